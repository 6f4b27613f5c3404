use std::time::Duration;

use serde::Deserialize;

/// Fixed listen port of the relay.
pub const LISTEN_PORT: u16 = 8000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Base URL of the watering controller, e.g. `http://garden.local:8080`.
    /// Used verbatim; an unset variable leaves this empty.
    pub watering_upstream: String,
    /// Pre-shared key configured on the Soracom Beam side.
    /// Recognised but not checked against inbound requests.
    pub soracom_beam_psk: Option<String>,
    /// Optional total timeout for the outbound call.
    /// Set via WATERING_UPSTREAM_TIMEOUT_SECS. Default: none.
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    pub fn new(watering_upstream: impl Into<String>) -> Self {
        Self {
            watering_upstream: watering_upstream.into(),
            ..Self::default()
        }
    }

    /// Returns the Beam pre-shared key, if one was configured.
    pub fn beam_psk(&self) -> Option<&str> {
        self.soracom_beam_psk.as_deref().filter(|k| !k.is_empty())
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let upstream_timeout = match std::env::var("WATERING_UPSTREAM_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("WATERING_UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
            })?;
            Some(Duration::from_secs(secs))
        }
        _ => None,
    };

    Ok(Config {
        watering_upstream: std::env::var("WATERING_UPSTREAM").unwrap_or_default(),
        soracom_beam_psk: std::env::var("SORACOM_BEAM_PSK").ok(),
        upstream_timeout,
    })
}

use serde::Deserialize;

use crate::errors::AppError;

/// Payload Soracom Beam posts after a USSD delivery, e.g.
/// `{"imsi":"295050910000000","ussdDataCodingScheme":15,"ussdString":"*901031*1234567#","value":"1234567"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActivationNotification {
    pub imsi: String,
    #[serde(rename = "ussdDataCodingScheme")]
    pub ussd_data_coding_scheme: i64,
    #[serde(rename = "ussdString")]
    pub ussd_string: String,
    /// Activation duration in seconds, as a decimal string.
    pub value: String,
}

impl ActivationNotification {
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))
    }

    /// How long the watering controller should stay on.
    pub fn activation_seconds(&self) -> Result<u64, AppError> {
        self.value.parse::<u64>().map_err(|e| {
            AppError::Decode(format!("invalid activation value {:?}: {}", self.value, e))
        })
    }
}

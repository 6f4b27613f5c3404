use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beam_relay::proxy::relay;
use beam_relay::proxy::upstream::UpstreamClient;
use beam_relay::{cli, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Export spans over OTLP only when a collector is configured.
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    let telemetry_layer = if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "beam-relay"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "beam_relay=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry_layer)
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Water { seconds }) => water_once(cfg, seconds).await,
        Some(cli::Commands::Serve) | None => run_server(cfg).await,
    };

    if let Err(ref e) = result {
        tracing::error!("{:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config) -> anyhow::Result<()> {
    if cfg.watering_upstream.is_empty() {
        tracing::warn!("WATERING_UPSTREAM is not set; activations will target a relative URL");
    }
    if cfg.beam_psk().is_some() {
        tracing::info!("SORACOM_BEAM_PSK is set (not enforced on inbound requests)");
    }

    let upstream = UpstreamClient::new(cfg.upstream_timeout)?;
    let state = Arc::new(AppState::new(cfg, Arc::new(upstream)));
    let app = beam_relay::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config::LISTEN_PORT));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("beam relay listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn water_once(cfg: config::Config, seconds: u64) -> anyhow::Result<()> {
    let upstream = UpstreamClient::new(cfg.upstream_timeout)?;
    let url = relay::assemble_water_url(&cfg.watering_upstream, seconds);

    match relay::dispatch(&upstream, &cfg.watering_upstream, seconds)
        .await
        .into_result()
    {
        Ok(body) => {
            println!("Watering requested:");
            println!("  URL:      {}", url);
            println!("  Seconds:  {}", seconds);
            println!("  Response: {}", String::from_utf8_lossy(&body));
            Ok(())
        }
        Err(e) => anyhow::bail!("activation via {} failed ({}): {}", url, e.status_code(), e),
    }
}

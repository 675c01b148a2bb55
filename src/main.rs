use anyhow::Result;
use cartkeeper::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    info!("Starting cartkeeper {}", env!("CARGO_PKG_VERSION"));
    info!("HTTP server listening on {}", config.http_addr());

    server::run(config, prometheus_handle).await
}

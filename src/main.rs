use anyhow::Result;
use shortlink::{config, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    telemetry::init_tracing(&config.log_level, &config.log_format);

    tracing::info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    config.print_summary();

    server::run(config).await
}

mod config;
mod runner;

use std::sync::Arc;

use config::Config;
use pledgepoint_connect::payment::PaymentConfig;
use pledgepoint_connect::terminal::SimulatedTerminal;
use pledgepoint_connect::{KioskApiClient, KioskFlow};
use runner::{ConsoleProgress, ConsoleStatus};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing();

    let backend = Arc::new(KioskApiClient::new(&config.api_url)?);
    let terminal = Arc::new(SimulatedTerminal::new());
    let flow = KioskFlow::new(
        backend,
        terminal,
        Arc::new(ConsoleProgress),
        Arc::new(ConsoleStatus),
        PaymentConfig {
            device_code: config.device_code.clone(),
            ..PaymentConfig::default()
        },
    );

    tracing::info!("Backend: {}", config.api_url);
    tracing::info!("Device code: {}", config.device_code);
    runner::run(flow, &config).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .init();
}

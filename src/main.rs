//! Flight board server

use flight_board::{config::AppConfig, errors::FlightBoardError, server};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), FlightBoardError> {
    #[cfg(feature = "dotenvy")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration, preferring environment variables and config files
    let config = AppConfig::load()?;
    config.validate()?;

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    server::serve(&config, shutdown_signal).await
}

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use taskboard_server::config::{ServerConfig, StartupError};
use taskboard_server::telemetry::init_tracing;
use taskboard_server::AppState;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = ServerConfig::parse();
    init_tracing(config.log_format);

    let store = config.open_store()?;
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind,
            source,
        })?;
    info!(addr = %config.bind, store = ?config.store, "listening");

    let state = AppState::new(store, config.payload_policy());
    taskboard_server::run(listener, state)
        .await
        .map_err(StartupError::Serve)
}

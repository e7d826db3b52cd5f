//! murmur: posts, comments and feeds over HTTP.
//!
//! ## Configuration
//! - `config.yaml` in the working directory, a path argument, or `MURMUR_CONFIG`
//! - `MURMUR__SECTION__KEY` environment overrides (e.g. `MURMUR__SERVER__PORT`)
//! - `MURMUR_LOG`: tracing filter (default `info`)

use tracing::{error, info};

use murmur::config::Config;
use murmur::handlers::{serve, AppState};
use murmur::storage::init_storage;
use murmur::utils::bootstrap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bootstrap::init_tracing();

    let config_path = bootstrap::parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Starting murmur");

    let stores = init_storage(&config.storage).await?;
    info!("Storage initialized");

    let shutdown = bootstrap::shutdown_signal();
    let state = AppState::new(
        &stores,
        &config.pagination,
        &config.request,
        shutdown.clone(),
    );

    serve(state, &config.server, shutdown)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    info!("murmur stopped");
    Ok(())
}

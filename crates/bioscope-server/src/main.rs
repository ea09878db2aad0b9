//! Bioscope Server Binary

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bioscope_core::BioscopeConfig;
use bioscope_server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,bioscope=debug")),
        )
        .init();

    let config = BioscopeConfig::load()?;
    let state = Arc::new(AppState::from_config(&config));

    serve(&config.server.addr, state).await
}

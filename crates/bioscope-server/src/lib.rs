//! Bioscope Server - research dashboard API
//!
//! JSON over HTTP for the dashboard: publications, experiments, AI insights,
//! aggregates, and NASA ingestion. Every route delegates to a shared
//! [`ResearchService`].

pub mod error;
pub mod http;
pub mod query;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bioscope_core::{BioscopeConfig, ResearchService};

pub use error::ApiError;

/// Shared application state
pub struct AppState {
    pub service: ResearchService,
}

impl AppState {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }

    /// Build the service from configuration
    pub fn from_config(config: &BioscopeConfig) -> Self {
        Self::new(ResearchService::from_config(config))
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Publications
        .route(
            "/api/publications",
            get(http::list_publications).post(http::create_publication),
        )
        .route(
            "/api/publications/{id}",
            get(http::get_publication).patch(http::update_publication),
        )
        .route("/api/search", get(http::search_publications))
        // Insights
        .route("/api/ai-insights", get(http::list_insights))
        .route("/api/ai-insights/generate", post(http::generate_insights))
        // Aggregates
        .route("/api/stats", get(http::get_stats))
        .route("/api/filter-options", get(http::get_filter_options))
        // Experiments
        .route(
            "/api/experiments",
            get(http::list_experiments).post(http::create_experiment),
        )
        .route("/api/experiments/{id}", get(http::get_experiment))
        // Ingestion
        .route("/api/ingest-nasa-data", post(http::ingest_nasa_data))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server and run until Ctrl-C
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Bioscope server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

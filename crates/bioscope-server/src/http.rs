//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use bioscope_core::{DashboardStats, FilterOptions, IngestRequest, SearchOutcome};
use bioscope_domain::{
    AiInsight, Experiment, NewExperiment, NewPublication, Publication, PublicationPatch,
};

use crate::error::ApiError;
use crate::query;
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Publications
// ============================================================================

/// List publications matching the query-string filters, most recent first
pub async fn list_publications(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<Vec<Publication>>> {
    let filters = query::publication_filters(raw.as_deref())?;
    Ok(Json(state.service.publications(&filters).await))
}

pub async fn get_publication(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Publication>> {
    state
        .service
        .publication(&id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Publication not found"))
}

pub async fn create_publication(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewPublication>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Publication>)> {
    let Json(new) = body?;
    let publication = state
        .service
        .create_publication(new)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create publication"))?;
    Ok((StatusCode::CREATED, Json(publication)))
}

pub async fn update_publication(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<PublicationPatch>, JsonRejection>,
) -> ApiResult<Json<Publication>> {
    let Json(patch) = body?;
    state
        .service
        .update_publication(&id, patch)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update publication"))?
        .map(Json)
        .ok_or(ApiError::NotFound("Publication not found"))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Free-text search plus suggested filters from the research assistant
pub async fn search_publications(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchOutcome>> {
    let q = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Search query required".to_string()))?;

    state
        .service
        .search(&q)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "Failed to search publications"))
}

// ============================================================================
// Insights
// ============================================================================

pub async fn list_insights(State(state): State<Arc<AppState>>) -> Json<Vec<AiInsight>> {
    Json(state.service.insights().await)
}

/// Analyze recent publications and return the insights that were stored
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AiInsight>>> {
    state
        .service
        .generate_insights()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "Failed to generate AI insights"))
}

// ============================================================================
// Aggregates
// ============================================================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    Json(state.service.stats().await)
}

pub async fn get_filter_options(State(state): State<Arc<AppState>>) -> Json<FilterOptions> {
    Json(state.service.filter_options().await)
}

// ============================================================================
// Experiments
// ============================================================================

pub async fn list_experiments(State(state): State<Arc<AppState>>) -> Json<Vec<Experiment>> {
    Json(state.service.experiments().await)
}

pub async fn get_experiment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Experiment>> {
    state
        .service
        .experiment(&id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Experiment not found"))
}

pub async fn create_experiment(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewExperiment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Experiment>)> {
    let Json(new) = body?;
    let experiment = state
        .service
        .create_experiment(new)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create experiment"))?;
    Ok((StatusCode::CREATED, Json(experiment)))
}

// ============================================================================
// Ingestion
// ============================================================================

/// Response for an ingest run
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub ingested: usize,
    pub total: usize,
}

/// Pull publications from NASA into the store.
///
/// The body is optional; an empty one uses the configured query and limit.
pub async fn ingest_nasa_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<IngestResponse>> {
    let request: IngestRequest = if body.iter().all(u8::is_ascii_whitespace) {
        IngestRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid ingest request: {}", e)))?
    };

    let report = state
        .service
        .ingest(request)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to ingest NASA data"))?;

    Ok(Json(IngestResponse {
        message: report.message(),
        ingested: report.ingested,
        total: report.total,
    }))
}

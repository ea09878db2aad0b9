//! HTTP error responses
//!
//! Failed requests answer with a `{"message": ...}` body. Validation
//! problems are echoed back to the client; anything internal goes to the log
//! and the client sees only the generic message for the operation.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use bioscope_core::BioscopeError;
use bioscope_domain::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a service error, logging internal detail under `context`.
    ///
    /// `context` doubles as the client-facing message for server-side
    /// failures.
    pub fn from_service(err: BioscopeError, context: &'static str) -> Self {
        match err {
            BioscopeError::Validation(e) => ApiError::BadRequest(e.to_string()),
            BioscopeError::NotFound(what) => {
                tracing::debug!("{}: {} not found", context, what);
                ApiError::NotFound("Not found")
            }
            err @ (BioscopeError::ExternalService { .. } | BioscopeError::Internal(_)) => {
                tracing::error!("{}: {}", context, err);
                ApiError::Internal(context)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

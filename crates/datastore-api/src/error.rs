//! API errors and their HTTP rendering
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use datastore_core::{CoreError, ErrorInfo};
use datastore_validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("data-set not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Dependency(#[from] CoreError),

    #[error("cannot connect to database")]
    DatabaseUnavailable,

    #[error("metrics encoding failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Dependency(_) | ApiError::DatabaseUnavailable | ApiError::Metrics(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Dependency(err) => err.detail(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            [(header::CACHE_CONTROL, "none")],
            Json(ErrorInfo::error(self.detail())),
        )
            .into_response()
    }
}

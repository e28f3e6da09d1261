//! API Handlers
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use datastore_core::{
    DataSet, DataSetStorage, FreshnessAggregator, MetadataDirectory,
};
use datastore_validation::{QueryParameters, ValidationPipeline};
use serde_json::json;

use crate::error::ApiError;
use crate::metrics::Metrics;

/// Collaborators every handler is built from
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn DataSetStorage>,
    pub directory: Arc<dyn MetadataDirectory>,
    pub freshness: Arc<FreshnessAggregator>,
    pub pipeline: Arc<ValidationPipeline>,
    pub metrics: Arc<Metrics>,
}

const NO_CACHE: [(header::HeaderName, &str); 1] = [(header::CACHE_CONTROL, "none")];

/// GET /_status
pub async fn status(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    if !state.storage.alive().await {
        return Err(ApiError::DatabaseUnavailable);
    }

    Ok((
        StatusCode::OK,
        NO_CACHE,
        Json(json!({ "status": "ok", "message": "database seems fine" })),
    ))
}

/// GET /_status/data-sets
///
/// Stale data-sets are reported with a 200; only a directory failure is a 500.
pub async fn data_set_status(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .freshness
        .check_directory(state.directory.as_ref())
        .await?;

    state.metrics.stale_data_sets.set(report.stale.len() as i64);
    state.metrics.unknown_data_sets.set(report.unknown.len() as i64);

    if let Some(info) = report.to_error_info() {
        tracing::warn!(stale = report.stale.len(), detail = %info.detail, "stale data-sets");
    }

    Ok((StatusCode::OK, NO_CACHE, Json(report.summary())))
}

/// GET /data/{data_set}
///
/// Validates the query window; execution against storage is not performed,
/// so `data` is always empty.
pub async fn query_data_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let metadata = state
        .directory
        .data_set(&name)
        .await?
        .filter(|meta| meta.queryable)
        .ok_or_else(|| ApiError::NotFound(name.clone()))?;
    let data_set = DataSet::new(state.storage.clone(), metadata);

    let params: QueryParameters = pairs.into_iter().collect();
    let window = state.pipeline.validate(&params).map_err(|err| {
        state.metrics.validation_failures_total.inc();
        tracing::debug!(data_set = %name, error = %err, "rejected query");
        ApiError::from(err)
    })?;

    let cache_control = format!("max-age={}", data_set.cache_duration());
    Ok((
        StatusCode::OK,
        [(header::CACHE_CONTROL, cache_control)],
        Json(json!({ "data": [], "window": window })),
    )
        .into_response())
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(state.metrics.encode()?)
}

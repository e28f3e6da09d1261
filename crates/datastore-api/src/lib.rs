//! Datastore read API: status and query-window endpoints
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use std::sync::Arc;

use axum::{routing::get, Router};
use datastore_core::{FreshnessAggregator, InMemoryStorage, MetadataDirectory, StaticDirectory};
use datastore_validation::ValidationPipeline;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use handlers::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/_status", get(handlers::status))
        .route("/_status/data-sets", get(handlers::data_set_status))
        .route("/data/{data_set}", get(handlers::query_data_set))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

/// Wire the default collaborators for `config`
pub fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    let directory = match &config.data_sets_path {
        Some(path) => StaticDirectory::from_file(path)?,
        None => StaticDirectory::default(),
    };
    tracing::info!(data_sets = directory.len(), "loaded data-set directory");

    let storage = Arc::new(InMemoryStorage::new());
    let freshness =
        FreshnessAggregator::new(storage.clone()).with_lookup_timeout(config.lookup_timeout);
    let directory: Arc<dyn MetadataDirectory> = Arc::new(directory);

    Ok(AppState {
        storage,
        directory,
        freshness: Arc::new(freshness),
        pipeline: Arc::new(ValidationPipeline::for_query(config.min_timespan_days)),
        metrics: Arc::new(metrics::Metrics::new()?),
    })
}

pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let app = create_app(build_state(&config)?);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Datastore API listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Resolve on SIGTERM or Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

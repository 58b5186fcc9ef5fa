//! verity-server library - HTTP API for provider record verification
//!
//! The pipeline is built once at startup and handed to handlers through
//! [`AppState`]; nothing is initialized lazily or held in a global.

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use verity_runtime::{FixtureSource, LogSink, Pipeline};

pub mod api;
pub mod config;
pub mod error;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Verification pipeline
    pub pipeline: Arc<Pipeline>,
    /// Fixture table the pipeline reads from, when it is fixture-backed
    catalog: Option<Arc<FixtureSource>>,
}

impl AppState {
    /// Build state with a pipeline reading from `fixtures` and logging actions.
    ///
    /// The same table backs `/api/providers`.
    pub fn from_fixtures(fixtures: FixtureSource) -> Self {
        let fixtures = Arc::new(fixtures);
        let pipeline = Pipeline::new(fixtures.clone(), Arc::new(LogSink::new()));
        Self {
            pipeline: Arc::new(pipeline),
            catalog: Some(fixtures),
        }
    }

    /// Build state around an arbitrary pipeline. No fixture catalog is listed.
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            catalog: None,
        }
    }

    /// Fixture table backing the pipeline, if any
    pub fn catalog(&self) -> Option<&FixtureSource> {
        self.catalog.as_deref()
    }
}

/// Build application router
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    use axum::routing::{get, post};

    let router = Router::new()
        .route("/api/validate", post(api::validate_provider))
        .route("/api/providers", get(api::list_providers))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

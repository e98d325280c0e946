use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    error::AppError,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::CatalogProvider,
        recommendations::{entropy_source, ComplementTable, RandomSource},
        Recommender,
    },
};

pub mod recommendations;

/// Builds the random source used for one request
pub type RandomSourceFactory = fn() -> Box<dyn RandomSource + Send>;

fn entropy_factory() -> Box<dyn RandomSource + Send> {
    Box::new(entropy_source())
}

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub catalog_provider: Arc<dyn CatalogProvider>,
    pub recommender: Recommender,
    pub catalog_limit: usize,
    pub random_source: RandomSourceFactory,
}

impl AppState {
    pub fn new(config: &Config, catalog_provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            catalog_provider,
            recommender: Recommender::new(
                ComplementTable::default(),
                config.catalog_source_name.clone(),
            ),
            catalog_limit: config.catalog_limit,
            random_source: entropy_factory,
        }
    }

    /// Replaces the per-request random source, e.g. with a fixed one
    pub fn with_random_source(mut self, random_source: RandomSourceFactory) -> Self {
        self.random_source = random_source;
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_check))
        .route("/get-recommendations", post(recommendations::recommend))
        .with_state(Arc::new(state))
        // Applied innermost-first: request-id ends up outermost, as with a
        // ServiceBuilder listing the layers in the opposite order.
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

pub mod analytics;
pub mod generators;
pub mod health;
pub mod productions;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    middleware,
    routing::get,
    Json, Router,
};
use energy_client::EnergyStore;
use serde::de::DeserializeOwned;

use crate::{error::ApiError, metrics_server};

/// Shared handler state. The store is built once in `main` and injected here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EnergyStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EnergyStore>) -> Self {
        Self { store }
    }
}

/// JSON body extractor that reports malformed input in the error envelope.
pub struct JsonBody<T>(pub T);

#[async_trait::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    metrics::counter!("api_validation_rejected_total", "field" => "body").increment(1);
    ApiError::InvalidArgument(format!("invalid request body: {}", rejection.body_text()))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/types", get(types::list).post(types::create))
        .route("/types/:id", get(types::get).put(types::update).delete(types::delete))
        .route("/types/:id/generators", get(types::generators))
        .route("/generators", get(generators::list).post(generators::create))
        .route(
            "/generators/:id",
            get(generators::get).put(generators::update).delete(generators::delete),
        )
        .route("/productions", get(productions::list).post(productions::create))
        .route(
            "/productions/:id",
            get(productions::get).put(productions::update).delete(productions::delete),
        )
        .route("/analytics/total-production", get(analytics::total_production))
        .route("/analytics/generator-efficiency", get(analytics::generator_efficiency))
        .route("/analytics/renewable-vs-nonrenewable", get(analytics::renewable_summary))
}

/// Full application router: `/`, `/health` and the versioned API under `base_path`.
pub fn build_router(state: AppState, base_path: &str) -> Router {
    let root = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health));

    let router = if base_path.is_empty() || base_path == "/" {
        root.merge(api_routes())
    } else {
        root.nest(base_path, api_routes())
    };

    router
        .layer(middleware::from_fn(metrics_server::track_requests))
        .with_state(state)
}

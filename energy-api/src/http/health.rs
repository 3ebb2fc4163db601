use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::AppState;
use crate::{error::ApiError, response};

pub async fn index() -> impl IntoResponse {
    response::ok(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Liveness plus a store round trip.
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(response::ok(json!({
        "database": "up",
        "backend": state.store.backend(),
    })))
}

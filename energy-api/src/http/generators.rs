use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{AppState, JsonBody};
use crate::{
    error::ApiError,
    response,
    validate::{self, CreateGeneratorRequest, UpdateGeneratorRequest},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorListQuery {
    pub type_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GeneratorListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let type_id = validate::parse_optional_uuid("typeId", query.type_id.as_deref())?;
    let generators = state.store.list_generators(type_id).await?;
    Ok(response::ok(generators))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("generator id", &id)?;
    let generator = state.store.get_generator(id).await?;
    Ok(response::ok(generator))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateGeneratorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = body.validate()?;
    let generator = state.store.create_generator(new).await?;
    Ok(response::created("generator created", generator))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateGeneratorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("generator id", &id)?;
    let patch = body.validate()?;
    let generator = state.store.update_generator(id, patch).await?;
    Ok(response::ok(generator))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("generator id", &id)?;
    state.store.delete_generator(id).await?;
    Ok(response::deleted())
}

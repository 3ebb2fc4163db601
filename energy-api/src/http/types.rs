use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{AppState, JsonBody};
use crate::{
    error::ApiError,
    response,
    validate::{self, CreateTypeRequest, UpdateTypeRequest},
};

#[derive(Debug, Default, Deserialize)]
pub struct TypeListQuery {
    pub renewable: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TypeListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let renewable = validate::parse_bool_flag("renewable", query.renewable.as_deref())?;
    let types = state.store.list_types(renewable).await?;
    Ok(response::ok(types))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("type id", &id)?;
    let ty = state.store.get_type(id).await?;
    Ok(response::ok(ty))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = body.validate()?;
    let ty = state.store.create_type(new).await?;
    Ok(response::created("type created", ty))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("type id", &id)?;
    let patch = body.validate()?;
    let ty = state.store.update_type(id, patch).await?;
    Ok(response::ok(ty))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("type id", &id)?;
    state.store.delete_type(id).await?;
    Ok(response::deleted())
}

/// Generators of one type; 404 when the type itself does not exist.
pub async fn generators(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("type id", &id)?;
    state.store.get_type(id).await?;
    let generators = state.store.list_generators(Some(id)).await?;
    Ok(response::ok(generators))
}

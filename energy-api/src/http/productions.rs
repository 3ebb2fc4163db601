use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use energy_client::domain::ProductionFilter;
use serde::Deserialize;

use super::{AppState, JsonBody};
use crate::{
    error::ApiError,
    response,
    validate::{self, CreateProductionRequest, UpdateProductionRequest},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionListQuery {
    pub generator_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ProductionFilter {
        generator_id: validate::parse_optional_uuid("generatorId", query.generator_id.as_deref())?,
        range: validate::date_range(
            "startDate",
            query.start_date.as_deref(),
            "endDate",
            query.end_date.as_deref(),
        )?,
    };
    let productions = state.store.list_productions(filter).await?;
    Ok(response::ok(productions))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("production id", &id)?;
    let production = state.store.get_production(id).await?;
    Ok(response::ok(production))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProductionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = body.validate()?;
    let production = state.store.create_production(new).await?;
    Ok(response::created("production created", production))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateProductionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("production id", &id)?;
    let patch = body.validate()?;
    let production = state.store.update_production(id, patch).await?;
    Ok(response::ok(production))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_uuid("production id", &id)?;
    state.store.delete_production(id).await?;
    Ok(response::deleted())
}

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use energy_client::domain::DateRange;
use serde::Deserialize;
use time::OffsetDateTime;

use super::AppState;
use crate::{error::ApiError, response, validate};

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`; `end` defaults to today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeQuery {
    fn range(&self) -> Result<DateRange, ApiError> {
        let today = OffsetDateTime::now_utc().date();
        Ok(validate::analytics_range(self.start.as_deref(), self.end.as_deref(), today)?)
    }
}

pub async fn total_production(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.store.total_production_by_date(query.range()?).await?;
    Ok(response::ok(rows))
}

pub async fn generator_efficiency(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.store.generator_efficiency(query.range()?).await?;
    Ok(response::ok(rows))
}

pub async fn renewable_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.store.renewable_summary(query.range()?).await?;
    Ok(response::ok(rows))
}

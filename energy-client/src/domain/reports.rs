use serde::Serialize;
use time::Date;
use uuid::Uuid;

pub const RENEWABLE: &str = "Renewable";
pub const NON_RENEWABLE: &str = "Non-Renewable";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyProduction {
    #[serde(with = "super::date_format")]
    pub date: Date,
    pub total_production: f64,
    pub renewable_production: f64,
    pub non_renewable_production: f64,
}

/// Average and efficiency are `None` when the generator has no records in range.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorEfficiency {
    pub generator_id: Uuid,
    pub type_name: String,
    pub capacity: f64,
    pub total_production: f64,
    pub avg_daily_production: Option<f64>,
    pub efficiency_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RenewableSummary {
    pub energy_type: String,
    pub total_capacity: f64,
    pub generator_count: i64,
    pub total_production: f64,
    pub avg_production: f64,
    pub percentage_of_total: f64,
}

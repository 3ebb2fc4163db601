pub mod analytics_queries;
pub mod generator_queries;
pub mod production_queries;
pub mod schema;
pub mod type_queries;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{
        DailyProduction, DateRange, EnergyType, EnergyTypePatch, Generator, GeneratorEfficiency,
        GeneratorPatch, NewEnergyType, NewGenerator, NewProduction, Production, ProductionFilter,
        ProductionPatch, RenewableSummary,
    },
    error::{StoreError, StoreResult},
    store::{AnalyticsStore, EnergyStore, EntityStore},
};

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn create_type(&self, new: NewEnergyType) -> StoreResult<EnergyType> {
        type_queries::insert_type(&self.pool, &new).await
    }

    async fn get_type(&self, id: Uuid) -> StoreResult<EnergyType> {
        type_queries::find_type(&self.pool, id)
            .await?
            .ok_or(StoreError::not_found("type", id))
    }

    async fn list_types(&self, is_renewable: Option<bool>) -> StoreResult<Vec<EnergyType>> {
        type_queries::list_types(&self.pool, is_renewable).await
    }

    async fn update_type(&self, id: Uuid, patch: EnergyTypePatch) -> StoreResult<EnergyType> {
        let current = self.get_type(id).await?;
        let merged = current.apply(patch);
        type_queries::update_type(&self.pool, id, &merged)
            .await?
            .ok_or(StoreError::not_found("type", id))
    }

    async fn delete_type(&self, id: Uuid) -> StoreResult<()> {
        type_queries::delete_type(&self.pool, id).await
    }

    async fn create_generator(&self, new: NewGenerator) -> StoreResult<Generator> {
        generator_queries::insert_generator(&self.pool, &new).await
    }

    async fn get_generator(&self, id: Uuid) -> StoreResult<Generator> {
        generator_queries::find_generator(&self.pool, id)
            .await?
            .ok_or(StoreError::not_found("generator", id))
    }

    async fn list_generators(&self, type_id: Option<Uuid>) -> StoreResult<Vec<Generator>> {
        generator_queries::list_generators(&self.pool, type_id).await
    }

    async fn update_generator(&self, id: Uuid, patch: GeneratorPatch) -> StoreResult<Generator> {
        let current = self.get_generator(id).await?;
        let merged = current.apply(patch);
        generator_queries::update_generator(&self.pool, id, &merged)
            .await?
            .ok_or(StoreError::not_found("generator", id))
    }

    async fn delete_generator(&self, id: Uuid) -> StoreResult<()> {
        generator_queries::delete_generator(&self.pool, id).await
    }

    async fn create_production(&self, new: NewProduction) -> StoreResult<Production> {
        production_queries::insert_production(&self.pool, &new).await
    }

    async fn get_production(&self, id: Uuid) -> StoreResult<Production> {
        production_queries::find_production(&self.pool, id)
            .await?
            .ok_or(StoreError::not_found("production", id))
    }

    async fn list_productions(&self, filter: ProductionFilter) -> StoreResult<Vec<Production>> {
        production_queries::list_productions(&self.pool, &filter).await
    }

    async fn update_production(&self, id: Uuid, patch: ProductionPatch) -> StoreResult<Production> {
        let current = self.get_production(id).await?;
        let merged = current.apply(patch);
        production_queries::update_production(&self.pool, id, &merged)
            .await?
            .ok_or(StoreError::not_found("production", id))
    }

    async fn delete_production(&self, id: Uuid) -> StoreResult<()> {
        production_queries::delete_production(&self.pool, id).await
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn total_production_by_date(&self, range: DateRange) -> StoreResult<Vec<DailyProduction>> {
        analytics_queries::total_production_by_date(&self.pool, range).await
    }

    async fn generator_efficiency(&self, range: DateRange) -> StoreResult<Vec<GeneratorEfficiency>> {
        analytics_queries::generator_efficiency(&self.pool, range).await
    }

    async fn renewable_summary(&self, range: DateRange) -> StoreResult<Vec<RenewableSummary>> {
        analytics_queries::renewable_summary(&self.pool, range).await
    }
}

#[async_trait]
impl EnergyStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::database("ping database", e))
    }
}

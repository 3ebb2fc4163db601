//! Storage seams. The HTTP layer only sees these traits; the concrete backend
//! (PostgreSQL or in-process) is chosen once at startup and injected.

use std::cmp::Ordering;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    domain::{
        DailyProduction, DateRange, EnergyType, EnergyTypePatch, Generator, GeneratorEfficiency,
        GeneratorPatch, NewEnergyType, NewGenerator, NewProduction, Production, ProductionFilter,
        ProductionPatch, RenewableSummary,
    },
    error::StoreResult,
};

/// CRUD over types, generators and production records.
///
/// Implementations enforce:
/// - case-insensitive unique type names (`DuplicateName`),
/// - existing parents for generators and productions (`ForeignKeyViolation`),
/// - one production record per generator and day (`DuplicatePeriod`),
/// - cascading deletes type → generators → productions.
///
/// Updates load the current record, merge the patch, then write guarded by
/// id. A delete that lands between the two steps surfaces as `NotFound`.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_type(&self, new: NewEnergyType) -> StoreResult<EnergyType>;
    async fn get_type(&self, id: Uuid) -> StoreResult<EnergyType>;
    /// Ordered by name.
    async fn list_types(&self, is_renewable: Option<bool>) -> StoreResult<Vec<EnergyType>>;
    async fn update_type(&self, id: Uuid, patch: EnergyTypePatch) -> StoreResult<EnergyType>;
    async fn delete_type(&self, id: Uuid) -> StoreResult<()>;

    async fn create_generator(&self, new: NewGenerator) -> StoreResult<Generator>;
    async fn get_generator(&self, id: Uuid) -> StoreResult<Generator>;
    /// Ordered by type name, then capacity descending.
    async fn list_generators(&self, type_id: Option<Uuid>) -> StoreResult<Vec<Generator>>;
    async fn update_generator(&self, id: Uuid, patch: GeneratorPatch) -> StoreResult<Generator>;
    async fn delete_generator(&self, id: Uuid) -> StoreResult<()>;

    async fn create_production(&self, new: NewProduction) -> StoreResult<Production>;
    async fn get_production(&self, id: Uuid) -> StoreResult<Production>;
    /// Ordered by date descending, then type name.
    async fn list_productions(&self, filter: ProductionFilter) -> StoreResult<Vec<Production>>;
    async fn update_production(&self, id: Uuid, patch: ProductionPatch) -> StoreResult<Production>;
    async fn delete_production(&self, id: Uuid) -> StoreResult<()>;
}

/// Read-side aggregates over the current production data.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Per-day totals with the renewable split, newest first. Days without
    /// records are omitted.
    async fn total_production_by_date(&self, range: DateRange) -> StoreResult<Vec<DailyProduction>>;
    /// Every generator, best efficiency first; generators without records in
    /// range come last with null average and efficiency.
    async fn generator_efficiency(&self, range: DateRange) -> StoreResult<Vec<GeneratorEfficiency>>;
    /// Exactly two rows, "Non-Renewable" then "Renewable".
    async fn renewable_summary(&self, range: DateRange) -> StoreResult<Vec<RenewableSummary>>;
}

#[async_trait]
pub trait EnergyStore: EntityStore + AnalyticsStore {
    fn backend(&self) -> &'static str;
    async fn ping(&self) -> StoreResult<()>;
}

pub(crate) fn invalid_capacity(capacity: f64) -> Option<String> {
    (!(capacity.is_finite() && capacity > 0.0)).then(|| format!("capacity must be greater than 0, got {capacity}"))
}

pub(crate) fn invalid_production(production_mw: f64) -> Option<String> {
    (!(production_mw.is_finite() && production_mw >= 0.0))
        .then(|| format!("productionMw must be non-negative, got {production_mw}"))
}

/// Name order used by every listing: case-insensitive first, raw bytes as the
/// tie-break so the result is total.
pub(crate) fn cmp_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

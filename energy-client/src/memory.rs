//! In-process store with the same constraints, cascades and orderings as the
//! PostgreSQL schema. Every operation runs under a single table lock, so the
//! uniqueness checks cannot race.

use std::collections::HashMap;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    analytics::{self, GeneratorFact, ProductionFact},
    domain::{
        DailyProduction, DateRange, EnergyType, EnergyTypePatch, Generator, GeneratorEfficiency,
        GeneratorPatch, NewEnergyType, NewGenerator, NewProduction, Production, ProductionFilter,
        ProductionPatch, RenewableSummary,
    },
    error::{StoreError, StoreResult},
    store::{cmp_names, invalid_capacity, invalid_production, AnalyticsStore, EnergyStore, EntityStore},
};

#[derive(Debug, Clone)]
struct GeneratorRow {
    id: Uuid,
    type_id: Uuid,
    capacity: f64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
struct ProductionRow {
    id: Uuid,
    generator_id: Uuid,
    date: Date,
    production_mw: f64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct Tables {
    types: HashMap<Uuid, EnergyType>,
    generators: HashMap<Uuid, GeneratorRow>,
    productions: HashMap<Uuid, ProductionRow>,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        let lowered = name.to_lowercase();
        self.types
            .values()
            .any(|t| Some(t.id) != except && t.name.to_lowercase() == lowered)
    }

    fn period_taken(&self, generator_id: Uuid, date: Date, except: Option<Uuid>) -> bool {
        self.productions
            .values()
            .any(|p| Some(p.id) != except && p.generator_id == generator_id && p.date == date)
    }

    fn generator(&self, row: &GeneratorRow) -> StoreResult<Generator> {
        let ty = self
            .types
            .get(&row.type_id)
            .ok_or(StoreError::ForeignKeyViolation {
                entity: "type",
                id: row.type_id,
            })?;
        Ok(Generator {
            id: row.id,
            type_id: row.type_id,
            type_name: ty.name.clone(),
            type_description: ty.description.clone(),
            is_renewable: ty.is_renewable,
            capacity: row.capacity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn production(&self, row: &ProductionRow) -> StoreResult<Production> {
        let generator = self
            .generators
            .get(&row.generator_id)
            .ok_or(StoreError::ForeignKeyViolation {
                entity: "generator",
                id: row.generator_id,
            })?;
        let generator = self.generator(generator)?;
        Ok(Production {
            id: row.id,
            generator_id: row.generator_id,
            generator_capacity: generator.capacity,
            type_name: generator.type_name,
            is_renewable: generator.is_renewable,
            date: row.date,
            production_mw: row.production_mw,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn check_generator(&self, new: &NewGenerator) -> StoreResult<()> {
        if let Some(reason) = invalid_capacity(new.capacity) {
            return Err(StoreError::InvalidRecord(reason));
        }
        if !self.types.contains_key(&new.type_id) {
            return Err(StoreError::ForeignKeyViolation {
                entity: "type",
                id: new.type_id,
            });
        }
        Ok(())
    }

    fn check_production(&self, new: &NewProduction, except: Option<Uuid>) -> StoreResult<()> {
        if let Some(reason) = invalid_production(new.production_mw) {
            return Err(StoreError::InvalidRecord(reason));
        }
        if !self.generators.contains_key(&new.generator_id) {
            return Err(StoreError::ForeignKeyViolation {
                entity: "generator",
                id: new.generator_id,
            });
        }
        if self.period_taken(new.generator_id, new.date, except) {
            return Err(StoreError::DuplicatePeriod {
                generator_id: new.generator_id,
                date: new.date,
            });
        }
        Ok(())
    }

    fn remove_generator(&mut self, id: Uuid) -> bool {
        if self.generators.remove(&id).is_none() {
            return false;
        }
        self.productions.retain(|_, p| p.generator_id != id);
        true
    }

    fn facts(&self, range: DateRange) -> (Vec<GeneratorFact>, Vec<ProductionFact>) {
        let generators = self
            .generators
            .values()
            .filter_map(|g| {
                self.types.get(&g.type_id).map(|t| GeneratorFact {
                    generator_id: g.id,
                    type_name: t.name.clone(),
                    capacity: g.capacity,
                    is_renewable: t.is_renewable,
                })
            })
            .collect();
        let productions = self
            .productions
            .values()
            .filter(|p| range.contains(p.date))
            .map(|p| ProductionFact {
                generator_id: p.generator_id,
                date: p.date,
                production_mw: p.production_mw,
            })
            .collect();
        (generators, productions)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_type(&self, new: NewEnergyType) -> StoreResult<EnergyType> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(&new.name, None) {
            return Err(StoreError::DuplicateName { name: new.name });
        }
        let now = OffsetDateTime::now_utc();
        let row = EnergyType {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            is_renewable: new.is_renewable,
            created_at: now,
            updated_at: now,
        };
        tables.types.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_type(&self, id: Uuid) -> StoreResult<EnergyType> {
        let tables = self.tables.read().await;
        tables
            .types
            .get(&id)
            .cloned()
            .ok_or(StoreError::not_found("type", id))
    }

    async fn list_types(&self, is_renewable: Option<bool>) -> StoreResult<Vec<EnergyType>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<EnergyType> = tables
            .types
            .values()
            .filter(|t| is_renewable.map_or(true, |flag| t.is_renewable == flag))
            .cloned()
            .collect();
        rows.sort_by(|a, b| cmp_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn update_type(&self, id: Uuid, patch: EnergyTypePatch) -> StoreResult<EnergyType> {
        let mut tables = self.tables.write().await;
        let current = tables.types.get(&id).ok_or(StoreError::not_found("type", id))?;
        let merged = current.apply(patch);
        if tables.name_taken(&merged.name, Some(id)) {
            return Err(StoreError::DuplicateName { name: merged.name });
        }
        let row = tables
            .types
            .get_mut(&id)
            .ok_or(StoreError::not_found("type", id))?;
        row.name = merged.name;
        row.description = merged.description;
        row.is_renewable = merged.is_renewable;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn delete_type(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.types.remove(&id).is_none() {
            return Err(StoreError::not_found("type", id));
        }
        let owned: Vec<Uuid> = tables
            .generators
            .values()
            .filter(|g| g.type_id == id)
            .map(|g| g.id)
            .collect();
        for generator_id in owned {
            tables.remove_generator(generator_id);
        }
        Ok(())
    }

    async fn create_generator(&self, new: NewGenerator) -> StoreResult<Generator> {
        let mut tables = self.tables.write().await;
        tables.check_generator(&new)?;
        let now = OffsetDateTime::now_utc();
        let row = GeneratorRow {
            id: Uuid::new_v4(),
            type_id: new.type_id,
            capacity: new.capacity,
            created_at: now,
            updated_at: now,
        };
        let generator = tables.generator(&row)?;
        tables.generators.insert(row.id, row);
        Ok(generator)
    }

    async fn get_generator(&self, id: Uuid) -> StoreResult<Generator> {
        let tables = self.tables.read().await;
        let row = tables
            .generators
            .get(&id)
            .ok_or(StoreError::not_found("generator", id))?;
        tables.generator(row)
    }

    async fn list_generators(&self, type_id: Option<Uuid>) -> StoreResult<Vec<Generator>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .generators
            .values()
            .filter(|g| type_id.map_or(true, |id| g.type_id == id))
            .map(|g| tables.generator(g))
            .collect::<StoreResult<Vec<_>>>()?;
        rows.sort_by(|a, b| {
            cmp_names(&a.type_name, &b.type_name)
                .then_with(|| b.capacity.total_cmp(&a.capacity))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn update_generator(&self, id: Uuid, patch: GeneratorPatch) -> StoreResult<Generator> {
        let mut tables = self.tables.write().await;
        let current = tables
            .generators
            .get(&id)
            .ok_or(StoreError::not_found("generator", id))?;
        let current = tables.generator(current)?;
        let merged = current.apply(patch);
        tables.check_generator(&merged)?;

        let row = tables
            .generators
            .get_mut(&id)
            .ok_or(StoreError::not_found("generator", id))?;
        row.type_id = merged.type_id;
        row.capacity = merged.capacity;
        row.updated_at = OffsetDateTime::now_utc();
        let row = row.clone();
        tables.generator(&row)
    }

    async fn delete_generator(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.remove_generator(id) {
            Ok(())
        } else {
            Err(StoreError::not_found("generator", id))
        }
    }

    async fn create_production(&self, new: NewProduction) -> StoreResult<Production> {
        let mut tables = self.tables.write().await;
        tables.check_production(&new, None)?;
        let now = OffsetDateTime::now_utc();
        let row = ProductionRow {
            id: Uuid::new_v4(),
            generator_id: new.generator_id,
            date: new.date,
            production_mw: new.production_mw,
            created_at: now,
            updated_at: now,
        };
        let production = tables.production(&row)?;
        tables.productions.insert(row.id, row);
        Ok(production)
    }

    async fn get_production(&self, id: Uuid) -> StoreResult<Production> {
        let tables = self.tables.read().await;
        let row = tables
            .productions
            .get(&id)
            .ok_or(StoreError::not_found("production", id))?;
        tables.production(row)
    }

    async fn list_productions(&self, filter: ProductionFilter) -> StoreResult<Vec<Production>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .productions
            .values()
            .filter(|p| filter.generator_id.map_or(true, |id| p.generator_id == id))
            .filter(|p| filter.range.contains(p.date))
            .map(|p| tables.production(p))
            .collect::<StoreResult<Vec<_>>>()?;
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| cmp_names(&a.type_name, &b.type_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn update_production(&self, id: Uuid, patch: ProductionPatch) -> StoreResult<Production> {
        let mut tables = self.tables.write().await;
        let current = tables
            .productions
            .get(&id)
            .ok_or(StoreError::not_found("production", id))?;
        let current = tables.production(current)?;
        let merged = current.apply(patch);
        tables.check_production(&merged, Some(id))?;

        let row = tables
            .productions
            .get_mut(&id)
            .ok_or(StoreError::not_found("production", id))?;
        row.generator_id = merged.generator_id;
        row.date = merged.date;
        row.production_mw = merged.production_mw;
        row.updated_at = OffsetDateTime::now_utc();
        let row = row.clone();
        tables.production(&row)
    }

    async fn delete_production(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.productions.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("production", id)),
        }
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn total_production_by_date(&self, range: DateRange) -> StoreResult<Vec<DailyProduction>> {
        let (generators, productions) = self.tables.read().await.facts(range);
        Ok(analytics::daily_totals(&generators, &productions))
    }

    async fn generator_efficiency(&self, range: DateRange) -> StoreResult<Vec<GeneratorEfficiency>> {
        let (generators, productions) = self.tables.read().await.facts(range);
        Ok(analytics::generator_efficiency(&generators, &productions))
    }

    async fn renewable_summary(&self, range: DateRange) -> StoreResult<Vec<RenewableSummary>> {
        let (generators, productions) = self.tables.read().await.facts(range);
        Ok(analytics::renewable_summary(&generators, &productions))
    }
}

#[async_trait]
impl EnergyStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Patch;
    use time::macros::date;

    async fn solar(store: &MemoryStore) -> EnergyType {
        store
            .create_type(NewEnergyType {
                name: "Solar".to_string(),
                description: "Photovoltaic panels".to_string(),
                is_renewable: true,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn type_names_are_unique_ignoring_case() {
        let store = MemoryStore::new();
        solar(&store).await;

        let err = store
            .create_type(NewEnergyType {
                name: "SOLAR".to_string(),
                description: "dup".to_string(),
                is_renewable: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn types_list_by_name_ignoring_case() {
        let store = MemoryStore::new();
        for name in ["wind", "Solar", "coal", "Hydro"] {
            store
                .create_type(NewEnergyType {
                    name: name.to_string(),
                    description: format!("{name} plant"),
                    is_renewable: true,
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_types(None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names, vec!["coal", "Hydro", "Solar", "wind"]);
    }

    #[tokio::test]
    async fn renaming_onto_another_type_is_rejected_but_self_rename_is_not() {
        let store = MemoryStore::new();
        let solar = solar(&store).await;
        let wind = store
            .create_type(NewEnergyType {
                name: "Wind".to_string(),
                description: "Turbines".to_string(),
                is_renewable: true,
            })
            .await
            .unwrap();

        let err = store
            .update_type(
                wind.id,
                EnergyTypePatch {
                    name: Patch::Set("solar".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));

        let renamed = store
            .update_type(
                solar.id,
                EnergyTypePatch {
                    name: Patch::Set("SOLAR".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "SOLAR");
        assert_eq!(renamed.description, "Photovoltaic panels");
    }

    #[tokio::test]
    async fn generator_requires_existing_type() {
        let store = MemoryStore::new();
        let err = store
            .create_generator(NewGenerator {
                type_id: Uuid::new_v4(),
                capacity: 10.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { entity: "type", .. }));
    }

    #[tokio::test]
    async fn deleting_a_type_cascades_to_generators_and_productions() {
        let store = MemoryStore::new();
        let ty = solar(&store).await;
        let generator = store
            .create_generator(NewGenerator {
                type_id: ty.id,
                capacity: 100.0,
            })
            .await
            .unwrap();
        let production = store
            .create_production(NewProduction {
                generator_id: generator.id,
                date: date!(2025 - 01 - 01),
                production_mw: 50.0,
            })
            .await
            .unwrap();

        store.delete_type(ty.id).await.unwrap();

        assert!(matches!(
            store.get_generator(generator.id).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.get_production(production.id).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_type(ty.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn one_production_per_generator_and_day() {
        let store = MemoryStore::new();
        let ty = solar(&store).await;
        let a = store
            .create_generator(NewGenerator { type_id: ty.id, capacity: 100.0 })
            .await
            .unwrap();
        let b = store
            .create_generator(NewGenerator { type_id: ty.id, capacity: 50.0 })
            .await
            .unwrap();
        let day = date!(2025 - 01 - 01);

        let first = store
            .create_production(NewProduction { generator_id: a.id, date: day, production_mw: 1.0 })
            .await
            .unwrap();
        store
            .create_production(NewProduction { generator_id: b.id, date: day, production_mw: 1.0 })
            .await
            .unwrap();
        let next_day = store
            .create_production(NewProduction {
                generator_id: a.id,
                date: date!(2025 - 01 - 02),
                production_mw: 1.0,
            })
            .await
            .unwrap();

        let err = store
            .create_production(NewProduction { generator_id: a.id, date: day, production_mw: 2.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePeriod { .. }));

        // Moving a record onto an occupied day is also a duplicate...
        let err = store
            .update_production(
                next_day.id,
                ProductionPatch { date: Patch::Set(day), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePeriod { .. }));

        // ...but re-saving a record onto its own day is not.
        store
            .update_production(
                first.id,
                ProductionPatch { date: Patch::Set(day), ..Default::default() },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn generators_sort_by_type_name_then_capacity_descending() {
        let store = MemoryStore::new();
        let wind = store
            .create_type(NewEnergyType {
                name: "Wind".to_string(),
                description: "Turbines".to_string(),
                is_renewable: true,
            })
            .await
            .unwrap();
        let solar = solar(&store).await;
        for (type_id, capacity) in [(wind.id, 5.0), (solar.id, 10.0), (solar.id, 80.0)] {
            store
                .create_generator(NewGenerator { type_id, capacity })
                .await
                .unwrap();
        }

        let listed = store.list_generators(None).await.unwrap();
        let order: Vec<(&str, f64)> = listed
            .iter()
            .map(|g| (g.type_name.as_str(), g.capacity))
            .collect();
        assert_eq!(order, vec![("Solar", 80.0), ("Solar", 10.0), ("Wind", 5.0)]);

        let only_wind = store.list_generators(Some(wind.id)).await.unwrap();
        assert_eq!(only_wind.len(), 1);
    }

    #[tokio::test]
    async fn update_rejects_non_positive_capacity() {
        let store = MemoryStore::new();
        let ty = solar(&store).await;
        let generator = store
            .create_generator(NewGenerator { type_id: ty.id, capacity: 10.0 })
            .await
            .unwrap();

        let err = store
            .update_generator(
                generator.id,
                GeneratorPatch { capacity: Patch::Set(0.0), ..Default::default() },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidRecord(_)));
        assert_eq!(store.get_generator(generator.id).await.unwrap().capacity, 10.0);
    }

    #[tokio::test]
    async fn production_listing_filters_by_inclusive_range() {
        let store = MemoryStore::new();
        let ty = solar(&store).await;
        let generator = store
            .create_generator(NewGenerator { type_id: ty.id, capacity: 10.0 })
            .await
            .unwrap();
        for day in [date!(2025 - 01 - 01), date!(2025 - 01 - 02), date!(2025 - 01 - 03)] {
            store
                .create_production(NewProduction { generator_id: generator.id, date: day, production_mw: 1.0 })
                .await
                .unwrap();
        }

        let filter = ProductionFilter {
            generator_id: Some(generator.id),
            range: DateRange::new(Some(date!(2025 - 01 - 02)), Some(date!(2025 - 01 - 03))),
        };
        let rows = store.list_productions(filter).await.unwrap();
        let dates: Vec<Date> = rows.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date!(2025 - 01 - 03), date!(2025 - 01 - 02)]);

        let open_ended = ProductionFilter {
            generator_id: None,
            range: DateRange::new(Some(date!(2025 - 01 - 02)), None),
        };
        assert_eq!(store.list_productions(open_ended).await.unwrap().len(), 2);
    }
}

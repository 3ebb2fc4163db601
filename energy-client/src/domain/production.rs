use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{DateRange, Patch};

/// One day of measured output for a generator.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: Uuid,
    pub generator_id: Uuid,
    pub generator_capacity: f64,
    pub type_name: String,
    pub is_renewable: bool,
    #[serde(with = "super::date_format")]
    pub date: Date,
    pub production_mw: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduction {
    pub generator_id: Uuid,
    pub date: Date,
    pub production_mw: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionPatch {
    pub generator_id: Patch<Uuid>,
    pub date: Patch<Date>,
    pub production_mw: Patch<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductionFilter {
    pub generator_id: Option<Uuid>,
    pub range: DateRange,
}

impl Production {
    pub fn apply(&self, patch: ProductionPatch) -> NewProduction {
        NewProduction {
            generator_id: patch.generator_id.merge(self.generator_id),
            date: patch.date.merge(self.date),
            production_mw: patch.production_mw.merge(self.production_mw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn sample() -> Production {
        Production {
            id: Uuid::new_v4(),
            generator_id: Uuid::new_v4(),
            generator_capacity: 100.0,
            type_name: "Solar".to_string(),
            is_renewable: true,
            date: date!(2025 - 01 - 01),
            production_mw: 50.0,
            created_at: datetime!(2025-01-01 00:00:00 UTC),
            updated_at: datetime!(2025-01-01 00:00:00 UTC),
        }
    }

    #[test]
    fn changing_only_output_keeps_generator_and_date() {
        let current = sample();
        let merged = current.apply(ProductionPatch {
            production_mw: Patch::Set(75.5),
            ..Default::default()
        });

        assert_eq!(merged.generator_id, current.generator_id);
        assert_eq!(merged.date, current.date);
        assert_eq!(merged.production_mw, 75.5);
    }

    #[test]
    fn serializes_with_camel_case_and_plain_date() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2025-01-01");
        assert_eq!(json["productionMw"], 50.0);
        assert_eq!(json["isRenewable"], true);
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00Z");
    }
}

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Patch;

/// A generating unit, read back together with its type.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub id: Uuid,
    pub type_id: Uuid,
    pub type_name: String,
    pub type_description: String,
    pub is_renewable: bool,
    pub capacity: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGenerator {
    pub type_id: Uuid,
    pub capacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorPatch {
    pub type_id: Patch<Uuid>,
    pub capacity: Patch<f64>,
}

impl Generator {
    pub fn apply(&self, patch: GeneratorPatch) -> NewGenerator {
        NewGenerator {
            type_id: patch.type_id.merge(self.type_id),
            capacity: patch.capacity.merge(self.capacity),
        }
    }
}

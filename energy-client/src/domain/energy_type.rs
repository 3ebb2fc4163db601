use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Patch;

/// Classification of a generator (Solar, Wind, Coal...).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnergyType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_renewable: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEnergyType {
    pub name: String,
    pub description: String,
    pub is_renewable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyTypePatch {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub is_renewable: Patch<bool>,
}

impl EnergyType {
    pub fn apply(&self, patch: EnergyTypePatch) -> NewEnergyType {
        NewEnergyType {
            name: patch.name.merge(self.name.clone()),
            description: patch.description.merge(self.description.clone()),
            is_renewable: patch.is_renewable.merge(self.is_renewable),
        }
    }
}

//! Raw JSON bodies and their conversion into validated store inputs.
//!
//! Bodies deserialize leniently (every field optional, identifiers and dates
//! as strings) so that missing or malformed values are reported through the
//! validator instead of a serde rejection.

use energy_client::domain::{
    EnergyTypePatch, GeneratorPatch, NewEnergyType, NewGenerator, NewProduction, Patch, ProductionPatch,
};
use serde::Deserialize;

use super::{
    bounded_text, capacity, parse_date, parse_uuid, production_mw, reject, required_text, ValidationError,
    TYPE_DESCRIPTION_MAX, TYPE_NAME_MAX,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_renewable: Option<bool>,
}

impl CreateTypeRequest {
    pub fn validate(self) -> Result<NewEnergyType, ValidationError> {
        Ok(NewEnergyType {
            name: required_text("name", self.name, TYPE_NAME_MAX)?,
            description: required_text("description", self.description, TYPE_DESCRIPTION_MAX)?,
            is_renewable: self.is_renewable.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTypeRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub is_renewable: Patch<bool>,
}

impl UpdateTypeRequest {
    pub fn validate(self) -> Result<EnergyTypePatch, ValidationError> {
        Ok(EnergyTypePatch {
            name: self.name.try_map(|v| bounded_text("name", v, TYPE_NAME_MAX))?,
            description: self
                .description
                .try_map(|v| bounded_text("description", v, TYPE_DESCRIPTION_MAX))?,
            is_renewable: self.is_renewable,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGeneratorRequest {
    pub type_id: Option<String>,
    pub capacity: Option<f64>,
}

impl CreateGeneratorRequest {
    pub fn validate(self) -> Result<NewGenerator, ValidationError> {
        let type_id = self.type_id.ok_or_else(|| reject("typeId", "is required"))?;
        let raw_capacity = self.capacity.ok_or_else(|| reject("capacity", "is required"))?;
        Ok(NewGenerator {
            type_id: parse_uuid("typeId", &type_id)?,
            capacity: capacity(raw_capacity)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGeneratorRequest {
    #[serde(default)]
    pub type_id: Patch<String>,
    #[serde(default)]
    pub capacity: Patch<f64>,
}

impl UpdateGeneratorRequest {
    pub fn validate(self) -> Result<GeneratorPatch, ValidationError> {
        Ok(GeneratorPatch {
            type_id: self.type_id.try_map(|v| parse_uuid("typeId", &v))?,
            capacity: self.capacity.try_map(capacity)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductionRequest {
    pub generator_id: Option<String>,
    pub date: Option<String>,
    pub production_mw: Option<f64>,
}

impl CreateProductionRequest {
    pub fn validate(self) -> Result<NewProduction, ValidationError> {
        let generator_id = self.generator_id.ok_or_else(|| reject("generatorId", "is required"))?;
        let date = self.date.ok_or_else(|| reject("date", "is required"))?;
        let output = self.production_mw.ok_or_else(|| reject("productionMw", "is required"))?;
        Ok(NewProduction {
            generator_id: parse_uuid("generatorId", &generator_id)?,
            date: parse_date("date", &date)?,
            production_mw: production_mw(output)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductionRequest {
    #[serde(default)]
    pub generator_id: Patch<String>,
    #[serde(default)]
    pub date: Patch<String>,
    #[serde(default)]
    pub production_mw: Patch<f64>,
}

impl UpdateProductionRequest {
    pub fn validate(self) -> Result<ProductionPatch, ValidationError> {
        Ok(ProductionPatch {
            generator_id: self.generator_id.try_map(|v| parse_uuid("generatorId", &v))?,
            date: self.date.try_map(|v| parse_date("date", &v))?,
            production_mw: self.production_mw.try_map(production_mw)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use uuid::Uuid;

    #[test]
    fn create_type_requires_name_and_description() {
        let missing: CreateTypeRequest = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(missing.validate().unwrap_err().field, "name");

        let long: CreateTypeRequest =
            serde_json::from_value(serde_json::json!({"name": "Solar", "description": "d".repeat(81)})).unwrap();
        assert_eq!(long.validate().unwrap_err().field, "description");

        let ok: CreateTypeRequest =
            serde_json::from_str(r#"{"name": "Solar", "description": "PV", "isRenewable": true}"#).unwrap();
        let new = ok.validate().unwrap();
        assert_eq!(new.name, "Solar");
        assert!(new.is_renewable);
    }

    #[test]
    fn update_type_validates_only_supplied_fields() {
        let req: UpdateTypeRequest = serde_json::from_str(r#"{"isRenewable": false}"#).unwrap();
        let patch = req.validate().unwrap();
        assert_eq!(patch.name, Patch::Keep);
        assert_eq!(patch.is_renewable, Patch::Set(false));

        let req: UpdateTypeRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn generator_capacity_must_be_positive() {
        let type_id = Uuid::new_v4();
        let req: CreateGeneratorRequest =
            serde_json::from_value(serde_json::json!({"typeId": type_id.to_string(), "capacity": 0})).unwrap();
        assert_eq!(req.validate().unwrap_err().field, "capacity");

        let req: CreateGeneratorRequest =
            serde_json::from_value(serde_json::json!({"typeId": "abc", "capacity": 10})).unwrap();
        assert_eq!(req.validate().unwrap_err().field, "typeId");

        let req: UpdateGeneratorRequest = serde_json::from_str(r#"{"capacity": -5}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn production_accepts_zero_output_and_iso_dates() {
        let generator_id = Uuid::new_v4();
        let req: CreateProductionRequest = serde_json::from_value(serde_json::json!({
            "generatorId": generator_id.to_string(),
            "date": "2025-01-01",
            "productionMw": 0
        }))
        .unwrap();
        let new = req.validate().unwrap();
        assert_eq!(new.date, date!(2025 - 01 - 01));
        assert_eq!(new.production_mw, 0.0);

        let req: UpdateProductionRequest = serde_json::from_str(r#"{"date": "2025/01/01"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().field, "date");
    }
}

pub mod date_format;
pub mod energy_type;
pub mod generator;
pub mod patch;
pub mod production;
pub mod range;
pub mod reports;

pub use energy_type::{EnergyType, EnergyTypePatch, NewEnergyType};
pub use generator::{Generator, GeneratorPatch, NewGenerator};
pub use patch::Patch;
pub use production::{NewProduction, Production, ProductionFilter, ProductionPatch};
pub use range::DateRange;
pub use reports::{DailyProduction, GeneratorEfficiency, RenewableSummary};

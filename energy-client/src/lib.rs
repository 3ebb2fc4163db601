pub mod analytics;
pub mod db;
pub mod domain;
pub mod error;
pub mod memory;
pub mod store;

pub use db::PgStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{AnalyticsStore, EnergyStore, EntityStore};

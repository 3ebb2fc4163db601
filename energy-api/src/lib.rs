pub mod config;
pub mod error;
pub mod http;
pub mod metrics_server;
pub mod observability;
pub mod response;
pub mod validate;

pub use error::ApiError;
pub use http::{build_router, AppState};

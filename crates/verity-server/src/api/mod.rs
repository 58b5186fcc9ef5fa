//! HTTP API handlers

pub mod health;
pub mod providers;
pub mod validate;

pub use health::health_routes;
pub use providers::list_providers;
pub use validate::validate_provider;

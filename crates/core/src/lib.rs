//! Shared domain types, configuration and errors for Leadboard.

pub mod coerce;
pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{LeadboardError, LeadboardResult};
pub use types::{AccountId, DateRange, MetricEntry, MetricRecord, Product, ProductId};

//! Record store: product catalog and daily metric records.
//!
//! Data stored in DashMap (development); the [`RecordSource`] seam lets a
//! database-backed store replace it without touching the analytics engine.
//!
//! [`RecordSource`]: leadboard_reporting::RecordSource

pub mod models;
pub mod store;

pub use models::{CreateProductRequest, ProductOrder, RenameProductRequest};
pub use store::{MetricsStore, DEMO_ACCOUNT};

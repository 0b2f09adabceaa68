#![warn(clippy::unwrap_used)]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod rest;
pub mod router;
pub mod server;

pub use rest::AppState;
pub use router::api_router;
pub use server::ApiServer;

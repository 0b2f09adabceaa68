//! Request types accepted by the store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameProductRequest {
    pub name: String,
}

/// Listing order for an account's products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductOrder {
    /// Alphabetical, case-insensitive.
    Name,
    /// Most recently created first.
    #[default]
    Newest,
}

use thiserror::Error;

pub type LeadboardResult<T> = Result<T, LeadboardError>;

#[derive(Error, Debug)]
pub enum LeadboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("At least one product must be selected")]
    EmptySelection,

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LeadboardError {
    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Validation(_) => "validation_failed",
            Self::InvalidRange { .. } => "invalid_date_range",
            Self::NotFound(_) => "not_found",
            Self::EmptySelection => "empty_selection",
            Self::Store(_) => "store_error",
            Self::Serialization(_) => "serialization_error",
            Self::Io(_) => "io_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// True for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidRange { .. } | Self::EmptySelection
        )
    }
}

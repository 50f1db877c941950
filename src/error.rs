//! Error types for ledger loading and study configuration

use thiserror::Error;

/// Errors raised while building or loading a reserve study
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid component '{name}': {reason}")]
    InvalidComponent { name: String, reason: String },

    #[error("Duplicate component name: '{0}'")]
    DuplicateComponent(String),

    #[error("Invalid horizon: {0} years")]
    InvalidHorizon(i64),

    #[error("Invalid start year {start_year}: a {horizon_years}-year horizon runs past the last representable year")]
    InvalidStartYear { start_year: i64, horizon_years: u32 },

    #[error("Invalid contribution search: {reason}")]
    InvalidSearch { reason: String },
}

pub type Result<T> = std::result::Result<T, StudyError>;

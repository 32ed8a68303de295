//! Error types for the Attribution Manager

use thiserror::Error;
use verbatim_domain::AttributionId;

/// Errors that can occur while managing attributions
#[derive(Error, Debug)]
pub enum AttributionError {
    /// Record is missing a required field or a field is out of its domain
    #[error("Invalid attribution: {0}")]
    Structural(String),

    /// No record exists for the ID
    #[error("Attribution not found: {0}")]
    NotFound(AttributionId),

    /// Export format is not `json` or `markdown`
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying store failed
    #[error("Store error: {0}")]
    Store(String),

    /// JSON export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

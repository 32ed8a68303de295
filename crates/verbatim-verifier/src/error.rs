//! Error types for the Verifier

use thiserror::Error;

/// Errors that can occur during verification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifierError {
    /// Quote is missing a required field or a field is out of its domain
    #[error("Invalid quote: {0}")]
    Structural(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A parallel verification task failed to complete
    #[error("Verification task failed: {0}")]
    Task(String),
}

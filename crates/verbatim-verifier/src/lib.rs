//! Verbatim Verifier
//!
//! Proves that quotations attached to insights actually occur in their source
//! transcript, assigns a calibrated confidence to that proof and screens for
//! fabricated ("hallucinated") quotes.
//!
//! # Architecture
//!
//! ```text
//! Quote + Transcript → validate → bounds check → LineMatcher → verdict → hallucination screen
//! ```
//!
//! # Key Features
//!
//! - **Structural validation**: malformed quotes are rejected with `VerifierError::Structural`
//! - **Best-match search**: exact, partial, fuzzy and two-line strategies
//! - **Hallucination screen**: injectable policy (anachronisms, overly complex language)
//! - **Batch processing**: per-item failure isolation, sequential or parallel
//! - **Reports and quality gate**: aggregate rates and a review decision for pipelines
//!
//! # Example Usage
//!
//! ```
//! use verbatim_domain::{Quote, Transcript};
//! use verbatim_verifier::{QuoteVerifier, VerifierConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transcript = Transcript::from_lines("session.txt", [
//!     "Welcome back everyone.",
//!     "First, make sure you have Docker installed and running on your system.",
//! ]);
//!
//! let verifier = QuoteVerifier::new(VerifierConfig::default())?;
//! let quote = Quote::new(
//!     "First, make sure you have Docker installed and running on your system.",
//!     "session.txt",
//!     2,
//! );
//!
//! let result = verifier.verify_quote(&quote, &transcript)?;
//! assert!(result.is_valid);
//! assert_eq!(result.confidence, 1.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod gate;
mod hallucination;
mod report;
mod verifier;


pub use config::{VerifierConfig, DEFAULT_ANACHRONISM_TERMS};
pub use error::VerifierError;
pub use gate::{GateDecision, QualityGate};
pub use hallucination::TermListPolicy;
pub use report::{
    AnnotatedInsight, BatchItem, ConfidenceSummary, VerificationReport, VerificationStatus,
};
pub use verifier::{QuoteVerifier, LINE_OUT_OF_RANGE, QUOTE_NOT_FOUND};

//! Verbatim Domain Layer
//!
//! This crate contains the data model shared by every Verbatim component. It
//! defines the value objects that flow through quote verification and source
//! attribution, plus the trait interfaces behind which storage and heuristic
//! policies live.
//!
//! ## Key Concepts
//!
//! - **Transcript**: An ordered, immutable list of line-indexed records
//! - **Quote**: A claimed verbatim excerpt of a transcript, attached to an insight
//! - **Verification Result**: The verdict on whether a quote occurs in its source
//! - **Attribution Record**: A versioned, auditable link from an insight to its sources
//! - **Relationships**: Symmetric, typed edges between insights
//!
//! ## Architecture
//!
//! - Minimal dependencies (identifiers and serialization only)
//! - Pure data and small invariant-preserving helpers
//! - Infrastructure implementations live in other crates
//! - Trait definitions for storage and hallucination screening

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribution;
pub mod audit;
pub mod id;
pub mod quote;
pub mod relationship;
pub mod traits;
pub mod transcript;
pub mod verification;

// Re-exports for convenience
pub use attribution::{
    AttributionRecord, AttributionSnapshot, AttributionUpdate, SourceReference,
    TranscriptMetadata, VerificationMethod, VersionSnapshot,
};
pub use audit::{AuditEvent, AuditEventType};
pub use id::{AttributionId, InsightId};
pub use quote::{Insight, Quote};
pub use relationship::{Relationship, RelationshipType};
pub use transcript::{Transcript, TranscriptLine};
pub use verification::{Correction, MatchLocation, MatchType, VerificationResult};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_current() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
        assert!(now_millis() < u64::MAX);
    }
}

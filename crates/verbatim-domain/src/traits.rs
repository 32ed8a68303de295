//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Implementations live in other crates.

use crate::{AttributionId, AttributionRecord, AuditEvent, InsightId, Relationship};

/// Repository for attribution records, audit events and the relationship graph
///
/// Implemented by the infrastructure layer (verbatim-store). Implementations
/// must keep `version_history` and audit events append-only.
pub trait AttributionStore {
    /// Error type for store operations
    type Error;

    /// Get a record by ID
    fn get_attribution(&self, id: AttributionId) -> Result<Option<AttributionRecord>, Self::Error>;

    /// Insert or replace a record
    fn put_attribution(&mut self, record: AttributionRecord) -> Result<(), Self::Error>;

    /// Append an audit event for a record
    fn append_event(&mut self, id: AttributionId, event: AuditEvent) -> Result<(), Self::Error>;

    /// All audit events for a record, in insertion order
    fn get_events(&self, id: AttributionId) -> Result<Vec<AuditEvent>, Self::Error>;

    /// Store a forward edge and its reverse; both are written or neither is
    fn add_relationship_pair(
        &mut self,
        forward: Relationship,
        reverse: Relationship,
    ) -> Result<(), Self::Error>;

    /// Outgoing edges of an insight
    fn get_relationships(&self, id: InsightId) -> Result<Vec<Relationship>, Self::Error>;
}

/// Heuristic screen for fabricated quotes
///
/// Implemented by the application layer (verbatim-verifier). Each returned
/// string names one suspicious pattern; an empty list means nothing was found.
pub trait HallucinationPolicy: Send + Sync {
    /// Inspect a quote's text
    fn suspicious_patterns(&self, text: &str) -> Vec<String>;
}

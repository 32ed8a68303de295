//! Read-only projections of attribution records

use serde::{Deserialize, Serialize};
use verbatim_domain::{AttributionId, AuditEvent};

/// Context lines around a traced quote
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceContext {
    /// Lines before the quote, space-joined
    pub before: Option<String>,
    /// Lines after the quote, space-joined
    pub after: Option<String>,
}

/// Denormalized view of one source reference for citation rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTrace {
    /// Transcript file
    pub file: String,
    /// Every line covered by the quote
    pub line_numbers: Vec<u32>,
    /// Number of lines covered
    pub span_lines: u32,
    /// Cue timestamp, when known
    pub timestamp: Option<String>,
    /// The quoted text
    pub original_text: String,
    /// Surrounding lines
    pub context: SourceContext,
    /// Verification confidence
    pub confidence: f64,
    /// Character offset within the newline-joined transcript
    pub character_offset: usize,
}

/// Kind of drift found by an integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityIssueKind {
    /// A referenced line no longer exists
    MissingLines,
    /// The first referenced line no longer contains the quote
    QuoteMismatch,
}

/// One reference that failed an integrity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    /// Kind of drift
    #[serde(rename = "type")]
    pub kind: IntegrityIssueKind,
    /// Index of the reference within the record
    pub reference_index: usize,
    /// Human-readable detail
    pub message: String,
}

/// Result of re-checking a record against a current transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// No issue was found
    pub is_valid: bool,
    /// One entry per failing reference
    pub issues: Vec<IntegrityIssue>,
    /// Mean confidence over references that passed (0 if none did)
    pub confidence_score: f64,
}

/// Ordered history of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    /// Record the trail belongs to
    pub attribution_id: AttributionId,
    /// Events sorted ascending by timestamp
    pub events: Vec<AuditEvent>,
    /// Record creation time (ms)
    pub created_at: u64,
    /// Record last update time (ms)
    pub updated_at: Option<u64>,
    /// Current record version
    pub version: u32,
    /// Number of events
    pub event_count: usize,
}

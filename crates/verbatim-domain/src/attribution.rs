//! Attribution records linking insights to transcript evidence
//!
//! Records are immutable values: a revision is built from the prior record
//! plus an update, and the prior state is kept in `version_history`.

use crate::{AttributionId, InsightId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How strongly a reference was verified, derived from its confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Confidence of exactly 1.0
    ExactMatch,
    /// Confidence above 0.9
    FuzzyMatch,
    /// Confidence above 0.7
    PartialMatch,
    /// Anything else
    LowConfidence,
}

impl VerificationMethod {
    /// Classify a confidence value
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 1.0 {
            VerificationMethod::ExactMatch
        } else if confidence > 0.9 {
            VerificationMethod::FuzzyMatch
        } else if confidence > 0.7 {
            VerificationMethod::PartialMatch
        } else {
            VerificationMethod::LowConfidence
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::ExactMatch => "exact_match",
            VerificationMethod::FuzzyMatch => "fuzzy_match",
            VerificationMethod::PartialMatch => "partial_match",
            VerificationMethod::LowConfidence => "low_confidence",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence for one quote inside an attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Transcript file
    pub file: String,
    /// First line of the quote
    pub line_start: u32,
    /// Last line of the quote
    pub line_end: u32,
    /// Cue timestamp, when known
    pub timestamp: Option<String>,
    /// The quoted text
    pub exact_quote: String,
    /// Lines immediately before the quote, space-joined
    pub context_before: Option<String>,
    /// Lines immediately after the quote, space-joined
    pub context_after: Option<String>,
    /// Verification confidence in [0, 1]
    pub confidence: f64,
    /// Method derived from `confidence`
    pub verification_method: VerificationMethod,
    /// Character offset of the quote within the newline-joined transcript
    pub character_offset: usize,
}

impl SourceReference {
    /// Number of lines spanned (inclusive)
    pub fn span_lines(&self) -> u32 {
        self.line_end.saturating_sub(self.line_start) + 1
    }

    /// Line numbers covered by the reference, inclusive
    pub fn line_numbers(&self) -> Vec<u32> {
        (self.line_start..=self.line_end).collect()
    }

    /// Check required fields and domains, returning the first violation
    pub fn validate(&self) -> Result<(), String> {
        if self.file.is_empty() {
            return Err("file is empty".to_string());
        }
        if self.exact_quote.is_empty() {
            return Err("exact_quote is empty".to_string());
        }
        if self.line_start == 0 {
            return Err("line_start must be >= 1".to_string());
        }
        if self.line_end < self.line_start {
            return Err(format!(
                "line_end {} < line_start {}",
                self.line_end, self.line_start
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} out of range [0.0, 1.0]",
                self.confidence
            ));
        }
        Ok(())
    }
}

/// Transcript facts captured when an attribution is created
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscriptMetadata {
    /// Transcript file name
    pub filename: String,
    /// Number of lines at attribution time
    pub total_lines: usize,
    /// Ingestion metadata copied from the transcript
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// The state of a record at one version, without its own history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionSnapshot {
    /// Attribution identifier
    pub attribution_id: AttributionId,
    /// Attributed insight
    pub insight_id: InsightId,
    /// Evidence
    pub source_references: Vec<SourceReference>,
    /// Transcript facts
    pub transcript_metadata: TranscriptMetadata,
    /// Creation time (ms)
    pub created_at: u64,
    /// Last update time (ms)
    pub updated_at: Option<u64>,
    /// Version number
    pub version: u32,
}

/// One entry of a record's version history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    /// Version the snapshot was taken at
    pub version: u32,
    /// Full prior state
    pub data: AttributionSnapshot,
    /// When that state was last written (its `updated_at`, else `created_at`)
    pub updated_at: u64,
}

/// A durable, versioned link from an insight back to transcript evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionRecord {
    /// Attribution identifier
    pub attribution_id: AttributionId,
    /// Attributed insight
    pub insight_id: InsightId,
    /// Evidence, at least one entry
    pub source_references: Vec<SourceReference>,
    /// Transcript facts
    pub transcript_metadata: TranscriptMetadata,
    /// Creation time (ms)
    pub created_at: u64,
    /// Last update time (ms)
    pub updated_at: Option<u64>,
    /// Starts at 1, +1 per update
    pub version: u32,
    /// Append-only prior states, oldest first
    pub version_history: Vec<VersionSnapshot>,
}

impl AttributionRecord {
    /// Create a version-1 record
    pub fn new(
        insight_id: InsightId,
        source_references: Vec<SourceReference>,
        transcript_metadata: TranscriptMetadata,
        created_at: u64,
    ) -> Self {
        Self {
            attribution_id: AttributionId::new(),
            insight_id,
            source_references,
            transcript_metadata,
            created_at,
            updated_at: None,
            version: 1,
            version_history: Vec::new(),
        }
    }

    /// The record's current state without history
    pub fn snapshot(&self) -> AttributionSnapshot {
        AttributionSnapshot {
            attribution_id: self.attribution_id,
            insight_id: self.insight_id,
            source_references: self.source_references.clone(),
            transcript_metadata: self.transcript_metadata.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }

    /// Check structural requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.source_references.is_empty() {
            return Err("attribution must have at least one source reference".to_string());
        }
        if self.version == 0 {
            return Err("version must be >= 1".to_string());
        }
        for (idx, reference) in self.source_references.iter().enumerate() {
            reference
                .validate()
                .map_err(|e| format!("source reference {}: {}", idx, e))?;
        }
        Ok(())
    }

    /// Build the next version of this record
    ///
    /// `self` is left untouched. When `track_history` is set, the prior state
    /// is appended to the new record's `version_history`.
    pub fn revise(&self, update: &AttributionUpdate, now: u64, track_history: bool) -> Self {
        let mut version_history = self.version_history.clone();
        if track_history {
            version_history.push(VersionSnapshot {
                version: self.version,
                data: self.snapshot(),
                updated_at: self.updated_at.unwrap_or(self.created_at),
            });
        }

        Self {
            attribution_id: self.attribution_id,
            insight_id: update.insight_id.unwrap_or(self.insight_id),
            source_references: update
                .source_references
                .clone()
                .unwrap_or_else(|| self.source_references.clone()),
            transcript_metadata: update
                .transcript_metadata
                .clone()
                .unwrap_or_else(|| self.transcript_metadata.clone()),
            created_at: self.created_at,
            updated_at: Some(now),
            version: self.version + 1,
            version_history,
        }
    }
}

/// Fields that may be replaced by an update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributionUpdate {
    /// Re-point the attribution at another insight
    pub insight_id: Option<InsightId>,
    /// Replace the evidence
    pub source_references: Option<Vec<SourceReference>>,
    /// Replace the transcript facts
    pub transcript_metadata: Option<TranscriptMetadata>,
}

impl AttributionUpdate {
    /// Update that replaces the evidence
    pub fn source_references(references: Vec<SourceReference>) -> Self {
        Self {
            source_references: Some(references),
            ..Self::default()
        }
    }

    /// Names of the top-level fields this update sets
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.insight_id.is_some() {
            fields.push("insight_id");
        }
        if self.source_references.is_some() {
            fields.push("source_references");
        }
        if self.transcript_metadata.is_some() {
            fields.push("transcript_metadata");
        }
        fields
    }

    /// Whether the update sets nothing
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}

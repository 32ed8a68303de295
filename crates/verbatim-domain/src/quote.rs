//! Quotes and the insights that carry them

use crate::InsightId;
use serde::{Deserialize, Serialize};

/// A claimed verbatim excerpt of a transcript
///
/// Created by the upstream extractor and read-only during verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Claimed quotation text (non-empty)
    pub text: String,

    /// Transcript file the quote claims to come from
    pub source_file: String,

    /// First line (1-based)
    pub line_start: u32,

    /// Last line (>= `line_start`)
    pub line_end: u32,

    /// Optional cue timestamp of the first line
    pub timestamp: Option<String>,

    /// Confidence in [0, 1]; optional on input, computed by verification
    pub confidence: Option<f64>,
}

impl Quote {
    /// Create a single-line quote without timestamp or confidence
    pub fn new(text: impl Into<String>, source_file: impl Into<String>, line: u32) -> Self {
        Self {
            text: text.into(),
            source_file: source_file.into(),
            line_start: line,
            line_end: line,
            timestamp: None,
            confidence: None,
        }
    }

    /// Widen the quote to end at `line_end`
    pub fn with_line_end(mut self, line_end: u32) -> Self {
        self.line_end = line_end;
        self
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Attach a confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A documentation entry produced by segmentation + classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Insight identifier
    pub insight_id: InsightId,

    /// Category label (tip, gotcha, how-to, ...)
    pub category: String,

    /// Short title
    pub title: String,

    /// Summary text
    pub summary: String,

    /// Supporting quotes
    pub quotes: Vec<Quote>,
}

impl Insight {
    /// Create an insight with a fresh identifier
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        quotes: Vec<Quote>,
    ) -> Self {
        Self {
            insight_id: InsightId::new(),
            category: category.into(),
            title: title.into(),
            summary: summary.into(),
            quotes,
        }
    }
}

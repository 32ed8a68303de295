//! Verification verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a quote was located in its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Normalized quote equals a normalized line
    Exact,
    /// Normalized quote is a substring of one line or two adjacent lines
    Partial,
    /// Edit-distance similarity above the fuzzy floor
    Fuzzy,
    /// Not found
    None,
}

impl MatchType {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Partial => "partial",
            MatchType::Fuzzy => "fuzzy",
            MatchType::None => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the transcript a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLocation {
    /// Line number of the matching (first) line
    pub line_number: u32,
    /// First line of the matched span
    pub line_start: u32,
    /// Last line of the matched span
    pub line_end: u32,
}

impl MatchLocation {
    /// A single-line location
    pub fn single(line_number: u32) -> Self {
        Self {
            line_number,
            line_start: line_number,
            line_end: line_number,
        }
    }

    /// A location spanning `line_start..=line_end`
    pub fn span(line_start: u32, line_end: u32) -> Self {
        Self {
            line_number: line_start,
            line_start,
            line_end,
        }
    }
}

/// A word-level difference between a quote and the fuzzily matched line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Word index within the normalized quote
    pub position: usize,
    /// Word as quoted
    pub original: String,
    /// Word as it appears in the source
    pub actual: String,
}

/// The verdict of verifying one quote
///
/// Produced fresh per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the quote is accepted as occurring in its source
    pub is_valid: bool,

    /// Calibrated confidence in [0, 1]
    pub confidence: f64,

    /// Which strategy located the quote
    pub match_type: MatchType,

    /// Where the quote was found
    pub location: Option<MatchLocation>,

    /// The source text that matched
    pub actual_text: Option<String>,

    /// Word-level corrections (fuzzy matches only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corrections: Vec<Correction>,

    /// Hallucination indicators (only when flagged)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suspicious_patterns: Vec<String>,

    /// Structural and lookup errors
    pub errors: Vec<String>,
}

impl VerificationResult {
    /// A negative verdict carrying a single error
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            ..Self::default()
        }
    }
}

impl Default for VerificationResult {
    fn default() -> Self {
        Self {
            is_valid: false,
            confidence: 0.0,
            match_type: MatchType::None,
            location: None,
            actual_text: None,
            corrections: Vec::new(),
            suspicious_patterns: Vec::new(),
            errors: Vec::new(),
        }
    }
}

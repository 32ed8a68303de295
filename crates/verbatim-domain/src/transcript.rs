//! Normalized transcript records
//!
//! Transcripts arrive already parsed (TXT/VTT/SRT are handled upstream) as an
//! ordered list of line-indexed records. They are never mutated here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single line of a normalized transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// 1-based line number, contiguous within one transcript
    pub line_number: u32,

    /// Optional cue timestamp (e.g. "00:01:23")
    pub timestamp: Option<String>,

    /// Optional speaker label
    pub speaker: Option<String>,

    /// Line text (non-empty)
    pub text: String,
}

impl TranscriptLine {
    /// Create a line without timestamp or speaker
    pub fn new(line_number: u32, text: impl Into<String>) -> Self {
        Self {
            line_number,
            timestamp: None,
            speaker: None,
            text: text.into(),
        }
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Attach a speaker label
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

/// A whole transcript as handed over by the ingestion component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Source file name
    pub filename: String,

    /// Ordered lines
    pub content: Vec<TranscriptLine>,

    /// Free-form ingestion metadata (format, duration, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Transcript {
    /// Create a transcript from a filename and its lines
    pub fn new(filename: impl Into<String>, content: Vec<TranscriptLine>) -> Self {
        Self {
            filename: filename.into(),
            content,
            metadata: BTreeMap::new(),
        }
    }

    /// Build a transcript from plain strings, numbering lines from 1
    pub fn from_lines<I, S>(filename: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content = lines
            .into_iter()
            .enumerate()
            .map(|(idx, text)| TranscriptLine::new(idx as u32 + 1, text))
            .collect();
        Self::new(filename, content)
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the transcript has no lines
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Index into `content` of the line carrying `line_number`
    pub fn index_of(&self, line_number: u32) -> Option<usize> {
        self.content.iter().position(|l| l.line_number == line_number)
    }

    /// The line carrying `line_number`
    pub fn line(&self, line_number: u32) -> Option<&TranscriptLine> {
        self.index_of(line_number).map(|idx| &self.content[idx])
    }
}

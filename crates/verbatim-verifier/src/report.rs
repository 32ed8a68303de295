//! Batch results and aggregate verification reports

use serde::{Deserialize, Serialize};
use verbatim_domain::{Insight, VerificationResult};

/// One verified quote within a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Position of the quote in the submitted batch
    pub original_index: usize,

    /// Verdict for that quote
    pub result: VerificationResult,
}

/// Confidence buckets across a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    /// Confidence above 0.9
    pub high_confidence: usize,
    /// Confidence in (0.7, 0.9]
    pub medium_confidence: usize,
    /// Confidence at or below 0.7
    pub low_confidence: usize,
}

impl ConfidenceSummary {
    fn record(&mut self, confidence: f64) {
        if confidence > 0.9 {
            self.high_confidence += 1;
        } else if confidence > 0.7 {
            self.medium_confidence += 1;
        } else {
            self.low_confidence += 1;
        }
    }
}

/// Aggregate outcome of verifying a set of quotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Quotes submitted
    pub total_quotes: usize,
    /// Quotes accepted
    pub valid_quotes: usize,
    /// Quotes rejected
    pub invalid_quotes: usize,
    /// `valid_quotes / total_quotes` (0 for an empty batch)
    pub verification_rate: f64,
    /// Mean confidence (0 for an empty batch)
    pub average_confidence: f64,
    /// Results flagged by the hallucination screen
    pub potential_hallucinations: usize,
    /// Per-quote results in submission order
    pub details: Vec<BatchItem>,
    /// Confidence buckets
    pub summary: ConfidenceSummary,
}

impl VerificationReport {
    /// Aggregate batch results
    pub fn from_items(details: Vec<BatchItem>, potential_hallucinations: usize) -> Self {
        let total_quotes = details.len();
        let valid_quotes = details.iter().filter(|d| d.result.is_valid).count();

        let mut summary = ConfidenceSummary::default();
        let mut confidence_sum = 0.0;
        for item in &details {
            summary.record(item.result.confidence);
            confidence_sum += item.result.confidence;
        }

        let (verification_rate, average_confidence) = if total_quotes == 0 {
            (0.0, 0.0)
        } else {
            (
                valid_quotes as f64 / total_quotes as f64,
                confidence_sum / total_quotes as f64,
            )
        };

        Self {
            total_quotes,
            valid_quotes,
            invalid_quotes: total_quotes - valid_quotes,
            verification_rate,
            average_confidence,
            potential_hallucinations,
            details,
            summary,
        }
    }
}

/// Publication status of an insight derived from its quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Every quote is valid and none is flagged
    Verified,
    /// Some quotes verified, others invalid or flagged
    NeedsReview,
    /// No quote verified
    Unverified,
}

/// An insight whose quotes carry computed confidences
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedInsight {
    /// The insight, with each quote's `confidence` set from its verdict
    pub insight: Insight,
    /// Verdicts in quote order
    pub results: Vec<VerificationResult>,
    /// Derived publication status
    pub status: VerificationStatus,
}

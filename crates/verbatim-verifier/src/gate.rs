//! Pipeline quality gate over verification reports

use crate::report::VerificationReport;
use serde::{Deserialize, Serialize};

/// Thresholds below which a pipeline run needs human review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    /// Minimum fraction of valid quotes
    pub min_verification_rate: f64,

    /// Minimum mean confidence
    pub min_average_confidence: f64,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            min_verification_rate: 0.8,
            min_average_confidence: 0.7,
        }
    }
}

/// Outcome of evaluating a report against a gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Whether the run must be reviewed before publishing
    pub requires_review: bool,

    /// Thresholds that were missed
    pub reasons: Vec<String>,
}

impl QualityGate {
    /// Evaluate a report
    pub fn evaluate(&self, report: &VerificationReport) -> GateDecision {
        let mut reasons = Vec::new();

        if report.verification_rate < self.min_verification_rate {
            reasons.push(format!(
                "verification rate {:.2} below {:.2}",
                report.verification_rate, self.min_verification_rate
            ));
        }
        if report.average_confidence < self.min_average_confidence {
            reasons.push(format!(
                "average confidence {:.2} below {:.2}",
                report.average_confidence, self.min_average_confidence
            ));
        }

        GateDecision {
            requires_review: !reasons.is_empty(),
            reasons,
        }
    }
}

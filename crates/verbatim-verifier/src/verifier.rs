//! Core QuoteVerifier implementation

use crate::config::VerifierConfig;
use crate::error::VerifierError;
use crate::hallucination::TermListPolicy;
use crate::report::{AnnotatedInsight, BatchItem, VerificationReport, VerificationStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};
use verbatim_domain::traits::HallucinationPolicy;
use verbatim_domain::{Insight, Quote, Transcript, VerificationResult};
use verbatim_matcher::LineMatcher;

/// Error recorded when `line_start` lies past the end of the transcript
pub const LINE_OUT_OF_RANGE: &str = "Line numbers out of range";

/// Error recorded when no strategy locates the quote
pub const QUOTE_NOT_FOUND: &str = "Quote not found in source";

/// Proves that claimed quotations occur in their source transcript
///
/// Verification is a pure function of the quote, the transcript and the
/// configuration, so the verifier is cheap to clone and safe to share
/// across threads.
#[derive(Clone)]
pub struct QuoteVerifier {
    config: Arc<VerifierConfig>,
    matcher: LineMatcher,
    policy: Arc<dyn HallucinationPolicy>,
}

impl QuoteVerifier {
    /// Create a verifier with the default term-list hallucination policy
    pub fn new(config: VerifierConfig) -> Result<Self, VerifierError> {
        let policy = TermListPolicy::from_config(&config)?;
        Self::with_policy(config, Arc::new(policy))
    }

    /// Create a verifier with a custom hallucination policy
    pub fn with_policy(
        config: VerifierConfig,
        policy: Arc<dyn HallucinationPolicy>,
    ) -> Result<Self, VerifierError> {
        config.validate().map_err(VerifierError::Config)?;
        Ok(Self {
            matcher: LineMatcher::new(config.weights.clone()),
            config: Arc::new(config),
            policy,
        })
    }

    /// Create a verifier with default configuration
    pub fn default_config() -> Result<Self, VerifierError> {
        Self::new(VerifierConfig::default())
    }

    /// The configuration in use
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Check that a quote is structurally sound
    pub fn validate_quote(&self, quote: &Quote) -> Result<(), VerifierError> {
        if quote.text.trim().is_empty() {
            return Err(VerifierError::Structural("text is empty".to_string()));
        }
        if quote.source_file.is_empty() {
            return Err(VerifierError::Structural("source_file is empty".to_string()));
        }
        if quote.line_start == 0 {
            return Err(VerifierError::Structural("line_start must be >= 1".to_string()));
        }
        if quote.line_end < quote.line_start {
            return Err(VerifierError::Structural(format!(
                "line_end {} < line_start {}",
                quote.line_end, quote.line_start
            )));
        }
        if let Some(confidence) = quote.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(VerifierError::Structural(format!(
                    "confidence {} out of range [0.0, 1.0]",
                    confidence
                )));
            }
        }
        Ok(())
    }

    /// Verify one quote against its transcript
    ///
    /// Structural violations are returned as `Err`. A quote that cannot be
    /// located is a negative `VerificationResult`, not an error.
    pub fn verify_quote(
        &self,
        quote: &Quote,
        transcript: &Transcript,
    ) -> Result<VerificationResult, VerifierError> {
        self.validate_quote(quote)?;

        if quote.line_start as usize > transcript.len() {
            debug!(
                "Quote line {} beyond transcript '{}' ({} lines)",
                quote.line_start,
                transcript.filename,
                transcript.len()
            );
            return Ok(VerificationResult::invalid(LINE_OUT_OF_RANGE));
        }

        let mut result = match self.matcher.find_best_match(&quote.text, &transcript.content) {
            Some(found) => VerificationResult {
                is_valid: found.confidence >= self.config.min_confidence_threshold,
                confidence: found.confidence,
                match_type: found.match_type,
                location: Some(found.location),
                actual_text: Some(found.actual_text),
                corrections: found.corrections,
                suspicious_patterns: Vec::new(),
                errors: Vec::new(),
            },
            None => VerificationResult::invalid(QUOTE_NOT_FOUND),
        };

        let patterns = self.policy.suspicious_patterns(&quote.text);
        if result.confidence < self.config.min_confidence_threshold || !patterns.is_empty() {
            result.suspicious_patterns = patterns;
        }

        if self.is_potential_hallucination(&result) {
            warn!(
                "Potential hallucination in '{}' line {}: confidence {:.2}, patterns {:?}",
                quote.source_file, quote.line_start, result.confidence, result.suspicious_patterns
            );
        } else {
            debug!(
                "Verified quote at '{}' line {}: {} ({:.2})",
                quote.source_file, quote.line_start, result.match_type, result.confidence
            );
        }

        Ok(result)
    }

    /// Whether a verdict should be treated as a possible fabrication
    pub fn is_potential_hallucination(&self, result: &VerificationResult) -> bool {
        result.confidence < self.config.min_confidence_threshold
            || !result.suspicious_patterns.is_empty()
    }

    /// Verify quotes one by one; a failing item never aborts the batch
    pub fn batch_verify(&self, quotes: &[Quote], transcript: &Transcript) -> Vec<BatchItem> {
        quotes
            .iter()
            .enumerate()
            .map(|(original_index, quote)| BatchItem {
                original_index,
                result: self.verify_or_capture(quote, transcript),
            })
            .collect()
    }

    /// Verify quotes concurrently on the blocking pool
    ///
    /// Items are independent; results come back ordered by `original_index`
    /// regardless of completion order.
    pub async fn batch_verify_parallel(
        &self,
        quotes: Vec<Quote>,
        transcript: Arc<Transcript>,
    ) -> Vec<BatchItem> {
        let handles: Vec<_> = quotes
            .into_iter()
            .map(|quote| {
                let verifier = self.clone();
                let transcript = Arc::clone(&transcript);
                tokio::task::spawn_blocking(move || verifier.verify_or_capture(&quote, &transcript))
            })
            .collect();

        let mut items = Vec::with_capacity(handles.len());
        for (original_index, handle) in handles.into_iter().enumerate() {
            let result = handle.await.unwrap_or_else(|e| {
                VerificationResult::invalid(VerifierError::Task(e.to_string()).to_string())
            });
            items.push(BatchItem {
                original_index,
                result,
            });
        }

        info!("Parallel verification complete: {} quotes", items.len());
        items
    }

    /// Verify a batch and aggregate the outcome
    pub fn generate_verification_report(
        &self,
        quotes: &[Quote],
        transcript: &Transcript,
    ) -> VerificationReport {
        let details = self.batch_verify(quotes, transcript);
        let flagged = details
            .iter()
            .filter(|d| self.is_potential_hallucination(&d.result))
            .count();
        let report = VerificationReport::from_items(details, flagged);

        info!(
            "Verification report for '{}': {}/{} valid, avg confidence {:.2}, {} flagged",
            transcript.filename,
            report.valid_quotes,
            report.total_quotes,
            report.average_confidence,
            report.potential_hallucinations
        );
        report
    }

    /// Verify an insight's quotes, recording each computed confidence
    pub fn annotate_insight(&self, insight: &Insight, transcript: &Transcript) -> AnnotatedInsight {
        let results: Vec<VerificationResult> = insight
            .quotes
            .iter()
            .map(|quote| self.verify_or_capture(quote, transcript))
            .collect();

        let mut annotated = insight.clone();
        for (quote, result) in annotated.quotes.iter_mut().zip(&results) {
            quote.confidence = Some(result.confidence);
        }

        let accepted = results
            .iter()
            .filter(|r| r.is_valid && !self.is_potential_hallucination(r))
            .count();
        let any_valid = results.iter().any(|r| r.is_valid);
        let status = if !results.is_empty() && accepted == results.len() {
            VerificationStatus::Verified
        } else if any_valid {
            VerificationStatus::NeedsReview
        } else {
            VerificationStatus::Unverified
        };

        AnnotatedInsight {
            insight: annotated,
            results,
            status,
        }
    }

    fn verify_or_capture(&self, quote: &Quote, transcript: &Transcript) -> VerificationResult {
        self.verify_quote(quote, transcript).unwrap_or_else(|e| {
            warn!("Quote failed validation: {}", e);
            VerificationResult::invalid(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbatim_domain::MatchType;

    const DOCKER_LINE: &str =
        "First, make sure you have Docker installed and running on your system.";

    fn transcript() -> Transcript {
        Transcript::from_lines(
            "docker-session.txt",
            [
                "Welcome to the session on containers.",
                DOCKER_LINE,
                "Then pull the base image before building.",
                "Finally, run the tests inside the container.",
            ],
        )
    }

    fn verifier() -> QuoteVerifier {
        QuoteVerifier::default_config().unwrap()
    }

    #[test]
    fn test_exact_quote() {
        let quote = Quote::new(DOCKER_LINE, "docker-session.txt", 2);
        let result = verifier().verify_quote(&quote, &transcript()).unwrap();

        assert!(result.is_valid);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.location.map(|l| l.line_number), Some(2));
        assert_eq!(result.actual_text.as_deref(), Some(DOCKER_LINE));
        assert!(result.errors.is_empty());
        assert!(result.suspicious_patterns.is_empty());
    }

    #[test]
    fn test_quote_with_stripped_punctuation() {
        let quote = Quote::new(
            "First make sure you have Docker installed and running on your system",
            "docker-session.txt",
            2,
        );
        let result = verifier().verify_quote(&quote, &transcript()).unwrap();

        assert!(result.is_valid);
        assert!(result.confidence > 0.9);
        assert!(matches!(result.match_type, MatchType::Exact | MatchType::Fuzzy));
    }

    #[test]
    fn test_quote_not_found() {
        let quote = Quote::new("Kubernetes autoscaling solves everything", "docker-session.txt", 1);
        let result = verifier().verify_quote(&quote, &transcript()).unwrap();

        assert!(!result.is_valid);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.errors.iter().any(|e| e == QUOTE_NOT_FOUND));
    }

    #[test]
    fn test_line_out_of_range() {
        let quote = Quote::new(DOCKER_LINE, "docker-session.txt", 5);
        let result = verifier().verify_quote(&quote, &transcript()).unwrap();

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e == LINE_OUT_OF_RANGE));
    }

    #[test]
    fn test_structural_errors_are_returned() {
        let v = verifier();
        let t = transcript();

        let empty = Quote::new("", "docker-session.txt", 1);
        assert!(matches!(v.verify_quote(&empty, &t), Err(VerifierError::Structural(_))));

        let backwards = Quote::new(DOCKER_LINE, "docker-session.txt", 3).with_line_end(2);
        assert!(matches!(v.verify_quote(&backwards, &t), Err(VerifierError::Structural(_))));

        let bad_confidence = Quote::new(DOCKER_LINE, "docker-session.txt", 2).with_confidence(1.5);
        assert!(matches!(v.verify_quote(&bad_confidence, &t), Err(VerifierError::Structural(_))));

        let zero_line = Quote::new(DOCKER_LINE, "docker-session.txt", 0);
        assert!(matches!(v.verify_quote(&zero_line, &t), Err(VerifierError::Structural(_))));
    }

    #[test]
    fn test_verification_is_idempotent() {
        let v = verifier();
        let t = transcript();
        let quote = Quote::new("pull the base image", "docker-session.txt", 3);

        assert_eq!(v.verify_quote(&quote, &t).unwrap(), v.verify_quote(&quote, &t).unwrap());
    }

    #[test]
    fn test_low_confidence_match_is_flagged() {
        let v = verifier();
        let quote = Quote::new("pull the base image", "docker-session.txt", 3);
        let result = v.verify_quote(&quote, &transcript()).unwrap();

        assert_eq!(result.match_type, MatchType::Partial);
        assert!(!result.is_valid);
        assert!(v.is_potential_hallucination(&result));
    }

    #[test]
    fn test_exact_quote_with_anachronism_is_flagged() {
        let t = Transcript::from_lines("x.txt", ["We should put this on the blockchain."]);
        let v = verifier();
        let quote = Quote::new("We should put this on the blockchain.", "x.txt", 1);
        let result = v.verify_quote(&quote, &t).unwrap();

        assert!(result.is_valid);
        assert_eq!(result.suspicious_patterns, vec!["anachronistic term: blockchain".to_string()]);
        assert!(v.is_potential_hallucination(&result));
    }

    #[test]
    fn test_custom_policy_is_used() {
        struct FlagEverything;
        impl HallucinationPolicy for FlagEverything {
            fn suspicious_patterns(&self, _text: &str) -> Vec<String> {
                vec!["always".to_string()]
            }
        }

        let v = QuoteVerifier::with_policy(VerifierConfig::default(), Arc::new(FlagEverything)).unwrap();
        let quote = Quote::new(DOCKER_LINE, "docker-session.txt", 2);
        let result = v.verify_quote(&quote, &transcript()).unwrap();
        assert_eq!(result.suspicious_patterns, vec!["always".to_string()]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = VerifierConfig::default();
        config.min_confidence_threshold = -1.0;
        assert!(matches!(QuoteVerifier::new(config), Err(VerifierError::Config(_))));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let quotes = vec![
            Quote::new(DOCKER_LINE, "docker-session.txt", 2),
            Quote::new("", "docker-session.txt", 1),
            Quote::new(DOCKER_LINE, "docker-session.txt", 9),
        ];
        let items = verifier().batch_verify(&quotes, &transcript());

        assert_eq!(items.len(), 3);
        assert_eq!(items.iter().map(|i| i.original_index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(items[0].result.is_valid);
        assert!(items[1].result.errors[0].starts_with("Invalid quote"));
        assert_eq!(items[2].result.errors, vec![LINE_OUT_OF_RANGE.to_string()]);
    }

    #[test]
    fn test_report() {
        let quotes = vec![
            Quote::new(DOCKER_LINE, "docker-session.txt", 2),
            Quote::new("Finally, run the tests inside the container.", "docker-session.txt", 4),
            Quote::new("Nobody said this at all", "docker-session.txt", 1),
        ];
        let report = verifier().generate_verification_report(&quotes, &transcript());

        assert_eq!(report.total_quotes, 3);
        assert_eq!(report.valid_quotes, 2);
        assert_eq!(report.invalid_quotes, 1);
        assert!((report.verification_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.average_confidence - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.potential_hallucinations, 1);
        assert_eq!(report.summary.high_confidence, 2);
        assert_eq!(report.summary.low_confidence, 1);
    }

    #[test]
    fn test_annotate_insight_statuses() {
        let v = verifier();
        let t = transcript();

        let verified = Insight::new(
            "how-to",
            "Install Docker first",
            "Docker must be running.",
            vec![Quote::new(DOCKER_LINE, "docker-session.txt", 2)],
        );
        let annotated = v.annotate_insight(&verified, &t);
        assert_eq!(annotated.status, VerificationStatus::Verified);
        assert_eq!(annotated.insight.quotes[0].confidence, Some(1.0));

        let mixed = Insight::new(
            "how-to",
            "Mixed",
            "One real, one invented.",
            vec![
                Quote::new(DOCKER_LINE, "docker-session.txt", 2),
                Quote::new("Invented words entirely", "docker-session.txt", 1),
            ],
        );
        assert_eq!(v.annotate_insight(&mixed, &t).status, VerificationStatus::NeedsReview);

        let empty = Insight::new("tip", "Nothing", "No quotes.", vec![]);
        assert_eq!(v.annotate_insight(&empty, &t).status, VerificationStatus::Unverified);
    }

    #[tokio::test]
    async fn test_parallel_batch_preserves_order() {
        let quotes: Vec<Quote> = (1..=4)
            .map(|line| {
                let text = transcript().content[line as usize - 1].text.clone();
                Quote::new(text, "docker-session.txt", line)
            })
            .chain(std::iter::once(Quote::new("", "docker-session.txt", 1)))
            .collect();

        let v = verifier();
        let sequential = v.batch_verify(&quotes, &transcript());
        let parallel = v.batch_verify_parallel(quotes, Arc::new(transcript())).await;

        assert_eq!(parallel, sequential);
        for (idx, item) in parallel.iter().enumerate().take(4) {
            assert_eq!(item.original_index, idx);
            assert_eq!(item.result.location.map(|l| l.line_number), Some(idx as u32 + 1));
        }
        assert!(!parallel[4].result.is_valid);
    }
}

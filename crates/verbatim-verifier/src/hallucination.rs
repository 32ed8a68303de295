//! Heuristic screens for fabricated quotes
//!
//! These are best-effort signals, not proofs. Policies are injectable so the
//! rules can change without touching the verifier's control flow.

use crate::config::VerifierConfig;
use crate::error::VerifierError;
use regex::Regex;
use verbatim_domain::traits::HallucinationPolicy;

/// Default policy: anachronistic vocabulary plus overly complex language
///
/// The two detectors run independently and their hits are unioned.
#[derive(Debug, Clone)]
pub struct TermListPolicy {
    anachronisms: Option<Regex>,
    complex_token_length: f64,
}

impl TermListPolicy {
    /// Build a policy from a term list and a mean-token-length limit
    pub fn new<I, S>(terms: I, complex_token_length: f64) -> Result<Self, VerifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = terms
            .into_iter()
            .map(|t| regex::escape(t.as_ref().trim()))
            .filter(|t| !t.is_empty())
            .collect();

        let anachronisms = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
            Some(Regex::new(&pattern).map_err(|e| VerifierError::Config(e.to_string()))?)
        };

        Ok(Self {
            anachronisms,
            complex_token_length,
        })
    }

    /// Build the policy described by a verifier configuration
    pub fn from_config(config: &VerifierConfig) -> Result<Self, VerifierError> {
        Self::new(&config.anachronism_terms, config.complex_token_length)
    }

    fn anachronistic_terms(&self, text: &str) -> Vec<String> {
        let Some(regex) = &self.anachronisms else {
            return Vec::new();
        };

        let mut found: Vec<String> = Vec::new();
        for m in regex.find_iter(text) {
            let term = m.as_str().to_lowercase();
            if !found.contains(&term) {
                found.push(term);
            }
        }
        found
            .into_iter()
            .map(|term| format!("anachronistic term: {}", term))
            .collect()
    }

    fn overly_complex(&self, text: &str) -> Option<String> {
        let lengths: Vec<usize> = text.split_whitespace().map(|t| t.chars().count()).collect();
        if lengths.is_empty() {
            return None;
        }
        let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        (mean > self.complex_token_length)
            .then(|| format!("overly complex language (mean token length {:.1})", mean))
    }
}

impl HallucinationPolicy for TermListPolicy {
    fn suspicious_patterns(&self, text: &str) -> Vec<String> {
        let mut patterns = self.anachronistic_terms(text);
        patterns.extend(self.overly_complex(text));
        patterns
    }
}

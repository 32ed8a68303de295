//! Configuration for the Verifier

use serde::{Deserialize, Serialize};
use verbatim_matcher::MatchWeights;

/// Terms unlikely to appear in the transcripts this verifier is tuned for
pub const DEFAULT_ANACHRONISM_TERMS: &[&str] = &[
    "blockchain",
    "cryptocurrency",
    "metaverse",
    "web3",
    "nft",
    "quantum computing",
    "neural network",
    "machine learning",
    "artificial intelligence",
    "large language model",
];

/// Configuration for the Verifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Minimum match confidence for a quote to be valid
    pub min_confidence_threshold: f64,

    /// Mean token length (chars) above which a quote reads as overly complex
    pub complex_token_length: f64,

    /// Vocabulary flagged as anachronistic for the transcript's era/domain
    #[serde(default = "default_anachronism_terms")]
    pub anachronism_terms: Vec<String>,

    /// Line matcher weights
    #[serde(default)]
    pub weights: MatchWeights,
}

fn default_anachronism_terms() -> Vec<String> {
    DEFAULT_ANACHRONISM_TERMS.iter().map(|t| t.to_string()).collect()
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            min_confidence_threshold: 0.7,
            complex_token_length: 7.0,
            anachronism_terms: default_anachronism_terms(),
            weights: MatchWeights::default(),
        }
    }
}

impl VerifierConfig {
    /// Strict preset: higher acceptance threshold, tighter fuzzy matching
    pub fn strict() -> Self {
        Self {
            min_confidence_threshold: 0.85,
            complex_token_length: 6.5,
            anachronism_terms: default_anachronism_terms(),
            weights: MatchWeights::strict(),
        }
    }

    /// Lenient preset: accepts noisier transcriptions
    pub fn lenient() -> Self {
        Self {
            min_confidence_threshold: 0.5,
            complex_token_length: 8.0,
            anachronism_terms: default_anachronism_terms(),
            weights: MatchWeights::lenient(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence_threshold) {
            return Err(format!(
                "min_confidence_threshold {} out of range [0.0, 1.0]",
                self.min_confidence_threshold
            ));
        }
        if self.complex_token_length <= 0.0 {
            return Err("complex_token_length must be greater than 0".to_string());
        }
        if self.anachronism_terms.iter().any(|t| t.trim().is_empty()) {
            return Err("anachronism_terms must not contain blank entries".to_string());
        }
        self.weights.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VerifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_confidence_threshold, 0.7);
        assert_eq!(config.weights.fuzzy_match_weight, 0.8);
        assert_eq!(config.weights.partial_match_weight, 0.6);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(VerifierConfig::strict().validate().is_ok());
        assert!(VerifierConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = VerifierConfig::default();
        config.min_confidence_threshold = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_term_rejected() {
        let mut config = VerifierConfig::default();
        config.anachronism_terms.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = VerifierConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = VerifierConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = VerifierConfig::from_toml(
            "min_confidence_threshold = 0.8\ncomplex_token_length = 7.5\n",
        )
        .unwrap();
        assert_eq!(parsed.min_confidence_threshold, 0.8);
        assert_eq!(parsed.weights, MatchWeights::default());
        assert_eq!(parsed.anachronism_terms.len(), DEFAULT_ANACHRONISM_TERMS.len());
    }
}

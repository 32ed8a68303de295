//! Match scoring weights

use serde::{Deserialize, Serialize};

/// Weights and thresholds applied by the line matcher
///
/// Partial and fuzzy weights must stay strictly below the exact weight so an
/// exact match always ranks first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    /// Confidence assigned to an exact match
    pub exact_match_weight: f64,

    /// Multiplier applied to edit-distance similarity
    pub fuzzy_match_weight: f64,

    /// Multiplier applied to the substring coverage ratio
    pub partial_match_weight: f64,

    /// Raw similarity a line must exceed to be a fuzzy candidate
    pub fuzzy_similarity_floor: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            exact_match_weight: 1.0,
            fuzzy_match_weight: 0.8,
            partial_match_weight: 0.6,
            fuzzy_similarity_floor: 0.7,
        }
    }
}

impl MatchWeights {
    /// Tighter fuzzy floor, lower partial credit
    pub fn strict() -> Self {
        Self {
            exact_match_weight: 1.0,
            fuzzy_match_weight: 0.75,
            partial_match_weight: 0.5,
            fuzzy_similarity_floor: 0.8,
        }
    }

    /// Looser fuzzy floor, higher partial credit
    pub fn lenient() -> Self {
        Self {
            exact_match_weight: 1.0,
            fuzzy_match_weight: 0.85,
            partial_match_weight: 0.7,
            fuzzy_similarity_floor: 0.6,
        }
    }

    /// Validate the weights
    pub fn validate(&self) -> Result<(), String> {
        let in_unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(format!("{} {} out of range [0.0, 1.0]", name, value))
            }
        };
        in_unit("exact_match_weight", self.exact_match_weight)?;
        in_unit("fuzzy_match_weight", self.fuzzy_match_weight)?;
        in_unit("partial_match_weight", self.partial_match_weight)?;
        in_unit("fuzzy_similarity_floor", self.fuzzy_similarity_floor)?;

        if self.fuzzy_match_weight >= self.exact_match_weight {
            return Err("fuzzy_match_weight must be below exact_match_weight".to_string());
        }
        if self.partial_match_weight >= self.exact_match_weight {
            return Err("partial_match_weight must be below exact_match_weight".to_string());
        }
        Ok(())
    }
}

//! Best-match search over transcript lines

use crate::{normalize, similarity, MatchWeights};
use tracing::debug;
use verbatim_domain::{Correction, MatchLocation, MatchType, TranscriptLine};

/// The single best location found for a quote
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch {
    /// Weighted confidence in [0, 1]
    pub confidence: f64,

    /// Strategy that produced the match
    pub match_type: MatchType,

    /// Matched line span
    pub location: MatchLocation,

    /// Source text of the matched span (raw, not normalized)
    pub actual_text: String,

    /// Word-level differences, fuzzy matches only
    pub corrections: Vec<Correction>,
}

/// Searches transcript lines for a claimed quotation
///
/// Four strategies are tried per line: exact (short-circuits), partial
/// substring, fuzzy similarity and partial over two adjacent lines. The
/// highest-confidence candidate wins; ties keep the earliest line.
#[derive(Debug, Clone, Default)]
pub struct LineMatcher {
    weights: MatchWeights,
}

impl LineMatcher {
    /// Create a matcher with the given weights
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    /// The weights in use
    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Find the best match for `search_text`, or `None` if no strategy applies
    pub fn find_best_match(&self, search_text: &str, lines: &[TranscriptLine]) -> Option<LineMatch> {
        let needle = normalize(search_text);
        if needle.is_empty() {
            return None;
        }
        let needle_len = needle.chars().count() as f64;

        let normalized: Vec<String> = lines.iter().map(|l| normalize(&l.text)).collect();

        // (line index, candidate)
        let mut best: Option<(usize, LineMatch)> = None;

        for (idx, (line, haystack)) in lines.iter().zip(&normalized).enumerate() {
            if *haystack == needle {
                debug!("Exact match at line {}", line.line_number);
                return Some(LineMatch {
                    confidence: self.weights.exact_match_weight,
                    match_type: MatchType::Exact,
                    location: MatchLocation::single(line.line_number),
                    actual_text: line.text.clone(),
                    corrections: Vec::new(),
                });
            }

            if haystack.contains(&needle) {
                let confidence =
                    needle_len / haystack.chars().count() as f64 * self.weights.partial_match_weight;
                Self::consider(
                    &mut best,
                    idx,
                    LineMatch {
                        confidence,
                        match_type: MatchType::Partial,
                        location: MatchLocation::single(line.line_number),
                        actual_text: line.text.clone(),
                        corrections: Vec::new(),
                    },
                );
            }

            let raw_similarity = similarity(&needle, haystack);
            if raw_similarity > self.weights.fuzzy_similarity_floor {
                Self::consider(
                    &mut best,
                    idx,
                    LineMatch {
                        confidence: raw_similarity * self.weights.fuzzy_match_weight,
                        match_type: MatchType::Fuzzy,
                        location: MatchLocation::single(line.line_number),
                        actual_text: line.text.clone(),
                        corrections: Vec::new(),
                    },
                );
            }

            // Quotes that straddle a line break
            if let (Some(next_line), Some(next_haystack)) = (lines.get(idx + 1), normalized.get(idx + 1)) {
                let joined = format!("{} {}", haystack, next_haystack);
                if joined.contains(&needle) {
                    let confidence =
                        needle_len / joined.chars().count() as f64 * self.weights.partial_match_weight;
                    Self::consider(
                        &mut best,
                        idx,
                        LineMatch {
                            confidence,
                            match_type: MatchType::Partial,
                            location: MatchLocation::span(line.line_number, next_line.line_number),
                            actual_text: format!("{} {}", line.text, next_line.text),
                            corrections: Vec::new(),
                        },
                    );
                }
            }
        }

        best.map(|(idx, mut found)| {
            if found.match_type == MatchType::Fuzzy {
                found.corrections = word_corrections(&needle, &normalized[idx]);
            }
            debug!(
                "Best match at line {}: {} ({:.3})",
                found.location.line_number, found.match_type, found.confidence
            );
            found
        })
    }

    fn consider(best: &mut Option<(usize, LineMatch)>, idx: usize, candidate: LineMatch) {
        let better = best
            .as_ref()
            .map_or(true, |(_, current)| candidate.confidence > current.confidence);
        if better {
            *best = Some((idx, candidate));
        }
    }
}

/// Index-wise word diff over the overlapping length of two normalized texts
fn word_corrections(quoted: &str, actual: &str) -> Vec<Correction> {
    quoted
        .split(' ')
        .zip(actual.split(' '))
        .enumerate()
        .filter(|(_, (q, a))| q != a)
        .map(|(position, (q, a))| Correction {
            position,
            original: q.to_string(),
            actual: a.to_string(),
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use verbatim_domain::TranscriptLine;

    proptest! {
        /// A line always matches itself exactly
        #[test]
        fn test_line_matches_itself(text in "[A-Za-z][A-Za-z0-9 ,.!?']{0,60}") {
            let line = TranscriptLine::new(1, text.clone());
            let found = LineMatcher::default().find_best_match(&text, &[line]);
            prop_assert!(found.is_some());
            let found = found.unwrap();
            prop_assert_eq!(found.match_type, MatchType::Exact);
            prop_assert_eq!(found.confidence, 1.0);
        }

        /// Non-exact strategies stay strictly below the exact weight
        #[test]
        fn test_non_exact_confidence_below_one(
            needle in "[a-z]{1,8}( [a-z]{1,8}){0,3}",
            texts in proptest::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,6}", 1..5),
        ) {
            let content: Vec<TranscriptLine> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| TranscriptLine::new(i as u32 + 1, t.clone()))
                .collect();
            if let Some(found) = LineMatcher::default().find_best_match(&needle, &content) {
                prop_assert!((0.0..=1.0).contains(&found.confidence));
                if found.match_type != MatchType::Exact {
                    prop_assert!(found.confidence < 1.0);
                }
            }
        }
    }
}

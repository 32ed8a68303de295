//! Verbatim Matcher
//!
//! Locates a claimed quotation inside an ordered list of transcript lines.
//!
//! The matcher provides:
//! - Text normalization (lowercase, punctuation stripped, whitespace collapsed)
//! - Levenshtein-based similarity scoring
//! - Best-match search across exact, partial, fuzzy and two-line strategies
//!
//! # Examples
//!
//! ```
//! use verbatim_domain::{MatchType, Transcript};
//! use verbatim_matcher::{LineMatcher, MatchWeights};
//!
//! let transcript = Transcript::from_lines("session.txt", [
//!     "Welcome back everyone.",
//!     "First, make sure you have Docker installed.",
//! ]);
//!
//! let matcher = LineMatcher::new(MatchWeights::default());
//! let found = matcher
//!     .find_best_match("first make sure you have docker installed", &transcript.content)
//!     .unwrap();
//!
//! assert_eq!(found.match_type, MatchType::Exact);
//! assert_eq!(found.location.line_number, 2);
//! ```

#![warn(missing_docs)]

mod config;
mod matcher;
mod normalize;
mod similarity;

pub use config::MatchWeights;
pub use matcher::{LineMatch, LineMatcher};
pub use normalize::normalize;
pub use similarity::{levenshtein, similarity};

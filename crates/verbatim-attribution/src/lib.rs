//! Verbatim Attribution
//!
//! Turns verified quotes into durable, versioned attribution records that
//! link each insight back to the exact transcript lines it came from.
//!
//! # Architecture
//!
//! ```text
//! Insight + Transcript → SourceReferences → AttributionRecord → AttributionStore
//!                                                  ↓
//!                          update (versioned) · link · audit · integrity · export
//! ```
//!
//! # Key Features
//!
//! - **Versioning**: every update appends the prior state to `version_history`
//! - **Audit trail**: append-only creation/update events per record
//! - **Relationships**: symmetric typed edges between insights
//! - **Integrity checks**: detect drift against a newer transcript without mutating
//! - **Export**: JSON dump or Markdown citation blocks
//!
//! # Example Usage
//!
//! ```
//! use verbatim_attribution::{AttributionConfig, AttributionManager};
//! use verbatim_domain::{Insight, Quote, Transcript};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transcript = Transcript::from_lines("session.txt", [
//!     "Welcome back everyone.",
//!     "Always pin your base image versions.",
//! ]);
//! let insight = Insight::new(
//!     "best_practice",
//!     "Pin base images",
//!     "Unpinned images break reproducible builds",
//!     vec![Quote::new("Always pin your base image versions.", "session.txt", 2).with_confidence(1.0)],
//! );
//!
//! let manager = AttributionManager::in_memory(AttributionConfig::default())?;
//! let record = manager.create_attribution(&insight, &transcript)?;
//! assert_eq!(record.version, 1);
//! assert_eq!(
//!     record.source_references[0].context_before.as_deref(),
//!     Some("Welcome back everyone.")
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod export;
mod manager;
mod views;

pub use config::{AttributionConfig, MAX_CONTEXT_WINDOW};
pub use error::AttributionError;
pub use export::ExportFormat;
pub use manager::AttributionManager;
pub use views::{
    AuditTrail, IntegrityIssue, IntegrityIssueKind, IntegrityReport, SourceContext, SourceTrace,
};

//! Verbatim Storage Layer
//!
//! Implements the `AttributionStore` trait twice: an in-process store for
//! tests and short-lived runs, and a SQLite store for durable attribution
//! records, audit events and the insight relationship graph.
//!
//! # Architecture
//!
//! - Records are persisted whole as JSON, keyed by attribution ID
//! - Audit events are append-only rows ordered by insertion
//! - Relationship edges are unique per `(from, to)`; re-linking replaces the kind
//! - A forward edge and its reverse are written in one transaction
//!
//! # Examples
//!
//! ```no_run
//! use verbatim_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for attribution operations
//! ```

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record body or event metadata could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

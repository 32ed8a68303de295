//! Append-only audit events recorded per attribution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of audited operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// A record was created
    AttributionCreated,
    /// A record was revised
    AttributionUpdated,
}

impl AuditEventType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::AttributionCreated => "attribution_created",
            AuditEventType::AttributionUpdated => "attribution_updated",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attribution_created" => Some(AuditEventType::AttributionCreated),
            "attribution_updated" => Some(AuditEventType::AttributionUpdated),
            _ => None,
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audited operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened
    pub event_type: AuditEventType,
    /// When it happened (ms)
    pub timestamp: u64,
    /// Operation details (source counts, changed fields, ...)
    pub metadata: serde_json::Value,
}

impl AuditEvent {
    /// Create an event
    pub fn new(event_type: AuditEventType, timestamp: u64, metadata: serde_json::Value) -> Self {
        Self {
            event_type,
            timestamp,
            metadata,
        }
    }
}

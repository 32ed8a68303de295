//! Configuration for the Attribution Manager

use serde::{Deserialize, Serialize};

/// Upper bound on the context window, in lines
pub const MAX_CONTEXT_WINDOW: usize = 50;

/// Configuration for the Attribution Manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Lines captured before and after each quote as context
    pub context_window_sentences: usize,

    /// Warn when a reference carries no timestamp (never rejects)
    pub require_timestamps: bool,

    /// Keep prior snapshots in `version_history` on update
    pub track_versions: bool,

    /// Record audit events for creations and updates
    pub audit_trail: bool,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            context_window_sentences: 2,
            require_timestamps: true,
            track_versions: true,
            audit_trail: true,
        }
    }
}

impl AttributionConfig {
    /// Strict preset: wider context, every guard enabled
    pub fn strict() -> Self {
        Self {
            context_window_sentences: 3,
            ..Self::default()
        }
    }

    /// Lenient preset: narrow context, no timestamp warnings
    pub fn lenient() -> Self {
        Self {
            context_window_sentences: 1,
            require_timestamps: false,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.context_window_sentences > MAX_CONTEXT_WINDOW {
            return Err(format!(
                "context_window_sentences {} exceeds maximum {}",
                self.context_window_sentences, MAX_CONTEXT_WINDOW
            ));
        }
        Ok(())
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

//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Tunables for connection discovery and synthesis detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum full-text similarity for a discovered edge.
    pub similarity_threshold: f32,

    /// Minimum keyword-set overlap for a discovered edge.
    pub keyword_overlap_threshold: f32,

    /// How many recent thoughts a new thought is compared against.
    pub candidate_window: usize,

    /// Minimum edge strength for a connection to count toward a synthesis
    /// moment.
    pub synthesis_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
            keyword_overlap_threshold: 0.4,
            candidate_window: 10,
            synthesis_threshold: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text. Missing keys fall back to
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }
}

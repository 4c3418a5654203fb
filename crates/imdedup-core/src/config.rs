//! Configuration for duplicate detection
//!
//! Thresholds and missing-title handling. A configuration is validated once,
//! before any record is processed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalization::{MissingTitlePolicy, TitleNormalizer};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_LENGTH_RATIO_CUTOFF: f64 = 0.3;

/// Configuration for deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeduplicationConfig {
    /// Minimum similarity ratio for a fuzzy pair, in `(0, 1]`
    pub similarity_threshold: f64,
    /// Maximum relative length difference before a pair is skipped, in `[0, 1]`
    pub length_ratio_cutoff: f64,
    /// How records without a title are matched
    pub missing_titles: MissingTitlePolicy,
    /// Strip diacritics before normalizing titles
    pub fold_diacritics: bool,
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            length_ratio_cutoff: DEFAULT_LENGTH_RATIO_CUTOFF,
            missing_titles: MissingTitlePolicy::default(),
            fold_diacritics: false,
        }
    }
}

impl DeduplicationConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_length_ratio_cutoff(mut self, cutoff: f64) -> Self {
        self.length_ratio_cutoff = cutoff;
        self
    }

    pub fn with_missing_titles(mut self, policy: MissingTitlePolicy) -> Self {
        self.missing_titles = policy;
        self
    }

    pub fn with_fold_diacritics(mut self, fold: bool) -> Self {
        self.fold_diacritics = fold;
        self
    }

    pub fn normalizer(&self) -> TitleNormalizer {
        TitleNormalizer::new(self.missing_titles, self.fold_diacritics)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails both comparisons
        let threshold = self.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "similarity_threshold",
                value: threshold,
                expected: "(0, 1]",
            });
        }

        let cutoff = self.length_ratio_cutoff;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(ConfigError::OutOfRange {
                field: "length_ratio_cutoff",
                value: cutoff,
                expected: "[0, 1]",
            });
        }

        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Value out of range: {field} = {value}, expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

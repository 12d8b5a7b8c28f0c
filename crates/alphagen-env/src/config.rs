//! Environment configuration.
//!
//! Loaded from JSON; every field has a default matching the reference
//! experiments, so `{}` is a valid configuration.

use std::path::Path;
use std::sync::Arc;

use alphagen_core::{ActionCodec, Vocabulary};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default capacity of the observation buffer.
pub const DEFAULT_MAX_EXPR_LENGTH: usize = 15;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one [`AlphaEnv`](crate::env::AlphaEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Observation buffer length; the grammar must end every episode
    /// before this many tokens are appended.
    #[serde(default = "default_max_expr_length")]
    pub max_expr_length: usize,
    /// Constant added to every step's reward.
    #[serde(default)]
    pub reward_per_step: f64,
    /// Token tables numbered by the action codec.
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

fn default_max_expr_length() -> usize {
    DEFAULT_MAX_EXPR_LENGTH
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_expr_length: default_max_expr_length(),
            reward_per_step: 0.0,
            vocabulary: Vocabulary::alphagen(),
        }
    }
}

impl EnvConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EnvConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expr_length == 0 {
            return Err(ConfigError::Invalid(
                "max_expr_length must be at least 1".to_string(),
            ));
        }
        if !self.reward_per_step.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "reward_per_step must be finite, got {}",
                self.reward_per_step
            )));
        }
        Ok(())
    }

    pub fn with_max_expr_length(mut self, max_expr_length: usize) -> Self {
        self.max_expr_length = max_expr_length;
        self
    }

    pub fn with_reward_per_step(mut self, reward_per_step: f64) -> Self {
        self.reward_per_step = reward_per_step;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Build a codec over this configuration's vocabulary.
    pub fn codec(&self) -> ActionCodec {
        ActionCodec::new(Arc::new(self.vocabulary.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphagen_core::{FeatureType, Operator};

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EnvConfig::from_json("{}").unwrap();
        assert_eq!(config, EnvConfig::default());
        assert_eq!(config.max_expr_length, 15);
        assert_eq!(config.reward_per_step, 0.0);
        assert_eq!(config.codec().size_action(), 49);
    }

    #[test]
    fn test_custom_vocabulary() {
        let json = r#"{
            "max_expr_length": 5,
            "reward_per_step": -0.01,
            "vocabulary": {
                "operators": ["Abs", "Add", "Mean"],
                "features": ["close", "volume"],
                "delta_times": [10, 20],
                "constants": [1.0]
            }
        }"#;
        let config = EnvConfig::from_json(json).unwrap();
        assert_eq!(config.max_expr_length, 5);
        assert_eq!(config.reward_per_step, -0.01);
        assert_eq!(
            config.vocabulary.operators(),
            &[Operator::Abs, Operator::Add, Operator::Mean]
        );
        assert_eq!(
            config.vocabulary.features(),
            &[FeatureType::Close, FeatureType::Volume]
        );
        assert_eq!(config.codec().size_action(), 9);
    }

    #[test]
    fn test_duplicate_vocabulary_rejected() {
        let json = r#"{
            "vocabulary": {
                "operators": ["Abs", "Abs"],
                "features": [],
                "delta_times": [],
                "constants": []
            }
        }"#;
        assert!(matches!(
            EnvConfig::from_json(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            EnvConfig::from_json(r#"{"max_expr_length": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_finite_reward_rejected() {
        let config = EnvConfig::default().with_reward_per_step(f64::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            EnvConfig::load("/nonexistent/alphagen-env.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EnvConfig::default()
            .with_max_expr_length(20)
            .with_reward_per_step(0.5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EnvConfig::from_json(&json).unwrap(), config);
    }
}

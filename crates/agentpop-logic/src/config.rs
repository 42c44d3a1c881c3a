//! Caller-supplied population configuration and its validation.
//!
//! The host application owns one `PopulationConfig`. It supplies the
//! defaults applied to imported agents and the display knobs for the
//! normalization indicator and the error summary.
//!
//! ```
//! use agentpop_logic::config::{validate_config, PopulationConfig};
//!
//! let config = PopulationConfig::from_json(r#"{"default_role": "citizen"}"#).unwrap();
//! assert_eq!(config.default_role, "citizen");
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DISPLAYED_ERRORS, NORMALIZATION_TOLERANCE};
use crate::model::LlmConfig;

/// Defaults and display settings for the population engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Role given to imported agents that do not specify one.
    pub default_role: String,
    /// LLM settings given to imported agents that do not specify their own.
    pub llm_config: LlmConfig,
    /// Allowed distance from 1.0 before a distribution is flagged.
    pub normalization_tolerance: f64,
    /// How many import errors are shown verbatim.
    pub max_displayed_errors: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            default_role: "agent".to_string(),
            llm_config: LlmConfig::default(),
            normalization_tolerance: NORMALIZATION_TOLERANCE,
            max_displayed_errors: MAX_DISPLAYED_ERRORS,
        }
    }
}

impl PopulationConfig {
    /// Load from JSON; absent keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Default role is blank.
    EmptyDefaultRole,
    /// Tolerance must lie strictly between 0 and 1.
    ToleranceOutOfRange(f64),
    /// Error display cap of zero would hide every error.
    ZeroErrorCap,
    /// Temperature outside \[0, 2\].
    TemperatureOutOfRange(f64),
    /// Model name is blank.
    EmptyModel,
}

/// Validate a population configuration, returning all errors found.
pub fn validate_config(config: &PopulationConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.default_role.trim().is_empty() {
        errors.push(ConfigError::EmptyDefaultRole);
    }
    let tol = config.normalization_tolerance;
    if !(tol > 0.0 && tol < 1.0) {
        errors.push(ConfigError::ToleranceOutOfRange(tol));
    }
    if config.max_displayed_errors == 0 {
        errors.push(ConfigError::ZeroErrorCap);
    }
    let temp = config.llm_config.temperature;
    if !(0.0..=2.0).contains(&temp) {
        errors.push(ConfigError::TemperatureOutOfRange(temp));
    }
    if config.llm_config.model.trim().is_empty() {
        errors.push(ConfigError::EmptyModel);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&PopulationConfig::default()).is_empty());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PopulationConfig::from_json(r#"{"max_displayed_errors": 10}"#).unwrap();
        assert_eq!(config.max_displayed_errors, 10);
        assert_eq!(config.default_role, "agent");
        assert!((config.normalization_tolerance - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_nested_llm() {
        let config = PopulationConfig::from_json(
            r#"{"llm_config": {"provider": "anthropic", "model": "m", "temperature": 1.0, "maxTokens": 2048}}"#,
        )
        .unwrap();
        assert_eq!(config.llm_config.provider, "anthropic");
        assert_eq!(config.llm_config.max_tokens, 2048);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(PopulationConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PopulationConfig::default();
        config.default_role = "  ".into();
        config.normalization_tolerance = 0.0;
        config.max_displayed_errors = 0;
        config.llm_config.temperature = 3.5;
        config.llm_config.model.clear();
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ConfigError::EmptyDefaultRole));
        assert!(errors.contains(&ConfigError::ToleranceOutOfRange(0.0)));
        assert!(errors.contains(&ConfigError::ZeroErrorCap));
        assert!(errors.contains(&ConfigError::TemperatureOutOfRange(3.5)));
        assert!(errors.contains(&ConfigError::EmptyModel));
    }
}

//! Population data model — dimensions, archetypes, traits, agent records.
//!
//! Plain serde-serializable values. Every operation elsewhere in the crate
//! takes these by reference and returns new values; nothing here mutates
//! shared state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named demographic axis (e.g. "Age") with ordered, mutually exclusive categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub categories: Vec<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            name: name.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One combination of categories across all dimensions, weighted by probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Generator-assigned id, stable only within one generation call.
    pub id: String,
    /// Dimension name → chosen category, one entry per dimension.
    pub attributes: BTreeMap<String, String>,
    /// Human-readable `"dimension: category"` join, in dimension order.
    pub label: String,
    /// Weight in \[0.0, 1.0\].
    pub probability: f64,
}

/// Passthrough personality trait consumed by the external persona generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub id: String,
    pub name: String,
    /// Mean score, clamped to \[0, 100\].
    pub mean: f64,
    /// Standard deviation, clamped to \[0, 50\].
    pub std: f64,
}

/// LLM settings attached to each agent.
///
/// Unknown keys survive a round-trip through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            extra: Map::new(),
        }
    }
}

/// A fully-specified agent ready for simulation bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar_url: String,
    pub profile: String,
    pub properties: Map<String, Value>,
    pub llm_config: LlmConfig,
    pub history: Vec<Value>,
    pub memory: Vec<Value>,
    pub knowledge_base: Vec<Value>,
}

/// A single row rejected during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// `"Row N"` for row failures, `"file"` for whole-file failures.
    pub row_label: String,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.row_label, self.message)
    }
}

/// Outcome of one import attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Every row that individually passed validation, in input order.
    pub accepted: Vec<AgentRecord>,
    /// Row errors in input order. Never truncated.
    pub errors: Vec<RowError>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render at most `cap` error messages verbatim, one per line, followed by
    /// a count of suppressed errors. Returns an empty string when there are none.
    pub fn summary(&self, cap: usize) -> String {
        let mut lines: Vec<String> = self.errors.iter().take(cap).map(|e| e.to_string()).collect();
        let hidden = self.errors.len().saturating_sub(cap);
        if hidden > 0 {
            lines.push(format!(
                "... and {} more error{}",
                hidden,
                if hidden == 1 { "" } else { "s" }
            ));
        }
        lines.join("\n")
    }
}

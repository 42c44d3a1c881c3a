//! Row validation and field partitioning.
//!
//! Shared by the CSV and JSON paths. A row must be an object carrying a name
//! (`agent_name`, then `name`) and a description (`agent_description`, then
//! `profile`). Reserved keys become first-class fields; everything else lands
//! in `properties`, behind any explicit `properties` object on the row.

use serde_json::{Map, Value};

use crate::config::PopulationConfig;
use crate::constants::{fields, AVATAR_PLACEHOLDER_BASE};
use crate::model::{AgentRecord, LlmConfig, RowError};

/// Validate one row and build its record.
///
/// `index` is the 0-based position within the import and `stamp` a per-import
/// timestamp; together they form the default id.
pub fn build_record(
    label: &str,
    value: &Value,
    index: usize,
    stamp: u128,
    config: &PopulationConfig,
) -> Result<AgentRecord, RowError> {
    let reject = |message: String| RowError {
        row_label: label.to_string(),
        message,
    };

    let Value::Object(row) = value else {
        return Err(reject(format!(
            "bad row format: expected an object, found {}",
            kind(value)
        )));
    };

    let name = first_text(row, &[fields::AGENT_NAME, fields::NAME]);
    let profile = first_text(row, &[fields::AGENT_DESCRIPTION, fields::PROFILE]);
    let (name, profile) = match (name, profile) {
        (Some(n), Some(p)) => (n, p),
        (n, p) => {
            let mut missing = Vec::new();
            if n.is_none() {
                missing.push("name");
            }
            if p.is_none() {
                missing.push("description");
            }
            return Err(reject(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
    };

    let id = first_text(row, &[fields::ID]).unwrap_or_else(|| format!("agent_{}_{}", stamp, index));
    let role = first_text(row, &[fields::ROLE]).unwrap_or_else(|| config.default_role.clone());
    let avatar_url =
        first_text(row, &[fields::AVATAR_URL]).unwrap_or_else(|| avatar_placeholder(&name));

    Ok(AgentRecord {
        id,
        role,
        avatar_url,
        properties: partition_properties(label, row),
        llm_config: llm_config(label, row, &config.llm_config),
        history: array_field(label, row, fields::HISTORY),
        memory: array_field(label, row, fields::MEMORY),
        knowledge_base: array_field(label, row, fields::KNOWLEDGE_BASE),
        name,
        profile,
    })
}

/// Deterministic placeholder avatar for a name.
pub fn avatar_placeholder(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    format!(
        "{}{}",
        AVATAR_PLACEHOLDER_BASE,
        if slug.is_empty() { "agent" } else { slug }
    )
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First key holding a usable scalar. Null, empty strings and containers
/// count as absent.
fn first_text(row: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match row.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn partition_properties(label: &str, row: &Map<String, Value>) -> Map<String, Value> {
    let mut props = match row.get(fields::PROPERTIES) {
        Some(Value::Object(explicit)) => explicit.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(other) => {
            log::warn!("{}: ignoring non-object properties ({})", label, kind(other));
            Map::new()
        }
    };
    for (key, value) in row {
        if !fields::is_reserved(key) {
            props.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    props
}

/// Overlay the row's `llmConfig` keys on the default. A value that does not
/// form a valid config falls back to the default.
fn llm_config(label: &str, row: &Map<String, Value>, default: &LlmConfig) -> LlmConfig {
    let overrides = match row.get(fields::LLM_CONFIG) {
        Some(Value::Object(o)) => o,
        Some(Value::Null) | None => return default.clone(),
        Some(other) => {
            log::warn!("{}: ignoring non-object llmConfig ({})", label, kind(other));
            return default.clone();
        }
    };

    let mut merged = match serde_json::to_value(default) {
        Ok(Value::Object(m)) => m,
        _ => Map::new(),
    };
    for (k, v) in overrides {
        merged.insert(k.clone(), v.clone());
    }
    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
        log::warn!("{}: invalid llmConfig ({}), using default", label, e);
        default.clone()
    })
}

fn array_field(label: &str, row: &Map<String, Value>, key: &str) -> Vec<Value> {
    match row.get(key) {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            log::warn!("{}: ignoring non-array {} ({})", label, key, kind(other));
            Vec::new()
        }
    }
}

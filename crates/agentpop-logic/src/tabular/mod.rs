//! Tabular agent import — CSV or JSON into validated agent records.
//!
//! The format is picked from the filename extension. Whole-file problems
//! (unsupported extension, syntax errors, no data) produce a single error and
//! no records. Row problems are collected in row order and never stop the
//! batch; every row that passes is kept no matter how many others fail.
//!
//! ```
//! use agentpop_logic::config::PopulationConfig;
//! use agentpop_logic::tabular::parse;
//!
//! let report = parse(
//!     "agents.csv",
//!     "agent_name,agent_description\nAda,A mathematician\nGrace,A programmer",
//!     &PopulationConfig::default(),
//! );
//! assert_eq!(report.accepted.len(), 2);
//! assert!(report.errors.is_empty());
//! ```

mod delimited;
mod json;
mod row;

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use thiserror::Error;

use crate::config::PopulationConfig;
use crate::constants::{fields, FILE_ERROR_LABEL};
use crate::model::{AgentRecord, RowError, ValidationReport};

pub use row::{avatar_placeholder, build_record};

/// Whole-file import failure. Row-level problems are reported in
/// [`ValidationReport::errors`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("invalid CSV: unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("invalid CSV: unexpected character after closing quote on line {line}")]
    MalformedQuote { line: usize },
    #[error("JSON must be an array of agents or an object with an \"agents\" array")]
    NotAnArray,
    #[error("no agent rows found")]
    Empty,
}

/// Input format, inferred from the filename only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Case-insensitive match on the final extension.
    pub fn from_filename(filename: &str) -> Result<Self, ImportError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("json") => Ok(Format::Json),
            _ => Err(ImportError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// A candidate row before validation: its display label and raw value.
pub(crate) struct RawRow {
    pub label: String,
    pub value: Value,
}

pub(crate) fn row_label(n: usize) -> String {
    format!("Row {}", n)
}

/// Parse and validate a file, surfacing whole-file failures as `Err`.
pub fn try_parse(
    filename: &str,
    text: &str,
    config: &PopulationConfig,
) -> Result<ValidationReport, ImportError> {
    let rows = match Format::from_filename(filename)? {
        Format::Json => json::rows_from_json(text)?,
        Format::Csv => delimited::rows_from_csv(text)?,
    };
    if rows.is_empty() {
        return Err(ImportError::Empty);
    }

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let mut report = ValidationReport::default();
    for (index, raw) in rows.iter().enumerate() {
        match build_record(&raw.label, &raw.value, index, stamp, config) {
            Ok(record) => report.accepted.push(record),
            Err(e) => {
                log::debug!("rejected {}", e);
                report.errors.push(e);
            }
        }
    }

    log::info!(
        "imported {}: {} accepted, {} rejected",
        filename,
        report.accepted.len(),
        report.errors.len()
    );
    Ok(report)
}

/// Parse and validate a file. Never fails: a whole-file failure becomes a
/// report with one error labeled `file` and no accepted records.
pub fn parse(filename: &str, text: &str, config: &PopulationConfig) -> ValidationReport {
    match try_parse(filename, text, config) {
        Ok(report) => report,
        Err(e) => {
            log::warn!("import {} failed: {}", filename, e);
            ValidationReport {
                accepted: Vec::new(),
                errors: vec![RowError {
                    row_label: FILE_ERROR_LABEL.to_string(),
                    message: e.to_string(),
                }],
            }
        }
    }
}

/// Serialize records as `{"agents": [...]}`, a shape [`parse`] accepts back.
pub fn export_json(records: &[AgentRecord]) -> Result<String, serde_json::Error> {
    let mut root = serde_json::Map::new();
    root.insert(fields::AGENTS.to_string(), serde_json::to_value(records)?);
    serde_json::to_string_pretty(&Value::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg() -> PopulationConfig {
        PopulationConfig::default()
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(Format::from_filename("a.csv").unwrap(), Format::Csv);
        assert_eq!(Format::from_filename("dir/A.JSON").unwrap(), Format::Json);
        assert!(matches!(
            Format::from_filename("agents.xlsx"),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(Format::from_filename("noext").is_err());
    }

    #[test]
    fn test_unsupported_extension_is_file_error() {
        let report = parse("agents.txt", "Ada,A mathematician", &cfg());
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row_label, "file");
        assert!(report.errors[0].message.contains("unsupported format"));
    }

    #[test]
    fn test_bad_json_is_file_error() {
        let report = parse("a.json", "[{\"name\": ", &cfg());
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.starts_with("invalid JSON"));
    }

    #[test]
    fn test_unbalanced_csv_quote_is_file_error() {
        let report = parse(
            "a.csv",
            "Ada,A mathematician\n\"Grace,A programmer\nLinus,Kernels",
            &cfg(),
        );
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row_label, "file");
        assert_eq!(
            report.errors[0].message,
            "invalid CSV: unterminated quoted field starting on line 2"
        );
    }

    #[test]
    fn test_empty_inputs_are_file_errors() {
        assert!(matches!(try_parse("a.json", "[]", &cfg()), Err(ImportError::Empty)));
        assert!(matches!(try_parse("a.csv", "", &cfg()), Err(ImportError::Empty)));
        assert!(matches!(
            try_parse("a.csv", "agent_name,agent_description\n", &cfg()),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn test_json_partial_failure() {
        let text = json!([
            {"name": "Ada", "profile": "A mathematician"},
            {"profile": "No name here"},
            {"name": "Grace", "profile": "A programmer"}
        ])
        .to_string();
        let report = parse("a.json", &text, &cfg());
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row_label, "Row 2");
    }

    #[test]
    fn test_ids_unique_within_call() {
        let text = json!([
            {"name": "A", "profile": "a"},
            {"name": "B", "profile": "b"},
            {"name": "C", "profile": "c"}
        ])
        .to_string();
        let report = parse("a.json", &text, &cfg());
        let mut ids: Vec<&str> = report.accepted.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_export_round_trip() {
        let text = "agent_name,agent_description,team\nAda,A mathematician,analysis";
        let first = parse("a.csv", text, &cfg());
        let exported = export_json(&first.accepted).unwrap();
        let second = parse("again.json", &exported, &cfg());
        assert!(second.is_clean());
        assert_eq!(second.accepted, first.accepted);
    }

    #[test]
    fn test_many_errors_none_dropped() {
        let mut rows: Vec<Value> = (0..9).map(|i| json!({"name": format!("x{i}")})).collect();
        rows.push(json!({"name": "ok", "profile": "fine"}));
        let report = parse("a.json", &Value::Array(rows).to_string(), &cfg());
        assert_eq!(report.errors.len(), 9);
        assert_eq!(report.accepted.len(), 1);
        assert!(report.summary(5).ends_with("... and 4 more errors"));
    }
}

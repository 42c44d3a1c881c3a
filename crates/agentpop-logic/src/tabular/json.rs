//! JSON input: a top-level array, or an object with an `agents` array.

use serde_json::Value;

use super::{row_label, ImportError, RawRow};
use crate::constants::fields;

pub(crate) fn rows_from_json(text: &str) -> Result<Vec<RawRow>, ImportError> {
    let root: Value = serde_json::from_str(text)?;
    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(fields::AGENTS) {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::NotAnArray),
        },
        _ => return Err(ImportError::NotAnArray),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, value)| RawRow {
            label: row_label(i + 1),
            value,
        })
        .collect())
}

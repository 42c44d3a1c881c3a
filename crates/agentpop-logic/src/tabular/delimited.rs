//! CSV input with heuristic header detection.
//!
//! Cells are kept as raw strings. The first row is treated as a header when
//! it has at least two cells and either the first cell is `agent_name`/`name`
//! or the second is `agent_description`/`description` (exact, case-sensitive).
//! Otherwise every row is positional: name, description, then `attribute1..n`.
//!
//! A data row that happens to start with the literal `name` is misread as a
//! header. That is an accepted limitation of the heuristic.
//!
//! The `csv` reader never fails on `&str` input in flexible mode: an
//! unbalanced quote silently swallows the rest of the file into one cell.
//! `check_quotes` runs first and turns that into a whole-file error.

use serde_json::{Map, Value};

use super::{row_label, ImportError, RawRow};
use crate::constants::fields;

pub(crate) fn rows_from_csv(text: &str) -> Result<Vec<RawRow>, ImportError> {
    check_quotes(text)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };

    if looks_like_header(first) {
        let columns: Vec<String> = first.iter().map(|h| header_key(h)).collect();
        log::debug!("csv header detected: {:?}", columns);
        Ok(rows[1..]
            .iter()
            .enumerate()
            .map(|(i, cells)| RawRow {
                label: row_label(i + 2),
                value: Value::Object(keyed_row(&columns, cells)),
            })
            .collect())
    } else {
        log::debug!("csv has no header, using positional columns");
        Ok(rows
            .iter()
            .enumerate()
            .map(|(i, cells)| RawRow {
                label: row_label(i + 1),
                value: Value::Object(positional_row(cells)),
            })
            .collect())
    }
}

/// Reject unbalanced quoting before handing the text to the reader.
///
/// A field that opens with `"` must close with a lone `"` followed by a
/// delimiter, a line break or the end of input; `""` inside it is an escaped
/// quote. Quotes in the middle of an unquoted field are literal text.
fn check_quotes(text: &str) -> Result<(), ImportError> {
    let mut line = 1;
    let mut open_line = 1;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => {
                    in_quotes = false;
                    match chars.peek() {
                        None | Some(',') | Some('\n') | Some('\r') => {}
                        Some(_) => return Err(ImportError::MalformedQuote { line }),
                    }
                }
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if at_field_start => {
                in_quotes = true;
                open_line = line;
                at_field_start = false;
            }
            ',' => at_field_start = true,
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            '\r' => {}
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { line: open_line });
    }
    Ok(())
}

fn looks_like_header(row: &[String]) -> bool {
    if row.len() < 2 {
        return false;
    }
    let first = row[0].as_str();
    let second = row[1].as_str();
    first == fields::AGENT_NAME
        || first == fields::NAME
        || second == fields::AGENT_DESCRIPTION
        || second == fields::DESCRIPTION
}

/// `description` is accepted as a header spelling of `agent_description`.
fn header_key(cell: &str) -> String {
    if cell == fields::DESCRIPTION {
        fields::AGENT_DESCRIPTION.to_string()
    } else {
        cell.to_string()
    }
}

fn keyed_row(columns: &[String], cells: &[String]) -> Map<String, Value> {
    let mut map = Map::new();
    for (i, cell) in cells.iter().enumerate() {
        match columns.get(i) {
            Some(key) if !key.is_empty() => {
                map.insert(key.clone(), Value::String(cell.clone()));
            }
            _ => log::debug!("csv cell {} has no header, skipped", i + 1),
        }
    }
    map
}

fn positional_row(cells: &[String]) -> Map<String, Value> {
    let mut map = Map::new();
    for (i, cell) in cells.iter().enumerate() {
        let key = match i {
            0 => fields::AGENT_NAME.to_string(),
            1 => fields::AGENT_DESCRIPTION.to_string(),
            n => format!("{}{}", fields::ATTRIBUTE_PREFIX, n - 1),
        };
        map.insert(key, Value::String(cell.clone()));
    }
    map
}

//! Dimension editing — pure add/remove/rename over a dimension list.
//!
//! Every edit takes the current list and returns a new one. Index-based
//! edits with an out-of-range index return the input unchanged. Editing may
//! transiently leave a dimension with zero categories; the archetype
//! generator treats that as "no combinations".

use std::collections::HashSet;

use crate::archetypes::combination_count;
use crate::constants::MAX_ARCHETYPES;
use crate::model::Dimension;

/// Append a dimension.
pub fn add_dimension(dims: &[Dimension], dimension: Dimension) -> Vec<Dimension> {
    let mut out = dims.to_vec();
    out.push(dimension);
    out
}

/// Remove the dimension at `index`.
pub fn remove_dimension(dims: &[Dimension], index: usize) -> Vec<Dimension> {
    let mut out = dims.to_vec();
    if index < out.len() {
        out.remove(index);
    } else {
        log::warn!("remove_dimension: index {} out of range ({})", index, dims.len());
    }
    out
}

/// Rename the dimension at `index`.
pub fn rename_dimension(dims: &[Dimension], index: usize, name: &str) -> Vec<Dimension> {
    let mut out = dims.to_vec();
    match out.get_mut(index) {
        Some(d) => d.name = name.to_string(),
        None => log::warn!("rename_dimension: index {} out of range ({})", index, dims.len()),
    }
    out
}

/// Append a category to the dimension at `index`.
pub fn add_category(dims: &[Dimension], index: usize, category: &str) -> Vec<Dimension> {
    let mut out = dims.to_vec();
    match out.get_mut(index) {
        Some(d) => d.categories.push(category.to_string()),
        None => log::warn!("add_category: index {} out of range ({})", index, dims.len()),
    }
    out
}

/// Remove category `cat_index` from the dimension at `index`.
pub fn remove_category(dims: &[Dimension], index: usize, cat_index: usize) -> Vec<Dimension> {
    let mut out = dims.to_vec();
    match out.get_mut(index) {
        Some(d) if cat_index < d.categories.len() => {
            d.categories.remove(cat_index);
        }
        _ => log::warn!("remove_category: ({}, {}) out of range", index, cat_index),
    }
    out
}

/// Rename category `cat_index` of the dimension at `index`.
pub fn rename_category(
    dims: &[Dimension],
    index: usize,
    cat_index: usize,
    category: &str,
) -> Vec<Dimension> {
    let mut out = dims.to_vec();
    match out.get_mut(index).and_then(|d| d.categories.get_mut(cat_index)) {
        Some(c) => *c = category.to_string(),
        None => log::warn!("rename_category: ({}, {}) out of range", index, cat_index),
    }
    out
}

/// Dimension-set validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    /// Dimension name is blank (index).
    EmptyName(usize),
    /// Two dimensions share a name; archetype attributes would collide.
    DuplicateName(String),
    /// Dimension has no categories and will yield zero archetypes.
    NoCategories(String),
    /// Category is blank (dimension name, category index).
    EmptyCategory(String, usize),
    /// Category repeated within one dimension (dimension name, category).
    DuplicateCategory(String, String),
    /// Cross-product larger than the generator will expand (`None` = overflow).
    TooManyCombinations(Option<usize>),
}

/// Validate a working dimension set, returning all errors found.
pub fn validate_dimensions(dims: &[Dimension]) -> Vec<DimensionError> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (i, dim) in dims.iter().enumerate() {
        if dim.name.trim().is_empty() {
            errors.push(DimensionError::EmptyName(i));
        } else if !names.insert(dim.name.as_str()) {
            errors.push(DimensionError::DuplicateName(dim.name.clone()));
        }

        if dim.categories.is_empty() {
            errors.push(DimensionError::NoCategories(dim.name.clone()));
        }

        let mut seen = HashSet::new();
        for (ci, cat) in dim.categories.iter().enumerate() {
            if cat.trim().is_empty() {
                errors.push(DimensionError::EmptyCategory(dim.name.clone(), ci));
            } else if !seen.insert(cat.as_str()) {
                errors.push(DimensionError::DuplicateCategory(
                    dim.name.clone(),
                    cat.clone(),
                ));
            }
        }
    }

    match combination_count(dims) {
        Some(n) if n <= MAX_ARCHETYPES => {}
        other => errors.push(DimensionError::TooManyCombinations(other)),
    }

    errors
}

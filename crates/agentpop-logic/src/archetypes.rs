//! Archetype generation — cross-product expansion of demographic dimensions.
//!
//! Every combination of one category per dimension becomes an archetype.
//! Enumeration follows dimension order with the last dimension varying
//! fastest, and keeps each dimension's category order as given. Generation
//! is a full replace: ids are `arch_<index>` in enumeration order and are
//! only meaningful within one call.
//!
//! [`regenerate`] is an opt-in alternative that carries user-adjusted
//! probabilities forward for attribute tuples that survive a dimension edit.

use std::collections::{BTreeMap, HashMap};

use crate::constants::{ARCHETYPE_ID_PREFIX, LABEL_SEPARATOR, MAX_ARCHETYPES};
use crate::model::{Archetype, Dimension};

/// Number of archetypes the dimension set expands to, `None` on overflow.
///
/// Empty input yields 0, as does any dimension with zero categories.
pub fn combination_count(dims: &[Dimension]) -> Option<usize> {
    if dims.is_empty() {
        return Some(0);
    }
    dims.iter()
        .map(|d| d.categories.len())
        .try_fold(1usize, |acc, n| acc.checked_mul(n))
}

/// Expand dimensions into archetypes with a uniform probability distribution.
///
/// Products above [`MAX_ARCHETYPES`] (or overflowing `usize`) yield an empty
/// list; `validate_dimensions` reports them.
pub fn generate(dims: &[Dimension]) -> Vec<Archetype> {
    let total = match combination_count(dims) {
        Some(0) => return Vec::new(),
        Some(n) if n <= MAX_ARCHETYPES => n,
        other => {
            log::warn!(
                "generate: {} combinations exceed the limit of {}",
                other.map_or_else(|| "too many".to_string(), |n| n.to_string()),
                MAX_ARCHETYPES
            );
            return Vec::new();
        }
    };
    let probability = 1.0 / total as f64;

    // Mixed-radix counter over category indices, last digit fastest.
    let mut digits = vec![0usize; dims.len()];
    let mut out = Vec::with_capacity(total);
    for index in 0..total {
        let mut attributes = BTreeMap::new();
        let mut parts = Vec::with_capacity(dims.len());
        for (dim, &ci) in dims.iter().zip(&digits) {
            let category = &dim.categories[ci];
            attributes.insert(dim.name.clone(), category.clone());
            parts.push(format!("{}: {}", dim.name, category));
        }
        out.push(Archetype {
            id: format!("{}{}", ARCHETYPE_ID_PREFIX, index),
            attributes,
            label: parts.join(LABEL_SEPARATOR),
            probability,
        });

        for pos in (0..digits.len()).rev() {
            digits[pos] += 1;
            if digits[pos] < dims[pos].categories.len() {
                break;
            }
            digits[pos] = 0;
        }
    }

    log::debug!("generated {} archetypes from {} dimensions", total, dims.len());
    out
}

/// Regenerate after a dimension edit, keeping probabilities of surviving tuples.
///
/// Archetypes are matched by their full attribute map. Tuples that are new
/// get the uniform share `1 / total` each; surviving tuples keep their
/// relative weights and are rescaled to fill the remainder. If nothing
/// survives, or the survivors carry no mass, this is the same as
/// [`generate`] restricted to the new tuples.
pub fn regenerate(previous: &[Archetype], dims: &[Dimension]) -> Vec<Archetype> {
    let mut fresh = generate(dims);
    if fresh.is_empty() || previous.is_empty() {
        return fresh;
    }

    let old: HashMap<&BTreeMap<String, String>, f64> = previous
        .iter()
        .map(|a| (&a.attributes, a.probability))
        .collect();
    let carried: Vec<Option<f64>> = fresh
        .iter()
        .map(|a| old.get(&a.attributes).copied())
        .collect();

    let total = fresh.len() as f64;
    let new_count = carried.iter().filter(|c| c.is_none()).count();
    let carried_sum: f64 = carried.iter().flatten().sum();

    if new_count == fresh.len() {
        return fresh;
    }
    if carried_sum <= 0.0 {
        // Survivors hold no mass: give everything to the new tuples.
        let share = if new_count > 0 { 1.0 / new_count as f64 } else { 0.0 };
        for (a, c) in fresh.iter_mut().zip(&carried) {
            a.probability = if c.is_some() { 0.0 } else { share };
        }
        return fresh;
    }

    let uniform = 1.0 / total;
    let residual = 1.0 - new_count as f64 * uniform;
    let scale = residual / carried_sum;
    for (a, c) in fresh.iter_mut().zip(&carried) {
        a.probability = match c {
            Some(p) => (p * scale).max(0.0),
            None => uniform,
        };
    }

    log::debug!(
        "regenerated {} archetypes ({} carried, {} new)",
        fresh.len(),
        fresh.len() - new_count,
        new_count
    );
    fresh
}

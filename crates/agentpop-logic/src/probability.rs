//! Probability redistribution over an archetype set.
//!
//! Editing one archetype rescales all the others by a common factor so the
//! total stays at 1.0. Redistribution is proportional: archetypes with more
//! mass absorb more of the change. When every other archetype already sits
//! at zero there is nothing to rescale, so the total ends up equal to the
//! edited value. That state is reported through [`summarize`], not rejected.

use serde::{Deserialize, Serialize};

use crate::model::Archetype;

/// Running total and normalization flag for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilitySummary {
    pub total: f64,
    /// `true` when `total` is within tolerance of 1.0.
    pub normalized: bool,
}

/// Sum of all archetype probabilities.
pub fn total_probability(archetypes: &[Archetype]) -> f64 {
    archetypes.iter().map(|a| a.probability).sum()
}

/// Whether the distribution sums to 1.0 within `tolerance`.
pub fn is_normalized(archetypes: &[Archetype], tolerance: f64) -> bool {
    (total_probability(archetypes) - 1.0).abs() <= tolerance
}

pub fn summarize(archetypes: &[Archetype], tolerance: f64) -> ProbabilitySummary {
    let total = total_probability(archetypes);
    ProbabilitySummary {
        total,
        normalized: (total - 1.0).abs() <= tolerance,
    }
}

/// Set one archetype's probability and proportionally rescale the rest.
///
/// `new_value` is clamped into \[0, 1\] (NaN becomes 0). An unknown
/// `target_id` returns the set unchanged.
pub fn set_probability(archetypes: &[Archetype], target_id: &str, new_value: f64) -> Vec<Archetype> {
    let Some(old_value) = archetypes
        .iter()
        .find(|a| a.id == target_id)
        .map(|a| a.probability)
    else {
        log::warn!("set_probability: unknown archetype {}", target_id);
        return archetypes.to_vec();
    };

    let new_value = if new_value.is_nan() {
        0.0
    } else {
        new_value.clamp(0.0, 1.0)
    };
    let remaining_total = total_probability(archetypes) - old_value;
    let factor = if remaining_total > 0.0 {
        Some((1.0 - new_value) / remaining_total)
    } else {
        log::debug!(
            "set_probability: no remaining mass to rebalance around {}",
            target_id
        );
        None
    };

    archetypes
        .iter()
        .map(|a| {
            let mut a = a.clone();
            if a.id == target_id {
                a.probability = new_value;
            } else if let Some(f) = factor {
                a.probability = (a.probability * f).max(0.0);
            }
            a
        })
        .collect()
}

/// Divide every probability by the current total. A zero total is left as is.
pub fn normalize(archetypes: &[Archetype]) -> Vec<Archetype> {
    let total = total_probability(archetypes);
    if total <= 0.0 {
        return archetypes.to_vec();
    }
    archetypes
        .iter()
        .map(|a| Archetype {
            probability: a.probability / total,
            ..a.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::generate;
    use crate::constants::NORMALIZATION_TOLERANCE;
    use crate::model::Dimension;

    fn four() -> Vec<Archetype> {
        generate(&[Dimension::new("Group", &["A", "B", "C", "D"])])
    }

    fn with_probs(probs: &[f64]) -> Vec<Archetype> {
        let dims = [Dimension::new(
            "Group",
            &["A", "B", "C", "D", "E", "F"][..probs.len()],
        )];
        generate(&dims)
            .into_iter()
            .zip(probs)
            .map(|(a, &p)| Archetype { probability: p, ..a })
            .collect()
    }

    #[test]
    fn test_set_keeps_sum() {
        let out = set_probability(&four(), "arch_1", 0.7);
        assert!((out[1].probability - 0.7).abs() < 1e-12);
        assert!((total_probability(&out) - 1.0).abs() < 1e-9);
        for i in [0, 2, 3] {
            assert!((out[i].probability - 0.1).abs() < 1e-12);
        }
    }

    #[test]
    fn test_set_is_proportional() {
        let out = set_probability(&with_probs(&[0.5, 0.3, 0.2]), "arch_0", 0.0);
        // remaining 0.5 rescaled to 1.0: factor 2
        assert!((out[1].probability - 0.6).abs() < 1e-12);
        assert!((out[2].probability - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_set_clamps_input() {
        let out = set_probability(&four(), "arch_0", 1.8);
        assert_eq!(out[0].probability, 1.0);
        assert!(out[1..].iter().all(|a| a.probability == 0.0));

        let out = set_probability(&four(), "arch_0", -0.5);
        assert_eq!(out[0].probability, 0.0);
        assert!((total_probability(&out) - 1.0).abs() < 1e-9);

        let out = set_probability(&four(), "arch_0", f64::NAN);
        assert_eq!(out[0].probability, 0.0);
    }

    #[test]
    fn test_set_degenerate_zero_remaining() {
        let arch = with_probs(&[1.0, 0.0, 0.0]);
        let out = set_probability(&arch, "arch_0", 0.4);
        assert_eq!(out[0].probability, 0.4);
        assert_eq!(out[1].probability, 0.0);
        assert_eq!(out[2].probability, 0.0);
        let summary = summarize(&out, NORMALIZATION_TOLERANCE);
        assert!((summary.total - 0.4).abs() < 1e-12);
        assert!(!summary.normalized);
    }

    #[test]
    fn test_set_unknown_id() {
        let arch = four();
        assert_eq!(set_probability(&arch, "arch_99", 0.5), arch);
    }

    #[test]
    fn test_set_does_not_mutate_input() {
        let arch = four();
        let _ = set_probability(&arch, "arch_0", 0.9);
        assert!((arch[0].probability - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_edits_stay_normalized() {
        let mut arch = four();
        for (id, v) in [("arch_0", 0.4), ("arch_2", 0.05), ("arch_1", 0.33), ("arch_3", 0.9)] {
            arch = set_probability(&arch, id, v);
            assert!(is_normalized(&arch, 1e-9), "after {id}={v}");
        }
    }

    #[test]
    fn test_normalize() {
        let out = normalize(&with_probs(&[0.2, 0.2, 0.4]));
        assert!((out[2].probability - 0.5).abs() < 1e-12);
        assert!((total_probability(&out) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_total_noop() {
        let arch = with_probs(&[0.0, 0.0]);
        assert_eq!(normalize(&arch), arch);
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize(&with_probs(&[0.3, 0.9, 0.1, 0.05]));
        let twice = normalize(&once);
        for (a, b) in once.iter().zip(&twice) {
            assert!((a.probability - b.probability).abs() < 1e-12);
        }
    }

    #[test]
    fn test_summary_tolerance() {
        let arch = with_probs(&[0.5, 0.505]);
        assert!(summarize(&arch, 0.01).normalized);
        assert!(!summarize(&arch, 0.001).normalized);
        assert!(summarize(&[], 0.01).total == 0.0);
    }
}

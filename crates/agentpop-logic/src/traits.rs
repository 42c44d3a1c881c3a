//! Trait configuration: CRUD with bounds clamping.
//!
//! Traits are passed through untouched to the external persona generator.
//! The only logic here keeps `mean` in \[0, 100\] and `std` in \[0, 50\].

use crate::constants::{trait_bounds, TRAIT_ID_PREFIX};
use crate::model::Trait;

impl Trait {
    /// Build a trait, clamping mean and std into range.
    pub fn new(id: impl Into<String>, name: impl Into<String>, mean: f64, std: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mean: clamp_mean(mean),
            std: clamp_std(std),
        }
    }
}

fn clamp_mean(v: f64) -> f64 {
    clamp_or_min(v, trait_bounds::MEAN_MIN, trait_bounds::MEAN_MAX)
}

fn clamp_std(v: f64) -> f64 {
    clamp_or_min(v, trait_bounds::STD_MIN, trait_bounds::STD_MAX)
}

/// NaN clamps to the lower bound.
fn clamp_or_min(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() {
        min
    } else {
        v.clamp(min, max)
    }
}

/// Next free `trait_<n>` id for this list.
fn next_trait_id(traits: &[Trait]) -> String {
    let max = traits
        .iter()
        .filter_map(|t| t.id.strip_prefix(TRAIT_ID_PREFIX))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{}", TRAIT_ID_PREFIX, max + 1)
}

/// Append a new trait with a fresh id.
pub fn add_trait(traits: &[Trait], name: &str, mean: f64, std: f64) -> Vec<Trait> {
    let mut out = traits.to_vec();
    out.push(Trait::new(next_trait_id(traits), name, mean, std));
    out
}

/// Replace the name, mean and std of the trait with `id`. Unknown ids are a no-op.
pub fn update_trait(traits: &[Trait], id: &str, name: &str, mean: f64, std: f64) -> Vec<Trait> {
    traits
        .iter()
        .map(|t| {
            if t.id == id {
                Trait::new(id, name, mean, std)
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Remove the trait with `id`.
pub fn remove_trait(traits: &[Trait], id: &str) -> Vec<Trait> {
    traits.iter().filter(|t| t.id != id).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let t = Trait::new("t", "Openness", 140.0, -3.0);
        assert_eq!(t.mean, 100.0);
        assert_eq!(t.std, 0.0);
        let t = Trait::new("t", "Openness", -1.0, 80.0);
        assert_eq!(t.mean, 0.0);
        assert_eq!(t.std, 50.0);
    }

    #[test]
    fn test_nan_clamps_to_min() {
        let t = Trait::new("t", "x", f64::NAN, f64::NAN);
        assert_eq!(t.mean, 0.0);
        assert_eq!(t.std, 0.0);
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let traits = add_trait(&[], "Openness", 50.0, 10.0);
        let traits = add_trait(&traits, "Neuroticism", 40.0, 15.0);
        assert_eq!(traits[0].id, "trait_1");
        assert_eq!(traits[1].id, "trait_2");
        let traits = remove_trait(&traits, "trait_1");
        let traits = add_trait(&traits, "Agreeableness", 60.0, 5.0);
        assert_eq!(traits[1].id, "trait_3");
    }

    #[test]
    fn test_update_clamps_and_targets_one() {
        let traits = add_trait(&add_trait(&[], "A", 10.0, 1.0), "B", 20.0, 2.0);
        let out = update_trait(&traits, "trait_2", "B2", 500.0, 5.0);
        assert_eq!(out[0], traits[0]);
        assert_eq!(out[1].name, "B2");
        assert_eq!(out[1].mean, 100.0);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let traits = add_trait(&[], "A", 10.0, 1.0);
        assert_eq!(update_trait(&traits, "nope", "Z", 1.0, 1.0), traits);
    }
}

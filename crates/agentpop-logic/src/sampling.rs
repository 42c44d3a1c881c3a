//! Population allocation: turning an archetype distribution into head counts.
//!
//! The persona generator needs to know how many agents to materialize per
//! archetype. [`allocate_counts`] does this deterministically; [`sample_archetypes`]
//! draws archetypes independently from a caller-supplied RNG.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::model::Archetype;
use crate::probability::total_probability;

/// Split `population` agents across archetypes in proportion to probability.
///
/// Uses largest-remainder rounding, so the counts sum exactly to `population`
/// whenever the total mass is positive. Ties go to the earlier archetype.
/// A zero-mass distribution yields all zeros.
pub fn allocate_counts(archetypes: &[Archetype], population: u32) -> Vec<u32> {
    let total = total_probability(archetypes);
    if total <= 0.0 || archetypes.is_empty() {
        return vec![0; archetypes.len()];
    }

    let quotas: Vec<f64> = archetypes
        .iter()
        .map(|a| a.probability.max(0.0) / total * population as f64)
        .collect();
    let mut counts: Vec<u32> = quotas.iter().map(|q| q.floor() as u32).collect();
    let assigned: u32 = counts.iter().sum();
    let mut leftover = population.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for i in order {
        if leftover == 0 {
            break;
        }
        counts[i] += 1;
        leftover -= 1;
    }

    counts
}

/// Draw `count` archetype indices weighted by probability.
///
/// Returns an empty list if the weights are all zero or otherwise unusable.
pub fn sample_archetypes<R: Rng + ?Sized>(
    archetypes: &[Archetype],
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let weights = archetypes.iter().map(|a| a.probability.max(0.0));
    let dist = match WeightedIndex::new(weights) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("sample_archetypes: cannot sample ({})", e);
            return Vec::new();
        }
    };
    (0..count).map(|_| dist.sample(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::generate;
    use crate::model::Dimension;
    use crate::probability::set_probability;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn three() -> Vec<Archetype> {
        generate(&[Dimension::new("Group", &["A", "B", "C"])])
    }

    #[test]
    fn test_allocate_uniform_remainder() {
        let counts = allocate_counts(&three(), 10);
        assert_eq!(counts.iter().sum::<u32>(), 10);
        // 3.33 each, first archetype wins the tie
        assert_eq!(counts, vec![4, 3, 3]);
    }

    #[test]
    fn test_allocate_weighted() {
        let arch = set_probability(&three(), "arch_2", 0.5);
        let counts = allocate_counts(&arch, 100);
        assert_eq!(counts, vec![25, 25, 50]);
    }

    #[test]
    fn test_allocate_unnormalized_input() {
        // Sum 0.4 after a degenerate edit still allocates everyone
        let arch = set_probability(&set_probability(&three(), "arch_0", 1.0), "arch_0", 0.4);
        let counts = allocate_counts(&arch, 7);
        assert_eq!(counts, vec![7, 0, 0]);
    }

    #[test]
    fn test_allocate_zero_mass() {
        let arch = set_probability(&generate(&[Dimension::new("G", &["A"])]), "arch_0", 0.0);
        assert_eq!(allocate_counts(&arch, 10), vec![0]);
        assert!(allocate_counts(&[], 10).is_empty());
    }

    #[test]
    fn test_sample_deterministic_with_seed() {
        let arch = three();
        let a = sample_archetypes(&arch, 50, &mut StdRng::seed_from_u64(7));
        let b = sample_archetypes(&arch, 50, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|&i| i < 3));
    }

    #[test]
    fn test_sample_skips_zero_weight() {
        let arch = set_probability(&three(), "arch_1", 1.0);
        let draws = sample_archetypes(&arch, 200, &mut StdRng::seed_from_u64(1));
        assert!(draws.iter().all(|&i| i == 1));
    }

    #[test]
    fn test_sample_zero_mass_is_empty() {
        let arch = set_probability(&generate(&[Dimension::new("G", &["A"])]), "arch_0", 0.0);
        assert!(sample_archetypes(&arch, 5, &mut StdRng::seed_from_u64(1)).is_empty());
    }
}

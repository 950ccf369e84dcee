//! Random number helpers shared by the placers, routers and search.
//!
//! Every strategy receives its generator explicitly; nothing here keeps
//! global state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a seeded, reproducible generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Roulette-wheel selection over non-negative weights.
///
/// Returns the index of the chosen weight, or `None` if `weights` is
/// empty. When the weights do not sum to a positive finite value the
/// choice falls back to uniform.
pub fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(rng.random_range(0..weights.len()));
    }

    let target = rng.random_range(0.0..total);
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return Some(i);
        }
    }

    // Rounding can leave `target` just above the last partial sum.
    weights.iter().rposition(|&w| w > 0.0)
}

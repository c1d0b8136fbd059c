//! Injectable random source for generation.
//!
//! All nondeterminism in the generator (entropy tie-breaks, weighted pattern
//! choice, fallback fill) goes through a `RandomSource` handed in by the
//! caller. Seed a `StdRandom` to get reproducible output.
//!
//! # Example
//!
//! ```
//! use mapgen_core::rng::{RandomSource, StdRandom};
//!
//! let mut rng = StdRandom::from_seed(42);
//! let roll = rng.next_double(); // 0.0..1.0
//! let index = rng.next_usize_max(10); // 0..10
//! assert!(roll < 1.0 && index < 10);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random number capability used throughout generation.
pub trait RandomSource {
    /// Returns a random double in [0.0, 1.0).
    fn next_double(&mut self) -> f64;

    /// Returns a random usize in [0, max). Returns 0 when `max` is 0.
    fn next_usize_max(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_double() * max as f64) as usize).min(max - 1)
    }

    /// Returns a random boolean.
    fn next_bool(&mut self) -> bool {
        self.next_double() < 0.5
    }
}

/// Seedable RNG backed by `rand::rngs::StdRng`.
#[derive(Clone, Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy; output is not reproducible.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.gen()
    }

    fn next_usize_max(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }
}

/// Pick an index with probability proportional to `weights[i]`.
///
/// Returns `None` when the weights sum to zero.
pub fn weighted_index(weights: &[f64], rng: &mut dyn RandomSource) -> Option<usize> {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return None;
    }

    let threshold = rng.next_double() * sum;
    let mut partial_sum = 0.0;
    let mut last_positive = None;

    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        partial_sum += w;
        last_positive = Some(i);
        if partial_sum > threshold {
            return Some(i);
        }
    }

    // Float rounding can leave threshold just above the final partial sum
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_random_ranges() {
        let mut rng = StdRandom::from_seed(42);
        for _ in 0..100 {
            let v = rng.next_double();
            assert!((0.0..1.0).contains(&v));
            assert!(rng.next_usize_max(7) < 7);
        }
        assert_eq!(rng.next_usize_max(0), 0);
    }

    #[test]
    fn test_std_random_is_deterministic() {
        let mut rng1 = StdRandom::from_seed(123);
        let mut rng2 = StdRandom::from_seed(123);
        for _ in 0..100 {
            assert_eq!(rng1.next_usize_max(1000), rng2.next_usize_max(1000));
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = StdRandom::from_seed(1);
        for _ in 0..200 {
            let i = weighted_index(&[0.0, 2.0, 0.0, 1.0], &mut rng).unwrap();
            assert!(i == 1 || i == 3);
        }
        assert_eq!(weighted_index(&[0.0, 0.0], &mut rng), None);
        assert_eq!(weighted_index(&[], &mut rng), None);
    }

    #[test]
    fn test_weighted_index_distribution() {
        let mut rng = StdRandom::from_seed(12345);
        let mut counts = [0usize; 2];
        for _ in 0..1000 {
            counts[weighted_index(&[1.0, 9.0], &mut rng).unwrap()] += 1;
        }
        assert!(
            counts[1] > counts[0] * 5,
            "Expected index 1 to be selected more often: {:?}",
            counts
        );
    }
}

//! Unit-hypercube sampling.
//!
//! Produces the probability-space coordinates consumed by bound resolution:
//! `N` samples, each a `D`-tuple of independent Uniform[0, 1) draws, where
//! `D` is the number of uncertain variables.
//!
//! No variance reduction is applied; every coordinate is an independent
//! draw from the configured [`RelRng`] stream, so a fixed seed reproduces
//! the full sample matrix exactly.

use crate::engine::rng::RelRng;

/// Plain Monte Carlo sampler over the unit hypercube.
///
/// Statistical adequacy of the sample count is a caller responsibility;
/// `n_samples = 1` is legal but produces an unreliable estimate.
#[derive(Debug, Clone, Copy)]
pub struct HypercubeSampler {
    /// Number of samples to draw.
    n_samples: usize,
    /// Hypercube dimension (number of variables).
    dimension: usize,
}

impl HypercubeSampler {
    /// Create a sampler for `n_samples` points of the given dimension.
    #[must_use]
    pub const fn new(n_samples: usize, dimension: usize) -> Self {
        Self {
            n_samples,
            dimension,
        }
    }

    /// Draw the full sample matrix, row `i` being sample `i`.
    #[must_use]
    pub fn draw(&self, rng: &mut RelRng) -> Vec<Vec<f64>> {
        (0..self.n_samples)
            .map(|_| rng.sample_n(self.dimension))
            .collect()
    }

    /// Get the configured sample count.
    #[must_use]
    pub const fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Get the hypercube dimension.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
}

//! Empirical CDF with interpolated inverse.
//!
//! `Hist` variables carry an observed sample instead of a parametric
//! distribution. The table is built once at construction: observations are
//! sorted ascending and observation `i` (zero-based) is assigned cumulative
//! probability `(i + 1) / n`. The inverse interpolates linearly between
//! table rows and clamps to the smallest/largest observation outside the
//! table's support, so `u = 0` maps to the observed minimum and `u = 1` to
//! the observed maximum.

use crate::error::{RelError, RelResult};

/// Sorted-data / cumulative-probability table with an interpolated inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalCdf {
    /// Observations sorted ascending.
    sorted: Vec<f64>,
    /// Cumulative probability of each observation, `(i + 1) / n`.
    cdf: Vec<f64>,
}

impl EmpiricalCdf {
    /// Build the table from raw observations.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for fewer than two observations (the
    /// inverse interpolation is undefined otherwise) or any non-finite
    /// observation.
    pub fn from_observations(observations: &[f64]) -> RelResult<Self> {
        if observations.len() < 2 {
            return Err(RelError::config(format!(
                "empirical variable requires at least two observations, got {}",
                observations.len()
            )));
        }
        if let Some(bad) = observations.iter().find(|v| !v.is_finite()) {
            return Err(RelError::config(format!(
                "empirical observations must be finite, got {bad}"
            )));
        }

        let mut sorted = observations.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let cdf = (1..=n).map(|i| i as f64 / n as f64).collect();

        Ok(Self { sorted, cdf })
    }

    /// Inverse CDF at probability level `u`, clamped to the observed range.
    ///
    /// Callers guarantee `u ∈ [0, 1]`.
    #[must_use]
    pub fn inverse(&self, u: f64) -> f64 {
        let last = self.cdf.len() - 1;
        if u <= self.cdf[0] {
            return self.sorted[0];
        }
        if u >= self.cdf[last] {
            return self.sorted[last];
        }

        // First table row with cumulative probability >= u; u is strictly
        // inside (cdf[0], cdf[last]) here, so 1 <= i <= last.
        let i = self.cdf.partition_point(|&p| p < u);
        let (p0, p1) = (self.cdf[i - 1], self.cdf[i]);
        let (x0, x1) = (self.sorted[i - 1], self.sorted[i]);
        x0 + (u - p0) / (p1 - p0) * (x1 - x0)
    }

    /// Observations sorted ascending.
    #[must_use]
    pub fn observations(&self) -> &[f64] {
        &self.sorted
    }

    /// Smallest observation.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    /// Largest observation.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }
}

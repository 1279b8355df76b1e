//! Continuous distribution wrapper.
//!
//! `Cdf` and `Pbox` variables map probability coordinates into physical
//! space through the inverse CDF (quantile) of one or more continuous
//! distributions. The statrs distributions do the numerical work; this
//! module pairs each one with a serializable parameter spec so variable
//! definitions can round-trip through configuration files and analysis
//! records.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, LogNormal, Normal, Uniform};

use crate::error::{RelError, RelResult};

/// Serializable distribution parameters.
///
/// The YAML form is tagged by `kind`:
///
/// ```yaml
/// kind: normal
/// mean: 1.0
/// std_dev: 0.14
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum DistSpec {
    /// Normal distribution with mean and standard deviation.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation (must be positive).
        std_dev: f64,
    },
    /// Log-normal distribution parameterized on the log scale.
    LogNormal {
        /// Location (mean of the underlying normal).
        location: f64,
        /// Scale (standard deviation of the underlying normal).
        scale: f64,
    },
    /// Continuous uniform distribution.
    Uniform {
        /// Lower endpoint.
        min: f64,
        /// Upper endpoint.
        max: f64,
    },
}

impl DistSpec {
    /// Build the distribution described by this spec.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid parameters (non-positive
    /// scale, reversed uniform endpoints, NaN).
    pub fn build(&self) -> RelResult<Dist> {
        let inner = match *self {
            Self::Normal { mean, std_dev } => Normal::new(mean, std_dev)
                .map(Inner::Normal)
                .map_err(|e| RelError::config(format!("normal({mean}, {std_dev}): {e}")))?,
            Self::LogNormal { location, scale } => LogNormal::new(location, scale)
                .map(Inner::LogNormal)
                .map_err(|e| RelError::config(format!("lognormal({location}, {scale}): {e}")))?,
            Self::Uniform { min, max } => Uniform::new(min, max)
                .map(Inner::Uniform)
                .map_err(|e| RelError::config(format!("uniform({min}, {max}): {e}")))?,
        };
        Ok(Dist {
            spec: self.clone(),
            inner,
        })
    }
}

/// A continuous distribution with quantile evaluation.
#[derive(Debug, Clone)]
pub struct Dist {
    spec: DistSpec,
    inner: Inner,
}

#[derive(Debug, Clone)]
enum Inner {
    Normal(Normal),
    LogNormal(LogNormal),
    Uniform(Uniform),
}

impl Dist {
    /// Normal distribution with the given mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-positive standard deviation.
    pub fn normal(mean: f64, std_dev: f64) -> RelResult<Self> {
        DistSpec::Normal { mean, std_dev }.build()
    }

    /// Log-normal distribution parameterized on the log scale.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-positive scale.
    pub fn lognormal(location: f64, scale: f64) -> RelResult<Self> {
        DistSpec::LogNormal { location, scale }.build()
    }

    /// Log-normal distribution matched to physical-space moments.
    ///
    /// Given the physical mean `m` and standard deviation `s`, the
    /// underlying normal has location `ln(m² / √(m² + s²))` and scale
    /// `√(ln(1 + s²/m²))`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `m > 0` and `s > 0`.
    pub fn lognormal_from_moments(mean: f64, std_dev: f64) -> RelResult<Self> {
        if mean <= 0.0 || std_dev <= 0.0 {
            return Err(RelError::config(format!(
                "lognormal moments require positive mean and std_dev, got ({mean}, {std_dev})"
            )));
        }
        let location = (mean * mean / (mean * mean + std_dev * std_dev).sqrt()).ln();
        let scale = (1.0 + (std_dev * std_dev) / (mean * mean)).ln().sqrt();
        Self::lognormal(location, scale)
    }

    /// Continuous uniform distribution on `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `min >= max`.
    pub fn uniform(min: f64, max: f64) -> RelResult<Self> {
        DistSpec::Uniform { min, max }.build()
    }

    /// Inverse CDF at probability level `u`.
    ///
    /// Callers guarantee `u ∈ [0, 1]`; the variable layer performs the
    /// domain check before any quantile is evaluated. Unbounded
    /// distributions return `-∞` at 0 and `+∞` at 1.
    #[must_use]
    pub fn quantile(&self, u: f64) -> f64 {
        match &self.inner {
            Inner::Normal(d) => d.inverse_cdf(u),
            Inner::LogNormal(d) => d.inverse_cdf(u),
            Inner::Uniform(d) => d.inverse_cdf(u),
        }
    }

    /// CDF at `x` (probability of a value at or below `x`).
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        match &self.inner {
            Inner::Normal(d) => d.cdf(x),
            Inner::LogNormal(d) => d.cdf(x),
            Inner::Uniform(d) => d.cdf(x),
        }
    }

    /// The serializable parameter spec this distribution was built from.
    #[must_use]
    pub fn spec(&self) -> DistSpec {
        self.spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_quantile_median() {
        let d = Dist::normal(0.0, 1.0).expect("valid");
        assert!(d.quantile(0.5).abs() < 1e-12);

        let shifted = Dist::normal(1.0, 0.1).expect("valid");
        assert!((shifted.quantile(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_quantile_reference_values() {
        // Reference quantiles from the source implementation's test suite.
        let d = Dist::normal(36.0, 0.5).expect("valid");
        assert!((d.quantile(0.9) - 36.640_775_782_772_3).abs() < 1e-7);

        let d = Dist::normal(-4.0, 0.3).expect("valid");
        assert!((d.quantile(0.4) - (-4.076_004_130_940_74)).abs() < 1e-7);
    }

    #[test]
    fn test_normal_quantile_tails() {
        let d = Dist::normal(1.0, 0.1).expect("valid");
        assert_eq!(d.quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(d.quantile(1.0), f64::INFINITY);
    }

    #[test]
    fn test_uniform_quantile() {
        let d = Dist::uniform(2.0, 6.0).expect("valid");
        assert!((d.quantile(0.0) - 2.0).abs() < 1e-12);
        assert!((d.quantile(0.5) - 4.0).abs() < 1e-12);
        assert!((d.quantile(1.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_lognormal_from_moments_recovers_mean() {
        // E[X] for LogNormal(location, scale) is exp(location + scale²/2).
        let d = Dist::lognormal_from_moments(3.0, 0.6).expect("valid");
        let DistSpec::LogNormal { location, scale } = d.spec() else {
            panic!("expected lognormal spec");
        };
        let mean = (location + scale * scale / 2.0).exp();
        assert!((mean - 3.0).abs() < 1e-10, "recovered mean {mean}");
    }

    #[test]
    fn test_lognormal_from_moments_rejects_nonpositive() {
        assert!(Dist::lognormal_from_moments(-1.0, 0.5).is_err());
        assert!(Dist::lognormal_from_moments(1.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_parameters_are_config_errors() {
        let err = Dist::normal(0.0, -1.0).expect_err("negative std_dev");
        assert!(err.to_string().contains("configuration error"));

        assert!(Dist::uniform(5.0, 1.0).is_err());
    }

    #[test]
    fn test_quantile_cdf_roundtrip() {
        let d = Dist::normal(2.0, 0.5).expect("valid");
        for u in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let x = d.quantile(u);
            assert!((d.cdf(x) - u).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spec_yaml_roundtrip() {
        let spec = DistSpec::Normal {
            mean: 1.0,
            std_dev: 0.14,
        };
        let yaml = serde_yaml::to_string(&spec).expect("serialize");
        let back: DistSpec = serde_yaml::from_str(&yaml).expect("parse");
        assert_eq!(back, spec);
    }

    #[test]
    fn test_spec_unknown_kind_rejected() {
        let result: Result<DistSpec, _> = serde_yaml::from_str("kind: cauchy\nscale: 1.0\n");
        assert!(result.is_err());
    }
}

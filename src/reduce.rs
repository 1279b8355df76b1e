//! Reliability statistics.
//!
//! Reduces the per-sample extrema produced by the engine into a probability
//! of failure and a reliability index for each envelope. The performance
//! function convention is that negative output denotes failure, so the
//! probability of failure is the fraction of outcomes strictly below zero
//! and the reliability index is the standard-normal inverse CDF at `1 - pf`.
//!
//! Reduction is a pure function of the outcome sequence: running it twice
//! on the same outcomes yields identical summaries.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::engine::SampleOutcome;
use crate::error::{RelError, RelResult};

/// Aggregate reliability statistics for both envelopes.
///
/// The lower pair is computed from the per-sample minima, the upper pair
/// from the per-sample maxima. In precise mode no maxima exist and the
/// upper pair is degenerate: `pf_upper = 0`, `beta_upper = +∞`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilitySummary {
    /// Probability of failure from the lower-envelope outcomes.
    pub pf_lower: f64,
    /// Probability of failure from the upper-envelope outcomes.
    pub pf_upper: f64,
    /// Reliability index for the lower envelope.
    pub beta_lower: f64,
    /// Reliability index for the upper envelope.
    pub beta_upper: f64,
}

/// Fraction of outcomes strictly below zero.
///
/// # Errors
///
/// Returns [`RelError::EmptyOutcomes`] for an empty collection and a
/// non-finite error if any outcome is NaN. Infinite outcomes are legal:
/// `+∞` can never count as failure, `-∞` always does.
pub fn probability_of_failure(outcomes: &[f64]) -> RelResult<f64> {
    if outcomes.is_empty() {
        return Err(RelError::EmptyOutcomes);
    }
    if let Some(i) = outcomes.iter().position(|y| y.is_nan()) {
        return Err(RelError::non_finite(format!("outcomes[{i}]")));
    }

    let failures = outcomes.iter().filter(|&&y| y < 0.0).count();
    Ok(failures as f64 / outcomes.len() as f64)
}

/// Reliability index for a probability of failure.
///
/// Uses the classical first-order relation `beta = Φ⁻¹(1 - pf)`. The
/// endpoints map to the infinities: `pf = 0` means no observed failure
/// (`+∞`), `pf = 1` means certain failure (`-∞`).
///
/// # Errors
///
/// Returns a domain error when `pf < 0` or `pf > 1` (including NaN).
pub fn reliability_index(pf: f64) -> RelResult<f64> {
    if !(0.0..=1.0).contains(&pf) {
        return Err(RelError::ProbabilityOutOfBounds { value: pf });
    }
    if pf == 0.0 {
        return Ok(f64::INFINITY);
    }
    if pf == 1.0 {
        return Ok(f64::NEG_INFINITY);
    }

    Ok(standard_normal().inverse_cdf(1.0 - pf))
}

/// Probability of failure implied by a reliability index, `1 - Φ(beta)`.
///
/// Inverse of [`reliability_index`]; used to cross-check closed-form
/// reference cases.
#[must_use]
pub fn failure_probability(beta: f64) -> f64 {
    if beta == f64::INFINITY {
        return 0.0;
    }
    if beta == f64::NEG_INFINITY {
        return 1.0;
    }
    1.0 - standard_normal().cdf(beta)
}

/// Reduce per-sample extrema into a [`ReliabilitySummary`].
///
/// Every outcome must carry an upper extremum or none may: the engine
/// decides the analysis mode once per run, so a mixed sequence indicates
/// a construction defect and is rejected.
///
/// # Errors
///
/// Returns [`RelError::EmptyOutcomes`] for an empty sequence, a non-finite
/// error for NaN extrema, and a configuration error for a mixed sequence.
pub fn reduce(outcomes: &[SampleOutcome]) -> RelResult<ReliabilitySummary> {
    if outcomes.is_empty() {
        return Err(RelError::EmptyOutcomes);
    }

    let lower: Vec<f64> = outcomes.iter().map(|o| o.min.y).collect();
    let upper: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| o.max.as_ref().map(|m| m.y))
        .collect();

    if !upper.is_empty() && upper.len() != outcomes.len() {
        return Err(RelError::config(format!(
            "mixed outcome sequence: {} of {} samples carry an upper extremum",
            upper.len(),
            outcomes.len()
        )));
    }

    let pf_lower = probability_of_failure(&lower)?;
    let beta_lower = reliability_index(pf_lower)?;

    // No upper searches were performed: nothing can have failed there.
    let (pf_upper, beta_upper) = if upper.is_empty() {
        (0.0, f64::INFINITY)
    } else {
        let pf = probability_of_failure(&upper)?;
        (pf, reliability_index(pf)?)
    };

    Ok(ReliabilitySummary {
        pf_lower,
        pf_upper,
        beta_lower,
        beta_upper,
    })
}

fn standard_normal() -> Normal {
    // The standard normal parameters are always valid.
    Normal::standard()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: pf always lands in [0, 1].
        #[test]
        fn prop_pf_in_unit_interval(
            outcomes in prop::collection::vec(-1e6f64..1e6, 1..200),
        ) {
            let pf = probability_of_failure(&outcomes).expect("non-empty");
            prop_assert!((0.0..=1.0).contains(&pf));
        }

        /// Falsification: beta round-trips through failure_probability.
        #[test]
        fn prop_beta_roundtrip(pf in 0.0001f64..0.9999) {
            let beta = reliability_index(pf).expect("in domain");
            prop_assert!((failure_probability(beta) - pf).abs() < 1e-9);
        }

        /// Falsification: reliability_index is monotone decreasing in pf.
        #[test]
        fn prop_beta_monotone(p1 in 0.001f64..0.999, p2 in 0.001f64..0.999) {
            prop_assume!(p1 < p2);
            let b1 = reliability_index(p1).expect("in domain");
            let b2 = reliability_index(p2).expect("in domain");
            prop_assert!(b1 >= b2);
        }
    }
}

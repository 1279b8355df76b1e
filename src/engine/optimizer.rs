//! Bounded derivative-free minimization.
//!
//! Implements the Nelder–Mead simplex method subject to independent box
//! constraints per dimension: every candidate vertex is projected onto the
//! feasible box, so degenerate dimensions (`lo == hi`) stay pinned and the
//! search never evaluates the objective outside the box.
//!
//! The worst-case evaluator runs this twice per imprecise sample — once on
//! the performance function and once on its negation — which reuses a single
//! minimization primitive for both envelope searches.
//!
//! # Convergence
//!
//! The search reports success only when both the function spread and the
//! simplex extent fall below the configured tolerances within the iteration
//! budget. Budget exhaustion is a hard error: an unconverged bound must
//! never flow into an aggregate statistic.

use serde::{Deserialize, Serialize};

/// Nelder–Mead coefficients (standard values).
const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Relative step used to seed the initial simplex on each free dimension.
const INITIAL_STEP: f64 = 0.1;

/// Configuration for a bounded minimization run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Iteration budget; exhaustion is a convergence failure.
    pub max_iterations: usize,
    /// Convergence tolerance on the simplex function-value spread.
    pub f_tolerance: f64,
    /// Convergence tolerance on the simplex coordinate extent.
    pub x_tolerance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            f_tolerance: 1e-10,
            x_tolerance: 1e-8,
        }
    }
}

/// A converged bounded optimization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Optimum {
    /// Location of the optimum inside the box.
    pub x: Vec<f64>,
    /// Objective value at [`Optimum::x`].
    pub y: f64,
    /// Iterations consumed.
    pub iterations: usize,
}

/// Failure of a single bounded minimization.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OptimizerError {
    /// The iteration budget ran out before the tolerances were met.
    #[error("iteration budget exhausted after {max_iterations} iterations (best value {best_y:.6e})")]
    BudgetExhausted {
        /// Configured budget.
        max_iterations: usize,
        /// Best objective value seen before giving up.
        best_y: f64,
    },
    /// The feasible box was malformed.
    #[error("invalid bounds at dimension {dimension}: ({lo}, {hi})")]
    InvalidBounds {
        /// Offending dimension index.
        dimension: usize,
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },
    /// The objective produced NaN inside the feasible box.
    #[error("objective returned NaN at a feasible point")]
    NonFiniteObjective,
}

/// Minimize `f` over the box `bounds` starting from `x0`.
///
/// `x0` is projected onto the box before the search starts; callers usually
/// draw it uniformly from the box. If every dimension is degenerate the box
/// contains a single feasible point and its evaluation is returned directly.
///
/// # Errors
///
/// Returns [`OptimizerError::InvalidBounds`] for `lo > hi` or a NaN bound,
/// [`OptimizerError::NonFiniteObjective`] if `f` yields NaN, and
/// [`OptimizerError::BudgetExhausted`] when the tolerances are not met
/// within `config.max_iterations`.
pub fn minimize<F>(
    f: F,
    bounds: &[(f64, f64)],
    x0: &[f64],
    config: &OptimizerConfig,
) -> Result<Optimum, OptimizerError>
where
    F: Fn(&[f64]) -> f64,
{
    for (j, &(lo, hi)) in bounds.iter().enumerate() {
        if lo > hi || lo.is_nan() || hi.is_nan() {
            return Err(OptimizerError::InvalidBounds {
                dimension: j,
                lo,
                hi,
            });
        }
    }
    debug_assert_eq!(bounds.len(), x0.len());

    let start = project(x0, bounds);

    // Fully degenerate box: the single feasible point is the optimum.
    if bounds.iter().all(|(lo, hi)| lo == hi) {
        let y = eval(&f, &start)?;
        return Ok(Optimum {
            x: start,
            y,
            iterations: 0,
        });
    }

    let n = bounds.len();
    let mut simplex = initial_simplex(&start, bounds);
    let mut values = Vec::with_capacity(n + 1);
    for vertex in &simplex {
        values.push(eval(&f, vertex)?);
    }

    for iteration in 0..config.max_iterations {
        sort_simplex(&mut simplex, &mut values);

        if converged(&simplex, &values, config) {
            return Ok(Optimum {
                x: simplex[0].clone(),
                y: values[0],
                iterations: iteration,
            });
        }

        // Centroid of every vertex except the worst.
        let mut centroid = vec![0.0; n];
        for vertex in &simplex[..n] {
            for (c, &xj) in centroid.iter_mut().zip(vertex.iter()) {
                *c += xj;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        let worst = simplex[n].clone();
        let reflected = project(&step(&centroid, &worst, REFLECT), bounds);
        let f_reflected = eval(&f, &reflected)?;

        if f_reflected < values[0] {
            // Try to expand past the reflection.
            let expanded = project(&step(&centroid, &worst, EXPAND), bounds);
            let f_expanded = eval(&f, &expanded)?;
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
        } else if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
        } else {
            // Contract toward the better of the reflection and the worst.
            let (toward, f_toward) = if f_reflected < values[n] {
                (&reflected, f_reflected)
            } else {
                (&worst, values[n])
            };
            let contracted: Vec<f64> = centroid
                .iter()
                .zip(toward.iter())
                .map(|(&c, &w)| c + CONTRACT * (w - c))
                .collect();
            let contracted = project(&contracted, bounds);
            let f_contracted = eval(&f, &contracted)?;

            if f_contracted < f_toward {
                simplex[n] = contracted;
                values[n] = f_contracted;
            } else {
                // Shrink every vertex toward the best.
                let best = simplex[0].clone();
                for i in 1..=n {
                    let shrunk: Vec<f64> = best
                        .iter()
                        .zip(simplex[i].iter())
                        .map(|(&b, &v)| b + SHRINK * (v - b))
                        .collect();
                    simplex[i] = project(&shrunk, bounds);
                    values[i] = eval(&f, &simplex[i])?;
                }
            }
        }
    }

    sort_simplex(&mut simplex, &mut values);
    Err(OptimizerError::BudgetExhausted {
        max_iterations: config.max_iterations,
        best_y: values[0],
    })
}

fn eval<F>(f: &F, x: &[f64]) -> Result<f64, OptimizerError>
where
    F: Fn(&[f64]) -> f64,
{
    let y = f(x);
    if y.is_nan() {
        return Err(OptimizerError::NonFiniteObjective);
    }
    Ok(y)
}

/// Clamp each coordinate into its dimension's bounds.
fn project(x: &[f64], bounds: &[(f64, f64)]) -> Vec<f64> {
    x.iter()
        .zip(bounds.iter())
        .map(|(&xj, &(lo, hi))| xj.clamp(lo, hi))
        .collect()
}

/// `centroid + coeff * (centroid - worst)`.
fn step(centroid: &[f64], worst: &[f64], coeff: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst.iter())
        .map(|(&c, &w)| c + coeff * (c - w))
        .collect()
}

/// Seed simplex: the start plus one perturbed vertex per free dimension.
///
/// Degenerate dimensions get a zero step, leaving those vertices pinned;
/// the search then effectively runs in the free subspace.
fn initial_simplex(start: &[f64], bounds: &[(f64, f64)]) -> Vec<Vec<f64>> {
    let n = bounds.len();
    let mut simplex = Vec::with_capacity(n + 1);
    simplex.push(start.to_vec());

    for j in 0..n {
        let (lo, hi) = bounds[j];
        let mut vertex = start.to_vec();
        let h = INITIAL_STEP * (hi - lo);
        // Step away from the nearer boundary.
        if vertex[j] + h <= hi {
            vertex[j] += h;
        } else {
            vertex[j] -= h;
        }
        simplex.push(project(&vertex, bounds));
    }

    simplex
}

fn sort_simplex(simplex: &mut [Vec<f64>], values: &mut [f64]) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let sorted_simplex: Vec<Vec<f64>> = order.iter().map(|&i| simplex[i].clone()).collect();
    let sorted_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    simplex.clone_from_slice(&sorted_simplex);
    values.copy_from_slice(&sorted_values);
}

fn converged(simplex: &[Vec<f64>], values: &[f64], config: &OptimizerConfig) -> bool {
    let f_spread = values[values.len() - 1] - values[0];
    if f_spread.abs() > config.f_tolerance {
        return false;
    }

    let best = &simplex[0];
    simplex[1..].iter().all(|vertex| {
        vertex
            .iter()
            .zip(best.iter())
            .all(|(&a, &b)| (a - b).abs() <= config.x_tolerance)
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: the optimum never leaves the feasible box.
        #[test]
        fn prop_optimum_within_bounds(
            lo in -10.0f64..0.0,
            hi in 0.0f64..10.0,
            start in -10.0f64..10.0,
            center in -20.0f64..20.0,
        ) {
            let f = move |x: &[f64]| (x[0] - center).powi(2);
            let opt = minimize(f, &[(lo, hi)], &[start], &OptimizerConfig::default())
                .expect("quadratic converges");
            prop_assert!(opt.x[0] >= lo && opt.x[0] <= hi);
        }

        /// Falsification: the optimum is at least as good as the start point.
        #[test]
        fn prop_never_worse_than_start(
            lo in -10.0f64..-1.0,
            hi in 1.0f64..10.0,
            start in -1.0f64..1.0,
        ) {
            let f = |x: &[f64]| x[0].powi(2) + x[0].sin();
            let f_start = f(&[start]);
            let opt = minimize(f, &[(lo, hi)], &[start], &OptimizerConfig::default())
                .expect("smooth 1-d objective converges");
            prop_assert!(opt.y <= f_start + 1e-12);
        }
    }
}

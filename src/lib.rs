//! # imprel
//!
//! Imprecise Structural Reliability Analysis.
//!
//! An uncertainty-propagation engine for structural reliability problems
//! where some inputs are only imprecisely known:
//! - Uncertain variables as a closed sum type (deterministic, interval,
//!   distribution, probability box, empirical sample)
//! - Plain Monte Carlo sampling over the unit hypercube with a
//!   deterministic, partitioned PCG random number generator
//! - Per-sample worst-case evaluation via bounded derivative-free
//!   optimization when any variable is epistemically uncertain
//! - Reduction into probability-of-failure and reliability-index pairs
//!   for the lower and upper envelopes
//!
//! ## Example
//!
//! ```rust
//! use imprel::prelude::*;
//!
//! let variables = vec![
//!     Variable::cdf("r", Dist::normal(1.0, 0.14)?),
//!     Variable::cdf("s", Dist::normal(0.2, 0.2)?),
//! ];
//! let settings = EngineSettings {
//!     n_samples: 1000,
//!     seed: 42,
//!     ..EngineSettings::default()
//! };
//! let engine = ReliabilityEngine::new(variables, |x: &[f64]| x[0] - x[1], settings)?;
//! let output = engine.run()?;
//! assert!(output.summary.pf_lower < 0.01);
//! # Ok::<(), imprel::RelError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Manual Horner's method is intentional
    clippy::imprecise_flops,   // Numerical code choices are intentional
    clippy::no_effect_underscore_binding,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod reduce;
pub mod scenarios;
pub mod variables;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::engine::rng::RelRng;
    pub use crate::engine::{
        AnalysisMode, AnalysisOutput, AnalysisRecord, EngineSettings, HypercubeSampler,
        ReliabilityEngine, SampleOutcome,
    };
    pub use crate::error::{RelError, RelResult};
    pub use crate::reduce::{probability_of_failure, reliability_index, ReliabilitySummary};
    pub use crate::variables::{Dist, DistSpec, Variable, VariableSpec, VarKind};
}

/// Re-export for public API
pub use error::{RelError, RelResult};

//! Error types for imprel.
//!
//! Every fallible operation returns `Result<T, RelError>`; nothing panics
//! and nothing is silently swallowed or retried. Convergence restarts are
//! bounded, counted, and reported by the engine before escalating here.

use thiserror::Error;

/// Result type alias for imprel operations.
pub type RelResult<T> = Result<T, RelError>;

/// Unified error type for all imprel operations.
///
/// # Taxonomy
///
/// - *Domain*: a probability coordinate outside `[0, 1]` reached a bound
///   resolution — a sampler or caller defect, propagated immediately.
/// - *Configuration*: malformed variable definitions or analysis settings,
///   raised at construction time before any sampling occurs.
/// - *Convergence*: a bounded optimization failed for one sample; fatal for
///   the entire run because an unconverged bound cannot be trusted in an
///   aggregate statistic.
/// - *Shape*: the reducer was given an empty or non-finite outcome set.
#[derive(Debug, Error)]
pub enum RelError {
    /// Probability coordinate outside the unit interval.
    #[error("probability value {value} is outside [0, 1]")]
    ProbabilityOutOfBounds {
        /// The offending coordinate.
        value: f64,
    },

    /// Invalid variable definition or analysis setting.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bounded optimization failed to converge for one sample.
    #[error("{bound} bound search failed to converge at sample {sample}: {message}")]
    Convergence {
        /// Which envelope was being searched (`"lower"` or `"upper"`).
        bound: &'static str,
        /// Index of the sample whose optimization failed.
        sample: usize,
        /// Optimizer diagnostic.
        message: String,
    },

    /// The reducer was given an empty outcome collection.
    #[error("outcome collection is empty")]
    EmptyOutcomes,

    /// A NaN slipped into a numeric aggregate.
    #[error("non-finite value detected at {location}")]
    NonFinite {
        /// Location where the NaN was detected.
        location: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a non-finite error for the given location.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFinite {
            location: location.into(),
        }
    }

    /// Check whether this error aborts a whole analysis run.
    ///
    /// Convergence failures poison the aggregate statistic, so no partial
    /// results may be returned once one occurs.
    #[must_use]
    pub const fn is_fatal_for_run(&self) -> bool {
        matches!(self, Self::Convergence { .. })
    }
}

//! Configuration system with YAML schema and validation.
//!
//! Mistake-proofs analysis definitions through:
//! - Type-safe configuration structs
//! - Compile-time validation via serde
//! - Runtime semantic validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::{EngineSettings, OptimizerConfig};
use crate::error::{RelError, RelResult};
use crate::variables::{Variable, VariableSpec};

/// Top-level analysis configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Analysis metadata.
    #[validate(nested)]
    #[serde(default)]
    pub analysis: AnalysisMeta,

    /// Sampling settings.
    #[validate(nested)]
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Bounded-optimization settings for imprecise mode.
    #[validate(nested)]
    #[serde(default)]
    pub optimizer: OptimizerSettings,

    /// Execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Uncertain input variables, in performance-function argument order.
    #[validate(length(min = 1))]
    pub variables: Vec<VariableSpec>,

    /// Name of the registered performance function to evaluate.
    #[validate(length(min = 1))]
    pub limit_state: String,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl AnalysisConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> RelResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> RelResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        // Schema constraints first, then semantic constraints.
        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> RelResult<()> {
        if self.sampling.samples == 0 {
            return Err(RelError::config("sample count must be at least 1"));
        }

        if self.optimizer.max_iterations == 0 {
            return Err(RelError::config("optimizer iteration budget must be at least 1"));
        }
        if self.optimizer.f_tolerance <= 0.0 || self.optimizer.x_tolerance <= 0.0 {
            return Err(RelError::config("optimizer tolerances must be positive"));
        }

        if let Some(0) = self.execution.workers {
            return Err(RelError::config(
                "worker count must be at least 1 (omit to use all CPUs)",
            ));
        }

        // Constructing each variable exercises its parameter validation.
        for spec in &self.variables {
            Variable::from_spec(spec)?;
        }

        Ok(())
    }

    /// Build the variable set in configuration order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid variable parameters.
    pub fn build_variables(&self) -> RelResult<Vec<Variable>> {
        self.variables.iter().map(Variable::from_spec).collect()
    }

    /// Engine settings implied by this configuration.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            n_samples: self.sampling.samples,
            seed: self.sampling.seed,
            workers: self.execution.workers,
            optimizer: OptimizerConfig {
                max_iterations: self.optimizer.max_iterations,
                f_tolerance: self.optimizer.f_tolerance,
                x_tolerance: self.optimizer.x_tolerance,
            },
            max_restarts: self.optimizer.max_restarts,
        }
    }
}

/// Analysis metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalysisMeta {
    /// Analysis name.
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    /// Number of Monte Carlo samples.
    #[validate(range(min = 1))]
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Master RNG seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_samples() -> usize {
    10_000
}

const fn default_seed() -> u64 {
    42
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed: default_seed(),
        }
    }
}

/// Bounded-optimization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OptimizerSettings {
    /// Iteration budget per bounded minimization.
    #[validate(range(min = 1))]
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Convergence tolerance on the function-value spread.
    #[serde(default = "default_f_tolerance")]
    pub f_tolerance: f64,

    /// Convergence tolerance on the coordinate spread.
    #[serde(default = "default_x_tolerance")]
    pub x_tolerance: f64,

    /// Additional random-start attempts per bound before the run aborts.
    #[serde(default = "default_max_restarts")]
    pub max_restarts: usize,
}

fn default_max_iterations() -> usize {
    OptimizerConfig::default().max_iterations
}

fn default_f_tolerance() -> f64 {
    OptimizerConfig::default().f_tolerance
}

fn default_x_tolerance() -> f64 {
    OptimizerConfig::default().x_tolerance
}

const fn default_max_restarts() -> usize {
    2
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            f_tolerance: default_f_tolerance(),
            x_tolerance: default_x_tolerance(),
            max_restarts: default_max_restarts(),
        }
    }
}

/// Execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Worker thread count; omit to use the number of CPUs.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Run samples on the work-stealing pool instead of sequentially.
    #[serde(default)]
    pub parallel: bool,
}

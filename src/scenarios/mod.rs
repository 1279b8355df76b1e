//! Pre-built reliability scenarios.
//!
//! Provides ready-to-run analysis templates for the classical
//! resistance-minus-load problem:
//! - `r-minus-s`: both variables precisely known (precise mode)
//! - `r-minus-s-pbox`: resistance as a probability box (imprecise mode)
//!
//! Scenarios carry variable definitions and the name of a registered
//! performance function; configurations loaded from YAML reference the
//! same registry.

use crate::engine::EngineSettings;
use crate::error::{RelError, RelResult};
use crate::variables::{DistSpec, Variable, VariableSpec};

/// Scalar performance function over a physical-space point.
pub type LimitState = fn(&[f64]) -> f64;

/// Registered performance functions, addressable by name.
const LIMIT_STATES: &[(&str, LimitState)] = &[("difference", difference)];

/// Resistance-minus-load margin: negative when the load exceeds the
/// resistance.
fn difference(x: &[f64]) -> f64 {
    x[0] - x[1]
}

/// Look up a registered performance function.
///
/// # Errors
///
/// Returns a configuration error for an unknown name.
pub fn limit_state_by_name(name: &str) -> RelResult<LimitState> {
    LIMIT_STATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, f)| f)
        .ok_or_else(|| {
            let known: Vec<&str> = LIMIT_STATES.iter().map(|&(n, _)| n).collect();
            RelError::config(format!(
                "unknown limit state '{name}' (known: {})",
                known.join(", ")
            ))
        })
}

/// A ready-to-run analysis template.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario identifier, used by the CLI.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Variable definitions, in performance-function argument order.
    pub variables: Vec<VariableSpec>,
    /// Name of the registered performance function.
    pub limit_state: &'static str,
    /// Default sample count.
    pub samples: usize,
}

impl Scenario {
    /// Build the variable set for this scenario.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid variable parameters;
    /// built-in scenarios never fail.
    pub fn build_variables(&self) -> RelResult<Vec<Variable>> {
        self.variables.iter().map(Variable::from_spec).collect()
    }

    /// Resolve this scenario's performance function.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unregistered name.
    pub fn build_limit_state(&self) -> RelResult<LimitState> {
        limit_state_by_name(self.limit_state)
    }

    /// Engine settings with this scenario's default sample count.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            n_samples: self.samples,
            ..EngineSettings::default()
        }
    }
}

/// All built-in scenarios.
#[must_use]
pub fn builtin() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "r-minus-s",
            description: "Resistance minus load, both precisely known normals",
            variables: vec![
                VariableSpec::Cdf {
                    name: "r".to_string(),
                    dist: DistSpec::Normal {
                        mean: 1.0,
                        std_dev: 0.14,
                    },
                },
                VariableSpec::Cdf {
                    name: "s".to_string(),
                    dist: DistSpec::Normal {
                        mean: 0.2,
                        std_dev: 0.2,
                    },
                },
            ],
            limit_state: "difference",
            samples: 10_000,
        },
        Scenario {
            name: "r-minus-s-pbox",
            description: "Resistance as a probability box over two normals",
            variables: vec![
                VariableSpec::Pbox {
                    name: "r".to_string(),
                    dists: vec![
                        DistSpec::Normal {
                            mean: 0.7,
                            std_dev: 0.14,
                        },
                        DistSpec::Normal {
                            mean: 0.8,
                            std_dev: 0.14,
                        },
                    ],
                },
                VariableSpec::Cdf {
                    name: "s".to_string(),
                    dist: DistSpec::Normal {
                        mean: 0.2,
                        std_dev: 0.2,
                    },
                },
            ],
            limit_state: "difference",
            samples: 10_000,
        },
    ]
}

/// Look up a built-in scenario by name.
///
/// # Errors
///
/// Returns a configuration error for an unknown name.
pub fn by_name(name: &str) -> RelResult<Scenario> {
    builtin()
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| {
            let known: Vec<String> = builtin().iter().map(|s| s.name.to_string()).collect();
            RelError::config(format!(
                "unknown scenario '{name}' (known: {})",
                known.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AnalysisMode, ReliabilityEngine};

    #[test]
    fn test_builtin_scenarios_are_well_formed() {
        let scenarios = builtin();
        assert_eq!(scenarios.len(), 2);

        for scenario in &scenarios {
            let variables = scenario.build_variables().expect("valid variables");
            assert_eq!(variables.len(), scenario.variables.len());
            scenario.build_limit_state().expect("registered limit state");
            assert!(scenario.samples >= 1);
        }
    }

    #[test]
    fn test_scenario_modes() {
        let precise = by_name("r-minus-s").expect("built-in");
        let engine = ReliabilityEngine::new(
            precise.build_variables().expect("valid"),
            precise.build_limit_state().expect("registered"),
            precise.engine_settings(),
        )
        .expect("valid engine");
        assert_eq!(engine.mode(), AnalysisMode::Precise);

        let imprecise = by_name("r-minus-s-pbox").expect("built-in");
        let engine = ReliabilityEngine::new(
            imprecise.build_variables().expect("valid"),
            imprecise.build_limit_state().expect("registered"),
            imprecise.engine_settings(),
        )
        .expect("valid engine");
        assert_eq!(engine.mode(), AnalysisMode::Imprecise);
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let err = by_name("nonexistent").expect_err("unknown name");
        assert!(err.to_string().contains("unknown scenario"));
        assert!(err.to_string().contains("r-minus-s"));
    }

    #[test]
    fn test_limit_state_registry() {
        let f = limit_state_by_name("difference").expect("registered");
        assert!((f(&[3.0, 1.0]) - 2.0).abs() < 1e-15);

        let err = limit_state_by_name("product").expect_err("unregistered");
        assert!(err.to_string().contains("unknown limit state"));
    }
}

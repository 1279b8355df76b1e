//! Uncertain input variables.
//!
//! A [`Variable`] maps a probability-space coordinate `u ∈ [0, 1]` to a
//! physical-space interval `(lo, hi)` with `lo <= hi`. Precisely known
//! variables (`Deterministic`, `Cdf`, `Hist`) always produce a degenerate
//! interval (`lo == hi`); epistemically uncertain ones (`Interval`, `Pbox`)
//! may produce a non-degenerate one, which is what pushes a whole analysis
//! into the imprecise regime.
//!
//! The variant set is closed: dispatch is exhaustive and the
//! precise-vs-imprecise capability is a static property of the variant,
//! never derived from runtime type names.

pub mod dist;
pub mod empirical;

use serde::{Deserialize, Serialize};

pub use dist::{Dist, DistSpec};
pub use empirical::EmpiricalCdf;

use crate::error::{RelError, RelResult};

/// Variable kind, exposed to callers as a single-character type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// `d` — fixed value.
    Deterministic,
    /// `i` — fixed interval, total epistemic uncertainty.
    Interval,
    /// `c` — one precisely known continuous distribution.
    Cdf,
    /// `p` — envelope of distributions (probability box).
    Pbox,
    /// `h` — empirical sample.
    Hist,
}

impl VarKind {
    /// The single-character code for this kind.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Deterministic => 'd',
            Self::Interval => 'i',
            Self::Cdf => 'c',
            Self::Pbox => 'p',
            Self::Hist => 'h',
        }
    }

    /// Resolve a single-character type code.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown code.
    pub fn from_code(code: char) -> RelResult<Self> {
        match code {
            'd' => Ok(Self::Deterministic),
            'i' => Ok(Self::Interval),
            'c' => Ok(Self::Cdf),
            'p' => Ok(Self::Pbox),
            'h' => Ok(Self::Hist),
            other => Err(RelError::config(format!(
                "unknown variable type code '{other}' (expected one of d, i, c, p, h)"
            ))),
        }
    }

    /// Whether this kind can produce non-degenerate bounds.
    ///
    /// Decides precise-vs-imprecise mode for the whole run, statically.
    #[must_use]
    pub const fn may_be_imprecise(self) -> bool {
        matches!(self, Self::Interval | Self::Pbox)
    }
}

/// One uncertain input of the performance function.
#[derive(Debug, Clone)]
pub enum Variable {
    /// Fixed value.
    Deterministic {
        /// Identifier (not required unique).
        name: String,
        /// The constant.
        value: f64,
    },
    /// Fixed interval; the probability coordinate is accepted but ignored.
    Interval {
        /// Identifier.
        name: String,
        /// Lower bound (normalized at construction).
        lb: f64,
        /// Upper bound (normalized at construction).
        ub: f64,
    },
    /// One precisely known continuous distribution.
    Cdf {
        /// Identifier.
        name: String,
        /// The distribution.
        dist: Dist,
    },
    /// Envelope over a non-empty family of distributions.
    Pbox {
        /// Identifier.
        name: String,
        /// Member distributions (order-irrelevant).
        dists: Vec<Dist>,
    },
    /// Empirical sample with interpolated inverse CDF.
    Hist {
        /// Identifier.
        name: String,
        /// Pre-built empirical table.
        ecdf: EmpiricalCdf,
    },
}

impl Variable {
    /// Fixed-value variable.
    #[must_use]
    pub fn deterministic(name: impl Into<String>, value: f64) -> Self {
        Self::Deterministic {
            name: name.into(),
            value,
        }
    }

    /// Interval variable; endpoint order does not matter.
    #[must_use]
    pub fn interval(name: impl Into<String>, a: f64, b: f64) -> Self {
        Self::Interval {
            name: name.into(),
            lb: a.min(b),
            ub: a.max(b),
        }
    }

    /// Precisely known distribution variable.
    #[must_use]
    pub fn cdf(name: impl Into<String>, dist: Dist) -> Self {
        Self::Cdf {
            name: name.into(),
            dist,
        }
    }

    /// Probability-box variable over the given distribution family.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty family.
    pub fn pbox(name: impl Into<String>, dists: Vec<Dist>) -> RelResult<Self> {
        if dists.is_empty() {
            return Err(RelError::config(
                "probability box requires at least one member distribution",
            ));
        }
        Ok(Self::Pbox {
            name: name.into(),
            dists,
        })
    }

    /// Empirical variable from raw observations.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for fewer than two observations or
    /// non-finite values.
    pub fn hist(name: impl Into<String>, observations: &[f64]) -> RelResult<Self> {
        Ok(Self::Hist {
            name: name.into(),
            ecdf: EmpiricalCdf::from_observations(observations)?,
        })
    }

    /// The variable's identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Deterministic { name, .. }
            | Self::Interval { name, .. }
            | Self::Cdf { name, .. }
            | Self::Pbox { name, .. }
            | Self::Hist { name, .. } => name,
        }
    }

    /// The variable's kind.
    #[must_use]
    pub const fn kind(&self) -> VarKind {
        match self {
            Self::Deterministic { .. } => VarKind::Deterministic,
            Self::Interval { .. } => VarKind::Interval,
            Self::Cdf { .. } => VarKind::Cdf,
            Self::Pbox { .. } => VarKind::Pbox,
            Self::Hist { .. } => VarKind::Hist,
        }
    }

    /// Whether this variable can produce non-degenerate bounds.
    #[must_use]
    pub const fn may_be_imprecise(&self) -> bool {
        self.kind().may_be_imprecise()
    }

    /// Resolve the physical-space interval at probability coordinate `u`.
    ///
    /// The returned pair satisfies `lo <= hi`; precisely known variants
    /// return `lo == hi`.
    ///
    /// # Errors
    ///
    /// Returns a domain error when `u < 0` or `u > 1` (including NaN),
    /// before any variant-specific logic runs.
    pub fn bounds(&self, u: f64) -> RelResult<(f64, f64)> {
        if !(0.0..=1.0).contains(&u) {
            return Err(RelError::ProbabilityOutOfBounds { value: u });
        }

        let bounds = match self {
            Self::Deterministic { value, .. } => (*value, *value),
            Self::Interval { lb, ub, .. } => (*lb, *ub),
            Self::Cdf { dist, .. } => {
                let x = dist.quantile(u);
                (x, x)
            }
            Self::Pbox { dists, .. } => {
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for dist in dists {
                    let q = dist.quantile(u);
                    lo = lo.min(q);
                    hi = hi.max(q);
                }
                (lo, hi)
            }
            Self::Hist { ecdf, .. } => {
                let x = ecdf.inverse(u);
                (x, x)
            }
        };

        Ok(bounds)
    }

    /// Serializable definition of this variable (name + parameters).
    ///
    /// Empirical observations are reported sorted ascending.
    #[must_use]
    pub fn spec(&self) -> VariableSpec {
        match self {
            Self::Deterministic { name, value } => VariableSpec::Deterministic {
                name: name.clone(),
                value: *value,
            },
            Self::Interval { name, lb, ub } => VariableSpec::Interval {
                name: name.clone(),
                bounds: [*lb, *ub],
            },
            Self::Cdf { name, dist } => VariableSpec::Cdf {
                name: name.clone(),
                dist: dist.spec(),
            },
            Self::Pbox { name, dists } => VariableSpec::Pbox {
                name: name.clone(),
                dists: dists.iter().map(Dist::spec).collect(),
            },
            Self::Hist { name, ecdf } => VariableSpec::Hist {
                name: name.clone(),
                observations: ecdf.observations().to_vec(),
            },
        }
    }

    /// Build a variable from its serializable definition.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for structurally invalid definitions
    /// (empty p-box family, too few observations, bad distribution
    /// parameters).
    pub fn from_spec(spec: &VariableSpec) -> RelResult<Self> {
        match spec {
            VariableSpec::Deterministic { name, value } => Ok(Self::deterministic(name, *value)),
            VariableSpec::Interval { name, bounds } => {
                Ok(Self::interval(name, bounds[0], bounds[1]))
            }
            VariableSpec::Cdf { name, dist } => Ok(Self::cdf(name, dist.build()?)),
            VariableSpec::Pbox { name, dists } => {
                let dists = dists
                    .iter()
                    .map(DistSpec::build)
                    .collect::<RelResult<Vec<_>>>()?;
                Self::pbox(name, dists)
            }
            VariableSpec::Hist { name, observations } => Self::hist(name, observations),
        }
    }
}

/// Serializable variable definition, tagged by the single-character codes
/// exposed to callers (`d`, `i`, `c`, `p`, `h`).
///
/// ```yaml
/// type: c
/// name: r
/// dist:
///   kind: normal
///   mean: 1.0
///   std_dev: 0.14
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VariableSpec {
    /// Fixed value (`d`).
    #[serde(rename = "d")]
    Deterministic {
        /// Identifier.
        name: String,
        /// The constant.
        value: f64,
    },
    /// Fixed interval (`i`); endpoint order does not matter.
    #[serde(rename = "i")]
    Interval {
        /// Identifier.
        name: String,
        /// Endpoints, any order.
        bounds: [f64; 2],
    },
    /// Precisely known distribution (`c`).
    #[serde(rename = "c")]
    Cdf {
        /// Identifier.
        name: String,
        /// Distribution parameters.
        dist: DistSpec,
    },
    /// Probability box (`p`).
    #[serde(rename = "p")]
    Pbox {
        /// Identifier.
        name: String,
        /// Member distribution parameters.
        dists: Vec<DistSpec>,
    },
    /// Empirical sample (`h`).
    #[serde(rename = "h")]
    Hist {
        /// Identifier.
        name: String,
        /// Raw observations (at least two).
        observations: Vec<f64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_bounds() {
        for value in [2.0, 0.1, -5.0, -0.2] {
            let v = Variable::deterministic("v", value);
            for u in [0.0, 0.1, 0.5, 1.0] {
                assert_eq!(v.bounds(u).expect("in domain"), (value, value));
            }
        }
    }

    #[test]
    fn test_interval_bounds_order_independent() {
        for (a, b) in [(1.0, 2.0), (0.1, 0.3), (-5.0, -4.0), (-0.2, -0.1), (4.0, 4.0)] {
            let v = Variable::interval("v", a, b);
            assert_eq!(v.bounds(0.1).expect("in domain"), (a.min(b), a.max(b)));
        }

        let inverted = Variable::interval("v", 2.0, 1.0);
        assert_eq!(inverted.bounds(0.2).expect("in domain"), (1.0, 2.0));
    }

    #[test]
    fn test_interval_ignores_probability_coordinate() {
        let v = Variable::interval("v", -1.0, 1.0);
        for u in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(v.bounds(u).expect("in domain"), (-1.0, 1.0));
        }
    }

    #[test]
    fn test_cdf_bounds() {
        let v = Variable::cdf("v", Dist::normal(0.0, 0.1).expect("valid"));
        let (lo, hi) = v.bounds(0.5).expect("in domain");
        assert!(lo.abs() < 1e-12);
        assert!((lo - hi).abs() < f64::EPSILON);

        let v = Variable::cdf("v", Dist::normal(1.0, 0.1).expect("valid"));
        let (lo, hi) = v.bounds(0.5).expect("in domain");
        assert!((lo - 1.0).abs() < 1e-12);
        assert!((lo - hi).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cdf_bounds_at_support_edges() {
        let v = Variable::cdf("v", Dist::normal(1.0, 0.1).expect("valid"));
        assert_eq!(
            v.bounds(0.0).expect("in domain"),
            (f64::NEG_INFINITY, f64::NEG_INFINITY)
        );
        assert_eq!(
            v.bounds(1.0).expect("in domain"),
            (f64::INFINITY, f64::INFINITY)
        );
    }

    #[test]
    fn test_pbox_envelope() {
        let v = Variable::pbox(
            "v",
            vec![
                Dist::normal(0.0, 0.1).expect("valid"),
                Dist::normal(1.0, 0.1).expect("valid"),
            ],
        )
        .expect("non-empty");
        let (lo, hi) = v.bounds(0.5).expect("in domain");
        assert!(lo.abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pbox_order_independence() {
        let forward = Variable::pbox(
            "v",
            vec![
                Dist::normal(0.0, 0.1).expect("valid"),
                Dist::normal(1.0, 0.1).expect("valid"),
                Dist::normal(-1.0, 0.1).expect("valid"),
            ],
        )
        .expect("non-empty");
        let reversed = Variable::pbox(
            "v",
            vec![
                Dist::normal(-1.0, 0.1).expect("valid"),
                Dist::normal(1.0, 0.1).expect("valid"),
                Dist::normal(0.0, 0.1).expect("valid"),
            ],
        )
        .expect("non-empty");

        for u in [0.1, 0.5, 0.9] {
            let a = forward.bounds(u).expect("in domain");
            let b = reversed.bounds(u).expect("in domain");
            assert!((a.0 - b.0).abs() < 1e-12);
            assert!((a.1 - b.1).abs() < 1e-12);
        }

        let (lo, hi) = forward.bounds(0.5).expect("in domain");
        assert!((lo + 1.0).abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pbox_at_support_edges() {
        let v = Variable::pbox(
            "v",
            vec![
                Dist::normal(0.0, 0.1).expect("valid"),
                Dist::normal(-1.0, 0.1).expect("valid"),
            ],
        )
        .expect("non-empty");
        assert_eq!(
            v.bounds(0.0).expect("in domain"),
            (f64::NEG_INFINITY, f64::NEG_INFINITY)
        );
        assert_eq!(
            v.bounds(1.0).expect("in domain"),
            (f64::INFINITY, f64::INFINITY)
        );
    }

    #[test]
    fn test_empty_pbox_rejected() {
        let err = Variable::pbox("v", vec![]).expect_err("empty family");
        assert!(err.to_string().contains("at least one member"));
    }

    #[test]
    fn test_hist_bounds() {
        let v = Variable::hist("v", &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid");
        assert_eq!(v.bounds(0.5).expect("in domain"), (2.0, 2.0));
        assert_eq!(v.bounds(0.0).expect("in domain"), (0.0, 0.0));
        assert_eq!(v.bounds(1.0).expect("in domain"), (5.0, 5.0));

        let v = Variable::hist("v", &[1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid");
        assert_eq!(v.bounds(0.5).expect("in domain"), (2.5, 2.5));
    }

    #[test]
    fn test_hist_too_few_observations() {
        let err = Variable::hist("v", &[3.0]).expect_err("single observation");
        assert!(err.to_string().contains("at least two observations"));
    }

    #[test]
    fn test_domain_error_for_every_variant() {
        let variants = [
            Variable::deterministic("d", 1.0),
            Variable::interval("i", 0.0, 1.0),
            Variable::cdf("c", Dist::normal(0.0, 1.0).expect("valid")),
            Variable::pbox("p", vec![Dist::normal(0.0, 1.0).expect("valid")]).expect("non-empty"),
            Variable::hist("h", &[1.0, 2.0, 3.0]).expect("valid"),
        ];

        for v in &variants {
            for bad in [-1.0, -1e-9, 1.0 + 1e-9, 2.0, f64::NAN] {
                let err = v.bounds(bad).expect_err("outside [0, 1]");
                assert!(
                    matches!(err, RelError::ProbabilityOutOfBounds { .. }),
                    "{:?} accepted u = {bad}",
                    v.kind()
                );
            }
        }
    }

    #[test]
    fn test_capability_flags() {
        assert!(!Variable::deterministic("d", 1.0).may_be_imprecise());
        assert!(Variable::interval("i", 0.0, 1.0).may_be_imprecise());
        assert!(!Variable::cdf("c", Dist::normal(0.0, 1.0).expect("valid")).may_be_imprecise());
        assert!(
            Variable::pbox("p", vec![Dist::normal(0.0, 1.0).expect("valid")])
                .expect("non-empty")
                .may_be_imprecise()
        );
        assert!(!Variable::hist("h", &[1.0, 2.0]).expect("valid").may_be_imprecise());
    }

    #[test]
    fn test_kind_codes_roundtrip() {
        for kind in [
            VarKind::Deterministic,
            VarKind::Interval,
            VarKind::Cdf,
            VarKind::Pbox,
            VarKind::Hist,
        ] {
            assert_eq!(VarKind::from_code(kind.code()).expect("known code"), kind);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = VarKind::from_code('b').expect_err("unknown code");
        assert!(err.to_string().contains("unknown variable type code 'b'"));
    }

    #[test]
    fn test_spec_roundtrip_through_yaml() {
        let specs = vec![
            VariableSpec::Deterministic {
                name: "d".to_string(),
                value: 1.5,
            },
            VariableSpec::Interval {
                name: "i".to_string(),
                bounds: [2.0, 1.0],
            },
            VariableSpec::Cdf {
                name: "c".to_string(),
                dist: DistSpec::Normal {
                    mean: 1.0,
                    std_dev: 0.14,
                },
            },
            VariableSpec::Pbox {
                name: "p".to_string(),
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
            VariableSpec::Hist {
                name: "h".to_string(),
                observations: vec![1.0, 2.0, 4.0],
            },
        ];

        for spec in specs {
            let yaml = serde_yaml::to_string(&spec).expect("serialize");
            let parsed: VariableSpec = serde_yaml::from_str(&yaml).expect("parse");
            assert_eq!(parsed, spec);
            let variable = Variable::from_spec(&parsed).expect("build");
            assert_eq!(variable.name(), match &spec {
                VariableSpec::Deterministic { name, .. }
                | VariableSpec::Interval { name, .. }
                | VariableSpec::Cdf { name, .. }
                | VariableSpec::Pbox { name, .. }
                | VariableSpec::Hist { name, .. } => name,
            });
        }
    }

    #[test]
    fn test_from_spec_validates_structure() {
        let empty_pbox = VariableSpec::Pbox {
            name: "p".to_string(),
            dists: vec![],
        };
        assert!(Variable::from_spec(&empty_pbox).is_err());

        let short_hist = VariableSpec::Hist {
            name: "h".to_string(),
            observations: vec![3.0],
        };
        assert!(Variable::from_spec(&short_hist).is_err());
    }

    #[test]
    fn test_interval_spec_normalizes_on_build() {
        let spec = VariableSpec::Interval {
            name: "i".to_string(),
            bounds: [5.0, -1.0],
        };
        let v = Variable::from_spec(&spec).expect("build");
        assert_eq!(v.bounds(0.3).expect("in domain"), (-1.0, 5.0));
    }
}

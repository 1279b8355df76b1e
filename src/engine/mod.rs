//! Reliability analysis engine.
//!
//! Drives one analysis run end to end:
//! - Deterministic RNG (PCG with partitioned per-sample streams)
//! - Unit-hypercube sampling
//! - Per-sample worst-case evaluation (bounded optimization in imprecise
//!   mode, a single function evaluation in precise mode)
//! - Reduction into envelope reliability statistics
//!
//! The precise-vs-imprecise decision is made once per run from the static
//! capability flags of the variable set, never per sample.

pub mod optimizer;
pub mod rng;
pub mod sampler;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub use optimizer::{Optimum, OptimizerConfig};
pub use rng::RelRng;
pub use sampler::HypercubeSampler;

use crate::error::{RelError, RelResult};
use crate::reduce::{self, ReliabilitySummary};
use crate::variables::{Variable, VariableSpec};

/// Run-level analysis mode, decided once from the variable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Every variable resolves to a degenerate interval; one function
    /// evaluation per sample.
    Precise,
    /// At least one variable can produce a non-degenerate interval; two
    /// bounded optimizations per sample.
    Imprecise,
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Precise => write!(f, "precise"),
            Self::Imprecise => write!(f, "imprecise"),
        }
    }
}

/// One extremum of the performance function over a sample's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    /// Performance function value at the extremum.
    pub y: f64,
    /// Physical-space location of the extremum.
    pub x: Vec<f64>,
}

/// Worst-case evaluation result for one sample.
///
/// `max` is absent in precise mode: no upper search is performed because
/// the box is a single point and the minimum already tells the whole story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleOutcome {
    /// Minimum of the performance function over the sample's box.
    pub min: Extremum,
    /// Maximum over the box; `None` in precise mode.
    pub max: Option<Extremum>,
}

/// Engine settings for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Number of Monte Carlo samples (at least 1).
    pub n_samples: usize,
    /// Master RNG seed.
    pub seed: u64,
    /// Worker thread count for parallel runs; `None` uses the number of
    /// CPUs.
    pub workers: Option<usize>,
    /// Bounded-optimization settings for imprecise mode.
    pub optimizer: OptimizerConfig,
    /// Additional optimizer attempts per bound before a convergence
    /// failure aborts the run.
    pub max_restarts: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            n_samples: 10_000,
            seed: 42,
            workers: None,
            optimizer: OptimizerConfig::default(),
            max_restarts: 2,
        }
    }
}

/// Complete result of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// Mode the run executed in.
    pub mode: AnalysisMode,
    /// Per-sample extrema, ordered by sample index.
    pub outcomes: Vec<SampleOutcome>,
    /// Envelope reliability statistics.
    pub summary: ReliabilitySummary,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Total optimizer restarts consumed across all samples.
    pub restarts: usize,
}

/// Per-sample work unit for the parallel runner.
#[derive(Debug)]
struct SampleTask {
    index: usize,
    coords: Vec<f64>,
    rng: RelRng,
}

/// Uncertainty-propagation engine for one variable set and performance
/// function.
///
/// The performance function maps a physical-space point to a scalar;
/// negative output denotes failure. Sequential and parallel runs produce
/// bitwise-identical outcomes because every sample owns a partitioned RNG
/// stream keyed by its index.
#[derive(Debug)]
pub struct ReliabilityEngine<F> {
    variables: Vec<Variable>,
    limit_state: F,
    settings: EngineSettings,
    mode: AnalysisMode,
}

impl<F> ReliabilityEngine<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    /// Create an engine for the given variables and performance function.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty variable set or a zero
    /// sample count.
    pub fn new(variables: Vec<Variable>, limit_state: F, settings: EngineSettings) -> RelResult<Self> {
        if variables.is_empty() {
            return Err(RelError::config("analysis requires at least one variable"));
        }
        if settings.n_samples == 0 {
            return Err(RelError::config("sample count must be at least 1"));
        }

        let mode = if variables.iter().any(Variable::may_be_imprecise) {
            AnalysisMode::Imprecise
        } else {
            AnalysisMode::Precise
        };

        Ok(Self {
            variables,
            limit_state,
            settings,
            mode,
        })
    }

    /// The run-level analysis mode.
    #[must_use]
    pub const fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// The variable set, in construction order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Get the engine settings.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run the analysis sequentially.
    ///
    /// # Errors
    ///
    /// Propagates domain errors from bound resolution and convergence
    /// failures from the worst-case evaluator; any such error aborts the
    /// whole run.
    pub fn run(&self) -> RelResult<AnalysisOutput> {
        let started = Instant::now();
        let (samples, streams) = self.prepare();

        let mut outcomes = Vec::with_capacity(samples.len());
        let mut restarts = 0;
        for (index, (coords, mut rng)) in samples.into_iter().zip(streams).enumerate() {
            let (outcome, used) = self.evaluate_sample(index, &coords, &mut rng)?;
            outcomes.push(outcome);
            restarts += used;
        }

        self.finish(outcomes, restarts, started)
    }

    /// Run the analysis on a work-stealing thread pool.
    ///
    /// Outcomes are identical to [`ReliabilityEngine::run`] for the same
    /// seed: per-sample RNG streams make the evaluation independent of
    /// execution order, and the fan-in sorts by sample index.
    ///
    /// # Errors
    ///
    /// Same contract as [`ReliabilityEngine::run`]; when several samples
    /// fail, the error for the lowest sample index is reported.
    pub fn run_parallel(&self) -> RelResult<AnalysisOutput> {
        use crossbeam_deque::{Injector, Stealer, Worker};

        let started = Instant::now();
        let (samples, streams) = self.prepare();
        let n_samples = samples.len();

        let num_workers = self.settings.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZero::get)
                .unwrap_or(4)
        });

        // Global work queue, per-worker local queues, cross-worker stealers.
        let injector: Injector<SampleTask> = Injector::new();
        let workers: Vec<Worker<SampleTask>> =
            (0..num_workers).map(|_| Worker::new_fifo()).collect();
        let stealers: Vec<Stealer<SampleTask>> = workers.iter().map(Worker::stealer).collect();

        for (index, (coords, rng)) in samples.into_iter().zip(streams).enumerate() {
            injector.push(SampleTask { index, coords, rng });
        }

        type Indexed = (usize, RelResult<(SampleOutcome, usize)>);
        let results: std::sync::Mutex<Vec<Indexed>> =
            std::sync::Mutex::new(Vec::with_capacity(n_samples));

        std::thread::scope(|s| {
            for (worker_id, worker) in workers.into_iter().enumerate() {
                let injector = &injector;
                let stealers = &stealers;
                let results = &results;

                s.spawn(move || {
                    loop {
                        // Local queue first, then the global queue, then
                        // round-robin theft from the other workers.
                        let task = worker
                            .pop()
                            .or_else(|| {
                                loop {
                                    match injector.steal() {
                                        crossbeam_deque::Steal::Success(task) => {
                                            return Some(task)
                                        }
                                        crossbeam_deque::Steal::Empty => break,
                                        crossbeam_deque::Steal::Retry => {}
                                    }
                                }
                                None
                            })
                            .or_else(|| {
                                for i in 0..stealers.len() {
                                    let stealer_idx = (worker_id + i + 1) % stealers.len();
                                    loop {
                                        match stealers[stealer_idx].steal() {
                                            crossbeam_deque::Steal::Success(task) => {
                                                return Some(task)
                                            }
                                            crossbeam_deque::Steal::Empty => break,
                                            crossbeam_deque::Steal::Retry => {}
                                        }
                                    }
                                }
                                None
                            });

                        match task {
                            Some(mut task) => {
                                let outcome =
                                    self.evaluate_sample(task.index, &task.coords, &mut task.rng);
                                if let Ok(mut guard) = results.lock() {
                                    guard.push((task.index, outcome));
                                }
                            }
                            None => break, // No more work
                        }
                    }
                });
            }
        });

        let mut indexed = results.into_inner().unwrap_or_default();
        indexed.sort_by_key(|(index, _)| *index);

        let mut outcomes = Vec::with_capacity(n_samples);
        let mut restarts = 0;
        for (_, result) in indexed {
            let (outcome, used) = result?;
            outcomes.push(outcome);
            restarts += used;
        }

        self.finish(outcomes, restarts, started)
    }

    /// Draw the sample matrix and one partitioned RNG stream per sample.
    ///
    /// The master stream is consumed in a fixed order (matrix first,
    /// partitions second) so sequential and parallel runs see identical
    /// randomness.
    fn prepare(&self) -> (Vec<Vec<f64>>, Vec<RelRng>) {
        let mut master = RelRng::new(self.settings.seed);
        let sampler = HypercubeSampler::new(self.settings.n_samples, self.variables.len());
        let samples = sampler.draw(&mut master);
        let streams = master.partition(self.settings.n_samples);
        (samples, streams)
    }

    fn finish(
        &self,
        outcomes: Vec<SampleOutcome>,
        restarts: usize,
        started: Instant,
    ) -> RelResult<AnalysisOutput> {
        let summary = reduce::reduce(&outcomes)?;
        Ok(AnalysisOutput {
            mode: self.mode,
            outcomes,
            summary,
            elapsed: started.elapsed(),
            restarts,
        })
    }

    /// Evaluate the worst case for one sample.
    ///
    /// Returns the outcome and the number of optimizer restarts consumed.
    fn evaluate_sample(
        &self,
        index: usize,
        coords: &[f64],
        rng: &mut RelRng,
    ) -> RelResult<(SampleOutcome, usize)> {
        let mut bounds = Vec::with_capacity(self.variables.len());
        for (variable, &u) in self.variables.iter().zip(coords.iter()) {
            bounds.push(variable.bounds(u)?);
        }

        match self.mode {
            AnalysisMode::Precise => {
                // Every interval is degenerate: a single evaluation at the
                // lower corner is the whole story.
                let x: Vec<f64> = bounds.iter().map(|&(lo, _)| lo).collect();
                let y = (self.limit_state)(&x);
                if y.is_nan() {
                    return Err(RelError::non_finite(format!(
                        "performance function at sample {index}"
                    )));
                }
                Ok((
                    SampleOutcome {
                        min: Extremum { y, x },
                        max: None,
                    },
                    0,
                ))
            }
            AnalysisMode::Imprecise => {
                let mut restarts = 0;

                let min = self.search_bound(index, "lower", &bounds, rng, &mut restarts, false)?;
                let max = self.search_bound(index, "upper", &bounds, rng, &mut restarts, true)?;

                Ok((
                    SampleOutcome {
                        min,
                        max: Some(max),
                    },
                    restarts,
                ))
            }
        }
    }

    /// One envelope search: bounded minimization of `f` (or `-f`) from
    /// independent uniform random starts inside the box.
    ///
    /// Each failed attempt consumes one counted restart; exhausting the
    /// restart budget escalates to a fatal convergence error.
    fn search_bound(
        &self,
        index: usize,
        bound: &'static str,
        bounds: &[(f64, f64)],
        rng: &mut RelRng,
        restarts: &mut usize,
        negate: bool,
    ) -> RelResult<Extremum> {
        let objective = |x: &[f64]| {
            let y = (self.limit_state)(x);
            if negate {
                -y
            } else {
                y
            }
        };

        let mut last_message = String::new();
        for attempt in 0..=self.settings.max_restarts {
            let start: Vec<f64> = bounds
                .iter()
                .map(|&(lo, hi)| rng.gen_range_f64(lo, hi))
                .collect();

            match optimizer::minimize(&objective, bounds, &start, &self.settings.optimizer) {
                Ok(opt) => {
                    if attempt > 0 {
                        *restarts += attempt;
                    }
                    let y = if negate { -opt.y } else { opt.y };
                    return Ok(Extremum { y, x: opt.x });
                }
                Err(err) => last_message = err.to_string(),
            }
        }

        *restarts += self.settings.max_restarts;
        Err(RelError::Convergence {
            bound,
            sample: index,
            message: last_message,
        })
    }
}

/// Durable record of one analysis run, for persistence collaborators.
///
/// Carries the variable definitions (name and parameters, not the
/// performance function itself) alongside the summary so a record is
/// self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Human-readable analysis name.
    pub name: String,
    /// Sample count.
    pub samples: usize,
    /// Master RNG seed.
    pub seed: u64,
    /// Mode the run executed in.
    pub mode: AnalysisMode,
    /// Wall-clock duration in seconds.
    pub elapsed_secs: f64,
    /// Optimizer restarts consumed across all samples.
    pub restarts: usize,
    /// Variable definitions, in engine order.
    pub variables: Vec<VariableSpec>,
    /// Envelope reliability statistics.
    pub summary: ReliabilitySummary,
}

impl AnalysisRecord {
    /// Assemble a record from an engine's inputs and its run output.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, engine: &ReliabilityEngine<F>, output: &AnalysisOutput) -> Self
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        Self {
            name: name.into(),
            samples: engine.settings().n_samples,
            seed: engine.settings().seed,
            mode: output.mode,
            elapsed_secs: output.elapsed.as_secs_f64(),
            restarts: output.restarts,
            variables: engine.variables().iter().map(Variable::spec).collect(),
            summary: output.summary,
        }
    }
}

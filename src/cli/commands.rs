//! CLI command handlers.
//!
//! This module contains the execution logic for each CLI command.
//! Extracted to enable comprehensive testing of command behavior.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::AnalysisConfig;
use crate::engine::{AnalysisRecord, EngineSettings, ReliabilityEngine};
use crate::error::RelResult;
use crate::scenarios::{self, LimitState};
use crate::variables::Variable;

use super::output::{print_analysis_result, print_help, print_scenario_list, print_version};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run {
            target,
            samples_override,
            seed_override,
            workers_override,
            parallel,
            record_path,
            verbose,
        } => run_analysis(&RunRequest {
            target,
            samples_override,
            seed_override,
            workers_override,
            parallel,
            record_path,
            verbose,
        }),
        Command::List => list_scenarios(),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Everything needed to execute one `run` invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Scenario name or config file path.
    pub target: String,
    /// Optional sample count override.
    pub samples_override: Option<usize>,
    /// Optional seed override.
    pub seed_override: Option<u64>,
    /// Optional worker count override.
    pub workers_override: Option<usize>,
    /// Run on the work-stealing pool.
    pub parallel: bool,
    /// Write the analysis record here.
    pub record_path: Option<PathBuf>,
    /// Enable verbose output.
    pub verbose: bool,
}

/// Resolved analysis inputs, from either a scenario or a config file.
struct ResolvedAnalysis {
    name: String,
    variables: Vec<Variable>,
    limit_state: LimitState,
    settings: EngineSettings,
    parallel: bool,
}

/// Run an analysis from a scenario name or a YAML config file.
#[must_use]
pub fn run_analysis(request: &RunRequest) -> ExitCode {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║           imprel - Reliability Analysis Runner                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let resolved = match resolve(request) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if request.verbose {
        println!(
            "Resolved {} variable(s), {} samples, seed {}",
            resolved.variables.len(),
            resolved.settings.n_samples,
            resolved.settings.seed
        );
    }
    println!("Running analysis: {}\n", resolved.name);

    let engine = match ReliabilityEngine::new(
        resolved.variables,
        resolved.limit_state,
        resolved.settings,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let output = if resolved.parallel {
        engine.run_parallel()
    } else {
        engine.run()
    };

    match output {
        Ok(output) => {
            print_analysis_result(&resolved.name, &output, request.verbose);

            if let Some(ref path) = request.record_path {
                let record = AnalysisRecord::new(&resolved.name, &engine, &output);
                if let Err(e) = write_record(path, &record) {
                    eprintln!("Error writing record: {e}");
                    return ExitCode::from(1);
                }
                println!("Record written to {}", path.display());
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Resolve a run request into concrete analysis inputs.
///
/// Targets naming an existing file or carrying a YAML extension are
/// loaded as configurations; anything else is looked up as a built-in
/// scenario.
fn resolve(request: &RunRequest) -> RelResult<ResolvedAnalysis> {
    let path = Path::new(&request.target);
    let looks_like_file = path.exists()
        || matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );

    let (name, variables, limit_state, mut settings, parallel) = if looks_like_file {
        let config = AnalysisConfig::load(path)?;
        let name = if config.analysis.name.is_empty() {
            request.target.clone()
        } else {
            config.analysis.name.clone()
        };
        let variables = config.build_variables()?;
        let limit_state = scenarios::limit_state_by_name(&config.limit_state)?;
        let settings = config.engine_settings();
        (
            name,
            variables,
            limit_state,
            settings,
            config.execution.parallel,
        )
    } else {
        let scenario = scenarios::by_name(&request.target)?;
        let variables = scenario.build_variables()?;
        let limit_state = scenario.build_limit_state()?;
        let settings = scenario.engine_settings();
        (scenario.name.to_string(), variables, limit_state, settings, false)
    };

    if let Some(samples) = request.samples_override {
        settings.n_samples = samples;
    }
    if let Some(seed) = request.seed_override {
        settings.seed = seed;
    }
    if let Some(workers) = request.workers_override {
        settings.workers = Some(workers);
    }

    Ok(ResolvedAnalysis {
        name,
        variables,
        limit_state,
        settings,
        parallel: parallel || request.parallel,
    })
}

fn write_record(path: &Path, record: &AnalysisRecord) -> RelResult<()> {
    let yaml = serde_yaml::to_string(record)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// List all built-in scenarios.
#[must_use]
pub fn list_scenarios() -> ExitCode {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║             imprel - Scenario Library                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    print_scenario_list(&scenarios::builtin());
    ExitCode::SUCCESS
}

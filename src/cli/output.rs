//! CLI output formatting.
//!
//! This module contains all output formatting functions for the CLI.
//! Extracted to enable testing of output generation.

use crate::engine::{AnalysisMode, AnalysisOutput};
use crate::scenarios::Scenario;

/// Print version information.
pub fn print_version() {
    println!("imprel {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"imprel - Imprecise Structural Reliability Analysis

USAGE:
    imprel <COMMAND> [OPTIONS]

COMMANDS:
    run <scenario|config.yaml>  Run a reliability analysis
        --samples <N>           Override the sample count
        --seed <N>              Override the RNG seed
        --workers <N>           Worker threads for --parallel (default: CPUs)
        --parallel              Run samples on the work-stealing pool
        --out <file.yaml>       Write the analysis record to a YAML file
        -v, --verbose           Enable verbose output

    list                        List built-in scenarios

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    imprel run r-minus-s
    imprel run r-minus-s-pbox --samples 50000 --seed 7
    imprel run analyses/bracket.yaml --parallel --out record.yaml

Negative performance-function output denotes failure; the report shows
the probability of failure and reliability index for both envelopes.
"
    );
}

/// Render a reliability value, folding the infinities into readable text.
fn fmt_beta(beta: f64) -> String {
    if beta == f64::INFINITY {
        "+inf".to_string()
    } else if beta == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{beta:.4}")
    }
}

/// Print an analysis result.
///
/// # Arguments
///
/// * `name` - Analysis name
/// * `output` - The completed run
/// * `verbose` - Whether to show verbose output
pub fn print_analysis_result(name: &str, output: &AnalysisOutput, verbose: bool) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Analysis: {name}");
    println!("Mode: {}", output.mode);
    println!("Samples: {}", output.outcomes.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let summary = &output.summary;
    println!("Lower envelope:");
    println!("  pf:   {:.6}", summary.pf_lower);
    println!("  beta: {}", fmt_beta(summary.beta_lower));

    println!("\nUpper envelope:");
    if output.mode == AnalysisMode::Precise {
        println!("  (no upper search performed in precise mode)");
    }
    println!("  pf:   {:.6}", summary.pf_upper);
    println!("  beta: {}", fmt_beta(summary.beta_upper));

    println!("\nExecution:");
    println!("  Duration: {} ms", output.elapsed.as_millis());
    println!("  Restarts: {}", output.restarts);

    if verbose {
        let lower_failures = output.outcomes.iter().filter(|o| o.min.y < 0.0).count();
        println!("\nOutcomes:");
        println!("  Lower-envelope failures: {lower_failures}");
        if output.mode == AnalysisMode::Imprecise {
            let upper_failures = output
                .outcomes
                .iter()
                .filter(|o| o.max.as_ref().is_some_and(|m| m.y < 0.0))
                .count();
            println!("  Upper-envelope failures: {upper_failures}");
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

/// Print the built-in scenario listing.
pub fn print_scenario_list(scenarios: &[Scenario]) {
    println!("Built-in scenarios:\n");
    for scenario in scenarios {
        println!("  {}", scenario.name);
        println!("      {}", scenario.description);
        println!(
            "      variables: {}, default samples: {}",
            scenario.variables.len(),
            scenario.samples
        );
    }
    println!("\nUsage: imprel run <scenario>");
}

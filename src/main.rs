//! imprel CLI - Imprecise Structural Reliability Analysis
//!
//! Command-line interface for running reliability analyses.

use std::process::ExitCode;

use imprel::cli::{run_cli, Args};

fn main() -> ExitCode {
    run_cli(Args::parse())
}

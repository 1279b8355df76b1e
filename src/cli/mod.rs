//! CLI module for imprel.
//!
//! This module contains all CLI logic extracted from main.rs to enable
//! full test coverage. The entry point `run_cli` can be called from main.rs
//! with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command};
pub use commands::{list_scenarios, run_analysis, run_cli, RunRequest};
pub use output::{print_analysis_result, print_help, print_scenario_list, print_version};

//! CLI argument parsing.
//!
//! This module provides the argument parser for the imprel CLI.
//! Extracted to enable comprehensive testing of argument parsing logic.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run an analysis
    Run {
        /// Built-in scenario name or path to an analysis YAML file.
        target: String,
        /// Optional sample count override.
        samples_override: Option<usize>,
        /// Optional seed override.
        seed_override: Option<u64>,
        /// Optional worker count override.
        workers_override: Option<usize>,
        /// Run on the work-stealing pool.
        parallel: bool,
        /// Write the analysis record to this YAML file.
        record_path: Option<PathBuf>,
        /// Enable verbose output.
        verbose: bool,
    },
    /// List built-in scenarios
    List,
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Internal parsing from a vector of strings.
    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "list" => Command::List,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'run' command arguments.
    fn parse_run_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'run' command requires a scenario name or config path");
            return Command::Help;
        }

        let mut samples_override = None;
        let mut seed_override = None;
        let mut workers_override = None;
        let mut parallel = false;
        let mut record_path = None;
        let mut verbose = false;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--samples" => {
                    if i + 1 < args.len() {
                        if let Ok(n) = args[i + 1].parse() {
                            samples_override = Some(n);
                        }
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--seed" => {
                    if i + 1 < args.len() {
                        if let Ok(seed) = args[i + 1].parse() {
                            seed_override = Some(seed);
                        }
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--workers" => {
                    if i + 1 < args.len() {
                        if let Ok(n) = args[i + 1].parse() {
                            workers_override = Some(n);
                        }
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--parallel" => {
                    parallel = true;
                    i += 1;
                }
                "--out" => {
                    if i + 1 < args.len() {
                        record_path = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "-v" | "--verbose" => {
                    verbose = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Run {
            target: args[2].clone(),
            samples_override,
            seed_override,
            workers_override,
            parallel,
            record_path,
            verbose,
        }
    }
}

//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{EvalArgs, InteractiveArgs, SolveArgs};

/// nrsolve - Newton-Raphson root finding for built-in and user-entered functions
#[derive(Parser)]
#[command(name = "nrsolve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (TOML). Defaults to ./nrsolve.toml, then the user config directory.
    #[arg(long, env = "NRSOLVE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Find a root with Newton-Raphson
    Solve(SolveArgs),

    /// Evaluate an expression at a point
    Eval(EvalArgs),

    /// List the built-in functions
    List,

    /// Menu-driven session on stdin
    Interactive(InteractiveArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}

//! nrsolve - Newton-Raphson root finding from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Solve a built-in function
//! nrsolve solve --builtin cubic --x0 2
//!
//! # Solve a typed-in function with its derivative
//! nrsolve solve --function "x^2 - 4" --derivative "2x" --x0 3 --epsilon 1e-10
//!
//! # Let the derivative be estimated and log the iterations to CSV
//! nrsolve solve --function "cos(x) - x" --output iterations.csv
//!
//! # Evaluate an expression
//! nrsolve eval "3sin(x) + 1" --x 0.5
//!
//! # Menu-driven session
//! nrsolve interactive
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod sink;

use cli::{Cli, Commands};
use config::Settings;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let settings = Settings::load(cli.config.as_deref())?;
    let format = cli.format;

    // Execute command
    let code = match cli.command {
        Commands::Solve(args) => commands::solve::execute(args, format, &settings)?,
        Commands::Eval(args) => {
            commands::eval::execute(args, format, &settings)?;
            ExitCode::SUCCESS
        }
        Commands::List => {
            commands::list::execute(format)?;
            ExitCode::SUCCESS
        }
        Commands::Interactive(args) => commands::interactive::execute(args, format, &settings)?,
    };

    Ok(code)
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

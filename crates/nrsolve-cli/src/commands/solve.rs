//! Solve command implementation.
//!
//! Runs Newton-Raphson on a built-in function or a user expression.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, Args};

use nrsolve_math::prelude::{BuiltinFunction, FunctionSource, RootFindOutcome};

use crate::cli::OutputFormat;
use crate::commands::{run_newton, user_function, RunParameters};
use crate::config::Settings;
use crate::output::{print_info, print_success, print_warning, write_run};

/// Arguments for the solve command.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["builtin", "function"])))]
pub struct SolveArgs {
    /// Built-in function: cubic, cosine, exponential, depressed-cubic (or 1-4)
    #[arg(short, long)]
    pub builtin: Option<BuiltinFunction>,

    /// Function of x, e.g. "x^2 - 4" or "3sin(x) - x"
    #[arg(long)]
    pub function: Option<String>,

    /// Derivative of the function. Estimated numerically when omitted.
    #[arg(short, long, requires = "function", conflicts_with = "builtin")]
    pub derivative: Option<String>,

    /// Initial guess
    #[arg(long, allow_negative_numbers = true)]
    pub x0: Option<f64>,

    /// Convergence tolerance on successive iterates
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Maximum number of iterations
    #[arg(short = 'n', long)]
    pub max_iterations: Option<u32>,

    /// Digits after the decimal point
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Write the iterations to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SolveArgs {
    fn source(&self, settings: &Settings) -> Result<FunctionSource> {
        match (self.builtin, &self.function) {
            (Some(_), _) if self.derivative.is_some() => Err(anyhow::anyhow!(
                "--derivative applies to --function only; built-in functions carry their own"
            )),
            (Some(builtin), _) => Ok(builtin.into()),
            (None, Some(function)) => {
                Ok(user_function(function, self.derivative.as_deref(), settings).into())
            }
            (None, None) => Err(anyhow::anyhow!("either --builtin or --function is required")),
        }
    }
}

/// Execute the solve command.
pub fn execute(args: SolveArgs, format: OutputFormat, settings: &Settings) -> Result<ExitCode> {
    let params = RunParameters::resolve(
        settings,
        args.x0,
        args.epsilon,
        args.max_iterations,
        args.precision,
    )?;
    let source = args.source(settings)?;

    let run = run_newton(source, &params, args.output.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_run(&mut out, &run, format)?;
    out.flush()?;
    drop(out);

    if format == OutputFormat::Table {
        if let Some(path) = &args.output {
            print_info(&format!("Iterations written to {}", path.display()));
        }
        match &run.report.outcome {
            RootFindOutcome::Converged { .. } => print_success("Converged"),
            outcome => print_warning(&outcome.to_string()),
        }
    }

    Ok(exit_code(&run.report.outcome))
}

/// Zero for a converged run, one otherwise.
pub fn exit_code(outcome: &RootFindOutcome) -> ExitCode {
    if outcome.is_converged() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

//! CLI command implementations.

pub mod eval;
pub mod interactive;
pub mod list;
pub mod solve;

// Re-export submodules for convenience
pub use eval::EvalArgs;
pub use interactive::InteractiveArgs;
pub use solve::SolveArgs;

use std::path::Path;

use nrsolve_math::prelude::{
    DifferentiationStrategy, ExpressionEvaluator, FunctionSource, NewtonReport, NewtonSolver,
    SolverConfig, UserFunction,
};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::sink::CsvLogSink;

/// Largest number of digits printed after the decimal point.
pub const MAX_PRECISION: usize = 17;

/// Validates an initial guess.
pub fn validate_initial_guess(x0: f64) -> CliResult<f64> {
    if !x0.is_finite() {
        return Err(CliError::InvalidInitialGuess(x0));
    }
    Ok(x0)
}

/// Validates an output precision.
pub fn validate_precision(precision: usize) -> CliResult<usize> {
    if precision > MAX_PRECISION {
        return Err(CliError::InvalidPrecision(precision));
    }
    Ok(precision)
}

/// Validated inputs of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunParameters {
    pub x0: f64,
    pub config: SolverConfig,
    pub precision: usize,
}

impl RunParameters {
    /// Merges command-line overrides over the loaded settings and validates.
    pub fn resolve(
        settings: &Settings,
        x0: Option<f64>,
        epsilon: Option<f64>,
        max_iterations: Option<u32>,
        precision: Option<usize>,
    ) -> CliResult<Self> {
        let x0 = validate_initial_guess(x0.unwrap_or(settings.x0))?;
        let epsilon = epsilon.unwrap_or(settings.epsilon);
        let config = SolverConfig::new(epsilon, max_iterations.unwrap_or(settings.max_iterations));
        config
            .validate()
            .map_err(|_| CliError::InvalidEpsilon(epsilon))?;
        let precision = validate_precision(precision.unwrap_or(settings.precision))?;

        Ok(Self {
            x0,
            config,
            precision,
        })
    }
}

/// A finished run and how to display it.
#[derive(Debug, Clone)]
pub struct Run {
    pub source: FunctionSource,
    pub report: NewtonReport,
    pub precision: usize,
}

/// Builds a user function with the configured division threshold.
///
/// A missing or blank derivative selects the central-difference estimate.
pub fn user_function(function: &str, derivative: Option<&str>, settings: &Settings) -> UserFunction {
    let evaluator = ExpressionEvaluator::new().with_division_threshold(settings.division_threshold);
    UserFunction::new(function)
        .with_strategy(DifferentiationStrategy::from_optional(derivative))
        .with_evaluator(evaluator)
}

/// Runs Newton-Raphson, optionally streaming records to a CSV log.
pub fn run_newton(
    source: FunctionSource,
    params: &RunParameters,
    log_path: Option<&Path>,
) -> CliResult<Run> {
    let solver = NewtonSolver::new(params.config);
    info!(
        "Solving {} from x0 = {} (epsilon = {}, max iterations = {})",
        source.describe(),
        params.x0,
        solver.config().tolerance,
        solver.config().max_iterations
    );

    let mut log = log_path
        .map(|path| CsvLogSink::create(path, params.precision))
        .transpose()?;
    let mut records = Vec::new();

    let outcome = solver.solve(&source, params.x0, &mut (&mut records, &mut log));
    debug!("Run finished: {}", outcome);

    if let Some(log) = log {
        log.finish(&outcome)?;
    }

    Ok(Run {
        source,
        report: NewtonReport { records, outcome },
        precision: params.precision,
    })
}

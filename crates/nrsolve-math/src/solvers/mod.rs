//! Newton-Raphson root finding.
//!
//! The engine, [`newton_raphson`], is generic over any pair of fallible
//! real-valued callables. It knows nothing about where `f` and `f'` come
//! from; [`NewtonSolver`] adapts anything implementing
//! [`RealFunction`] to it.
//!
//! Every completed iteration produces an [`IterationRecord`] that is handed
//! to an [`IterationSink`] as soon as it exists. Every run ends in exactly
//! one [`RootFindOutcome`]:
//!
//! | Outcome | When |
//! |---------|------|
//! | `Converged` | `\|x_{n+1} - x_n\| < epsilon` |
//! | `ExhaustedIterations` | `max_iterations` passes without converging |
//! | `DerivativeVanished` | `\|f'(x)\| < 1e-18` at the current iterate |
//! | `EvaluationFailed` | `f` or `f'` returned an error |
//!
//! # Example
//!
//! ```rust
//! use nrsolve_math::catalog::BuiltinFunction;
//! use nrsolve_math::solvers::{NewtonSolver, RootFindOutcome, SolverConfig};
//!
//! let solver = NewtonSolver::new(SolverConfig::new(1e-7, 50));
//! let mut records = Vec::new();
//!
//! let outcome = solver.solve(&BuiltinFunction::Cubic, 2.0, &mut records);
//!
//! match outcome {
//!     RootFindOutcome::Converged { root, iterations } => {
//!         assert!((root - 2.0945515).abs() < 1e-7);
//!         assert_eq!(iterations as usize, records.len());
//!     }
//!     other => panic!("unexpected outcome: {other}"),
//! }
//! ```

mod newton;

pub use newton::newton_raphson;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::function::RealFunction;

/// Default convergence tolerance on successive iterates.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default maximum number of Newton iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// Derivative magnitude below which the Newton step is undefined.
pub const DERIVATIVE_EPSILON: f64 = 1e-18;

/// Configuration for the Newton-Raphson iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Convergence tolerance (epsilon) on `|x_{n+1} - x_n|`.
    pub tolerance: f64,
    /// Maximum number of iterations. Zero runs no iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the tolerance is a positive finite number.
    ///
    /// The solver itself does not call this; it is for callers that take
    /// the tolerance from user input.
    pub fn validate(&self) -> MathResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// State after one completed Newton iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// One-based iteration number.
    #[serde(rename = "k")]
    pub index: u32,
    /// Iterate the step was taken from.
    pub x_n: f64,
    /// `f(x_n)`.
    pub fx_n: f64,
    /// `|x_{n+1} - x_n|`.
    pub estimated_error: f64,
}

/// Terminal state of a Newton-Raphson run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RootFindOutcome {
    /// Successive iterates closer than the tolerance.
    Converged {
        /// The last iterate.
        root: f64,
        /// Number of iterations performed.
        iterations: u32,
    },
    /// Iteration limit reached without converging.
    ExhaustedIterations {
        /// The last iterate.
        last_approximation: f64,
    },
    /// The derivative was (numerically) zero at an iterate.
    DerivativeVanished {
        /// The iterate where `f'` vanished.
        at_x: f64,
    },
    /// `f` or `f'` could not be evaluated.
    EvaluationFailed {
        /// The evaluation error message.
        message: String,
    },
}

impl RootFindOutcome {
    /// Returns true for [`Converged`](Self::Converged).
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// The root, if the run converged.
    pub fn root(&self) -> Option<f64> {
        match self {
            Self::Converged { root, .. } => Some(*root),
            _ => None,
        }
    }

    /// The last iterate reached, for outcomes that have one.
    pub fn approximation(&self) -> Option<f64> {
        match self {
            Self::Converged { root, .. } => Some(*root),
            Self::ExhaustedIterations { last_approximation } => Some(*last_approximation),
            Self::DerivativeVanished { at_x } => Some(*at_x),
            Self::EvaluationFailed { .. } => None,
        }
    }

    /// Short status label.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Converged { .. } => "converged",
            Self::ExhaustedIterations { .. } => "iteration limit reached",
            Self::DerivativeVanished { .. } => "derivative vanished",
            Self::EvaluationFailed { .. } => "evaluation failed",
        }
    }
}

impl fmt::Display for RootFindOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged { root, iterations } => {
                write!(f, "converged to {} after {} iterations", root, iterations)
            }
            Self::ExhaustedIterations { last_approximation } => write!(
                f,
                "did not converge (iteration limit), last approximation {}",
                last_approximation
            ),
            Self::DerivativeVanished { at_x } => {
                write!(f, "derivative vanished at x = {}", at_x)
            }
            Self::EvaluationFailed { message } => write!(f, "evaluation failed: {}", message),
        }
    }
}

/// Receives iteration records in the order they are produced.
pub trait IterationSink {
    /// Called once per completed iteration.
    fn record(&mut self, record: &IterationRecord);
}

impl IterationSink for Vec<IterationRecord> {
    fn record(&mut self, record: &IterationRecord) {
        self.push(*record);
    }
}

impl<S: IterationSink + ?Sized> IterationSink for &mut S {
    fn record(&mut self, record: &IterationRecord) {
        (**self).record(record);
    }
}

impl<S: IterationSink> IterationSink for Option<S> {
    fn record(&mut self, record: &IterationRecord) {
        if let Some(sink) = self {
            sink.record(record);
        }
    }
}

/// Forwards every record to both sinks, first `A` then `B`.
impl<A: IterationSink, B: IterationSink> IterationSink for (A, B) {
    fn record(&mut self, record: &IterationRecord) {
        self.0.record(record);
        self.1.record(record);
    }
}

/// A sink that discards records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl IterationSink for NullSink {
    fn record(&mut self, _record: &IterationRecord) {}
}

/// Records and outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewtonReport {
    /// Every completed iteration, in order.
    pub records: Vec<IterationRecord>,
    /// The terminal outcome.
    pub outcome: RootFindOutcome,
}

/// Newton-Raphson solver bound to a configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver {
    config: SolverConfig,
}

impl NewtonSolver {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs Newton-Raphson on `function` from `initial_guess`.
    pub fn solve<F, S>(&self, function: &F, initial_guess: f64, sink: &mut S) -> RootFindOutcome
    where
        F: RealFunction + ?Sized,
        S: IterationSink + ?Sized,
    {
        newton_raphson(
            |x| function.value(x),
            |x| function.derivative(x),
            initial_guess,
            &self.config,
            sink,
        )
    }

    /// Runs Newton-Raphson and collects the records.
    pub fn solve_collect<F>(&self, function: &F, initial_guess: f64) -> NewtonReport
    where
        F: RealFunction + ?Sized,
    {
        let mut records = Vec::new();
        let outcome = self.solve(function, initial_guess, &mut records);
        NewtonReport { records, outcome }
    }
}

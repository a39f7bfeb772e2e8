//! Newton-Raphson iteration engine.

use std::fmt;

use log::{debug, warn};

use crate::solvers::{
    IterationRecord, IterationSink, RootFindOutcome, SolverConfig, DERIVATIVE_EPSILON,
};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// Each pass evaluates `f` and `f'` at the current iterate, takes the step,
/// and hands an [`IterationRecord`] to `sink`. The run stops with:
///
/// - `EvaluationFailed` as soon as `f` or `f'` errors (no record for that pass)
/// - `DerivativeVanished` when `|f'(x)| < 1e-18` (no record for that pass)
/// - `Converged` when the step `|x_{n+1} - x_n|` is below the tolerance
/// - `ExhaustedIterations` after `max_iterations` passes
///
/// Convergence is judged on the step size only, never on `|f(x)|`.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
/// * `sink` - Receives each completed iteration
///
/// # Example
///
/// ```rust
/// use nrsolve_math::solvers::{newton_raphson, RootFindOutcome, SolverConfig};
/// use std::convert::Infallible;
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| Ok::<f64, Infallible>(x * x - 2.0);
/// let df = |x: f64| Ok::<f64, Infallible>(2.0 * x);
///
/// let mut records = Vec::new();
/// let outcome = newton_raphson(f, df, 1.5, &SolverConfig::new(1e-12, 50), &mut records);
///
/// assert!((outcome.root().unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
/// assert!(records.len() < 10);
/// ```
pub fn newton_raphson<F, DF, E, S>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
    sink: &mut S,
) -> RootFindOutcome
where
    F: Fn(f64) -> Result<f64, E>,
    DF: Fn(f64) -> Result<f64, E>,
    E: fmt::Display,
    S: IterationSink + ?Sized,
{
    let mut x = initial_guess;
    let mut iteration = 0;

    while iteration < config.max_iterations {
        let (fx, dfx) = match f(x).and_then(|fx| Ok((fx, df(x)?))) {
            Ok(values) => values,
            Err(e) => {
                warn!("evaluation failed at x = {}: {}", x, e);
                return RootFindOutcome::EvaluationFailed {
                    message: e.to_string(),
                };
            }
        };

        // Check for zero derivative
        if dfx.abs() < DERIVATIVE_EPSILON {
            warn!("derivative vanished at x = {} (f'(x) = {:e})", x, dfx);
            return RootFindOutcome::DerivativeVanished { at_x: x };
        }

        // Newton step
        let next = x - fx / dfx;
        let error = (next - x).abs();
        iteration += 1;

        let record = IterationRecord {
            index: iteration,
            x_n: x,
            fx_n: fx,
            estimated_error: error,
        };
        debug!(
            "iteration {}: x = {}, f(x) = {:e}, error = {:e}",
            record.index, record.x_n, record.fx_n, record.estimated_error
        );
        sink.record(&record);

        x = next;

        // Check for step convergence
        if error < config.tolerance {
            debug!("converged to {} after {} iterations", x, iteration);
            return RootFindOutcome::Converged {
                root: x,
                iterations: iteration,
            };
        }
    }

    debug!(
        "iteration limit {} reached, last approximation {}",
        config.max_iterations, x
    );
    RootFindOutcome::ExhaustedIterations {
        last_approximation: x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::convert::Infallible;

    fn exact(g: impl Fn(f64) -> f64) -> impl Fn(f64) -> Result<f64, Infallible> {
        move |x| Ok(g(x))
    }

    #[test]
    fn test_classic_cubic() {
        let f = exact(|x| x.powi(3) - 2.0 * x - 5.0);
        let df = exact(|x| 3.0 * x * x - 2.0);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 2.0, &SolverConfig::new(1e-7, 50), &mut records);

        match outcome {
            RootFindOutcome::Converged { root, iterations } => {
                assert_relative_eq!(root, 2.0945515, epsilon = 1e-7);
                assert!(iterations <= 6);
                assert_eq!(iterations as usize, records.len());
            }
            other => panic!("expected convergence, got {other:?}"),
        }
    }

    #[test]
    fn test_first_record_holds_initial_state() {
        let f = exact(|x| x * x - 2.0);
        let df = exact(|x| 2.0 * x);
        let mut records = Vec::new();

        newton_raphson(f, df, 1.0, &SolverConfig::default(), &mut records);

        let first = records[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.x_n, 1.0);
        assert_eq!(first.fx_n, -1.0);
        // x1 = 1 - (-1)/2 = 1.5
        assert_eq!(first.estimated_error, 0.5);
        assert_eq!(records[1].x_n, 1.5);
    }

    #[test]
    fn test_zero_derivative_at_start() {
        let f = exact(|x| x * x);
        let df = exact(|x| 2.0 * x);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 0.0, &SolverConfig::default(), &mut records);

        assert_eq!(outcome, RootFindOutcome::DerivativeVanished { at_x: 0.0 });
        assert!(records.is_empty());
    }

    #[test]
    fn test_zero_derivative_mid_run() {
        // The first step lands exactly on x = 1, where f' is zero.
        let f = exact(|x| x - 1.0);
        let df = exact(|x| if x == 1.0 { 0.0 } else { 1.0 });
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 3.0, &SolverConfig::new(1e-12, 50), &mut records);

        assert_eq!(outcome, RootFindOutcome::DerivativeVanished { at_x: 1.0 });
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_zero_iterations() {
        let f = exact(|x| x * x - 2.0);
        let df = exact(|x| 2.0 * x);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 1.25, &SolverConfig::new(1e-7, 0), &mut records);

        assert_eq!(
            outcome,
            RootFindOutcome::ExhaustedIterations {
                last_approximation: 1.25
            }
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_iteration_limit() {
        let f = exact(|x| x * x - 2.0);
        let df = exact(|x| 2.0 * x);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 100.0, &SolverConfig::new(1e-15, 3), &mut records);

        assert_eq!(records.len(), 3);
        match outcome {
            RootFindOutcome::ExhaustedIterations { last_approximation } => {
                let last = records[2];
                let expected = last.x_n - last.fx_n / (2.0 * last.x_n);
                assert_eq!(last_approximation, expected);
            }
            other => panic!("expected exhausted iterations, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluation_failure_stops_run() {
        let calls = Cell::new(0);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            if calls.get() == 3 {
                Err(ParseError::DivisionByZero { divisor: 0.0 })
            } else {
                Ok(x * x - 2.0)
            }
        };
        let df = |x: f64| Ok(2.0 * x);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 1.0, &SolverConfig::new(1e-15, 50), &mut records);

        assert_eq!(
            outcome,
            RootFindOutcome::EvaluationFailed {
                message: "division by zero".to_string()
            }
        );
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_derivative_failure_stops_run() {
        let f = |x: f64| Ok::<f64, ParseError>(x);
        let df = |_x: f64| {
            Err(ParseError::UnknownFunction {
                name: "y".to_string(),
            })
        };
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 1.0, &SolverConfig::default(), &mut records);

        assert_eq!(
            outcome,
            RootFindOutcome::EvaluationFailed {
                message: "unknown function y".to_string()
            }
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_convergence_is_step_based() {
        // |f(x0)| = 0.009 is already below the tolerance, but the first step
        // is 9, so a second iteration is still required.
        let f = exact(|x| 1e-3 * (x - 1.0));
        let df = exact(|_| 1e-3);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 10.0, &SolverConfig::new(1e-2, 50), &mut records);

        assert_eq!(records.len(), 2);
        assert!(records[0].fx_n.abs() < 1e-2);
        assert!(records[0].estimated_error > 1e-2);
        assert_relative_eq!(outcome.root().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_oscillation_exhausts() {
        // x^3 - 2x + 2 from 0 cycles between 0 and 1.
        let f = exact(|x| x.powi(3) - 2.0 * x + 2.0);
        let df = exact(|x| 3.0 * x * x - 2.0);
        let mut records = Vec::new();

        let outcome = newton_raphson(f, df, 0.0, &SolverConfig::new(1e-8, 10), &mut records);

        assert_eq!(records.len(), 10);
        assert!(matches!(
            outcome,
            RootFindOutcome::ExhaustedIterations { .. }
        ));
    }
}

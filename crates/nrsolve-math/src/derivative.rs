//! Derivative strategies for user-entered functions.
//!
//! A user function either comes with a second expression for its derivative
//! ([`DifferentiationStrategy::Analytic`]) or has its derivative estimated by
//! a fixed-step central difference ([`DifferentiationStrategy::Numeric`]).

use serde::{Deserialize, Serialize};

/// Step size for central-difference differentiation.
pub const CENTRAL_DIFFERENCE_STEP: f64 = 1e-8;

/// How the derivative of a user function is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expression", rename_all = "snake_case")]
pub enum DifferentiationStrategy {
    /// Evaluate a second expression at the same `x`.
    Analytic(String),
    /// Central difference `(f(x + h) - f(x - h)) / 2h` with `h = 1e-8`.
    Numeric,
}

impl DifferentiationStrategy {
    /// Picks [`Analytic`](Self::Analytic) for a non-blank expression,
    /// [`Numeric`](Self::Numeric) otherwise.
    pub fn from_optional(expression: Option<&str>) -> Self {
        match expression.map(str::trim) {
            Some(text) if !text.is_empty() => Self::Analytic(text.to_string()),
            _ => Self::Numeric,
        }
    }

    /// Returns true if the derivative is estimated numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

/// Central-difference estimate of `f'(x)`.
///
/// Uses the fixed step [`CENTRAL_DIFFERENCE_STEP`]. Errors from either
/// evaluation of `f` are returned as-is.
///
/// # Example
///
/// ```rust
/// use nrsolve_math::derivative::central_difference;
///
/// let f = |x: f64| Ok::<f64, std::convert::Infallible>(x * x);
/// let slope = central_difference(f, 3.0).unwrap();
/// assert!((slope - 6.0).abs() < 1e-6);
/// ```
pub fn central_difference<F, E>(f: F, x: f64) -> Result<f64, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    let h = CENTRAL_DIFFERENCE_STEP;
    let forward = f(x + h)?;
    let backward = f(x - h)?;
    Ok((forward - backward) / (2.0 * h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::convert::Infallible;

    #[test]
    fn test_central_difference_smooth_function() {
        let f = |x: f64| Ok::<f64, Infallible>(x.cos() - x);
        for &x in &[-2.0, -0.5, 0.0, 0.739, 1.5, 3.0] {
            let numeric = central_difference(f, x).unwrap();
            let analytic = -x.sin() - 1.0;
            assert!(
                (numeric - analytic).abs() < 1e-6,
                "x = {x}: numeric {numeric}, analytic {analytic}"
            );
        }
    }

    #[test]
    fn test_central_difference_propagates_errors() {
        let f = |x: f64| {
            if x > 0.0 {
                Err(ParseError::DivisionByZero { divisor: 0.0 })
            } else {
                Ok(x)
            }
        };
        assert!(central_difference(f, 0.0).is_err());
        assert!(central_difference(f, -1.0).is_ok());
    }

    #[test]
    fn test_strategy_from_optional() {
        assert_eq!(
            DifferentiationStrategy::from_optional(Some(" 2x ")),
            DifferentiationStrategy::Analytic("2x".to_string())
        );
        assert!(DifferentiationStrategy::from_optional(Some("   ")).is_numeric());
        assert!(DifferentiationStrategy::from_optional(None).is_numeric());
    }
}

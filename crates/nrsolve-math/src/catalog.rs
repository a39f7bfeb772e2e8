//! Built-in closed-form functions.
//!
//! | Id | f(x) | f'(x) |
//! |----|------|-------|
//! | `cubic` | x³ − 2x − 5 | 3x² − 2 |
//! | `cosine` | cos x − x | −sin x − 1 |
//! | `exponential` | e^(−x) − x | −e^(−x) − 1 |
//! | `depressed-cubic` | x³ − 9x + 3 | 3x² − 9 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MathError;

/// A built-in function with a known analytic derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinFunction {
    /// `x^3 - 2x - 5`, the classic Newton example (root ≈ 2.0945515).
    Cubic,
    /// `cos(x) - x` (root ≈ 0.7390851).
    Cosine,
    /// `e^(-x) - x` (root ≈ 0.5671433).
    Exponential,
    /// `x^3 - 9x + 3`, three real roots.
    DepressedCubic,
}

impl BuiltinFunction {
    /// All built-in functions, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Cubic,
        Self::Cosine,
        Self::Exponential,
        Self::DepressedCubic,
    ];

    /// Evaluates the function.
    pub fn value(self, x: f64) -> f64 {
        match self {
            Self::Cubic => x.powi(3) - 2.0 * x - 5.0,
            Self::Cosine => x.cos() - x,
            Self::Exponential => (-x).exp() - x,
            Self::DepressedCubic => x.powi(3) - 9.0 * x + 3.0,
        }
    }

    /// Evaluates the analytic derivative.
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Self::Cubic => 3.0 * x.powi(2) - 2.0,
            Self::Cosine => -x.sin() - 1.0,
            Self::Exponential => -(-x).exp() - 1.0,
            Self::DepressedCubic => 3.0 * x.powi(2) - 9.0,
        }
    }

    /// Human-readable formula.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cubic => "x^3 - 2x - 5",
            Self::Cosine => "cos(x) - x",
            Self::Exponential => "e^(-x) - x",
            Self::DepressedCubic => "x^3 - 9x + 3",
        }
    }

    /// Formula of the derivative.
    pub fn derivative_label(self) -> &'static str {
        match self {
            Self::Cubic => "3x^2 - 2",
            Self::Cosine => "-sin(x) - 1",
            Self::Exponential => "-e^(-x) - 1",
            Self::DepressedCubic => "3x^2 - 9",
        }
    }

    /// Stable identifier used on the command line and in config files.
    pub fn id(self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Cosine => "cosine",
            Self::Exponential => "exponential",
            Self::DepressedCubic => "depressed-cubic",
        }
    }

    /// One-based position in [`ALL`](Self::ALL).
    pub fn menu_number(self) -> usize {
        match self {
            Self::Cubic => 1,
            Self::Cosine => 2,
            Self::Exponential => 3,
            Self::DepressedCubic => 4,
        }
    }

    /// Looks a function up by its one-based menu number.
    pub fn from_menu_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }
}

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuiltinFunction {
    type Err = MathError;

    /// Accepts an identifier (`cubic`, `depressed-cubic`, ...) or a menu
    /// number (`1`..`4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<usize>() {
            return Self::from_menu_number(number)
                .ok_or_else(|| MathError::invalid_input(format!("no built-in function #{}", s)));
        }

        let normalized = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|function| function.id() == normalized)
            .ok_or_else(|| MathError::invalid_input(format!("unknown built-in function '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivative::central_difference;
    use std::convert::Infallible;

    #[test]
    fn test_values() {
        assert_eq!(BuiltinFunction::Cubic.value(2.0), -1.0);
        assert_eq!(BuiltinFunction::Cosine.value(0.0), 1.0);
        assert_eq!(BuiltinFunction::Exponential.value(0.0), 1.0);
        assert_eq!(BuiltinFunction::DepressedCubic.value(0.0), 3.0);
    }

    #[test]
    fn test_derivatives_match_central_difference() {
        for function in BuiltinFunction::ALL {
            for &x in &[-1.5, 0.0, 0.5, 2.0] {
                let numeric =
                    central_difference(|t| Ok::<f64, Infallible>(function.value(t)), x).unwrap();
                assert!(
                    (numeric - function.derivative(x)).abs() < 1e-5,
                    "{} at x = {}",
                    function,
                    x
                );
            }
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("cubic".parse::<BuiltinFunction>().unwrap(), BuiltinFunction::Cubic);
        assert_eq!(
            "Depressed_Cubic".parse::<BuiltinFunction>().unwrap(),
            BuiltinFunction::DepressedCubic
        );
        assert_eq!("3".parse::<BuiltinFunction>().unwrap(), BuiltinFunction::Exponential);
        assert!("0".parse::<BuiltinFunction>().is_err());
        assert!("5".parse::<BuiltinFunction>().is_err());
        assert!("quartic".parse::<BuiltinFunction>().is_err());
    }

    #[test]
    fn test_menu_numbers_round_trip() {
        for function in BuiltinFunction::ALL {
            assert_eq!(
                BuiltinFunction::from_menu_number(function.menu_number()),
                Some(function)
            );
        }
    }
}

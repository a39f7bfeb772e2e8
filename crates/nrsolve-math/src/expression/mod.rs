//! Single-variable expression text.
//!
//! Expressions are plain algebraic text in one variable `x`, for example
//! `x^3 - 2x - 5` or `cos(x) - x`:
//!
//! - [`preprocess`]: makes digit-then-letter multiplication explicit (`2x` → `2*x`)
//! - [`ExpressionEvaluator`]: recursive-descent evaluation at a given `x`
//!
//! # Grammar
//!
//! | Rule | Production |
//! |------|------------|
//! | expression | term (('+' \| '-') term)* |
//! | term | power (('*' \| '/') power)* |
//! | power | factor ('^' factor)* |
//! | factor | number \| '(' expression ')' \| '-' factor \| identifier |
//!
//! `^` is **left-associative**: `2^3^2` is `(2^3)^2 = 64`.
//!
//! Supported identifiers are `x` and the one-argument functions `sin`, `cos`,
//! `tan`, `exp`, `log` (natural) and `sqrt`. A function takes exactly one
//! following factor, so `sin x^2` is `(sin x)^2`.
//!
//! # Example
//!
//! ```rust
//! use nrsolve_math::expression::{evaluate, preprocess};
//!
//! assert_eq!(preprocess("3sin(x)"), "3*sin(x)");
//! assert_eq!(evaluate("2x + 1", 5.0).unwrap(), 11.0);
//! ```

mod evaluator;
mod preprocess;

pub use evaluator::{ExpressionEvaluator, DEFAULT_DIVISION_THRESHOLD, MAX_NESTING_DEPTH};
pub use preprocess::preprocess;

use crate::error::ParseResult;

/// Evaluates `expression` at `x` with a default [`ExpressionEvaluator`].
pub fn evaluate(expression: &str, x: f64) -> ParseResult<f64> {
    ExpressionEvaluator::default().evaluate(expression, x)
}

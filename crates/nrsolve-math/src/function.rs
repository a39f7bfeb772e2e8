//! Functions the solver can be pointed at.
//!
//! [`RealFunction`] is the seam between function sources and the solver:
//! anything that can produce `f(x)` and `f'(x)` (possibly failing) can be
//! solved. Two sources are provided:
//!
//! - [`BuiltinFunction`]: closed-form catalog entries, never fail
//! - [`UserFunction`]: expression text with an analytic or numeric derivative
//!
//! [`FunctionSource`] selects between them at runtime.

use std::convert::Infallible;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::BuiltinFunction;
use crate::derivative::{central_difference, DifferentiationStrategy};
use crate::error::{ParseError, ParseResult};
use crate::expression::{preprocess, ExpressionEvaluator};

/// A real function of one variable with a derivative.
pub trait RealFunction {
    /// Error raised when the function cannot be evaluated.
    type Error: fmt::Display;

    /// Evaluates `f(x)`.
    fn value(&self, x: f64) -> Result<f64, Self::Error>;

    /// Evaluates `f'(x)`.
    fn derivative(&self, x: f64) -> Result<f64, Self::Error>;
}

impl RealFunction for BuiltinFunction {
    type Error = Infallible;

    fn value(&self, x: f64) -> Result<f64, Infallible> {
        Ok(BuiltinFunction::value(*self, x))
    }

    fn derivative(&self, x: f64) -> Result<f64, Infallible> {
        Ok(BuiltinFunction::derivative(*self, x))
    }
}

impl<T: RealFunction + ?Sized> RealFunction for &T {
    type Error = T::Error;

    fn value(&self, x: f64) -> Result<f64, Self::Error> {
        (**self).value(x)
    }

    fn derivative(&self, x: f64) -> Result<f64, Self::Error> {
        (**self).derivative(x)
    }
}

/// A function entered as expression text.
///
/// Owns its expression strings, so it can outlive whatever buffer the text
/// was read from.
///
/// # Example
///
/// ```rust
/// use nrsolve_math::function::UserFunction;
///
/// let f = UserFunction::new("x^2 - 4");
/// assert_eq!(f.value(3.0).unwrap(), 5.0);
/// assert!((f.derivative(3.0).unwrap() - 6.0).abs() < 1e-6);
///
/// let g = UserFunction::new("x^2 - 4").with_derivative("2x");
/// assert_eq!(g.derivative(3.0).unwrap(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    expression: String,
    strategy: DifferentiationStrategy,
    evaluator: ExpressionEvaluator,
}

impl UserFunction {
    /// Creates a user function with a numerically estimated derivative.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            strategy: DifferentiationStrategy::Numeric,
            evaluator: ExpressionEvaluator::default(),
        }
    }

    /// Uses `derivative` as the analytic derivative expression.
    #[must_use]
    pub fn with_derivative(mut self, derivative: impl Into<String>) -> Self {
        self.strategy = DifferentiationStrategy::Analytic(derivative.into());
        self
    }

    /// Sets the derivative strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DifferentiationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the evaluator used for both the function and its derivative.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: ExpressionEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// The expression text as entered.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The derivative strategy.
    pub fn strategy(&self) -> &DifferentiationStrategy {
        &self.strategy
    }

    /// The expression after implicit-multiplication rewriting.
    pub fn interpreted(&self) -> String {
        preprocess(&self.expression)
    }

    /// The derivative expression after rewriting, if analytic.
    pub fn interpreted_derivative(&self) -> Option<String> {
        match &self.strategy {
            DifferentiationStrategy::Analytic(text) => Some(preprocess(text)),
            DifferentiationStrategy::Numeric => None,
        }
    }

    /// Evaluates the function at `x`.
    pub fn value(&self, x: f64) -> ParseResult<f64> {
        self.evaluator.evaluate(&self.expression, x)
    }

    /// Evaluates the derivative at `x` according to the strategy.
    pub fn derivative(&self, x: f64) -> ParseResult<f64> {
        match &self.strategy {
            DifferentiationStrategy::Analytic(text) => self.evaluator.evaluate(text, x),
            DifferentiationStrategy::Numeric => central_difference(|t| self.value(t), x),
        }
    }
}

impl RealFunction for UserFunction {
    type Error = ParseError;

    fn value(&self, x: f64) -> ParseResult<f64> {
        UserFunction::value(self, x)
    }

    fn derivative(&self, x: f64) -> ParseResult<f64> {
        UserFunction::derivative(self, x)
    }
}

/// A function chosen at runtime: catalog entry or user expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionSource {
    /// A built-in closed-form function.
    Builtin(BuiltinFunction),
    /// A user-entered expression.
    User(UserFunction),
}

impl FunctionSource {
    /// Short description of the function, as it will be evaluated.
    pub fn describe(&self) -> String {
        match self {
            Self::Builtin(function) => function.label().to_string(),
            Self::User(function) => function.interpreted(),
        }
    }

    /// Description of how the derivative is obtained.
    pub fn describe_derivative(&self) -> String {
        match self {
            Self::Builtin(function) => function.derivative_label().to_string(),
            Self::User(function) => function
                .interpreted_derivative()
                .unwrap_or_else(|| "numeric (central difference)".to_string()),
        }
    }
}

impl From<BuiltinFunction> for FunctionSource {
    fn from(function: BuiltinFunction) -> Self {
        Self::Builtin(function)
    }
}

impl From<UserFunction> for FunctionSource {
    fn from(function: UserFunction) -> Self {
        Self::User(function)
    }
}

impl RealFunction for FunctionSource {
    type Error = ParseError;

    fn value(&self, x: f64) -> ParseResult<f64> {
        match self {
            Self::Builtin(function) => Ok(BuiltinFunction::value(*function, x)),
            Self::User(function) => function.value(x),
        }
    }

    fn derivative(&self, x: f64) -> ParseResult<f64> {
        match self {
            Self::Builtin(function) => Ok(BuiltinFunction::derivative(*function, x)),
            Self::User(function) => function.derivative(x),
        }
    }
}

/// Serializable description of a [`FunctionSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescription {
    /// The function as evaluated.
    pub function: String,
    /// The derivative, or how it is estimated.
    pub derivative: String,
}

impl From<&FunctionSource> for FunctionDescription {
    fn from(source: &FunctionSource) -> Self {
        Self {
            function: source.describe(),
            derivative: source.describe_derivative(),
        }
    }
}

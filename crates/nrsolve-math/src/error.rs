//! Error types for expression evaluation and solver setup.

use thiserror::Error;

/// A specialized Result type for expression parsing and evaluation.
pub type ParseResult<T> = Result<T, ParseError>;

/// A specialized Result type for everything else in this crate.
pub type MathResult<T> = Result<T, MathError>;

/// Errors raised while parsing or evaluating expression text.
///
/// The display strings are the messages reported to users when a root-finding
/// run ends in [`EvaluationFailed`](crate::solvers::RootFindOutcome::EvaluationFailed).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A parenthesised group was not closed by `)`.
    #[error("expected ')'")]
    ExpectedClosingParen {
        /// Cursor position (in characters) where `)` was expected.
        position: usize,
    },

    /// An identifier that is neither `x` nor a supported function.
    #[error("unknown function {name}")]
    UnknownFunction {
        /// The identifier as written.
        name: String,
    },

    /// A character that does not start or continue any production.
    #[error("unexpected character {character}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Cursor position (in characters) of the offending character.
        position: usize,
    },

    /// Input ended where an operand was required.
    ///
    /// This also covers an unclosed group with nothing after it: in `(` or
    /// `(x +` the missing operand is reached before the missing `)`, so
    /// only `(x` reports [`ExpectedClosingParen`](Self::ExpectedClosingParen).
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Groups, unary minus and function calls nested deeper than `limit`.
    #[error("expression nested too deeply (limit {limit})")]
    NestingTooDeep {
        /// The nesting limit that was exceeded.
        limit: usize,
    },

    /// Right operand of `/` too close to zero.
    #[error("division by zero")]
    DivisionByZero {
        /// The near-zero divisor.
        divisor: f64,
    },
}

/// Errors outside of expression evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Expression parsing or evaluation failed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

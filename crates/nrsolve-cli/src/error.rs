//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Initial guess is not a finite number.
    #[error("Invalid initial guess: {0}. Must be a finite number.")]
    InvalidInitialGuess(f64),

    /// Tolerance is not a positive finite number.
    #[error("Invalid epsilon: {0}. Must be a positive number.")]
    InvalidEpsilon(f64),

    /// Output precision out of range.
    #[error("Invalid precision: {0}. Must be between 0 and {max}.", max = crate::commands::MAX_PRECISION)]
    InvalidPrecision(usize),

    /// Text that should have been a number.
    #[error("Invalid {field}: '{value}' is not a number")]
    InvalidNumber {
        /// What was being read.
        field: String,
        /// The text entered.
        value: String,
    },

    /// Menu option outside the offered range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Input ended before all answers were given.
    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

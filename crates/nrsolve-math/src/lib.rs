//! # nrsolve Math
//!
//! Expression evaluation and Newton-Raphson root finding.
//!
//! This crate provides:
//!
//! - **Expression**: Implicit-multiplication preprocessing and a
//!   recursive-descent evaluator for single-variable algebraic text
//! - **Derivatives**: Analytic (second expression) or central-difference
//!   derivative strategies
//! - **Catalog**: Built-in closed-form functions with known derivatives
//! - **Solvers**: The Newton-Raphson iteration engine with per-iteration
//!   records and a classified terminal outcome
//!
//! ## Design Philosophy
//!
//! - **Generic Engine**: The solver only sees `f` and `f'` as fallible
//!   real-valued callables; it knows nothing about expression text
//! - **No Hidden State**: Every evaluation builds its own parse context
//! - **Observable**: Each completed iteration is handed to a caller-owned sink
//!
//! ## Example
//!
//! ```rust
//! use nrsolve_math::prelude::*;
//!
//! let function = UserFunction::new("x^2 - 4").with_derivative("2x");
//! let solver = NewtonSolver::new(SolverConfig::new(1e-10, 50));
//!
//! let report = solver.solve_collect(&function, 3.0);
//! assert!(report.outcome.is_converged());
//! assert!((report.outcome.root().unwrap() - 2.0).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod catalog;
pub mod derivative;
pub mod error;
pub mod expression;
pub mod function;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::catalog::BuiltinFunction;
    pub use crate::derivative::{central_difference, DifferentiationStrategy};
    pub use crate::error::{MathError, MathResult, ParseError, ParseResult};
    pub use crate::expression::{evaluate, preprocess, ExpressionEvaluator};
    pub use crate::function::{FunctionDescription, FunctionSource, RealFunction, UserFunction};
    pub use crate::solvers::{
        newton_raphson, IterationRecord, IterationSink, NewtonReport, NewtonSolver, NullSink,
        RootFindOutcome, SolverConfig,
    };
}

pub use error::{MathError, MathResult, ParseError, ParseResult};

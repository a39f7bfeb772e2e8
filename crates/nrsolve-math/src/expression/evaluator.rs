//! Recursive-descent expression evaluator.
//!
//! Whitespace separates tokens and never joins them: `1 2` is the numeral
//! `1` followed by a stray `2`, and `sin x` applies `sin` to `x`. Readers
//! that skip blanks inside numerals and names would see `12` and an
//! unknown function `sinx` instead.
//!
//! Recursion depth is capped at [`MAX_NESTING_DEPTH`] factors, so hostile
//! input fails with [`ParseError::NestingTooDeep`] rather than exhausting
//! the stack.

use log::trace;

use super::preprocess;
use crate::error::{ParseError, ParseResult};

/// Default magnitude below which a divisor is treated as zero.
pub const DEFAULT_DIVISION_THRESHOLD: f64 = 1e-9;

/// Deepest chain of nested factors (groups, unary minus, function calls).
pub const MAX_NESTING_DEPTH: usize = 256;

/// Evaluates single-variable expression text.
///
/// The evaluator holds configuration only. Each call to
/// [`evaluate`](Self::evaluate) preprocesses the text and walks it with a
/// fresh [`EvaluationContext`], so one instance can be shared freely.
///
/// # Example
///
/// ```rust
/// use nrsolve_math::expression::ExpressionEvaluator;
///
/// let evaluator = ExpressionEvaluator::new();
/// assert_eq!(evaluator.evaluate("x^2 - 4", 3.0).unwrap(), 5.0);
/// assert_eq!(evaluator.evaluate("2^3^2", 0.0).unwrap(), 64.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionEvaluator {
    division_threshold: f64,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self {
            division_threshold: DEFAULT_DIVISION_THRESHOLD,
        }
    }
}

impl ExpressionEvaluator {
    /// Creates an evaluator with the default division threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the divisor magnitude below which `/` fails.
    #[must_use]
    pub fn with_division_threshold(mut self, threshold: f64) -> Self {
        self.division_threshold = threshold;
        self
    }

    /// Returns the divisor magnitude below which `/` fails.
    pub fn division_threshold(&self) -> f64 {
        self.division_threshold
    }

    /// Evaluates `expression` with `x` bound to the given value.
    ///
    /// The whole text must be consumed; anything left over fails with
    /// [`ParseError::UnexpectedCharacter`].
    pub fn evaluate(&self, expression: &str, x: f64) -> ParseResult<f64> {
        let text = preprocess(expression);
        let mut ctx = EvaluationContext::new(&text, x, self.division_threshold);

        let value = ctx.expression()?;
        if let Some(character) = ctx.peek() {
            return Err(ParseError::UnexpectedCharacter {
                character,
                position: ctx.pos,
            });
        }

        trace!("evaluated '{}' at x = {} -> {}", text, x, value);
        Ok(value)
    }
}

/// Per-call parse state: the text, a cursor into it, and the bound `x`.
struct EvaluationContext {
    chars: Vec<char>,
    pos: usize,
    x: f64,
    division_threshold: f64,
    depth: usize,
}

impl EvaluationContext {
    fn new(text: &str, x: f64, division_threshold: f64) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            x,
            division_threshold,
            depth: 0,
        }
    }

    /// Skips whitespace and returns the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_whitespace())
        {
            self.pos += 1;
        }
        self.chars.get(self.pos).copied()
    }

    /// Consumes the character returned by the last [`peek`](Self::peek).
    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    /// Consumes the next character if it is one of `ops`.
    fn next_operator(&mut self, ops: &[char]) -> Option<char> {
        let c = self.peek().filter(|c| ops.contains(c))?;
        self.advance();
        Some(c)
    }

    fn expression(&mut self) -> ParseResult<f64> {
        let mut left = self.term()?;
        while let Some(op) = self.next_operator(&['+', '-']) {
            let right = self.term()?;
            if op == '+' {
                left += right;
            } else {
                left -= right;
            }
        }
        Ok(left)
    }

    fn term(&mut self) -> ParseResult<f64> {
        let mut left = self.power()?;
        while let Some(op) = self.next_operator(&['*', '/']) {
            let right = self.power()?;
            if op == '*' {
                left *= right;
            } else {
                if right.abs() < self.division_threshold {
                    return Err(ParseError::DivisionByZero { divisor: right });
                }
                left /= right;
            }
        }
        Ok(left)
    }

    // Left fold: 2^3^2 == (2^3)^2.
    fn power(&mut self) -> ParseResult<f64> {
        let mut left = self.factor()?;
        while self.next_operator(&['^']).is_some() {
            let right = self.factor()?;
            left = left.powf(right);
        }
        Ok(left)
    }

    fn factor(&mut self) -> ParseResult<f64> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let value = self.primary();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> ParseResult<f64> {
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(c) if c.is_ascii_digit() || c == '.' => Ok(self.number()),
            Some('(') => {
                self.advance();
                let value = self.expression()?;
                if self.peek() == Some(')') {
                    self.advance();
                    Ok(value)
                } else {
                    Err(ParseError::ExpectedClosingParen { position: self.pos })
                }
            }
            Some('-') => {
                self.advance();
                Ok(-self.factor()?)
            }
            Some(c) if c.is_ascii_alphabetic() => self.identifier(),
            Some(character) => Err(ParseError::UnexpectedCharacter {
                character,
                position: self.pos,
            }),
        }
    }

    fn number(&mut self) -> f64 {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == '.')
        {
            self.pos += 1;
        }
        let run: String = self.chars[start..self.pos].iter().collect();
        leading_decimal(&run)
    }

    fn identifier(&mut self) -> ParseResult<f64> {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(char::is_ascii_alphabetic)
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        if name == "x" {
            return Ok(self.x);
        }

        let function = builtin_function(&name).ok_or(ParseError::UnknownFunction { name })?;
        Ok(function(self.factor()?))
    }
}

/// One-argument functions callable from expression text.
fn builtin_function(name: &str) -> Option<fn(f64) -> f64> {
    let function: fn(f64) -> f64 = match name {
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "exp" => f64::exp,
        "log" => f64::ln,
        "sqrt" => f64::sqrt,
        _ => return None,
    };
    Some(function)
}

/// Converts the longest leading decimal literal of a digit/dot run.
///
/// `"1.2.3"` reads as `1.2`; a run without digits (a stray `.`) reads as `0`.
fn leading_decimal(run: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, c) in run.char_indices() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }
    run[..end].parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(expression: &str, x: f64) -> ParseResult<f64> {
        ExpressionEvaluator::new().evaluate(expression, x)
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(eval("x^2 - 4", 3.0).unwrap(), 5.0);
        assert_eq!(eval("x^3 - 2*x - 5", 2.0).unwrap(), -1.0);
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(eval("2x+1", 5.0).unwrap(), 11.0);
        assert_eq!(eval("3x^2", 2.0).unwrap(), 12.0);
    }

    #[test]
    fn test_power_is_left_associative() {
        assert_eq!(eval("2^3^2", 0.0).unwrap(), 64.0);
        assert_eq!(eval("2^(3^2)", 0.0).unwrap(), 512.0);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3", 0.0).unwrap(), 7.0);
        assert_eq!(eval("(1 + 2) * 3", 0.0).unwrap(), 9.0);
        assert_eq!(eval("2 * 3^2", 0.0).unwrap(), 18.0);
        assert_eq!(eval("8 / 4 / 2", 0.0).unwrap(), 1.0);
        assert_eq!(eval("10 - 4 - 3", 0.0).unwrap(), 3.0);
    }

    #[test]
    fn test_unary_minus_binds_to_factor() {
        assert_eq!(eval("-x", 2.0).unwrap(), -2.0);
        assert_eq!(eval("--x", 2.0).unwrap(), 2.0);
        // (-x)^2, not -(x^2)
        assert_eq!(eval("-x^2", 3.0).unwrap(), 9.0);
        assert_eq!(eval("2^-1", 0.0).unwrap(), 0.5);
    }

    #[test]
    fn test_functions() {
        assert_relative_eq!(eval("sin(0)", 0.0).unwrap(), 0.0);
        assert_relative_eq!(eval("cos(x) - x", 0.0).unwrap(), 1.0);
        assert_relative_eq!(eval("exp(1)", 0.0).unwrap(), std::f64::consts::E);
        assert_relative_eq!(eval("log(exp(2))", 0.0).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(eval("sqrt(16)", 0.0).unwrap(), 4.0);
        assert_relative_eq!(eval("tan(x)", 0.5).unwrap(), 0.5_f64.tan());
    }

    #[test]
    fn test_function_takes_one_factor() {
        // sin x^2 == (sin x)^2
        let x = 0.7_f64;
        assert_relative_eq!(eval("sin x^2", x).unwrap(), x.sin().powi(2));
        assert_relative_eq!(eval("exp -x", x).unwrap(), (-x).exp());
        assert_relative_eq!(eval("3sin(x)", x).unwrap(), 3.0 * x.sin());
    }

    #[test]
    fn test_whitespace_between_tokens() {
        assert_eq!(eval("  ( x + 1 )  *  2 ", 1.0).unwrap(), 4.0);
        assert_eq!(eval("\tx\n", 7.0).unwrap(), 7.0);
        assert_eq!(eval("sin x", 0.5).unwrap(), 0.5_f64.sin());
        assert!(matches!(
            eval("1 2", 0.0),
            Err(ParseError::UnexpectedCharacter { character: '2', .. })
        ));
    }

    #[test]
    fn test_numerals() {
        assert_eq!(eval("0.25", 0.0).unwrap(), 0.25);
        assert_eq!(eval(".5", 0.0).unwrap(), 0.5);
        assert_eq!(eval("3.", 0.0).unwrap(), 3.0);
        assert_eq!(eval("1.2.3", 0.0).unwrap(), 1.2);
        assert_eq!(eval(".", 0.0).unwrap(), 0.0);
        assert_eq!(eval("x + .", 4.0).unwrap(), 4.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            eval("1/0.0000000001", 0.0),
            Err(ParseError::DivisionByZero { .. })
        ));
        assert!(matches!(
            eval("1/x", 0.0),
            Err(ParseError::DivisionByZero { .. })
        ));
        assert!(matches!(
            eval("1/(x - x)", 3.0),
            Err(ParseError::DivisionByZero { .. })
        ));
        assert_eq!(eval("1/x", 4.0).unwrap(), 0.25);
    }

    #[test]
    fn test_division_threshold_is_configurable() {
        let evaluator = ExpressionEvaluator::new().with_division_threshold(1e-15);
        assert_relative_eq!(
            evaluator.evaluate("1/0.0000000001", 0.0).unwrap(),
            1e10,
            max_relative = 1e-12
        );
        assert!(evaluator.evaluate("1/0.0000000000000001", 0.0).is_err());
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("y", 0.0),
            Err(ParseError::UnknownFunction {
                name: "y".to_string()
            })
        );
        assert_eq!(
            eval("abs(x)", 0.0),
            Err(ParseError::UnknownFunction {
                name: "abs".to_string()
            })
        );
        // Identifiers are letter runs, so `xx` is not `x*x`.
        assert!(matches!(
            eval("xx", 1.0),
            Err(ParseError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_unclosed_group() {
        assert!(matches!(
            eval("(x + 1", 0.0),
            Err(ParseError::ExpectedClosingParen { .. })
        ));
        assert!(matches!(
            eval("sin(x", 0.0),
            Err(ParseError::ExpectedClosingParen { .. })
        ));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            eval("x # 2", 0.0),
            Err(ParseError::UnexpectedCharacter {
                character: '#',
                position: 2
            })
        );
        assert!(matches!(
            eval("x)", 0.0),
            Err(ParseError::UnexpectedCharacter { character: ')', .. })
        ));
        // No letter-then-digit insertion, so the trailing 2 is left over.
        assert!(matches!(
            eval("x2", 1.0),
            Err(ParseError::UnexpectedCharacter { character: '2', .. })
        ));
        // Closing group followed by a group is not multiplied.
        assert!(matches!(
            eval("(x+1)(x-1)", 1.0),
            Err(ParseError::UnexpectedCharacter { character: '(', .. })
        ));
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(eval("", 0.0), Err(ParseError::UnexpectedEnd));
        assert_eq!(eval("x +", 0.0), Err(ParseError::UnexpectedEnd));
        assert_eq!(eval("sqrt", 0.0), Err(ParseError::UnexpectedEnd));
        assert_eq!(eval("(", 0.0), Err(ParseError::UnexpectedEnd));
        assert_eq!(eval("(x +", 0.0), Err(ParseError::UnexpectedEnd));
        assert!(matches!(
            eval("(x", 0.0),
            Err(ParseError::ExpectedClosingParen { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}x{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(
            eval(&deep, 1.0),
            Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            })
        );

        let negations = format!("{}x", "-".repeat(200_000));
        assert!(matches!(eval(&negations, 1.0), Err(ParseError::NestingTooDeep { .. })));

        let shallow = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&shallow, 3.0), Ok(3.0));
    }

    #[test]
    fn test_repeated_evaluation_is_independent() {
        let evaluator = ExpressionEvaluator::new();
        assert_eq!(evaluator.evaluate("x^2", 2.0).unwrap(), 4.0);
        assert!(evaluator.evaluate("(x", 2.0).is_err());
        assert_eq!(evaluator.evaluate("x^2", 3.0).unwrap(), 9.0);
    }

    #[test]
    fn test_leading_decimal() {
        assert_eq!(leading_decimal("42"), 42.0);
        assert_eq!(leading_decimal("4.2.1"), 4.2);
        assert_eq!(leading_decimal(".."), 0.0);
        assert_eq!(leading_decimal(""), 0.0);
    }
}

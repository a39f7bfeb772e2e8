//! Implicit multiplication rewriting.

/// Inserts `*` between a digit and an immediately following letter.
///
/// Single left-to-right pass. No other adjacency is expanded: `x2`, `)x`,
/// `)2` and `)(` are returned unchanged.
///
/// # Example
///
/// ```rust
/// use nrsolve_math::expression::preprocess;
///
/// assert_eq!(preprocess("2x"), "2*x");
/// assert_eq!(preprocess("x2"), "x2");
/// assert_eq!(preprocess("(x+1)(x-1)"), "(x+1)(x-1)");
/// ```
pub fn preprocess(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        result.push(c);
        if c.is_ascii_digit() && chars.peek().is_some_and(char::is_ascii_alphabetic) {
            result.push('*');
        }
    }

    result
}

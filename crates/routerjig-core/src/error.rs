//! Error handling for RouterJig core
//!
//! Provides the length parse error shared by every layer of the
//! application, raised for malformed lengths and fractions typed by the
//! user. It uses `thiserror` like the other crates' error types.

use thiserror::Error;

/// Length parse error type
///
/// Raised when a user-supplied length or fraction string cannot be
/// interpreted. Carries the offending input so the message can be shown
/// as-is in a status line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LengthParseError {
    /// Wrong number of tokens, or a token that is not an integer
    #[error("Bad number specification: {input}")]
    BadSpecification {
        /// The string that failed to parse.
        input: String,
    },

    /// A fraction with a zero denominator
    #[error("Zero denominator in: {input}")]
    ZeroDenominator {
        /// The string that failed to parse.
        input: String,
    },

    /// Too many decimal digits to represent exactly
    #[error("Too many decimal digits in: {input}")]
    TooPrecise {
        /// The string that failed to parse.
        input: String,
    },
}

impl LengthParseError {
    /// Shorthand for the most common variant
    pub fn bad(input: impl Into<String>) -> Self {
        LengthParseError::BadSpecification {
            input: input.into(),
        }
    }

    /// The input string that failed to parse
    pub fn input(&self) -> &str {
        match self {
            LengthParseError::BadSpecification { input }
            | LengthParseError::ZeroDenominator { input }
            | LengthParseError::TooPrecise { input } => input,
        }
    }
}

//! Error types for the joint crate.
//!
//! This module provides structured error types for joint layout, design
//! persistence, and pass table output. Decoding failures of the JSON design
//! format are classified into [`DecodeError`].

use routerjig_core::LengthParseError;
use std::io;
use thiserror::Error;

/// Errors that can occur during joint operations.
#[derive(Error, Debug)]
pub enum JointError {
    /// The board set cannot be used for the operation.
    #[error("Invalid boards: {0}")]
    InvalidBoards(String),

    /// Invalid geometry or layout parameters were provided.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A length typed by the user could not be parsed.
    #[error(transparent)]
    Parse(#[from] LengthParseError),

    /// A design could not be encoded.
    #[error("Design encode error: {0}")]
    Encode(String),

    /// A saved design could not be decoded.
    #[error("Design decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Problems in a saved design. Any of these aborts the load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The data is not tagged with the design file format.
    #[error("not a design file: expected format {expected:?}, got {actual:?}")]
    BadMagic {
        expected: &'static str,
        actual: String,
    },

    /// The data ended in the middle of a value.
    #[error("unexpected end of data at line {line}, column {column}")]
    UnexpectedEof { line: usize, column: usize },

    /// The data is not well formed.
    #[error("malformed design at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Well formed data whose fields or types do not match a design.
    #[error("design does not match the file schema: {message}")]
    Schema { message: String },

    /// A field required by the rest of the design is absent.
    #[error("record '{record}' is missing field '{field}'")]
    MissingField { record: String, field: String },

    /// The spacing payload is not the kind its tag calls for.
    #[error("spacing tag {tag:?} needs {expected}, found {found}")]
    PayloadMismatch {
        tag: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A field decoded but holds an unusable value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let (line, column) = (err.line(), err.column());
        match err.classify() {
            Category::Eof => DecodeError::UnexpectedEof { line, column },
            Category::Syntax | Category::Io => DecodeError::Syntax {
                line,
                column,
                message: err.to_string(),
            },
            Category::Data => DecodeError::Schema {
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for joint operations.
pub type JointResult<T> = Result<T, JointError>;

/// Result type alias for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_error_display() {
        let err = JointError::InvalidBoards("a pass table needs at least 2 boards".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid boards: a pass table needs at least 2 boards"
        );

        let err = JointError::InvalidParameters("bit width must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameters: bit width must be positive");
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::UnexpectedEof { line: 3, column: 7 };
        assert_eq!(err.to_string(), "unexpected end of data at line 3, column 7");

        let err = DecodeError::PayloadMismatch {
            tag: "Equa".to_string(),
            expected: "equal parameters",
            found: "a cut list",
        };
        assert_eq!(
            err.to_string(),
            "spacing tag \"Equa\" needs equal parameters, found a cut list"
        );

        let err = DecodeError::InvalidValue {
            field: "bit_width".to_string(),
            reason: "bit width must be positive, got -2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for 'bit_width': bit width must be positive, got -2"
        );
    }

    #[test]
    fn test_json_error_classification() {
        let eof = serde_json::from_str::<serde_json::Value>("{\"a\": ").unwrap_err();
        assert!(matches!(DecodeError::from(eof), DecodeError::UnexpectedEof { line: 1, .. }));

        let syntax = serde_json::from_str::<serde_json::Value>("{]").unwrap_err();
        assert!(matches!(DecodeError::from(syntax), DecodeError::Syntax { .. }));

        let data = serde_json::from_str::<Vec<i64>>("[\"x\"]").unwrap_err();
        assert!(matches!(DecodeError::from(data), DecodeError::Schema { .. }));
    }

    #[test]
    fn test_error_conversion() {
        let err: JointError = DecodeError::Schema {
            message: "missing field `format`".to_string(),
        }
        .into();
        assert!(matches!(err, JointError::Decode(_)));

        let err: JointError = LengthParseError::bad("x").into();
        assert!(matches!(err, JointError::Parse(_)));

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: JointError = io_err.into();
        assert!(matches!(err, JointError::IoError(_)));
    }
}

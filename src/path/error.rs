//! Error types for pattern parsing and path operations.

use thiserror::Error;

/// Errors that can occur while parsing a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unexpected token at a specific position.
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of pattern, expected {expected}")]
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    #[error("Invalid path syntax: {message}")]
    InvalidSyntax { message: String },
}

/// Errors surfaced by [`Path`](super::Path) construction and operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The pattern string could not be compiled.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The operation is not defined for this kind of path, e.g. slicing a
    /// match pattern or matching two match patterns against each other.
    #[error("\"{pattern}\" cannot be used with {operation}")]
    WrongPathKind {
        pattern: String,
        operation: &'static str,
    },
}

impl PathError {
    pub(crate) fn wrong_kind(pattern: &str, operation: &'static str) -> Self {
        PathError::WrongPathKind {
            pattern: pattern.to_string(),
            operation,
        }
    }
}

//! Error types for the sift-query crate.

use thiserror::Error;

use crate::guard::GuardRejection;

/// Errors that can occur while compiling a search expression.
#[derive(Debug, Error)]
pub enum SiftError {
    /// The parser needed a term and could not find one.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// The query exceeded one of the configured size limits.
    #[error("query rejected: {0}")]
    GuardRejected(#[from] GuardRejection),

    /// An empty clause reached the predicate compiler.
    #[error("compile invariant violated: {0}")]
    CompileInvariant(String),

    /// A column binding could not be split into a table and a column.
    #[error("cannot derive table/column from binding '{0}'")]
    InvalidTarget(String),

    /// The compiled predicates could not be encoded for fingerprinting.
    #[error("failed to encode predicates: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A syntax error raised while parsing a token stream.
///
/// `position` is the index of the offending token (or the token count when
/// the stream ended early).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at token {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        ParseError {
            position,
            message: message.into(),
        }
    }
}

/// Result type for sift-query operations.
pub type Result<T> = std::result::Result<T, SiftError>;

//! Typed errors raised by the comment engine.
//!
//! Only failures that must abort an operation live here. A strategy declining
//! a comment, or a backend call failing, is reported per comment through
//! [`crate::conversion::ConversionResult`] instead.

use thiserror::Error;

use crate::range::Range;

/// Errors that abort lexing, parsing or rewriting of a buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A range was constructed with `start > end`.
    #[error("invalid range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },

    /// A comment failed the codec's per-line delimiter check.
    ///
    /// Lexing and merging guarantee homogeneous groups, so hitting this
    /// means an upstream bug rather than bad user input.
    #[error("malformed comment at line {line}: expected `{expected}` in {text:?}")]
    MalformedComment {
        line: usize,
        expected: &'static str,
        text: String,
    },

    /// Replacements overlap, are out of order, or leave the buffer.
    #[error("replacement invariant violated: {0}")]
    InvariantViolation(String),

    /// A user-supplied regular expression failed to compile.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A configuration value could not be interpreted.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn overlap(previous: Range, next: Range) -> Self {
        Self::InvariantViolation(format!(
            "range {next} starts before the end of preceding range {previous}"
        ))
    }

    pub fn out_of_bounds(range: Range, len: usize) -> Self {
        Self::InvariantViolation(format!("range {range} exceeds buffer length {len}"))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

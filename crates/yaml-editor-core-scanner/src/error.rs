//! Scanner errors.

use crate::mark::Mark;
use thiserror::Error;

/// A malformed span of input reported by the scanner.
///
/// The scanner stays usable after returning one of these: the next call resumes after the span
/// (or after the first character of it when the span is empty).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {start}")]
pub struct ScanError {
    /// First position of the malformed input.
    pub start: Mark,
    /// Position just past the malformed input.
    pub end: Mark,
    /// Human readable description.
    pub message: String,
}

impl ScanError {
    /// Create an error covering `start..end`.
    pub fn new(start: Mark, end: Mark, message: impl Into<String>) -> Self {
        Self {
            start,
            end,
            message: message.into(),
        }
    }
}

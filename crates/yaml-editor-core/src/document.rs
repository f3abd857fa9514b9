//! Versioned document text.
//!
//! [`TextDocument`] is the document-version source: it owns the current text and a version
//! number that increases on every change. Parsers key their caches on that version.

use crate::delta::{TextDelta, TextDeltaEdit};
use crate::line_index::LineIndex;
use std::ops::Range;
use thiserror::Error;

/// Errors returned by [`TextDocument`] edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The edited range does not fit the document.
    #[error("invalid range {start}..{end} for a document of {len} characters")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Document length in characters.
        len: usize,
    },
}

/// Rope-backed text with a monotonically increasing version.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    line_index: LineIndex,
    version: u64,
    last_delta: Option<TextDelta>,
}

impl TextDocument {
    /// Create a document at version 0.
    pub fn new(text: &str) -> Self {
        Self {
            line_index: LineIndex::from_text(text),
            version: 0,
            last_delta: None,
        }
    }

    /// Current version. Changes on every successful, non-empty edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.line_index.get_text()
    }

    /// Length in characters.
    pub fn len_chars(&self) -> usize {
        self.line_index.char_count()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Line index for offset / position conversions.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// The delta recorded by the most recent edit.
    pub fn last_delta(&self) -> Option<&TextDelta> {
        self.last_delta.as_ref()
    }

    /// Replace the characters in `range` with `text` and return the new version.
    ///
    /// An edit that neither deletes nor inserts anything keeps the current version.
    pub fn edit(&mut self, range: Range<usize>, text: &str) -> Result<u64, DocumentError> {
        let len = self.len_chars();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if range.is_empty() && text.is_empty() {
            return Ok(self.version);
        }

        let deleted_text = self.line_index.slice(range.start, range.end);
        self.line_index.delete(range.start, range.len());
        self.line_index.insert(range.start, text);

        let before_version = self.version;
        self.version += 1;
        self.last_delta = Some(TextDelta {
            before_version,
            after_version: self.version,
            before_char_count: len,
            after_char_count: self.line_index.char_count(),
            edits: vec![TextDeltaEdit {
                start: range.start,
                deleted_text,
                inserted_text: text.to_string(),
            }],
        });

        Ok(self.version)
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<u64, DocumentError> {
        self.edit(offset..offset, text)
    }

    /// Delete the characters in `range`.
    pub fn delete(&mut self, range: Range<usize>) -> Result<u64, DocumentError> {
        self.edit(range, "")
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: &str) -> u64 {
        let len = self.len_chars();
        // The full range always fits.
        self.edit(0..len, text).unwrap_or(self.version)
    }
}

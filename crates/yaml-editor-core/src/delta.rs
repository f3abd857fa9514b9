//! Structured text change deltas.
//!
//! Every [`TextDocument`](crate::TextDocument) edit records a [`TextDelta`] expressed in
//! **character offsets** (Unicode scalar values), so change consumers can tell where an edit
//! happened without diffing old and new text.

/// A single text edit expressed in character offsets.
///
/// `start` is a character offset in the document at the time the edit is applied; the deleted
/// range is the length (in `char`s) of `deleted_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}

/// A structured description of one document version change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Version before applying `edits`.
    pub before_version: u64,
    /// Version after applying `edits`.
    pub after_version: u64,
    /// Character count before applying `edits`.
    pub before_char_count: usize,
    /// Character count after applying `edits`.
    pub after_char_count: usize,
    /// Ordered list of edits that transforms the "before" document into the "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The earliest character offset touched by any edit.
    pub fn min_start(&self) -> Option<usize> {
        self.edits.iter().map(|edit| edit.start).min()
    }
}

//! Rope-backed line index.
//!
//! Offsets are character offsets (Unicode scalar values); lines and columns are 0-based.

use ropey::Rope;

/// Logical line index over the document text.
///
/// Rope provides O(log N) line access, insertion, and deletion, so edits on large files stay
/// cheap.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a line index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get line number and offset within line from character offset.
    ///
    /// Offsets past the end clamp to the end of the document.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        (line_idx, char_offset - line_start_char)
    }

    /// Get character offset from line number and column number.
    ///
    /// Columns past the end of the line clamp to the line end (before its line break).
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(line);
        let line_len = self
            .get_line_text(line)
            .map_or(0, |text| text.chars().count());

        line_start_char + column.min(line_len)
    }

    /// Total line count (an empty document has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Insert text at a character offset (clamped to the document end).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete `len_chars` characters starting at `start_char` (clamped to the document end).
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = (start_char + len_chars).min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// Text of a character range (clamped to the document).
    pub fn slice(&self, start_char: usize, end_char: usize) -> String {
        let end_char = end_char.min(self.rope.len_chars());
        let start_char = start_char.min(end_char);
        self.rope.slice(start_char..end_char).to_string()
    }

    /// Get complete text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Get text of the specified line (excluding its line break).
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.char_count(), 0);
    }

    #[test]
    fn test_char_offset_to_position() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.char_offset_to_position(0), (0, 0));
        assert_eq!(index.char_offset_to_position(2), (0, 2));
        assert_eq!(index.char_offset_to_position(4), (1, 0));
        assert_eq!(index.char_offset_to_position(8), (2, 0));
        assert_eq!(index.char_offset_to_position(99), (2, 3));
    }

    #[test]
    fn test_position_to_char_offset_clamps() {
        let index = LineIndex::from_text("ab\r\ncd\nef");

        assert_eq!(index.position_to_char_offset(0, 9), 2);
        assert_eq!(index.position_to_char_offset(1, 1), 5);
        assert_eq!(index.position_to_char_offset(2, 0), 7);
        assert_eq!(index.position_to_char_offset(7, 0), 9);
    }

    #[test]
    fn test_utf8_cjk() {
        let index = LineIndex::from_text("你好\n世界");

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.char_offset_to_position(3), (1, 0));
        assert_eq!(index.slice(3, 5), "世界");
    }

    #[test]
    fn test_insert_and_delete() {
        let mut index = LineIndex::from_text("key: value");

        index.insert(5, "new ");
        assert_eq!(index.get_text(), "key: new value");

        index.delete(5, 4);
        assert_eq!(index.get_text(), "key: value");
        assert_eq!(index.get_line_text(0).as_deref(), Some("key: value"));
        assert_eq!(index.get_line_text(1), None);
    }
}

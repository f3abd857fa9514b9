//! Source positions.

use std::cmp::Ordering;
use std::fmt;

/// A position in the scanned text.
///
/// `index` is an absolute character offset (Unicode scalar values from the start of the text).
/// `line` and `column` are 1-based display coordinates derived from `index` for the same text
/// version. Marks compare and order by `index` only.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    /// Absolute character offset.
    pub index: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Mark {
    /// Create a mark from an offset and 1-based line/column coordinates.
    pub const fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// The same position moved `count` characters to the right on the same line.
    pub const fn advanced_on_line(self, count: usize) -> Self {
        Self {
            index: self.index + count,
            line: self.line,
            column: self.column + count,
        }
    }
}

impl Default for Mark {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl PartialEq for Mark {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Mark {}

impl PartialOrd for Mark {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mark {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_order_by_index_only() {
        let a = Mark::new(3, 1, 4);
        let b = Mark::new(3, 9, 9);
        let c = Mark::new(4, 1, 5);

        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.max(c), c);
    }

    #[test]
    fn test_advanced_on_line() {
        let mark = Mark::new(10, 2, 3).advanced_on_line(1);
        assert_eq!(mark.index, 11);
        assert_eq!(mark.line, 2);
        assert_eq!(mark.column, 4);
    }

    #[test]
    fn test_default_is_start_of_text() {
        let mark = Mark::default();
        assert_eq!((mark.index, mark.line, mark.column), (0, 1, 1));
    }
}

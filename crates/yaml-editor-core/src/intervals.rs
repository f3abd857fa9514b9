//! Style intervals and fold regions.
//!
//! These are the derived-state shapes handed to the host editor through
//! [`ProcessingEdit`](crate::ProcessingEdit).

/// Style ID type
pub type StyleId = u32;

/// Style layer ID
///
/// Used to distinguish style sources, allowing replacement/clearing of one layer without
/// affecting other style layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleLayerId(pub u32);

impl StyleLayerId {
    /// Create a style layer id from a raw numeric identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// YAML token classification layer.
    pub const YAML_SYNTAX: Self = Self(6);

    /// Syntax-error underline layer.
    pub const DIAGNOSTICS: Self = Self(4);
}

/// A styled half-open character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// Style ID
    pub style_id: StyleId,
}

impl Interval {
    /// Create a new interval with `[start, end)` offsets and a style id.
    pub fn new(start: usize, end: usize, style_id: StyleId) -> Self {
        Self {
            start,
            end,
            style_id,
        }
    }

    /// Check if interval contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// A foldable line range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    /// Start line number (0-based)
    pub start_line: usize,
    /// End line number (0-based, inclusive)
    pub end_line: usize,
    /// Whether folded
    pub is_collapsed: bool,
    /// Placeholder text shown when folded
    pub placeholder: String,
}

impl FoldRegion {
    /// Create an expanded folding region for an inclusive line range.
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self::with_placeholder(start_line, end_line, String::from("[...]"))
    }

    /// Create a folding region with a custom placeholder string.
    pub fn with_placeholder(start_line: usize, end_line: usize, placeholder: String) -> Self {
        Self {
            start_line,
            end_line,
            is_collapsed: false,
            placeholder,
        }
    }

    /// Number of lines hidden when the region is collapsed.
    pub fn hidden_lines(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

//! Foldable region extraction.
//!
//! [`extract_regions`] walks a flat token stream once and rebuilds the block nesting from the
//! `BlockSequenceStart` / `BlockMappingStart` / `BlockEnd` tokens, using an explicit stack of
//! open levels so deeply nested input cannot overflow the call stack.

use std::borrow::Borrow;
use yaml_editor_core_scanner::{Mark, Token, TokenKind};

/// Collapsed display text used for every region.
pub const COLLAPSED_TEXT: &str = "...";

/// A foldable span of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Start of the span (the block-opening token or the scalar start).
    pub start: Mark,
    /// End of the span (the closing `BlockEnd` or the scalar end).
    pub end: Mark,
    /// Text shown while the region is collapsed.
    pub collapsed_text: String,
    /// Hover text for the collapsed region. Multi-line scalars carry their content here.
    pub tooltip: String,
}

impl Region {
    fn new(start: Mark, end: Mark, tooltip: impl Into<String>) -> Self {
        Self {
            start,
            end,
            collapsed_text: COLLAPSED_TEXT.to_string(),
            tooltip: tooltip.into(),
        }
    }

    /// Whether the region intersects `[start, end]` (character offsets, both inclusive).
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start.index <= end && self.end.index >= start
    }
}

/// One open nesting level.
#[derive(Debug, Clone, Copy)]
struct Level {
    /// Start of the block-opening token this level closes, `None` for stream / document levels.
    opening: Option<Mark>,
    /// Whether closing this level may produce a region.
    foldable: bool,
    /// Whether this is a document level, closed implicitly by the next `---`.
    document: bool,
}

impl Level {
    const STREAM: Self = Self {
        opening: None,
        foldable: false,
        document: false,
    };

    const DOCUMENT: Self = Self {
        document: true,
        ..Self::STREAM
    };
}

/// Extract the foldable regions of a token stream.
///
/// Regions are returned in the order their closing token is seen, so inner regions precede the
/// regions that contain them. Sort by `(start, end)` for a positional order.
///
/// A block directly under a stream or document level spans the whole document and is never
/// reported; nested blocks and scalars are reported when they cover more than one line.
pub fn extract_regions<I>(tokens: I) -> Vec<Region>
where
    I: IntoIterator,
    I::Item: Borrow<Token>,
{
    let mut extractor = Extractor::new();
    for token in tokens {
        extractor.push(token.borrow());
    }
    extractor.regions
}

/// Open levels plus the regions emitted so far.
struct Extractor {
    levels: Vec<Level>,
    regions: Vec<Region>,
}

impl Extractor {
    fn new() -> Self {
        Self {
            levels: vec![Level::STREAM],
            regions: Vec::new(),
        }
    }

    fn push(&mut self, token: &Token) {
        match &token.kind {
            TokenKind::StreamStart => self.levels.push(Level::STREAM),
            TokenKind::DocumentStart => {
                self.close_open_document();
                self.levels.push(Level::DOCUMENT);
            }
            TokenKind::BlockSequenceStart | TokenKind::BlockMappingStart => {
                let parent_is_wrapper = self
                    .levels
                    .last()
                    .is_none_or(|level| level.opening.is_none());
                self.levels.push(Level {
                    opening: Some(token.start),
                    foldable: !parent_is_wrapper,
                    document: false,
                });
            }
            TokenKind::StreamEnd => {
                self.close_open_document();
                self.close_level();
            }
            TokenKind::DocumentEnd => {
                self.close_level();
            }
            TokenKind::BlockEnd => {
                let Some(level) = self.close_level() else {
                    return;
                };
                if let Some(opening) = level.opening
                    && level.foldable
                    && opening.line != token.end.line
                {
                    self.regions
                        .push(Region::new(opening, token.end, COLLAPSED_TEXT));
                }
            }
            TokenKind::Scalar { value, .. } if token.is_multi_line() => {
                self.regions
                    .push(Region::new(token.start, token.end, value.as_str()));
            }
            _ => {}
        }
    }

    /// Pop the innermost level. The outermost level is never popped.
    fn close_level(&mut self) -> Option<Level> {
        if self.levels.len() > 1 {
            self.levels.pop()
        } else {
            None
        }
    }

    /// Close a document level left open by a document without an explicit `...`.
    fn close_open_document(&mut self) {
        if self.levels.last().is_some_and(|level| level.document) {
            self.close_level();
        }
    }
}

/// Regions intersecting `[start, end]` (character offsets, both inclusive).
pub fn regions_overlapping(
    regions: &[Region],
    start: usize,
    end: usize,
) -> impl Iterator<Item = &Region> {
    regions
        .iter()
        .filter(move |region| region.overlaps(start, end))
}

/// Sort regions by `(start, end)`.
pub fn sort_regions(regions: &mut [Region]) {
    regions.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
}

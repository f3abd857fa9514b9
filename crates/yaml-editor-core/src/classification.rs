//! Token classification for syntax coloring.

use crate::intervals::{Interval, StyleId};
use std::ops::Range;
use yaml_editor_core_scanner::{Token, TokenKind};

/// Built-in style id for anchors (`&name`).
pub const YAML_STYLE_ANCHOR: StyleId = 0x0200_0001;
/// Built-in style id for aliases (`*name`).
pub const YAML_STYLE_ALIAS: StyleId = 0x0200_0002;
/// Built-in style id for mapping keys.
pub const YAML_STYLE_KEY: StyleId = 0x0200_0003;
/// Built-in style id for scalar values.
pub const YAML_STYLE_VALUE: StyleId = 0x0200_0004;
/// Built-in style id for tags.
pub const YAML_STYLE_TAG: StyleId = 0x0200_0005;
/// Built-in style id for `%YAML` / `%TAG` directives.
pub const YAML_STYLE_DIRECTIVE: StyleId = 0x0200_0006;
/// Built-in style id for comments.
pub const YAML_STYLE_COMMENT: StyleId = 0x0200_0007;
/// Built-in style id for spans the scanner could not tokenize.
pub const YAML_STYLE_INVALID: StyleId = 0x0200_0008;
/// Built-in style id for indicators and other punctuation.
pub const YAML_STYLE_SYMBOL: StyleId = 0x0200_0009;

/// Syntax class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// `&name`
    Anchor,
    /// `*name`
    Alias,
    /// A scalar directly after a `Key` token.
    Key,
    /// Any other scalar.
    Value,
    /// `!tag`
    Tag,
    /// `%YAML` / `%TAG`
    Directive,
    /// `# ...`
    Comment,
    /// Unparsable input.
    Invalid,
    /// Any other token that covers text (indicators, brackets, document markers).
    Symbol,
}

impl TokenClass {
    /// The built-in style id for this class.
    pub fn style_id(self) -> StyleId {
        match self {
            Self::Anchor => YAML_STYLE_ANCHOR,
            Self::Alias => YAML_STYLE_ALIAS,
            Self::Key => YAML_STYLE_KEY,
            Self::Value => YAML_STYLE_VALUE,
            Self::Tag => YAML_STYLE_TAG,
            Self::Directive => YAML_STYLE_DIRECTIVE,
            Self::Comment => YAML_STYLE_COMMENT,
            Self::Invalid => YAML_STYLE_INVALID,
            Self::Symbol => YAML_STYLE_SYMBOL,
        }
    }
}

/// Classify `token`, given the token that precedes it in the stream.
///
/// Zero-width structural tokens have no class.
pub fn classify(token: &Token, previous: Option<&Token>) -> Option<TokenClass> {
    let class = match token.kind {
        TokenKind::Anchor(_) => TokenClass::Anchor,
        TokenKind::AnchorAlias(_) => TokenClass::Alias,
        TokenKind::Scalar { .. } => {
            if previous.is_some_and(|previous| previous.kind == TokenKind::Key) {
                TokenClass::Key
            } else {
                TokenClass::Value
            }
        }
        TokenKind::Tag { .. } => TokenClass::Tag,
        TokenKind::TagDirective { .. } | TokenKind::VersionDirective { .. } => {
            TokenClass::Directive
        }
        TokenKind::Comment { .. } => TokenClass::Comment,
        TokenKind::Invalid(_) => TokenClass::Invalid,
        _ if !token.is_empty() => TokenClass::Symbol,
        _ => return None,
    };
    Some(class)
}

/// Style intervals for `tokens`, clipped to the half-open character range `range`.
///
/// `tokens` must be in stream order; the first token is classified without a predecessor.
pub fn classify_tokens<'a, I>(tokens: I, range: Range<usize>) -> Vec<Interval>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut intervals = Vec::new();
    let mut previous: Option<&Token> = None;

    for token in tokens {
        if let Some(class) = classify(token, previous) {
            let start = token.start.index.max(range.start);
            let end = token.end.index.min(range.end);
            if start < end {
                intervals.push(Interval::new(start, end, class.style_id()));
            }
        }
        previous = Some(token);
    }

    intervals
}

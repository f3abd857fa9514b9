//! Token model shared by the scanner and its consumers.

use crate::error::ScanError;
use crate::mark::Mark;

/// Presentation style of a scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    /// Unquoted flow scalar.
    Plain,
    /// `'...'`
    SingleQuoted,
    /// `"..."`
    DoubleQuoted,
    /// `|` block scalar.
    Literal,
    /// `>` block scalar.
    Folded,
}

impl ScalarStyle {
    /// Whether this is a block (`|` / `>`) scalar.
    pub fn is_block(self) -> bool {
        matches!(self, Self::Literal | Self::Folded)
    }
}

/// The closed set of token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Start of the token stream.
    StreamStart,
    /// End of the token stream.
    StreamEnd,
    /// `%YAML major.minor`
    VersionDirective {
        /// Major version number.
        major: u32,
        /// Minor version number.
        minor: u32,
    },
    /// `%TAG handle prefix`
    TagDirective {
        /// Tag handle, e.g. `!!`.
        handle: String,
        /// Tag prefix the handle expands to.
        prefix: String,
    },
    /// `---`
    DocumentStart,
    /// `...`
    DocumentEnd,
    /// Implicit start of an indentation-delimited sequence.
    BlockSequenceStart,
    /// Implicit start of an indentation-delimited mapping.
    BlockMappingStart,
    /// Implicit end of the innermost block collection.
    BlockEnd,
    /// `[`
    FlowSequenceStart,
    /// `]`
    FlowSequenceEnd,
    /// `{`
    FlowMappingStart,
    /// `}`
    FlowMappingEnd,
    /// `-` in block context.
    BlockEntry,
    /// `,` in flow context.
    FlowEntry,
    /// Start of a mapping key (explicit `?` or implied by a simple key).
    Key,
    /// `:`
    Value,
    /// `*name`
    AnchorAlias(String),
    /// `&name`
    Anchor(String),
    /// `!suffix`, `!!suffix`, `!handle!suffix` or `!<verbatim>`.
    Tag {
        /// Tag handle (empty for verbatim tags).
        handle: String,
        /// Tag suffix.
        suffix: String,
    },
    /// A scalar value.
    Scalar {
        /// The scalar content after unescaping and line folding.
        value: String,
        /// How the scalar was written.
        style: ScalarStyle,
    },
    /// `# text`
    Comment {
        /// Comment text without the leading `#`.
        text: String,
        /// Whether the comment trails other content on the same line.
        is_inline: bool,
    },
    /// Placeholder for a span of input the scanner could not tokenize.
    Invalid(String),
}

impl TokenKind {
    /// A short, stable name for the kind (used in logs and test output).
    pub fn name(&self) -> &'static str {
        match self {
            Self::StreamStart => "StreamStart",
            Self::StreamEnd => "StreamEnd",
            Self::VersionDirective { .. } => "VersionDirective",
            Self::TagDirective { .. } => "TagDirective",
            Self::DocumentStart => "DocumentStart",
            Self::DocumentEnd => "DocumentEnd",
            Self::BlockSequenceStart => "BlockSequenceStart",
            Self::BlockMappingStart => "BlockMappingStart",
            Self::BlockEnd => "BlockEnd",
            Self::FlowSequenceStart => "FlowSequenceStart",
            Self::FlowSequenceEnd => "FlowSequenceEnd",
            Self::FlowMappingStart => "FlowMappingStart",
            Self::FlowMappingEnd => "FlowMappingEnd",
            Self::BlockEntry => "BlockEntry",
            Self::FlowEntry => "FlowEntry",
            Self::Key => "Key",
            Self::Value => "Value",
            Self::AnchorAlias(_) => "AnchorAlias",
            Self::Anchor(_) => "Anchor",
            Self::Tag { .. } => "Tag",
            Self::Scalar { .. } => "Scalar",
            Self::Comment { .. } => "Comment",
            Self::Invalid(_) => "Invalid",
        }
    }
}

/// A classified span of the scanned text.
///
/// `end` is exclusive: it is the position just past the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// First position covered by the token.
    pub start: Mark,
    /// Position just past the token.
    pub end: Mark,
    /// What the token is.
    pub kind: TokenKind,
}

impl Token {
    /// Create a token. `start` must not be after `end`.
    pub fn new(kind: TokenKind, start: Mark, end: Mark) -> Self {
        debug_assert!(start.index <= end.index, "token ends before it starts");
        Self { start, end, kind }
    }

    /// Build the placeholder token standing in for a scan error.
    ///
    /// A zero-width error is widened by one character so the placeholder is never empty.
    pub fn invalid(error: ScanError) -> Self {
        let end = if error.end.index == error.start.index {
            error.end.advanced_on_line(1)
        } else {
            error.end
        };
        Self::new(TokenKind::Invalid(error.message), error.start, end)
    }

    /// Whether the token covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Whether the token starts and ends on different lines.
    pub fn is_multi_line(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Whether this is an error placeholder.
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, TokenKind::Invalid(_))
    }
}

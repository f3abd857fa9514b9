//! Derived editor state as replaceable edits.
//!
//! A [`DocumentProcessor`] turns a [`TextDocument`] into [`ProcessingEdit`]s: full replacements
//! of a style layer, of the fold regions, or of the diagnostics list. Hosts apply them wholesale;
//! nothing here mutates the document.

use crate::classification::classify_tokens;
use crate::diagnostics::{Diagnostic, syntax_diagnostics};
use crate::document::TextDocument;
use crate::folds::fold_regions;
use crate::intervals::{FoldRegion, Interval, StyleLayerId};
use crate::parser::{DocumentParser, ParserConfig};
use std::convert::Infallible;
use yaml_editor_core_scanner::Token;

/// A change to derived editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEdit {
    /// Replace an entire style layer with the given intervals (char offsets).
    ReplaceStyleLayer {
        /// The style layer being replaced.
        layer: StyleLayerId,
        /// The full set of style intervals for the layer (char offsets, half-open).
        intervals: Vec<Interval>,
    },
    /// Replace folding regions.
    ///
    /// If `preserve_collapsed` is true, regions that match an existing collapsed region
    /// (`start_line`, `end_line`) stay collapsed after replacement.
    ReplaceFoldingRegions {
        /// The complete set of folding regions.
        regions: Vec<FoldRegion>,
        /// Whether to preserve the collapsed/expanded state for regions that still exist.
        preserve_collapsed: bool,
    },
    /// Replace the syntax diagnostics.
    ReplaceDiagnostics {
        /// The complete set of diagnostics.
        diagnostics: Vec<Diagnostic>,
    },
}

/// A processor that produces [`ProcessingEdit`]s for a document.
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Compute derived state updates for `doc`.
    ///
    /// An empty result means nothing changed since the previous call.
    fn process(&mut self, doc: &TextDocument) -> Result<Vec<ProcessingEdit>, Self::Error>;
}

/// Configuration for [`YamlProcessor`].
#[derive(Debug, Clone)]
pub struct YamlProcessorConfig {
    /// Style layer that receives token classes.
    pub style_layer: StyleLayerId,
    /// Whether fold replacement keeps still-existing regions collapsed.
    pub preserve_collapsed_folds: bool,
    /// Scanner and buffer options.
    pub parser: ParserConfig,
}

impl YamlProcessorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style layer.
    pub fn with_style_layer(mut self, layer: StyleLayerId) -> Self {
        self.style_layer = layer;
        self
    }

    /// Set whether collapsed folds survive a replacement.
    pub fn with_preserve_collapsed_folds(mut self, preserve: bool) -> Self {
        self.preserve_collapsed_folds = preserve;
        self
    }

    /// Set the parser options.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}

impl Default for YamlProcessorConfig {
    fn default() -> Self {
        Self {
            style_layer: StyleLayerId::YAML_SYNTAX,
            preserve_collapsed_folds: true,
            parser: ParserConfig::default(),
        }
    }
}

/// Token classes, folds, and syntax diagnostics for YAML documents.
///
/// Each document version is processed once; asking again for the same version yields no edits.
///
/// # Example
///
/// ```rust
/// use yaml_editor_core::{DocumentProcessor, ProcessingEdit, TextDocument, YamlProcessor};
///
/// let doc = TextDocument::new("a:\n  b:\n    - 1\n    - 2\n");
/// let mut processor = YamlProcessor::new();
///
/// let edits = processor.process(&doc).unwrap();
/// assert_eq!(edits.len(), 3);
/// assert!(matches!(edits[1], ProcessingEdit::ReplaceFoldingRegions { .. }));
/// assert!(processor.process(&doc).unwrap().is_empty());
/// ```
pub struct YamlProcessor {
    config: YamlProcessorConfig,
    parser: DocumentParser,
    last_processed_version: Option<u64>,
}

impl YamlProcessor {
    /// Create a processor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(YamlProcessorConfig::default())
    }

    /// Create a processor from `config`.
    pub fn with_config(config: YamlProcessorConfig) -> Self {
        let parser = DocumentParser::with_config(config.parser.clone());
        Self {
            config,
            parser,
            last_processed_version: None,
        }
    }

    /// The underlying parser, for direct token and region queries.
    pub fn parser_mut(&mut self) -> &mut DocumentParser {
        &mut self.parser
    }
}

impl Default for YamlProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor for YamlProcessor {
    type Error = Infallible;

    fn process(&mut self, doc: &TextDocument) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let version = doc.version();
        if self.last_processed_version == Some(version) {
            return Ok(Vec::new());
        }

        let tokens: Vec<Token> = self.parser.all_tokens(doc).collect();
        let intervals = classify_tokens(&tokens, 0..doc.len_chars());
        let diagnostics = syntax_diagnostics(&tokens);
        let folds = fold_regions(&self.parser.regions(doc), doc.line_index());

        tracing::debug!(
            version,
            tokens = tokens.len(),
            folds = folds.len(),
            diagnostics = diagnostics.len(),
            "processed yaml document"
        );

        self.last_processed_version = Some(version);
        Ok(vec![
            ProcessingEdit::ReplaceStyleLayer {
                layer: self.config.style_layer,
                intervals,
            },
            ProcessingEdit::ReplaceFoldingRegions {
                regions: folds,
                preserve_collapsed: self.config.preserve_collapsed_folds,
            },
            ProcessingEdit::ReplaceDiagnostics { diagnostics },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{YAML_STYLE_KEY, YAML_STYLE_VALUE};

    type Unpacked = (Vec<Interval>, Vec<FoldRegion>, Vec<Diagnostic>);

    fn unpack(edits: Vec<ProcessingEdit>) -> Unpacked {
        let mut intervals = Vec::new();
        let mut folds = Vec::new();
        let mut diagnostics = Vec::new();
        for edit in edits {
            match edit {
                ProcessingEdit::ReplaceStyleLayer { intervals: i, .. } => intervals = i,
                ProcessingEdit::ReplaceFoldingRegions { regions, .. } => folds = regions,
                ProcessingEdit::ReplaceDiagnostics { diagnostics: d } => diagnostics = d,
            }
        }
        (intervals, folds, diagnostics)
    }

    #[test]
    fn test_process_reports_styles_folds_and_diagnostics() {
        let doc = TextDocument::new("name: x\nlist:\n  - a:\n      b\n  - c\nbad: 'open\n");
        let mut processor = YamlProcessor::new();

        let Ok(edits) = processor.process(&doc);
        let (intervals, folds, diagnostics) = unpack(edits);

        assert_eq!(intervals[0], Interval::new(0, 4, YAML_STYLE_KEY));
        assert_eq!(intervals[2], Interval::new(6, 7, YAML_STYLE_VALUE));
        assert_eq!(
            folds
                .iter()
                .map(|fold| (fold.start_line, fold.end_line))
                .collect::<Vec<_>>(),
            vec![(2, 3), (2, 4)]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "found unterminated quoted scalar");
    }

    #[test]
    fn test_same_version_is_skipped() {
        let mut doc = TextDocument::new("a: 1\n");
        let mut processor = YamlProcessor::new();

        assert_eq!(processor.process(&doc).map(|edits| edits.len()), Ok(3));
        assert_eq!(processor.process(&doc), Ok(Vec::new()));

        doc.insert(0, "# c\n").unwrap();
        assert_eq!(processor.process(&doc).map(|edits| edits.len()), Ok(3));
    }

    #[test]
    fn test_config_is_applied() {
        let config = YamlProcessorConfig::new()
            .with_style_layer(StyleLayerId::new(42))
            .with_preserve_collapsed_folds(false);
        let mut processor = YamlProcessor::with_config(config);

        let Ok(edits) = processor.process(&TextDocument::new("k: v\n"));
        assert!(matches!(
            edits[0],
            ProcessingEdit::ReplaceStyleLayer {
                layer: StyleLayerId(42),
                ..
            }
        ));
        assert!(matches!(
            edits[1],
            ProcessingEdit::ReplaceFoldingRegions {
                preserve_collapsed: false,
                ..
            }
        ));
    }
}

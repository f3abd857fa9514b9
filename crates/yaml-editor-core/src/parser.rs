//! Version-keyed parse state for one document.
//!
//! [`DocumentParser`] owns exactly one [`TokenBuffer`] for the current document version and a
//! cached region snapshot. Every query first checks the document version; a new version drops
//! the old buffer wholesale and the next query re-scans lazily from the top. Each such re-scan
//! is published once to subscribers, whichever call noticed the new version.

use crate::document::TextDocument;
use crate::regions::{Region, extract_regions, sort_regions};
use crate::token_buffer::{AllTokens, TokenBuffer, TokenBufferConfig};
use std::ops::Range;
use std::sync::Arc;
use yaml_editor_core_scanner::{Scanner, ScannerConfig, Token};

/// Configuration for [`DocumentParser`].
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Scanner options used for every re-scan.
    pub scanner: ScannerConfig,
    /// Token buffer options used for every re-scan.
    pub buffer: TokenBufferConfig,
}

impl ParserConfig {
    /// Set the scanner options.
    pub fn with_scanner(mut self, scanner: ScannerConfig) -> Self {
        self.scanner = scanner;
        self
    }

    /// Set the token buffer options.
    pub fn with_buffer(mut self, buffer: TokenBufferConfig) -> Self {
        self.buffer = buffer;
        self
    }
}

/// Notification emitted after a re-scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTreeChanged {
    /// Version of the previous buffer, if there was one.
    pub old_version: Option<u64>,
    /// Version now being served.
    pub new_version: u64,
    /// Character range whose derived state must be re-queried: from the earliest edited
    /// position to the end of the document.
    pub affected: Range<usize>,
}

/// Parse tree change callback type
pub type ParseTreeChangedCallback = Box<dyn FnMut(&ParseTreeChanged) + Send>;

/// Token and region queries over a [`TextDocument`], re-scanned per version.
///
/// # Example
///
/// ```rust
/// use yaml_editor_core::{DocumentParser, TextDocument};
///
/// let mut doc = TextDocument::new("a:\n  b:\n    - 1\n    - 2\n");
/// let mut parser = DocumentParser::new();
///
/// assert_eq!(parser.regions(&doc).len(), 2);
///
/// doc.set_text("a: 1\n");
/// let change = parser.document_changed(&doc).unwrap();
/// assert_eq!(change.affected, 0..5);
/// assert!(parser.regions(&doc).is_empty());
/// ```
pub struct DocumentParser {
    config: ParserConfig,
    buffer: Option<TokenBuffer<Scanner>>,
    regions: Option<(u64, Arc<[Region]>)>,
    callbacks: Vec<ParseTreeChangedCallback>,
}

impl DocumentParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with an explicit configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            buffer: None,
            regions: None,
            callbacks: Vec::new(),
        }
    }

    /// Subscribe to [`ParseTreeChanged`] notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ParseTreeChanged) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// The buffer serving the current version, if any query has run yet.
    pub fn buffer(&self) -> Option<&TokenBuffer<Scanner>> {
        self.buffer.as_ref()
    }

    /// Replace the token buffer if `doc` has moved to a new version.
    ///
    /// Returns `true` when a new buffer was created. Subscribers are notified of the re-scan.
    pub fn rescan(&mut self, doc: &TextDocument) -> bool {
        self.replace_stale_buffer(doc).is_some()
    }

    /// React to a document change: re-scan and notify subscribers if the version moved.
    ///
    /// Returns `None` when the current version was already scanned, including by an earlier
    /// query, which has then published the change itself.
    pub fn document_changed(&mut self, doc: &TextDocument) -> Option<ParseTreeChanged> {
        self.replace_stale_buffer(doc)
    }

    /// Tokens intersecting `[start, end]` (character offsets, both inclusive).
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    pub fn tokens_overlapping(
        &mut self,
        doc: &TextDocument,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &Token> {
        self.current_buffer(doc).1.tokens_overlapping(start, end)
    }

    /// The whole token stream of the current version.
    pub fn all_tokens(&mut self, doc: &TextDocument) -> AllTokens<'_, Scanner> {
        self.current_buffer(doc).1.all_tokens()
    }

    /// Foldable regions of the current version, sorted by `(start, end)`.
    ///
    /// The snapshot is computed once per version and shared.
    pub fn regions(&mut self, doc: &TextDocument) -> Arc<[Region]> {
        let version = doc.version();
        self.rescan(doc);
        if let Some((cached_version, regions)) = &self.regions
            && *cached_version == version
        {
            return Arc::clone(regions);
        }

        let (_, buffer) = self.current_buffer(doc);
        let mut regions = extract_regions(buffer.all_tokens());
        sort_regions(&mut regions);
        tracing::debug!(version, count = regions.len(), "extracted regions");

        let regions: Arc<[Region]> = regions.into();
        self.regions = Some((version, Arc::clone(&regions)));
        regions
    }

    /// Regions of the current version intersecting `[start, end]` (both inclusive).
    pub fn regions_overlapping(
        &mut self,
        doc: &TextDocument,
        start: usize,
        end: usize,
    ) -> Vec<Region> {
        self.regions(doc)
            .iter()
            .filter(|region| region.overlaps(start, end))
            .cloned()
            .collect()
    }

    fn current_buffer(&mut self, doc: &TextDocument) -> (bool, &mut TokenBuffer<Scanner>) {
        let rescanned = self.replace_stale_buffer(doc).is_some();

        // Present for the current version once the stale check has run.
        let version = doc.version();
        let config = &self.config;
        let buffer = self.buffer.get_or_insert_with(|| {
            let scanner = Scanner::with_config(&doc.text(), config.scanner.clone());
            TokenBuffer::with_config(version, scanner, config.buffer.clone())
        });
        (rescanned, buffer)
    }

    /// Build a fresh buffer for a new document version and publish the change.
    fn replace_stale_buffer(&mut self, doc: &TextDocument) -> Option<ParseTreeChanged> {
        let version = doc.version();
        let old_version = self.buffer.as_ref().map(TokenBuffer::version);
        if old_version == Some(version) {
            return None;
        }

        tracing::debug!(?old_version, new_version = version, "rescanning document");
        let scanner = Scanner::with_config(&doc.text(), self.config.scanner.clone());
        self.buffer = Some(TokenBuffer::with_config(
            version,
            scanner,
            self.config.buffer.clone(),
        ));
        self.regions = None;

        let len = doc.len_chars();
        let edit_start = doc
            .last_delta()
            .filter(|delta| {
                Some(delta.before_version) == old_version && delta.after_version == version
            })
            .and_then(|delta| delta.min_start())
            .unwrap_or(0);

        let change = ParseTreeChanged {
            old_version,
            new_version: version,
            affected: edit_start.min(len)..len,
        };
        tracing::debug!(?change, "parse tree changed");

        for callback in &mut self.callbacks {
            callback(&change);
        }
        Some(change)
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

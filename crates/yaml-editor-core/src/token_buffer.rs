//! Incremental token buffer.
//!
//! A [`TokenBuffer`] presents the token stream of one document version as an append-only cache
//! that is filled on demand. Queries scan only as far as they need to; scan errors are folded
//! into the stream as `Invalid` tokens so the cache stays total and ordered.

use crate::source::TokenSource;
use yaml_editor_core_scanner::{Scanner, Token};

/// Default number of scan errors tolerated per document version.
pub const DEFAULT_ERROR_BUDGET: usize = 100;

/// Configuration for [`TokenBuffer`].
#[derive(Debug, Clone)]
pub struct TokenBufferConfig {
    /// Maximum number of scan errors recovered from before scanning stops for this version.
    pub error_budget: usize,
}

impl TokenBufferConfig {
    /// Set the error budget.
    pub fn with_error_budget(mut self, error_budget: usize) -> Self {
        self.error_budget = error_budget;
        self
    }
}

impl Default for TokenBufferConfig {
    fn default() -> Self {
        Self {
            error_budget: DEFAULT_ERROR_BUDGET,
        }
    }
}

/// Lazily filled token cache for a single document version.
///
/// Tokens are appended in document order, so the cache is sorted by both `start.index` and
/// `end.index`. Once the source is exhausted (or the error budget is spent) the cache stops
/// growing; queries then answer from what is cached.
pub struct TokenBuffer<S = Scanner> {
    version: u64,
    source: S,
    config: TokenBufferConfig,
    tokens: Vec<Token>,
    error_count: usize,
    exhausted: bool,
}

impl<S: TokenSource> TokenBuffer<S> {
    /// Create a buffer for `version` reading from `source`.
    pub fn new(version: u64, source: S) -> Self {
        Self::with_config(version, source, TokenBufferConfig::default())
    }

    /// Create a buffer with an explicit configuration.
    pub fn with_config(version: u64, source: S, config: TokenBufferConfig) -> Self {
        Self {
            version,
            source,
            config,
            tokens: Vec::new(),
            error_count: 0,
            exhausted: false,
        }
    }

    /// The document version this buffer was built for.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Tokens scanned so far.
    pub fn cached_tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of scan errors recovered from so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Whether the cache will not grow any further.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Tokens whose span intersects `[start, end]` (character offsets, both inclusive), in
    /// document order.
    ///
    /// Scanning first progresses until a token starts after `end` or the stream is finished.
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    pub fn tokens_overlapping(&mut self, start: usize, end: usize) -> impl Iterator<Item = &Token> {
        assert!(
            start <= end,
            "tokens_overlapping: end ({end}) is before start ({start})"
        );

        self.read_while(|last| last.is_none_or(|token| token.start.index <= end));

        let first = self.tokens.partition_point(|token| token.end.index < start);
        self.tokens[first..]
            .iter()
            .take_while(move |token| token.start.index <= end)
    }

    /// Iterate the whole token stream from the beginning.
    ///
    /// The cache is extended one line group at a time as the iterator advances: every extension
    /// reads tokens until one starts on a later line than the first token of the group.
    pub fn all_tokens(&mut self) -> AllTokens<'_, S> {
        AllTokens {
            buffer: self,
            next: 0,
        }
    }

    /// Read the next line group into the cache. Returns `false` if nothing was added.
    fn extend_line_group(&mut self) -> bool {
        let before = self.tokens.len();
        self.pull();
        let Some(line) = self.tokens.get(before).map(|token| token.start.line) else {
            return false;
        };

        self.read_while(|last| last.is_some_and(|token| token.start.line == line));
        tracing::trace!(
            version = self.version,
            added = self.tokens.len() - before,
            "extended token cache by one line group"
        );
        true
    }

    /// Pull tokens while `keep_reading` holds for the most recently cached token.
    fn read_while(&mut self, mut keep_reading: impl FnMut(Option<&Token>) -> bool) {
        while !self.exhausted && keep_reading(self.tokens.last()) {
            self.pull();
        }
    }

    /// Pull one item from the source into the cache.
    fn pull(&mut self) {
        if self.exhausted {
            return;
        }

        match self.source.next_token() {
            Ok(Some(token)) => self.tokens.push(token),
            Ok(None) => self.exhausted = true,
            Err(error) => {
                if self.error_count < self.config.error_budget {
                    self.error_count += 1;
                    self.tokens.push(Token::invalid(error));
                }
                if self.error_count >= self.config.error_budget {
                    self.exhausted = true;
                    tracing::warn!(
                        version = self.version,
                        errors = self.error_count,
                        "scan error budget exhausted; the rest of the document is not tokenized"
                    );
                }
            }
        }
    }
}

/// Iterator returned by [`TokenBuffer::all_tokens`].
pub struct AllTokens<'a, S> {
    buffer: &'a mut TokenBuffer<S>,
    next: usize,
}

impl<S: TokenSource> Iterator for AllTokens<'_, S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.next >= self.buffer.tokens.len() {
            if !self.buffer.extend_line_group() {
                return None;
            }
        }

        let token = self.buffer.tokens.get(self.next).cloned();
        self.next += 1;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use yaml_editor_core_scanner::{Mark, ScanError, TokenKind};

    /// Replays a fixed script of results and counts how often it was pulled.
    struct Scripted {
        items: VecDeque<Result<Token, ScanError>>,
        pulls: usize,
    }

    impl Scripted {
        fn new(items: Vec<Result<Token, ScanError>>) -> Self {
            Self {
                items: items.into(),
                pulls: 0,
            }
        }
    }

    impl TokenSource for Scripted {
        fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
            self.pulls += 1;
            self.items.pop_front().transpose()
        }
    }

    fn at(index: usize, line: usize) -> Mark {
        Mark::new(index, line, index + 1)
    }

    fn scalar(start: usize, end: usize, line: usize) -> Result<Token, ScanError> {
        Ok(Token::new(
            TokenKind::Scalar {
                value: "x".into(),
                style: yaml_editor_core_scanner::ScalarStyle::Plain,
            },
            at(start, line),
            at(end, line),
        ))
    }

    #[test]
    fn test_overlap_query_scans_only_as_far_as_needed() {
        let mut buffer = TokenBuffer::new(
            1,
            Scripted::new(vec![
                scalar(0, 2, 1),
                scalar(3, 5, 1),
                scalar(6, 8, 2),
                scalar(9, 11, 2),
            ]),
        );

        let found: Vec<usize> = buffer
            .tokens_overlapping(4, 4)
            .map(|token| token.start.index)
            .collect();
        assert_eq!(found, vec![3]);
        // Stops right after the first token starting past the range.
        assert_eq!(buffer.cached_tokens().len(), 3);
        assert!(!buffer.is_exhausted());
    }

    #[test]
    fn test_overlap_is_inclusive_at_both_ends() {
        let mut buffer = TokenBuffer::new(
            1,
            Scripted::new(vec![scalar(0, 2, 1), scalar(3, 5, 1), scalar(6, 8, 1)]),
        );

        let found: Vec<usize> = buffer
            .tokens_overlapping(2, 6)
            .map(|token| token.start.index)
            .collect();
        assert_eq!(found, vec![0, 3, 6]);
    }

    #[test]
    #[should_panic(expected = "is before start")]
    fn test_reversed_range_panics() {
        let mut buffer = TokenBuffer::new(1, Scripted::new(Vec::new()));
        let _ = buffer.tokens_overlapping(5, 4).count();
    }

    #[test]
    fn test_errors_become_invalid_tokens() {
        let mut buffer = TokenBuffer::new(
            7,
            Scripted::new(vec![
                scalar(0, 2, 1),
                Err(ScanError::new(at(3, 1), at(3, 1), "bad")),
                scalar(4, 6, 1),
            ]),
        );

        let tokens: Vec<Token> = buffer.all_tokens().collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Invalid("bad".into()));
        assert_eq!((tokens[1].start.index, tokens[1].end.index), (3, 4));
        assert_eq!(buffer.error_count(), 1);
        assert!(buffer.is_exhausted());
    }

    #[test]
    fn test_error_budget_truncates_the_stream() {
        let mut items = Vec::new();
        for i in 0..10 {
            items.push(Err(ScanError::new(at(i, 1), at(i + 1, 1), "bad")));
        }
        items.push(scalar(20, 21, 1));

        let mut buffer = TokenBuffer::with_config(
            1,
            Scripted::new(items),
            TokenBufferConfig::default().with_error_budget(3),
        );

        let tokens: Vec<Token> = buffer.all_tokens().collect();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(Token::is_invalid));
        assert!(buffer.is_exhausted());
        assert_eq!(buffer.tokens_overlapping(0, 100).count(), 3);
    }

    #[test]
    fn test_all_tokens_extends_by_line_group() {
        let mut buffer = TokenBuffer::new(
            1,
            Scripted::new(vec![
                scalar(0, 1, 1),
                scalar(2, 3, 1),
                scalar(4, 5, 2),
                scalar(6, 7, 3),
            ]),
        );

        let mut all = buffer.all_tokens();
        assert!(all.next().is_some());
        drop(all);
        // The first group reads line 1 and the first token of line 2.
        assert_eq!(buffer.cached_tokens().len(), 3);
        assert_eq!(buffer.source.pulls, 3);

        assert_eq!(buffer.all_tokens().count(), 4);
        assert_eq!(buffer.all_tokens().count(), 4);
    }

    #[test]
    fn test_requery_is_idempotent() {
        let text = "a:\n  - b\n  - 'c\n  - d\n";
        let mut buffer = TokenBuffer::new(1, Scanner::new(text));

        let first: Vec<Token> = buffer.tokens_overlapping(3, 12).cloned().collect();
        let second: Vec<Token> = buffer.tokens_overlapping(3, 12).cloned().collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}

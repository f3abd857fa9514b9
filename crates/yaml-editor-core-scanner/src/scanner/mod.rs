//! Error-resuming YAML tokenizer.
//!
//! The scanner follows the classic libyaml design: an indentation stack turns block structure
//! into explicit `BlockSequenceStart` / `BlockMappingStart` / `BlockEnd` tokens, and a table of
//! "possible simple keys" lets a `Key` token be inserted retroactively once the `:` is seen.
//!
//! Unlike libyaml, scanning does not stop at the first malformed construct. A [`ScanError`] is
//! returned for the malformed span and the following call continues right after it.

mod chars;
mod properties;
mod scalars;

use std::collections::VecDeque;

use crate::error::ScanError;
use crate::mark::Mark;
use crate::token::{Token, TokenKind};
use chars::{is_blank, is_break, is_indicator};

/// Simple keys further than this many characters from their `:` are not keys.
const MAX_SIMPLE_KEY_LENGTH: usize = 1024;

/// Configuration for [`Scanner`].
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// Drop comments instead of producing [`TokenKind::Comment`] tokens.
    pub skip_comments: bool,
}

impl ScannerConfig {
    /// Control whether comments are produced as tokens.
    pub fn with_skip_comments(mut self, skip: bool) -> Self {
        self.skip_comments = skip;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct SimpleKey {
    possible: bool,
    token_number: usize,
    mark: Mark,
}

impl SimpleKey {
    fn new(mark: Mark) -> Self {
        Self {
            possible: false,
            token_number: 0,
            mark,
        }
    }
}

/// A pull-based YAML tokenizer over an in-memory text.
///
/// ```
/// use yaml_editor_core_scanner::{Scanner, TokenKind};
///
/// let mut scanner = Scanner::new("a: 1\n");
/// let mut kinds = Vec::new();
/// while let Ok(Some(token)) = scanner.next_token() {
///     kinds.push(token.kind.name());
/// }
/// assert_eq!(kinds.first(), Some(&"StreamStart"));
/// assert_eq!(kinds.last(), Some(&"StreamEnd"));
/// ```
#[derive(Debug)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    /// 0-based line of `pos`.
    line: usize,
    /// 0-based column of `pos`.
    col: usize,
    config: ScannerConfig,
    tokens: VecDeque<Token>,
    tokens_parsed: usize,
    stream_start_produced: bool,
    stream_end_fetched: bool,
    stream_end_produced: bool,
    indent: isize,
    indents: Vec<isize>,
    flow_level: usize,
    simple_key_allowed: bool,
    simple_keys: Vec<SimpleKey>,
    pending_error: Option<ScanError>,
}

impl Scanner {
    /// Create a scanner that produces comment tokens.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, ScannerConfig::default())
    }

    /// Create a scanner with an explicit configuration.
    pub fn with_config(text: &str, config: ScannerConfig) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 0,
            col: 0,
            config,
            tokens: VecDeque::new(),
            tokens_parsed: 0,
            stream_start_produced: false,
            stream_end_fetched: false,
            stream_end_produced: false,
            indent: -1,
            indents: Vec::new(),
            flow_level: 0,
            simple_key_allowed: false,
            simple_keys: Vec::new(),
            pending_error: None,
        }
    }

    /// Pull the next token.
    ///
    /// Returns `Ok(None)` once `StreamEnd` has been delivered. An `Err` describes a malformed
    /// span; tokens preceding it have already been delivered and scanning resumes after it on
    /// the next call.
    pub fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        if self.stream_end_produced {
            return Ok(None);
        }

        self.fetch_more_tokens();

        if let Some(token) = self.tokens.pop_front() {
            self.tokens_parsed += 1;
            if token.kind == TokenKind::StreamEnd {
                self.stream_end_produced = true;
            }
            return Ok(Some(token));
        }

        match self.pending_error.take() {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }

    /// The current scan position.
    pub fn mark(&self) -> Mark {
        Mark::new(self.pos, self.line + 1, self.col + 1)
    }

    fn fetch_more_tokens(&mut self) {
        loop {
            let need_more = if self.tokens.is_empty() {
                true
            } else {
                self.stale_simple_keys();
                let parsed = self.tokens_parsed;
                self.simple_keys
                    .iter()
                    .any(|key| key.possible && key.token_number == parsed)
            };

            if !need_more || self.pending_error.is_some() || self.stream_end_fetched {
                return;
            }

            if let Err(error) = self.fetch_next_token() {
                self.recover(error);
            }
        }
    }

    /// Forget everything that depended on the failed construct.
    ///
    /// Queued tokens stay queued and are delivered before the error, so the token order is
    /// preserved.
    fn recover(&mut self, error: ScanError) {
        debug_assert_eq!(error.end.index, self.pos, "scanner must resume at the error end");
        tracing::trace!(
            start = error.start.index,
            end = error.end.index,
            message = %error.message,
            "scan error"
        );
        for key in &mut self.simple_keys {
            key.possible = false;
        }
        self.pending_error = Some(error);
    }

    fn fetch_next_token(&mut self) -> Result<(), ScanError> {
        if !self.stream_start_produced {
            self.fetch_stream_start();
            return Ok(());
        }

        self.scan_to_next_token();

        if self.at(0) == Some('#') {
            self.fetch_comment();
            return Ok(());
        }

        self.stale_simple_keys();
        self.unroll_indent(self.col as isize);

        let Some(c) = self.at(0) else {
            self.fetch_stream_end();
            return Ok(());
        };

        if self.col == 0 {
            if c == '%' {
                return self.fetch_directive();
            }
            if self.is_document_indicator_at(self.pos, "---") {
                self.fetch_document_indicator(TokenKind::DocumentStart);
                return Ok(());
            }
            if self.is_document_indicator_at(self.pos, "...") {
                self.fetch_document_indicator(TokenKind::DocumentEnd);
                return Ok(());
            }
        }

        match c {
            '[' => self.fetch_flow_collection_start(TokenKind::FlowSequenceStart),
            '{' => self.fetch_flow_collection_start(TokenKind::FlowMappingStart),
            ']' => self.fetch_flow_collection_end(TokenKind::FlowSequenceEnd),
            '}' => self.fetch_flow_collection_end(TokenKind::FlowMappingEnd),
            ',' => self.fetch_flow_entry(),
            '-' if self.is_blankz_at(1) => return self.fetch_block_entry(),
            '?' if self.flow_level > 0 || self.is_blankz_at(1) => return self.fetch_key(),
            ':' if self.flow_level > 0 || self.is_blankz_at(1) => return self.fetch_value(),
            '*' => return self.fetch_anchor(true),
            '&' => return self.fetch_anchor(false),
            '!' => return self.fetch_tag(),
            '|' | '>' if self.flow_level == 0 => return self.fetch_block_scalar(c == '|'),
            '\'' | '"' => return self.fetch_flow_scalar(c == '\''),
            _ if self.can_start_plain_scalar(c) => self.fetch_plain_scalar(),
            _ => {
                let start = self.mark();
                return Err(self.error_from(start, "found character that cannot start any token"));
            }
        }

        Ok(())
    }

    fn can_start_plain_scalar(&self, c: char) -> bool {
        if !(is_blank(c) || is_break(c) || is_indicator(c)) {
            return true;
        }
        match c {
            '-' => !self.is_blank_at(1),
            '?' | ':' => self.flow_level == 0 && !self.is_blankz_at(1),
            _ => false,
        }
    }

    fn scan_to_next_token(&mut self) {
        loop {
            while let Some(c) = self.at(0) {
                let skippable =
                    c == ' ' || (c == '\t' && (self.flow_level > 0 || !self.simple_key_allowed));
                if !skippable {
                    break;
                }
                self.advance();
            }

            if self.at(0) == Some('#') {
                if !self.config.skip_comments {
                    return;
                }
                while !self.is_breakz_at(0) {
                    self.advance();
                }
            }

            if !self.is_break_at(0) {
                return;
            }

            self.skip_break();
            if self.flow_level == 0 {
                self.simple_key_allowed = true;
            }
        }
    }

    // ---- indentation -------------------------------------------------------------------------

    fn roll_indent(&mut self, column: usize, number: Option<usize>, kind: TokenKind, mark: Mark) {
        if self.flow_level > 0 || self.indent >= column as isize {
            return;
        }

        self.indents.push(self.indent);
        self.indent = column as isize;

        let token = Token::new(kind, mark, mark);
        match number {
            Some(number) => {
                let at = number.saturating_sub(self.tokens_parsed).min(self.tokens.len());
                self.tokens.insert(at, token);
            }
            None => self.tokens.push_back(token),
        }
    }

    fn unroll_indent(&mut self, column: isize) {
        if self.flow_level > 0 {
            return;
        }

        while self.indent > column {
            let mark = self.mark();
            self.tokens
                .push_back(Token::new(TokenKind::BlockEnd, mark, mark));
            self.indent = self.indents.pop().unwrap_or(-1);
        }
    }

    // ---- simple keys -------------------------------------------------------------------------

    fn save_simple_key(&mut self) {
        if !self.simple_key_allowed {
            return;
        }

        let key = SimpleKey {
            possible: true,
            token_number: self.tokens_parsed + self.tokens.len(),
            mark: self.mark(),
        };
        if let Some(last) = self.simple_keys.last_mut() {
            *last = key;
        }
    }

    fn remove_simple_key(&mut self) {
        if let Some(last) = self.simple_keys.last_mut() {
            last.possible = false;
        }
    }

    /// Simple keys are limited to one line and [`MAX_SIMPLE_KEY_LENGTH`] characters.
    fn stale_simple_keys(&mut self) {
        let line = self.line + 1;
        let pos = self.pos;
        for key in &mut self.simple_keys {
            if key.possible
                && (key.mark.line < line || key.mark.index + MAX_SIMPLE_KEY_LENGTH < pos)
            {
                key.possible = false;
            }
        }
    }

    fn increase_flow_level(&mut self) {
        self.simple_keys.push(SimpleKey::new(self.mark()));
        self.flow_level += 1;
    }

    fn decrease_flow_level(&mut self) {
        if self.flow_level > 0 {
            self.flow_level -= 1;
            self.simple_keys.pop();
        }
    }

    // ---- structural tokens -------------------------------------------------------------------

    fn fetch_stream_start(&mut self) {
        let mark = self.mark();
        self.indent = -1;
        self.stream_start_produced = true;
        self.simple_key_allowed = true;
        self.simple_keys.push(SimpleKey::new(mark));
        self.tokens
            .push_back(Token::new(TokenKind::StreamStart, mark, mark));
    }

    fn fetch_stream_end(&mut self) {
        self.unroll_indent(-1);
        for key in &mut self.simple_keys {
            key.possible = false;
        }
        self.simple_key_allowed = false;

        let mark = self.mark();
        self.tokens
            .push_back(Token::new(TokenKind::StreamEnd, mark, mark));
        self.stream_end_fetched = true;
    }

    fn fetch_document_indicator(&mut self, kind: TokenKind) {
        self.unroll_indent(-1);
        self.remove_simple_key();
        self.simple_key_allowed = false;

        let start = self.mark();
        for _ in 0..3 {
            self.advance();
        }
        self.tokens.push_back(Token::new(kind, start, self.mark()));
    }

    fn fetch_flow_collection_start(&mut self, kind: TokenKind) {
        self.save_simple_key();
        self.increase_flow_level();
        self.simple_key_allowed = true;
        self.push_single_char_token(kind);
    }

    fn fetch_flow_collection_end(&mut self, kind: TokenKind) {
        self.remove_simple_key();
        self.decrease_flow_level();
        self.simple_key_allowed = false;
        self.push_single_char_token(kind);
    }

    fn fetch_flow_entry(&mut self) {
        self.remove_simple_key();
        self.simple_key_allowed = true;
        self.push_single_char_token(TokenKind::FlowEntry);
    }

    fn fetch_block_entry(&mut self) -> Result<(), ScanError> {
        if self.flow_level == 0 {
            if !self.simple_key_allowed {
                let start = self.mark();
                return Err(self.error_from(
                    start,
                    "block sequence entries are not allowed in this context",
                ));
            }
            let mark = self.mark();
            self.roll_indent(self.col, None, TokenKind::BlockSequenceStart, mark);
        }

        self.remove_simple_key();
        self.simple_key_allowed = true;
        self.push_single_char_token(TokenKind::BlockEntry);
        Ok(())
    }

    fn fetch_key(&mut self) -> Result<(), ScanError> {
        if self.flow_level == 0 {
            if !self.simple_key_allowed {
                let start = self.mark();
                return Err(self.error_from(start, "mapping keys are not allowed in this context"));
            }
            let mark = self.mark();
            self.roll_indent(self.col, None, TokenKind::BlockMappingStart, mark);
        }

        self.remove_simple_key();
        self.simple_key_allowed = self.flow_level == 0;
        self.push_single_char_token(TokenKind::Key);
        Ok(())
    }

    fn fetch_value(&mut self) -> Result<(), ScanError> {
        let simple_key = self.simple_keys.last().copied();

        match simple_key {
            Some(key) if key.possible => {
                let at = key
                    .token_number
                    .saturating_sub(self.tokens_parsed)
                    .min(self.tokens.len());
                self.tokens
                    .insert(at, Token::new(TokenKind::Key, key.mark, key.mark));
                self.roll_indent(
                    key.mark.column - 1,
                    Some(key.token_number),
                    TokenKind::BlockMappingStart,
                    key.mark,
                );
                self.remove_simple_key();
            }
            _ => {
                if self.flow_level == 0 {
                    if !self.simple_key_allowed {
                        let start = self.mark();
                        return Err(self.error_from(
                            start,
                            "mapping values are not allowed in this context",
                        ));
                    }
                    let mark = self.mark();
                    self.roll_indent(self.col, None, TokenKind::BlockMappingStart, mark);
                }
            }
        }

        self.simple_key_allowed = self.flow_level == 0;
        self.push_single_char_token(TokenKind::Value);
        Ok(())
    }

    fn fetch_comment(&mut self) {
        let is_inline = self.comment_is_inline();
        let start = self.mark();
        self.advance();

        let mut text = String::new();
        while let Some(c) = self.at(0) {
            if is_break(c) {
                break;
            }
            text.push(c);
            self.advance();
        }

        self.tokens.push_back(Token::new(
            TokenKind::Comment { text, is_inline },
            start,
            self.mark(),
        ));
    }

    fn comment_is_inline(&self) -> bool {
        self.chars[..self.pos]
            .iter()
            .rev()
            .find(|c| !is_blank(**c))
            .is_some_and(|c| !is_break(*c))
    }

    fn push_single_char_token(&mut self, kind: TokenKind) {
        let start = self.mark();
        self.advance();
        self.tokens.push_back(Token::new(kind, start, self.mark()));
    }

    // ---- errors ------------------------------------------------------------------------------

    /// Build an error spanning `start` up to the current position, consuming one character
    /// first when nothing has been consumed yet so that scanning always makes progress.
    fn error_from(&mut self, start: Mark, message: &str) -> ScanError {
        if self.pos == start.index && self.at(0).is_some() {
            self.skip();
        }
        ScanError::new(start, self.mark(), message)
    }

    /// Build an error spanning `start` up to the end of the current line.
    fn error_to_line_end(&mut self, start: Mark, message: &str) -> ScanError {
        while !self.is_breakz_at(0) {
            self.advance();
        }
        self.error_from(start, message)
    }

    // ---- reader ------------------------------------------------------------------------------

    fn at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn is_blank_at(&self, offset: usize) -> bool {
        self.at(offset).is_some_and(is_blank)
    }

    fn is_break_at(&self, offset: usize) -> bool {
        self.at(offset).is_some_and(is_break)
    }

    fn is_breakz_at(&self, offset: usize) -> bool {
        self.at(offset).is_none_or(is_break)
    }

    fn is_blankz_at(&self, offset: usize) -> bool {
        self.at(offset).is_none_or(|c| is_blank(c) || is_break(c))
    }

    /// `---` or `...` at absolute position `index`, followed by a blank, break or end of input.
    fn is_document_indicator_at(&self, index: usize, indicator: &str) -> bool {
        let mut chars = indicator.chars();
        let matches = (0..3).all(|i| self.chars.get(index + i).copied() == chars.next());
        matches
            && self
                .chars
                .get(index + 3)
                .is_none_or(|c| is_blank(*c) || is_break(*c))
    }

    /// Consume one non-break character.
    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
            self.col += 1;
        }
    }

    /// Consume one line break (`\n`, `\r` or `\r\n`).
    fn skip_break(&mut self) {
        match (self.at(0), self.at(1)) {
            (Some('\r'), Some('\n')) => self.pos += 2,
            (Some(c), _) if is_break(c) => self.pos += 1,
            _ => return,
        }
        self.line += 1;
        self.col = 0;
    }

    /// Consume one character of any kind.
    fn skip(&mut self) {
        if self.is_break_at(0) {
            self.skip_break();
        } else {
            self.advance();
        }
    }

    /// Consume a line break, appending its normalized form to `out`.
    fn read_break(&mut self, out: &mut String) {
        if self.is_break_at(0) {
            self.skip_break();
            out.push('\n');
        }
    }
}

impl Iterator for Scanner {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ScalarStyle;

    fn kinds(text: &str) -> Vec<&'static str> {
        Scanner::new(text)
            .map(|result| match result {
                Ok(token) => token.kind.name(),
                Err(_) => "Error",
            })
            .collect()
    }

    #[test]
    fn test_empty_input_is_start_and_end() {
        assert_eq!(kinds(""), vec!["StreamStart", "StreamEnd"]);
    }

    #[test]
    fn test_simple_key_inserts_mapping_start_before_key() {
        assert_eq!(
            kinds("a: 1"),
            vec![
                "StreamStart",
                "BlockMappingStart",
                "Key",
                "Scalar",
                "Value",
                "Scalar",
                "BlockEnd",
                "StreamEnd",
            ]
        );
    }

    #[test]
    fn test_nested_sequence_rolls_and_unrolls_indent() {
        assert_eq!(
            kinds("x:\n  - a\n"),
            vec![
                "StreamStart",
                "BlockMappingStart",
                "Key",
                "Scalar",
                "Value",
                "BlockSequenceStart",
                "BlockEntry",
                "Scalar",
                "BlockEnd",
                "BlockEnd",
                "StreamEnd",
            ]
        );
    }

    #[test]
    fn test_flow_collections() {
        assert_eq!(
            kinds("[a, {b: c}]"),
            vec![
                "StreamStart",
                "FlowSequenceStart",
                "Scalar",
                "FlowEntry",
                "FlowMappingStart",
                "Key",
                "Scalar",
                "Value",
                "Scalar",
                "FlowMappingEnd",
                "FlowSequenceEnd",
                "StreamEnd",
            ]
        );
    }

    #[test]
    fn test_comments_are_tokens_unless_skipped() {
        assert_eq!(
            kinds("# top\na # trailing\n"),
            vec!["StreamStart", "Comment", "Scalar", "Comment", "StreamEnd"]
        );

        let skipped: Vec<_> =
            Scanner::with_config("# top\na\n", ScannerConfig::default().with_skip_comments(true))
                .filter_map(Result::ok)
                .map(|token| token.kind.name())
                .collect();
        assert_eq!(skipped, vec!["StreamStart", "Scalar", "StreamEnd"]);
    }

    #[test]
    fn test_comment_inline_flag() {
        let comments: Vec<bool> = Scanner::new("# own line\nkey: v # trailing\n")
            .filter_map(Result::ok)
            .filter_map(|token| match token.kind {
                TokenKind::Comment { is_inline, .. } => Some(is_inline),
                _ => None,
            })
            .collect();
        assert_eq!(comments, vec![false, true]);
    }

    #[test]
    fn test_unknown_character_is_skipped() {
        let mut scanner = Scanner::new("@a");
        assert_eq!(
            scanner.next_token().unwrap().unwrap().kind,
            TokenKind::StreamStart
        );

        let error = scanner.next_token().unwrap_err();
        assert_eq!((error.start.index, error.end.index), (0, 1));

        let scalar = scanner.next_token().unwrap().unwrap();
        assert_eq!(
            scalar.kind,
            TokenKind::Scalar {
                value: "a".into(),
                style: ScalarStyle::Plain
            }
        );
        assert_eq!(scalar.start.index, 1);
    }

    #[test]
    fn test_queued_tokens_are_delivered_before_the_error() {
        // A quoted key spanning two lines is no longer a simple key when `:` arrives.
        let results: Vec<_> = Scanner::new("\"a\nb\": c\n").collect();

        let error_at = results
            .iter()
            .position(Result::is_err)
            .expect("an error is reported");
        let Err(error) = &results[error_at] else {
            unreachable!()
        };
        assert_eq!(error.message, "mapping values are not allowed in this context");
        assert_eq!((error.start.index, error.end.index), (5, 6));
        assert!(matches!(
            &results[error_at - 1],
            Ok(Token {
                kind: TokenKind::Scalar { .. },
                ..
            })
        ));

        let mut last_end = 0;
        for result in &results {
            let (start, end) = match result {
                Ok(token) => (token.start.index, token.end.index),
                Err(error) => (error.start.index, error.end.index),
            };
            assert!(start >= last_end, "out of order: {results:?}");
            last_end = end;
        }
    }

    #[test]
    fn test_document_markers() {
        assert_eq!(
            kinds("---\na\n...\n"),
            vec![
                "StreamStart",
                "DocumentStart",
                "Scalar",
                "DocumentEnd",
                "StreamEnd"
            ]
        );
    }

    #[test]
    fn test_marks_are_one_based() {
        let tokens: Vec<Token> = Scanner::new("a:\n  b").filter_map(Result::ok).collect();
        let b = tokens
            .iter()
            .find(|token| {
                matches!(&token.kind, TokenKind::Scalar { value, .. } if value == "b")
            })
            .unwrap();
        assert_eq!((b.start.index, b.start.line, b.start.column), (5, 2, 3));
        assert_eq!((b.end.index, b.end.line, b.end.column), (6, 2, 4));
    }

    #[test]
    fn test_crlf_counts_as_one_line_break() {
        let tokens: Vec<Token> = Scanner::new("a\r\nb: c\r\n").filter_map(Result::ok).collect();
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::StreamEnd);
        assert_eq!(last.start.line, 3);
        assert_eq!(last.start.column, 1);
    }
}

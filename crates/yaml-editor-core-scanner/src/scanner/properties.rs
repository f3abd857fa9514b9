//! Node properties (anchors, aliases and tags) and directives.

use super::Scanner;
use super::chars::{is_blank, is_flow_indicator, is_word_char};
use crate::error::ScanError;
use crate::mark::Mark;
use crate::token::{Token, TokenKind};

impl Scanner {
    pub(super) fn fetch_anchor(&mut self, alias: bool) -> Result<(), ScanError> {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let start = self.mark();
        self.advance();
        let name = self.read_word();

        let terminated = self.is_blankz_at(0)
            || self
                .at(0)
                .is_some_and(|c| matches!(c, '?' | ':' | ',' | ']' | '}' | '%' | '@' | '`'));
        if name.is_empty() || !terminated {
            let message = if alias {
                "did not find expected alphabetic or numeric character while scanning an alias"
            } else {
                "did not find expected alphabetic or numeric character while scanning an anchor"
            };
            return Err(self.error_from(start, message));
        }

        let kind = if alias {
            TokenKind::AnchorAlias(name)
        } else {
            TokenKind::Anchor(name)
        };
        self.tokens.push_back(Token::new(kind, start, self.mark()));
        Ok(())
    }

    pub(super) fn fetch_tag(&mut self) -> Result<(), ScanError> {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let start = self.mark();
        let (handle, suffix) = if self.at(1) == Some('<') {
            self.advance();
            self.advance();
            let suffix = self.read_uri();
            if self.at(0) != Some('>') || suffix.is_empty() {
                return Err(self.error_from(
                    start,
                    "did not find the expected '>' while scanning a tag",
                ));
            }
            self.advance();
            (String::new(), suffix)
        } else {
            let handle = self.read_tag_handle();
            if handle.len() > 1 && handle.ends_with('!') {
                let suffix = self.read_uri();
                (handle, suffix)
            } else {
                // `!local`: the word after `!` belongs to the suffix.
                let mut suffix = handle[1..].to_string();
                suffix.push_str(&self.read_uri());
                if suffix.is_empty() {
                    (String::new(), "!".to_string())
                } else {
                    ("!".to_string(), suffix)
                }
            }
        };

        let terminated =
            self.is_blankz_at(0) || (self.flow_level > 0 && self.at(0) == Some(','));
        if !terminated {
            return Err(self.error_from(
                start,
                "did not find expected whitespace or line break while scanning a tag",
            ));
        }

        self.tokens
            .push_back(Token::new(TokenKind::Tag { handle, suffix }, start, self.mark()));
        Ok(())
    }

    pub(super) fn fetch_directive(&mut self) -> Result<(), ScanError> {
        self.unroll_indent(-1);
        self.remove_simple_key();
        self.simple_key_allowed = false;

        let start = self.mark();
        self.advance();
        let name = self.read_word();

        if name.is_empty() {
            return Err(self.error_to_line_end(
                start,
                "could not find expected directive name while scanning a directive",
            ));
        }
        if !self.is_blankz_at(0) {
            return Err(self.error_to_line_end(
                start,
                "found unexpected non-alphabetical character while scanning a directive",
            ));
        }

        let kind = match name.as_str() {
            "YAML" => {
                self.skip_blanks();
                let major = self.read_version_number(start)?;
                if self.at(0) != Some('.') {
                    return Err(self.error_to_line_end(
                        start,
                        "did not find expected digit or '.' character while scanning a %YAML directive",
                    ));
                }
                self.advance();
                let minor = self.read_version_number(start)?;
                TokenKind::VersionDirective { major, minor }
            }
            "TAG" => {
                self.skip_blanks();
                let handle = self.read_tag_handle();
                if !handle.ends_with('!') {
                    return Err(self.error_to_line_end(
                        start,
                        "did not find expected '!' while scanning a %TAG directive",
                    ));
                }
                if !self.is_blank_at(0) {
                    return Err(self.error_to_line_end(
                        start,
                        "did not find expected whitespace while scanning a %TAG directive",
                    ));
                }
                self.skip_blanks();
                let prefix = self.read_uri();
                if prefix.is_empty() {
                    return Err(self.error_to_line_end(
                        start,
                        "did not find expected tag URI while scanning a %TAG directive",
                    ));
                }
                TokenKind::TagDirective { handle, prefix }
            }
            _ => return Err(self.error_to_line_end(start, "found unknown directive name")),
        };

        let end = self.mark();
        self.skip_blanks();
        if self.at(0) != Some('#') && !self.is_breakz_at(0) {
            return Err(self.error_to_line_end(
                start,
                "did not find expected comment or line break while scanning a directive",
            ));
        }

        self.tokens.push_back(Token::new(kind, start, end));
        Ok(())
    }

    fn read_version_number(&mut self, start: Mark) -> Result<u32, ScanError> {
        let mut value = 0u32;
        let mut length = 0;
        while let Some(digit) = self.at(0).and_then(|c| c.to_digit(10)) {
            length += 1;
            if length > 9 {
                return Err(self.error_to_line_end(
                    start,
                    "found extremely long version number while scanning a %YAML directive",
                ));
            }
            value = value * 10 + digit;
            self.advance();
        }
        if length == 0 {
            return Err(self.error_to_line_end(
                start,
                "did not find expected version number while scanning a %YAML directive",
            ));
        }
        Ok(value)
    }

    /// `!`, `!!`, `!word!` or `!word` (the last form is completed by the caller).
    fn read_tag_handle(&mut self) -> String {
        let mut handle = String::new();
        if self.at(0) != Some('!') {
            return handle;
        }
        handle.push('!');
        self.advance();
        handle.push_str(&self.read_word());
        if self.at(0) == Some('!') {
            handle.push('!');
            self.advance();
        }
        handle
    }

    fn read_uri(&mut self) -> String {
        let mut uri = String::new();
        while let Some(c) = self.at(0) {
            let allowed = is_word_char(c)
                || matches!(
                    c,
                    ';' | '/'
                        | '?'
                        | ':'
                        | '@'
                        | '&'
                        | '='
                        | '+'
                        | '$'
                        | '.'
                        | '!'
                        | '~'
                        | '*'
                        | '\''
                        | '('
                        | ')'
                        | '%'
                )
                || (self.flow_level == 0 && is_flow_indicator(c));
            if !allowed {
                break;
            }
            uri.push(c);
            self.advance();
        }
        uri
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.at(0).filter(|c| is_word_char(*c)) {
            word.push(c);
            self.advance();
        }
        word
    }

    fn skip_blanks(&mut self) {
        while self.at(0).is_some_and(is_blank) {
            self.advance();
        }
    }
}

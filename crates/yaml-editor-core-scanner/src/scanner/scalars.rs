//! Plain, quoted and block scalars.

use super::Scanner;
use super::chars::{is_blank, is_break, is_flow_indicator};
use crate::error::ScanError;
use crate::mark::Mark;
use crate::token::{ScalarStyle, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomping {
    Strip,
    Clip,
    Keep,
}

impl Scanner {
    pub(super) fn fetch_plain_scalar(&mut self) {
        self.save_simple_key();
        self.simple_key_allowed = false;
        let token = self.scan_plain_scalar();
        self.tokens.push_back(token);
    }

    pub(super) fn fetch_flow_scalar(&mut self, single: bool) -> Result<(), ScanError> {
        self.save_simple_key();
        self.simple_key_allowed = false;
        let token = self.scan_flow_scalar(single)?;
        self.tokens.push_back(token);
        Ok(())
    }

    pub(super) fn fetch_block_scalar(&mut self, literal: bool) -> Result<(), ScanError> {
        self.remove_simple_key();
        self.simple_key_allowed = true;
        let token = self.scan_block_scalar(literal)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn scan_plain_scalar(&mut self) -> Token {
        let start = self.mark();
        let mut end = start;
        let indent = self.indent + 1;

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks = false;

        loop {
            if self.col == 0
                && (self.is_document_indicator_at(self.pos, "---")
                    || self.is_document_indicator_at(self.pos, "..."))
            {
                break;
            }
            if self.at(0) == Some('#') {
                break;
            }

            while !self.is_blankz_at(0) {
                let Some(c) = self.at(0) else { break };

                let ends_scalar = if c == ':' {
                    self.is_blankz_at(1)
                        || (self.flow_level > 0 && self.at(1).is_some_and(is_flow_indicator))
                } else {
                    self.flow_level > 0 && is_flow_indicator(c)
                };
                if ends_scalar {
                    break;
                }

                if leading_blanks || !whitespaces.is_empty() {
                    if leading_blanks {
                        if trailing_breaks.is_empty() {
                            value.push(' ');
                        } else {
                            value.push_str(&trailing_breaks);
                            trailing_breaks.clear();
                        }
                        leading_break.clear();
                        leading_blanks = false;
                    } else {
                        value.push_str(&whitespaces);
                        whitespaces.clear();
                    }
                }

                value.push(c);
                self.advance();
                end = self.mark();
            }

            if !(self.is_blank_at(0) || self.is_break_at(0)) {
                break;
            }

            while let Some(c) = self.at(0) {
                if is_blank(c) {
                    if !leading_blanks {
                        whitespaces.push(c);
                    }
                    self.advance();
                } else if is_break(c) {
                    if leading_blanks {
                        self.read_break(&mut trailing_breaks);
                    } else {
                        whitespaces.clear();
                        self.read_break(&mut leading_break);
                        leading_blanks = true;
                    }
                } else {
                    break;
                }
            }

            if self.flow_level == 0 && (self.col as isize) < indent {
                break;
            }
        }

        if leading_blanks {
            self.simple_key_allowed = true;
        }

        Token::new(
            TokenKind::Scalar {
                value,
                style: ScalarStyle::Plain,
            },
            start,
            end,
        )
    }

    fn scan_flow_scalar(&mut self, single: bool) -> Result<Token, ScanError> {
        let start = self.mark();
        let quote = if single { '\'' } else { '"' };
        self.advance();

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut bad_escape: Option<&'static str> = None;

        loop {
            if self.col == 0
                && (self.is_document_indicator_at(self.pos, "---")
                    || self.is_document_indicator_at(self.pos, "..."))
            {
                return Err(ScanError::new(
                    start,
                    self.mark(),
                    "found unexpected document indicator while scanning a quoted scalar",
                ));
            }
            if self.at(0).is_none() {
                return Err(ScanError::new(
                    start,
                    self.mark(),
                    "found unexpected end of stream while scanning a quoted scalar",
                ));
            }

            let mut leading_blanks = false;

            while let Some(c) = self.at(0) {
                if is_blank(c) || is_break(c) {
                    break;
                }

                if single && c == '\'' && self.at(1) == Some('\'') {
                    value.push('\'');
                    self.advance();
                    self.advance();
                } else if c == quote {
                    break;
                } else if !single && c == '\\' && self.is_break_at(1) {
                    self.advance();
                    self.skip_break();
                    leading_blanks = true;
                    break;
                } else if !single && c == '\\' {
                    if let Err(message) = self.read_escape(&mut value) {
                        bad_escape.get_or_insert(message);
                    }
                } else {
                    value.push(c);
                    self.advance();
                }
            }

            if self.at(0) == Some(quote) {
                self.advance();
                break;
            }

            while let Some(c) = self.at(0) {
                if is_blank(c) {
                    if !leading_blanks {
                        whitespaces.push(c);
                    }
                    self.advance();
                } else if is_break(c) {
                    if let Some(message) = self.quoted_continuation_error() {
                        return Err(ScanError::new(start, self.mark(), message));
                    }
                    if leading_blanks {
                        self.read_break(&mut trailing_breaks);
                    } else {
                        whitespaces.clear();
                        self.read_break(&mut leading_break);
                        leading_blanks = true;
                    }
                } else {
                    break;
                }
            }

            if leading_blanks {
                if leading_break.is_empty() || !trailing_breaks.is_empty() {
                    value.push_str(&trailing_breaks);
                } else {
                    value.push(' ');
                }
                leading_break.clear();
                trailing_breaks.clear();
            } else {
                value.push_str(&whitespaces);
                whitespaces.clear();
            }
        }

        let end = self.mark();
        if let Some(message) = bad_escape {
            return Err(ScanError::new(start, end, message));
        }

        let style = if single {
            ScalarStyle::SingleQuoted
        } else {
            ScalarStyle::DoubleQuoted
        };
        Ok(Token::new(TokenKind::Scalar { value, style }, start, end))
    }

    /// Decide, before consuming a line break inside a quoted scalar, whether the scalar can
    /// continue on the next non-empty line.
    fn quoted_continuation_error(&self) -> Option<&'static str> {
        let mut index = self.pos;
        let mut col = self.col;
        loop {
            match self.chars.get(index) {
                None => {
                    return Some("found unexpected end of stream while scanning a quoted scalar");
                }
                Some(c) if is_break(*c) => {
                    index += 1;
                    col = 0;
                }
                Some(c) if is_blank(*c) => {
                    index += 1;
                    col += 1;
                }
                Some(_) => break,
            }
        }

        if col == 0
            && (self.is_document_indicator_at(index, "---")
                || self.is_document_indicator_at(index, "..."))
        {
            return Some("found unexpected document indicator while scanning a quoted scalar");
        }
        if self.flow_level == 0 && (col as isize) <= self.indent {
            return Some("found unterminated quoted scalar");
        }
        None
    }

    /// Read one `\` escape sequence. On failure the sequence is skipped.
    fn read_escape(&mut self, value: &mut String) -> Result<(), &'static str> {
        self.advance();
        let Some(code) = self.at(0) else {
            return Err("found unknown escape character while parsing a quoted scalar");
        };

        let simple = match code {
            '0' => Some('\0'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            't' | '\t' => Some('\t'),
            'n' => Some('\n'),
            'v' => Some('\x0B'),
            'f' => Some('\x0C'),
            'r' => Some('\r'),
            'e' => Some('\x1B'),
            ' ' => Some(' '),
            '"' => Some('"'),
            '/' => Some('/'),
            '\\' => Some('\\'),
            'N' => Some('\u{85}'),
            '_' => Some('\u{A0}'),
            'L' => Some('\u{2028}'),
            'P' => Some('\u{2029}'),
            _ => None,
        };
        if let Some(c) = simple {
            value.push(c);
            self.advance();
            return Ok(());
        }

        let width = match code {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => {
                if !is_break(code) {
                    self.advance();
                }
                return Err("found unknown escape character while parsing a quoted scalar");
            }
        };
        self.advance();

        let mut code_point = 0u32;
        for _ in 0..width {
            let Some(digit) = self.at(0).and_then(|c| c.to_digit(16)) else {
                return Err("did not find expected hexadecimal number while parsing a quoted scalar");
            };
            code_point = code_point * 16 + digit;
            self.advance();
        }

        match char::from_u32(code_point) {
            Some(c) => {
                value.push(c);
                Ok(())
            }
            None => Err("found invalid Unicode character escape code while parsing a quoted scalar"),
        }
    }

    fn scan_block_scalar(&mut self, literal: bool) -> Result<Token, ScanError> {
        let start = self.mark();
        self.advance();

        let mut chomping = Chomping::Clip;
        let mut increment = 0usize;

        let chomping_of = |c: char| match c {
            '+' => Some(Chomping::Keep),
            '-' => Some(Chomping::Strip),
            _ => None,
        };

        if let Some(chomp) = self.at(0).and_then(chomping_of) {
            chomping = chomp;
            self.advance();
            if let Some(digit) = self.at(0).and_then(|c| c.to_digit(10)) {
                if digit == 0 {
                    return Err(self.error_to_line_end(
                        start,
                        "found an indentation indicator equal to 0 while scanning a block scalar",
                    ));
                }
                increment = digit as usize;
                self.advance();
            }
        } else if let Some(digit) = self.at(0).and_then(|c| c.to_digit(10)) {
            if digit == 0 {
                return Err(self.error_to_line_end(
                    start,
                    "found an indentation indicator equal to 0 while scanning a block scalar",
                ));
            }
            increment = digit as usize;
            self.advance();
            if let Some(chomp) = self.at(0).and_then(chomping_of) {
                chomping = chomp;
                self.advance();
            }
        }

        while self.is_blank_at(0) {
            self.advance();
        }
        if self.at(0) == Some('#') {
            while !self.is_breakz_at(0) {
                self.advance();
            }
        }
        if !self.is_breakz_at(0) {
            return Err(self.error_to_line_end(
                start,
                "did not find expected comment or line break while scanning a block scalar",
            ));
        }
        self.skip_break();

        let mut end = self.mark();
        let mut indent = if increment == 0 {
            0
        } else if self.indent >= 0 {
            self.indent as usize + increment
        } else {
            increment
        };

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();

        self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, &mut end);

        let mut leading_blank = false;
        while self.col == indent && self.at(0).is_some() {
            let trailing_blank = self.is_blank_at(0);

            if !literal && !leading_break.is_empty() && !leading_blank && !trailing_blank {
                if trailing_breaks.is_empty() {
                    value.push(' ');
                }
                leading_break.clear();
            } else {
                value.push_str(&leading_break);
                leading_break.clear();
            }
            value.push_str(&trailing_breaks);
            trailing_breaks.clear();

            leading_blank = self.is_blank_at(0);

            while let Some(c) = self.at(0) {
                if is_break(c) {
                    break;
                }
                value.push(c);
                self.advance();
            }

            self.read_break(&mut leading_break);
            self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, &mut end);
        }

        if chomping != Chomping::Strip {
            value.push_str(&leading_break);
        }
        if chomping == Chomping::Keep {
            value.push_str(&trailing_breaks);
        }

        let style = if literal {
            ScalarStyle::Literal
        } else {
            ScalarStyle::Folded
        };
        Ok(Token::new(TokenKind::Scalar { value, style }, start, end))
    }

    /// Skip indentation and empty lines, resolving the automatic indentation on first use.
    ///
    /// `end` tracks the start of the line after the last consumed line break.
    fn scan_block_scalar_breaks(
        &mut self,
        indent: &mut usize,
        breaks: &mut String,
        end: &mut Mark,
    ) {
        let mut max_indent = 0;
        *end = self.mark();

        loop {
            while (*indent == 0 || self.col < *indent) && self.at(0) == Some(' ') {
                self.advance();
            }
            max_indent = max_indent.max(self.col);

            if !self.is_break_at(0) {
                break;
            }
            self.read_break(breaks);
            *end = self.mark();
        }

        if *indent == 0 {
            *indent = max_indent.max((self.indent + 1) as usize).max(1);
        }
    }
}

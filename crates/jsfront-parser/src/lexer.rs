//! Lexer (tokenizer) for ECMAScript.
//!
//! The lexer converts source text into a stream of tokens.
//! It's called on-demand by the parser, not upfront, which enables
//! context-sensitive tokenization (e.g., regex vs division).
//!
//! Whether `/` starts a regex is first guessed from the previous token. When
//! the guess says division but the parser is looking for an operand, the
//! parser calls [`Lexer::rescan_as_regex`]. Template continuations after a
//! `}` are requested the same way through [`Lexer::scan_template_continuation`].

use std::rc::Rc;

use unicode_xid::UnicodeXID;

use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::options::ParserOptions;
use crate::span::{LineIndex, Marker, Span};
use crate::token::{keyword_from_str, TemplateChunk, Token, TokenKind};

/// An escape sequence that could not be decoded: offset and message.
type EscapeError = (usize, &'static str);

/// The lexer state.
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    /// Source code as bytes (for fast indexing).
    bytes: &'a [u8],
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
    /// Whether the previous token ended an operand, making `/` division.
    division_allowed: bool,
    /// The previous token was `.` or `?.`, so a keyword is a property name.
    after_dot: bool,
    /// No token has been produced yet.
    at_start: bool,
    /// `<!--` and `-->` comments (scripts only).
    html_comments: bool,
    lines: Rc<LineIndex<'a>>,

    // Flags collected while scanning the current token.
    newline_before: bool,
    escaped: bool,
    legacy_octal: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for script code with default options.
    pub fn new(source: &'a str) -> Self {
        Self::for_options(source, &ParserOptions::default())
    }

    /// Create a lexer honoring the source type and hashbang setting.
    pub fn for_options(source: &'a str, options: &ParserOptions) -> Self {
        let mut lexer = Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            token_start: 0,
            division_allowed: false,
            after_dot: false,
            at_start: true,
            html_comments: !options.is_module(),
            lines: Rc::new(LineIndex::new(source)),
            newline_before: false,
            escaped: false,
            legacy_octal: false,
        };
        if options.allow_hashbang && source.starts_with("#!") {
            lexer.skip_line_comment(2);
        }
        lexer
    }

    /// Get the current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Line/column marker for a byte offset.
    pub fn marker(&self, offset: u32) -> Marker {
        self.lines.marker(offset)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.newline_before = false;
        self.escaped = false;
        self.legacy_octal = false;
        self.skip_whitespace_and_comments()?;
        self.token_start = self.pos;

        if self.is_eof() {
            return Ok(self.finish_token(TokenKind::Eof));
        }

        let ch = self.current();
        let kind = match ch {
            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' => self.scan_identifier()?,

            // Numbers
            b'0'..=b'9' => self.scan_number()?,

            // Strings
            b'"' | b'\'' => self.scan_string(ch)?,

            // Template literals
            b'`' => {
                self.advance();
                self.scan_template_chunk(true)?
            }

            b'#' => self.scan_private_name()?,

            // Punctuation and operators
            b'(' => { self.advance(); TokenKind::LParen }
            b')' => { self.advance(); TokenKind::RParen }
            b'{' => { self.advance(); TokenKind::LBrace }
            b'}' => { self.advance(); TokenKind::RBrace }
            b'[' => { self.advance(); TokenKind::LBracket }
            b']' => { self.advance(); TokenKind::RBracket }
            b';' => { self.advance(); TokenKind::Semicolon }
            b',' => { self.advance(); TokenKind::Comma }
            b':' => { self.advance(); TokenKind::Colon }
            b'~' => { self.advance(); TokenKind::Tilde }

            b'.' => self.scan_dot()?,
            b'?' => self.scan_question(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_star(),
            b'/' => self.scan_slash()?,
            b'%' => self.scan_percent(),
            b'=' => self.scan_equals(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),
            b'&' => self.scan_ampersand(),
            b'|' => self.scan_pipe(),
            b'^' => self.scan_caret(),

            0x80..=0xFF if is_id_start(self.current_char()) => self.scan_identifier()?,

            _ => {
                let c = self.current_char();
                return Err(self.error_at(format!("Unexpected character '{c}'"), self.pos));
            }
        };

        Ok(self.finish_token(kind))
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&self) -> ParseResult<Token> {
        self.clone().next_token()
    }

    /// Re-read a `/` or `/=` token as the start of a regular expression.
    pub fn rescan_as_regex(&mut self, slash: &Token) -> ParseResult<Token> {
        self.pos = slash.span.start as usize;
        self.token_start = self.pos;
        self.escaped = false;
        self.legacy_octal = false;
        self.newline_before = slash.had_newline_before;
        let kind = self.scan_regex()?;
        Ok(self.finish_token(kind))
    }

    /// Scan template middle or tail; `rbrace` is the `}` closing a substitution.
    pub fn scan_template_continuation(&mut self, rbrace: &Token) -> ParseResult<Token> {
        self.pos = rbrace.span.end as usize;
        self.token_start = rbrace.span.start as usize;
        self.escaped = false;
        self.legacy_octal = false;
        self.newline_before = rbrace.had_newline_before;
        let kind = self.scan_template_chunk(false)?;
        Ok(self.finish_token(kind))
    }

    // === Helper methods ===

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn current_char(&self) -> char {
        self.source
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    fn peek_char(&self) -> u8 {
        self.bytes.get(self.pos + 1).copied().unwrap_or(0)
    }

    fn peek_char_n(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    fn starts_with(&self, text: &str) -> bool {
        self.bytes[self.pos..].starts_with(text.as_bytes())
    }

    /// Length of the line terminator at the current position, if any.
    fn line_terminator_len(&self) -> usize {
        match self.current() {
            b'\n' | b'\r' => 1,
            0xE2 if self.peek_char() == 0x80 && matches!(self.peek_char_n(2), 0xA8 | 0xA9) => 3,
            _ => 0,
        }
    }

    fn finish_token(&mut self, kind: TokenKind) -> Token {
        self.division_allowed = kind.ends_operand() || (self.after_dot && kind.is_keyword());
        self.after_dot = matches!(kind, TokenKind::Dot | TokenKind::QuestionDot);
        self.at_start = false;
        let span = Span::between(
            self.lines.marker(self.token_start as u32),
            self.lines.marker(self.pos as u32),
        );
        Token {
            kind,
            span,
            had_newline_before: self.newline_before,
            escaped: self.escaped,
            legacy_octal: self.legacy_octal,
        }
    }

    fn error_at(&self, message: impl Into<String>, offset: usize) -> ParseError {
        ParseError::new(ErrorKind::Lexical, message, self.lines.marker(offset as u32))
    }

    // === Whitespace and comments ===

    fn skip_whitespace_and_comments(&mut self) -> ParseResult<()> {
        loop {
            match self.current() {
                // Whitespace
                b' ' | b'\t' | 0x0B | 0x0C => self.advance(),
                b'\n' | b'\r' => {
                    self.newline_before = true;
                    self.advance();
                }
                // Comments
                b'/' if self.peek_char() == b'/' => self.skip_line_comment(2),
                b'/' if self.peek_char() == b'*' => self.skip_block_comment()?,
                b'<' if self.html_comments && self.starts_with("<!--") => self.skip_line_comment(4),
                b'-' if self.html_comments
                    && (self.newline_before || self.at_start)
                    && self.starts_with("-->") =>
                {
                    self.skip_line_comment(3)
                }
                0x80..=0xFF => {
                    let c = self.current_char();
                    if c == '\u{2028}' || c == '\u{2029}' {
                        self.newline_before = true;
                    } else if !is_js_whitespace(c) {
                        break;
                    }
                    self.advance_n(c.len_utf8());
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self, prefix: usize) {
        self.advance_n(prefix);
        while !self.is_eof() && self.line_terminator_len() == 0 {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.advance_n(2); // Skip /*
        while !self.is_eof() {
            if self.current() == b'*' && self.peek_char() == b'/' {
                self.advance_n(2);
                return Ok(());
            }
            if self.line_terminator_len() > 0 {
                self.newline_before = true;
            }
            self.advance();
        }
        Err(self.error_at("Unterminated comment", start))
    }

    // === Token scanning ===

    fn scan_identifier(&mut self) -> ParseResult<TokenKind> {
        let word = self.read_word()?;
        // Escaped reserved words stay identifiers; the parser rejects them
        // wherever a keyword would have been required.
        if self.escaped {
            return Ok(TokenKind::Identifier(word));
        }
        Ok(keyword_from_str(&word).unwrap_or(TokenKind::Identifier(word)))
    }

    /// Read an IdentifierName, decoding `\u` escapes.
    fn read_word(&mut self) -> ParseResult<String> {
        let mut word = String::new();
        let mut chunk_start = self.pos;
        let mut first = true;
        loop {
            let b = self.current();
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                self.advance();
            } else if b == b'\\' {
                word.push_str(&self.source[chunk_start..self.pos]);
                let escape_start = self.pos;
                self.advance();
                if self.current() != b'u' {
                    return Err(self.error_at("Expecting Unicode escape sequence \\uXXXX", escape_start));
                }
                self.advance();
                let code = self
                    .read_unicode_escape()
                    .map_err(|(offset, message)| self.error_at(message, offset))?;
                let c = char::from_u32(code)
                    .filter(|&c| if first { is_id_start(c) } else { is_id_continue(c) })
                    .ok_or_else(|| self.error_at("Invalid Unicode escape", escape_start))?;
                word.push(c);
                self.escaped = true;
                chunk_start = self.pos;
            } else if b >= 0x80 {
                let c = self.current_char();
                let valid = if first { is_id_start(c) } else { is_id_continue(c) };
                if !valid {
                    break;
                }
                self.advance_n(c.len_utf8());
            } else {
                break;
            }
            first = false;
        }
        word.push_str(&self.source[chunk_start..self.pos]);
        Ok(word)
    }

    fn scan_private_name(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        self.advance(); // Skip #
        let b = self.current();
        let starts_name = b.is_ascii_alphabetic()
            || b == b'_'
            || b == b'$'
            || b == b'\\'
            || (b >= 0x80 && is_id_start(self.current_char()));
        if !starts_name {
            return Err(self.error_at("Unexpected character '#'", start));
        }
        Ok(TokenKind::PrivateName(self.read_word()?))
    }

    fn scan_number(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;

        if self.current() == b'0' {
            match self.peek_char() | 0x20 {
                b'x' => return self.scan_radix_number(16),
                b'o' => return self.scan_radix_number(8),
                b'b' => return self.scan_radix_number(2),
                _ => {}
            }
            if self.peek_char().is_ascii_digit() || self.peek_char() == b'_' {
                return self.scan_legacy_octal_like();
            }
        }

        let mut int_digits = String::new();
        if self.current() != b'.' {
            self.read_digits(10, &mut int_digits)?;
        }
        self.scan_decimal_tail(start, int_digits)
    }

    /// Fraction, exponent and BigInt suffix of a decimal literal.
    fn scan_decimal_tail(&mut self, start: usize, int_digits: String) -> ParseResult<TokenKind> {
        let mut is_integer = true;
        let mut frac_digits = String::new();
        let mut exponent = String::new();

        if self.current() == b'.' {
            is_integer = false;
            self.advance();
            if self.current() == b'_' {
                return Err(self.error_at("Numeric separator is not allowed here", self.pos));
            }
            self.read_digits(10, &mut frac_digits)?;
        }

        if self.current() | 0x20 == b'e' {
            is_integer = false;
            self.advance();
            if matches!(self.current(), b'+' | b'-') {
                exponent.push(self.current() as char);
                self.advance();
            }
            if !self.current().is_ascii_digit() {
                return Err(self.error_at("Invalid number", start));
            }
            self.read_digits(10, &mut exponent)?;
        }

        if self.current() == b'n' {
            if !is_integer || self.legacy_octal {
                return Err(self.error_at("Invalid BigInt syntax", start));
            }
            self.advance();
            self.check_after_number()?;
            return Ok(TokenKind::BigInt(int_digits));
        }

        self.check_after_number()?;

        let int_part = if int_digits.is_empty() { "0" } else { int_digits.as_str() };
        let frac_part = if frac_digits.is_empty() { "0" } else { frac_digits.as_str() };
        let exp_part = if exponent.is_empty() { "0" } else { exponent.as_str() };
        let text = format!("{int_part}.{frac_part}e{exp_part}");
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error_at("Invalid number", start))?;
        Ok(TokenKind::Number(value))
    }

    fn scan_radix_number(&mut self, radix: u32) -> ParseResult<TokenKind> {
        let start = self.pos;
        self.advance_n(2); // Skip 0x / 0o / 0b
        if self.current() == b'_' {
            return Err(self.error_at("Numeric separator is not allowed here", self.pos));
        }
        let mut digits = String::new();
        self.read_digits(radix, &mut digits)?;
        if digits.is_empty() {
            return Err(self.error_at(format!("Expected number in radix {radix}"), start));
        }

        if self.current() == b'n' {
            let text: String = self.source[start..self.pos].chars().filter(|&c| c != '_').collect();
            self.advance();
            self.check_after_number()?;
            return Ok(TokenKind::BigInt(text));
        }

        self.check_after_number()?;
        Ok(TokenKind::Number(digits_value(&digits, radix)))
    }

    /// `017` (legacy octal) or `019` (decimal with a leading zero).
    fn scan_legacy_octal_like(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        self.legacy_octal = true;
        while self.current().is_ascii_digit() {
            self.advance();
        }
        if self.current() == b'_' {
            return Err(self.error_at(
                "Numeric separator is not allowed in legacy octal-like literals",
                self.pos,
            ));
        }

        let digits = self.source[start..self.pos].to_string();
        if digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            if self.current() == b'n' {
                return Err(self.error_at("Invalid BigInt syntax", start));
            }
            self.check_after_number()?;
            return Ok(TokenKind::Number(digits_value(&digits, 8)));
        }

        self.scan_decimal_tail(start, digits)
    }

    /// Read digits of `radix`, dropping `_` separators that sit between digits.
    fn read_digits(&mut self, radix: u32, out: &mut String) -> ParseResult<()> {
        let mut any = false;
        let mut last_was_separator = false;
        loop {
            let b = self.current();
            if b == b'_' {
                if !any {
                    return Err(self.error_at(
                        "Numeric separator is not allowed at the first of digits",
                        self.pos,
                    ));
                }
                if last_was_separator {
                    return Err(self.error_at(
                        "Numeric separator must be exactly one underscore",
                        self.pos,
                    ));
                }
                last_was_separator = true;
                self.advance();
                continue;
            }
            if b >= 0x80 || (b as char).to_digit(radix).is_none() {
                break;
            }
            out.push(b as char);
            any = true;
            last_was_separator = false;
            self.advance();
        }
        if last_was_separator {
            return Err(self.error_at(
                "Numeric separator is not allowed at the last of digits",
                self.pos - 1,
            ));
        }
        Ok(())
    }

    fn check_after_number(&self) -> ParseResult<()> {
        let b = self.current();
        let bad = b.is_ascii_alphanumeric()
            || b == b'_'
            || b == b'$'
            || b == b'\\'
            || (b >= 0x80 && is_id_start(self.current_char()));
        if bad {
            return Err(self.error_at("Identifier directly after number", self.pos));
        }
        Ok(())
    }

    fn scan_string(&mut self, quote: u8) -> ParseResult<TokenKind> {
        let start = self.pos;
        self.advance(); // Skip opening quote
        let mut value = String::new();
        let mut chunk_start = self.pos;

        loop {
            if self.is_eof() {
                return Err(self.error_at("Unterminated string constant", start));
            }
            match self.current() {
                b if b == quote => {
                    value.push_str(&self.source[chunk_start..self.pos]);
                    self.advance();
                    return Ok(TokenKind::String(value));
                }
                b'\\' => {
                    value.push_str(&self.source[chunk_start..self.pos]);
                    self.advance();
                    self.read_escape(&mut value, false)
                        .map_err(|(offset, message)| self.error_at(message, offset))?;
                    chunk_start = self.pos;
                }
                b'\n' | b'\r' => {
                    return Err(self.error_at("Unterminated string constant", start));
                }
                _ => self.advance(),
            }
        }
    }

    /// Decode one escape sequence; the position is just past the backslash.
    fn read_escape(&mut self, out: &mut String, in_template: bool) -> Result<(), EscapeError> {
        let escape_start = self.pos - 1;
        if self.is_eof() {
            return Err((escape_start, "Unterminated string constant"));
        }

        // Line continuation
        let terminator = self.line_terminator_len();
        if terminator > 0 {
            let is_cr = self.current() == b'\r';
            self.advance_n(terminator);
            if is_cr && self.current() == b'\n' {
                self.advance();
            }
            return Ok(());
        }

        let b = self.current();
        match b {
            b'n' => { self.advance(); out.push('\n'); }
            b't' => { self.advance(); out.push('\t'); }
            b'r' => { self.advance(); out.push('\r'); }
            b'b' => { self.advance(); out.push('\u{8}'); }
            b'f' => { self.advance(); out.push('\u{c}'); }
            b'v' => { self.advance(); out.push('\u{b}'); }
            b'x' => {
                self.advance();
                let code = self
                    .read_hex(2)
                    .ok_or((escape_start, "Invalid hexadecimal escape sequence"))?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            b'u' => {
                self.advance();
                let code = self.read_unicode_escape()?;
                self.push_code_point(out, code);
            }
            b'0' if !self.peek_char().is_ascii_digit() => {
                self.advance();
                out.push('\0');
            }
            b'0'..=b'7' => {
                if in_template {
                    self.advance();
                    return Err((escape_start, "Octal literal in template string"));
                }
                self.legacy_octal = true;
                let mut value = 0u32;
                let mut len = 0;
                while len < 3 && (b'0'..=b'7').contains(&self.current()) {
                    let next = value * 8 + u32::from(self.current() - b'0');
                    if next > 255 {
                        break;
                    }
                    value = next;
                    len += 1;
                    self.advance();
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            b'8' | b'9' => {
                self.advance();
                if in_template {
                    return Err((escape_start, "Invalid escape sequence in template string"));
                }
                self.legacy_octal = true;
                out.push(b as char);
            }
            _ => {
                let c = self.current_char();
                self.advance_n(c.len_utf8());
                out.push(c);
            }
        }
        Ok(())
    }

    /// Append a code point, joining surrogate pairs written as two escapes.
    /// Lone surrogates become U+FFFD.
    fn push_code_point(&mut self, out: &mut String, code: u32) {
        if (0xD800..=0xDBFF).contains(&code) && self.current() == b'\\' && self.peek_char() == b'u' {
            let saved = self.pos;
            self.advance_n(2);
            match self.read_unicode_escape() {
                Ok(low) if (0xDC00..=0xDFFF).contains(&low) => {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                    return;
                }
                _ => self.pos = saved,
            }
        }
        out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
    }

    /// `XXXX` or `{X...}` after `\u`.
    fn read_unicode_escape(&mut self) -> Result<u32, EscapeError> {
        let escape_start = self.pos.saturating_sub(2);
        if self.current() == b'{' {
            self.advance();
            let digits_start = self.pos;
            let mut value = 0u32;
            while self.current().is_ascii_hexdigit() {
                value = value * 16 + hex_value(self.current());
                if value > 0x10FFFF {
                    return Err((escape_start, "Code point out of bounds"));
                }
                self.advance();
            }
            if self.pos == digits_start || self.current() != b'}' {
                return Err((escape_start, "Invalid Unicode escape sequence"));
            }
            self.advance();
            Ok(value)
        } else {
            self.read_hex(4)
                .ok_or((escape_start, "Invalid Unicode escape sequence"))
        }
    }

    fn read_hex(&mut self, len: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..len {
            let b = self.current();
            if !b.is_ascii_hexdigit() {
                return None;
            }
            value = value * 16 + hex_value(b);
            self.advance();
        }
        Some(value)
    }

    /// Scan a template chunk. `head` is true after the opening backtick and
    /// false after the `}` that closes a substitution.
    fn scan_template_chunk(&mut self, head: bool) -> ParseResult<TokenKind> {
        let mut cooked = Some(String::new());
        let mut raw = String::new();
        let mut invalid_escape = None;
        let mut chunk_start = self.pos;

        loop {
            if self.is_eof() {
                return Err(self.error_at("Unterminated template", self.token_start));
            }
            match self.current() {
                b'`' => {
                    flush(self.source, chunk_start, self.pos, &mut raw, &mut cooked);
                    self.advance();
                    let chunk = TemplateChunk { cooked, raw, invalid_escape };
                    return Ok(if head {
                        TokenKind::TemplateNoSub(chunk)
                    } else {
                        TokenKind::TemplateTail(chunk)
                    });
                }
                b'$' if self.peek_char() == b'{' => {
                    flush(self.source, chunk_start, self.pos, &mut raw, &mut cooked);
                    self.advance_n(2);
                    let chunk = TemplateChunk { cooked, raw, invalid_escape };
                    return Ok(if head {
                        TokenKind::TemplateHead(chunk)
                    } else {
                        TokenKind::TemplateMiddle(chunk)
                    });
                }
                b'\\' => {
                    flush(self.source, chunk_start, self.pos, &mut raw, &mut cooked);
                    let escape_start = self.pos;
                    self.advance();
                    let mut decoded = String::new();
                    match self.read_escape(&mut decoded, true) {
                        Ok(()) => {
                            if let Some(text) = cooked.as_mut() {
                                text.push_str(&decoded);
                            }
                        }
                        Err(err) => {
                            cooked = None;
                            invalid_escape.get_or_insert((err.0 as u32, err.1));
                        }
                    }
                    raw.push_str(&normalize_newlines(&self.source[escape_start..self.pos]));
                    chunk_start = self.pos;
                }
                b'\r' => {
                    flush(self.source, chunk_start, self.pos, &mut raw, &mut cooked);
                    self.advance();
                    if self.current() == b'\n' {
                        self.advance();
                    }
                    raw.push('\n');
                    if let Some(text) = cooked.as_mut() {
                        text.push('\n');
                    }
                    chunk_start = self.pos;
                }
                _ => self.advance(),
            }
        }
    }

    fn scan_regex(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        self.advance(); // Skip opening /

        // Scan pattern
        let mut in_class = false;
        let mut escaped = false;
        loop {
            if self.is_eof() || self.line_terminator_len() > 0 {
                return Err(self.error_at("Unterminated regular expression", start));
            }
            let b = self.current();
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'[' {
                in_class = true;
            } else if b == b']' && in_class {
                in_class = false;
            } else if b == b'/' && !in_class {
                break;
            }
            self.advance();
        }

        let pattern = self.source[start + 1..self.pos].to_string();
        self.advance(); // Skip closing /

        // Scan flags
        let flags_start = self.pos;
        loop {
            let b = self.current();
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                self.advance();
            } else if b >= 0x80 && is_id_continue(self.current_char()) {
                self.advance_n(self.current_char().len_utf8());
            } else if b == b'\\' {
                return Err(self.error_at("Invalid regular expression flag", self.pos));
            } else {
                break;
            }
        }
        let flags = self.source[flags_start..self.pos].to_string();
        self.validate_regex_flags(&flags, flags_start)?;

        Ok(TokenKind::Regex { pattern, flags })
    }

    fn validate_regex_flags(&self, flags: &str, offset: usize) -> ParseResult<()> {
        let mut seen = String::new();
        for c in flags.chars() {
            if !"dgimsuyv".contains(c) {
                return Err(self.error_at("Invalid regular expression flag", offset));
            }
            if seen.contains(c) {
                return Err(self.error_at("Duplicate regular expression flag", offset));
            }
            seen.push(c);
        }
        if seen.contains('u') && seen.contains('v') {
            return Err(self.error_at("Invalid regular expression flag", offset));
        }
        Ok(())
    }

    // === Multi-character operators ===

    fn scan_dot(&mut self) -> ParseResult<TokenKind> {
        if self.peek_char().is_ascii_digit() {
            // Number starting with .
            return self.scan_number();
        }
        self.advance();
        if self.current() == b'.' && self.peek_char() == b'.' {
            self.advance_n(2);
            Ok(TokenKind::Spread)
        } else {
            Ok(TokenKind::Dot)
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'?' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::QuestionQuestionEq
                } else {
                    TokenKind::QuestionQuestion
                }
            }
            b'.' if !self.peek_char().is_ascii_digit() => {
                self.advance();
                TokenKind::QuestionDot
            }
            _ => TokenKind::Question,
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'+' => { self.advance(); TokenKind::PlusPlus }
            b'=' => { self.advance(); TokenKind::PlusEq }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'-' => { self.advance(); TokenKind::MinusMinus }
            b'=' => { self.advance(); TokenKind::MinusEq }
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'*' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::StarStarEq
                } else {
                    TokenKind::StarStar
                }
            }
            b'=' => { self.advance(); TokenKind::StarEq }
            _ => TokenKind::Star,
        }
    }

    fn scan_slash(&mut self) -> ParseResult<TokenKind> {
        if !self.division_allowed {
            return self.scan_regex();
        }
        self.advance();
        match self.current() {
            b'=' => { self.advance(); Ok(TokenKind::SlashEq) }
            _ => Ok(TokenKind::Slash),
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            }
            b'>' => { self.advance(); TokenKind::Arrow }
            _ => TokenKind::Eq,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::BangEqEq
                } else {
                    TokenKind::BangEq
                }
            }
            _ => TokenKind::Bang,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'<' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::LtLtEq
                } else {
                    TokenKind::LtLt
                }
            }
            b'=' => { self.advance(); TokenKind::LtEq }
            _ => TokenKind::Lt,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'>' => {
                self.advance();
                match self.current() {
                    b'>' => {
                        self.advance();
                        if self.current() == b'=' {
                            self.advance();
                            TokenKind::GtGtGtEq
                        } else {
                            TokenKind::GtGtGt
                        }
                    }
                    b'=' => { self.advance(); TokenKind::GtGtEq }
                    _ => TokenKind::GtGt,
                }
            }
            b'=' => { self.advance(); TokenKind::GtEq }
            _ => TokenKind::Gt,
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'&' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::AmpAmpEq
                } else {
                    TokenKind::AmpAmp
                }
            }
            b'=' => { self.advance(); TokenKind::AmpEq }
            _ => TokenKind::Amp,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'|' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::PipePipeEq
                } else {
                    TokenKind::PipePipe
                }
            }
            b'=' => { self.advance(); TokenKind::PipeEq }
            _ => TokenKind::Pipe,
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }
}

fn flush(source: &str, start: usize, end: usize, raw: &mut String, cooked: &mut Option<String>) {
    let text = &source[start..end];
    raw.push_str(text);
    if let Some(cooked) = cooked.as_mut() {
        cooked.push_str(text);
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn hex_value(b: u8) -> u32 {
    (b as char).to_digit(16).unwrap_or(0)
}

/// Numeric value of a digit string. Exact below 2^64, approximated above.
fn digits_value(digits: &str, radix: u32) -> f64 {
    if let Ok(v) = u64::from_str_radix(digits, radix) {
        return v as f64;
    }
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

pub(crate) fn is_id_start(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphabetic() || c == '$' || c == '_'
    } else {
        UnicodeXID::is_xid_start(c) || is_id_not_xid(c)
    }
}

pub(crate) fn is_id_continue(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || c == '$' || c == '_'
    } else {
        c == '\u{200C}' || c == '\u{200D}' || UnicodeXID::is_xid_continue(c) || is_id_not_xid(c)
    }
}

/// ID_Start characters that XID_Start drops for NFKC closure. All of them
/// are also ID_Continue.
fn is_id_not_xid(c: char) -> bool {
    matches!(
        c,
        '\u{037A}'
            | '\u{0E33}'
            | '\u{0EB3}'
            | '\u{309B}'
            | '\u{309C}'
            | '\u{FC5E}'..='\u{FC63}'
            | '\u{FDFA}'
            | '\u{FDFB}'
            | '\u{FE70}'
            | '\u{FE72}'
            | '\u{FE74}'
            | '\u{FE76}'
            | '\u{FE78}'
            | '\u{FE7A}'
            | '\u{FE7C}'
            | '\u{FE7E}'
            | '\u{FF9E}'
            | '\u{FF9F}'
    )
}

/// Non-ASCII whitespace: the Zs category plus the byte order mark.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{00A0}' | '\u{FEFF}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

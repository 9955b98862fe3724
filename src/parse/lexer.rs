use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::errors::{ParseError, ParseErrorKind};
use crate::parse::cursor::Cursor;
use crate::parse::token::{Token, TokenKind, BACKSPACE, ESCAPES};

type ScanResult = Result<Token, ParseError>;

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | BACKSPACE | '\n' | '\r' | '\t')
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

fn is_comparison_start(c: char) -> bool {
    matches!(c, '<' | '>' | '!' | '=')
}

#[derive(Debug, Clone)]
pub struct Lexer {
    cursor: Cursor,
    failed: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            failed: false,
        }
    }

    /// Lexes the whole input, stopping at the first error.
    pub fn lex(self) -> Result<Vec<Token>, ParseError> {
        self.collect()
    }

    fn create_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.cursor.index())
    }

    /// Lexes exactly one token starting at the current position.
    ///
    /// Whitespace is not skipped here: a leading space lexes as an operator.
    pub fn lex_token(&mut self) -> ScanResult {
        match (self.cursor.get(0), self.cursor.get(1)) {
            (None, _) => Err(self.create_error(ParseErrorKind::EndOfInput)),
            (Some(c), _) if is_ident_start(c) => self.lex_identifier(),
            (Some(c), Some(d)) if is_sign(c) && is_digit(d) => self.lex_number(),
            (Some(c), _) if is_digit(c) => self.lex_number(),
            (Some('\''), _) => self.lex_character(),
            (Some('"'), _) => self.lex_string(),
            (Some(_), _) => self.lex_operator(),
        }
    }

    pub fn lex_identifier(&mut self) -> ScanResult {
        self.cursor.consume_while(is_ident_continuation);

        Ok(self.cursor.emit(TokenKind::Identifier))
    }

    pub fn lex_number(&mut self) -> ScanResult {
        self.cursor.consume_with(&[&is_sign]);
        self.cursor.consume_while(is_digit);

        // a fractional part needs at least one digit after the point
        if !self.cursor.consume_with(&[&|c: char| c == '.', &is_digit]) {
            return Ok(self.cursor.emit(TokenKind::Integer));
        }

        self.cursor.consume_while(is_digit);

        Ok(self.cursor.emit(TokenKind::Decimal))
    }

    pub fn lex_character(&mut self) -> ScanResult {
        self.cursor.consume_expecting('\'');

        if self.cursor.consume_expecting('\'') {
            if self.cursor.consume_expecting('\'') {
                return Err(self.create_error(ParseErrorKind::IllegalSingleQuote));
            }

            return Err(self.create_error(ParseErrorKind::MissingCharacter));
        }

        if self.cursor.peek_with(&[&|c: char| !is_line_terminator(c)]) {
            self.lex_unit()?;
        }

        self.expect_closing('\'', ParseErrorKind::UnterminatedCharacter)?;

        Ok(self.cursor.emit(TokenKind::Character))
    }

    pub fn lex_string(&mut self) -> ScanResult {
        self.cursor.consume_expecting('"');

        if self
            .cursor
            .consume_with(&[&|c: char| c == '"', &|c: char| c == '"'])
        {
            return Err(self.create_error(ParseErrorKind::DoubleQuoteInString));
        }

        while self
            .cursor
            .peek_with(&[&|c: char| c != '"' && !is_line_terminator(c)])
        {
            self.lex_unit()?;
        }

        self.expect_closing('"', ParseErrorKind::UnterminatedString)?;

        Ok(self.cursor.emit(TokenKind::String))
    }

    /// Consumes a single character of a character or string literal, which is either an escape
    /// sequence or a raw character.
    fn lex_unit(&mut self) -> Result<(), ParseError> {
        if self.cursor.peek() == Some('\\') {
            self.lex_escape()
        } else {
            self.cursor.advance();

            Ok(())
        }
    }

    pub fn lex_escape(&mut self) -> Result<(), ParseError> {
        if self
            .cursor
            .consume_with(&[&|c: char| c == '\\', &|c: char| ESCAPES.contains_key(&c)])
        {
            return Ok(());
        }

        // step over the backslash so the error points at the offending character
        self.cursor.advance();

        Err(self.create_error(ParseErrorKind::InvalidEscape))
    }

    pub fn lex_operator(&mut self) -> ScanResult {
        if !self
            .cursor
            .consume_with(&[&is_comparison_start, &|c: char| c == '='])
        {
            self.cursor.advance();
        }

        Ok(self.cursor.emit(TokenKind::Operator))
    }

    fn expect_closing(&mut self, delimiter: char, kind: ParseErrorKind) -> Result<(), ParseError> {
        if self.cursor.consume_expecting(delimiter) {
            return Ok(());
        }

        // include the stray character in the reported position, unless the line ends here
        self.cursor.consume_with(&[&|c: char| !is_line_terminator(c)]);

        Err(self.create_error(kind))
    }
}

impl Iterator for Lexer {
    type Item = ScanResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.cursor.peek() {
                None => return None,

                Some(c) if is_whitespace(c) => {
                    self.cursor.advance();
                    self.cursor.skip();
                }

                Some(_) => break,
            }
        }

        let result = self.lex_token();
        self.cursor.skip();

        match &result {
            Ok(token) => trace!(%token, offset = token.offset),

            Err(e) => {
                debug!(error = %e, offset = e.offset, "lexing failed");
                self.failed = true;
            }
        }

        Some(result)
    }
}

impl FusedIterator for Lexer {}

use crate::parse::token::{Token, TokenKind};

/// An index-based view over the input characters.
///
/// Besides the current position the cursor tracks the number of characters consumed since the
/// last token boundary, which is what [`emit`](Self::emit) turns into a token.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    index: usize,
    length: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            length: 0,
        }
    }

    /// Returns the index of the immediately following character.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the number of characters consumed since the last boundary.
    pub fn pending(&self) -> usize {
        self.length
    }

    pub fn has(&self, offset: usize) -> bool {
        self.index + offset < self.chars.len()
    }

    pub fn get(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    pub fn peek(&self) -> Option<char> {
        self.get(0)
    }

    /// Checks the next characters against a sequence of predicates, one character each.
    pub fn peek_with(&self, predicates: &[&dyn Fn(char) -> bool]) -> bool {
        predicates
            .iter()
            .enumerate()
            .all(|(i, predicate)| self.get(i).map_or(false, |c| predicate(c)))
    }

    /// Same as [`peek_with`](Self::peek_with), but consumes the characters if all of them match.
    pub fn consume_with(&mut self, predicates: &[&dyn Fn(char) -> bool]) -> bool {
        let matched = self.peek_with(predicates);

        if matched {
            for _ in predicates {
                self.advance();
            }
        }

        matched
    }

    pub fn consume_expecting(&mut self, expected: char) -> bool {
        self.consume_with(&[&|c: char| c == expected])
    }

    pub fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        let mut count = 0;

        while self.consume_with(&[&predicate]) {
            count += 1;
        }

        count
    }

    pub fn advance(&mut self) {
        if self.index < self.chars.len() {
            self.index += 1;
            self.length += 1;
        }
    }

    /// Marks the current position as a token boundary.
    pub fn skip(&mut self) {
        self.length = 0;
    }

    /// Produces a token out of the characters consumed since the last boundary.
    pub fn emit(&mut self, kind: TokenKind) -> Token {
        let start = self.index - self.pending();
        self.skip();

        Token {
            kind,
            literal: self.chars[start..self.index].iter().collect(),
            offset: start,
        }
    }
}

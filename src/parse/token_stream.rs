use crate::parse::token::Token;

/// A bounded-lookahead view over a token slice.
#[derive(Debug, Clone)]
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl<'t> TokenStream<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn has(&self, offset: usize) -> bool {
        self.index + offset < self.tokens.len()
    }

    pub fn get(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.index + offset)
    }

    pub fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// The position just past the last token of the whole stream.
    pub fn end_offset(&self) -> usize {
        self.tokens.last().map_or(0, Token::end_offset)
    }

    /// The offset of the next token, or [`end_offset`](Self::end_offset) if all tokens have
    /// been consumed.
    pub fn next_offset(&self) -> usize {
        self.get(0).map_or_else(|| self.end_offset(), |token| token.offset)
    }
}

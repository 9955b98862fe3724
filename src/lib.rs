pub mod ast;
pub mod dump;
pub mod errors;
pub mod parse;
pub mod position;
pub mod source;

use crate::errors::ParseError;
use crate::parse::{Lexer, Parser, Token};

/// Splits `input` into tokens, failing on the first lexical error.
pub fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input).lex()
}

/// Parses a whole program out of `tokens`.
pub fn parse(tokens: &[Token]) -> Result<ast::Source, ParseError> {
    Parser::new(tokens).parse_source()
}

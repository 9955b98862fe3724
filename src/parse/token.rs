use std::fmt::{self, Display};

use phf::phf_map;
use serde::Serialize;

use crate::position::HasOffset;

pub const BACKSPACE: char = '\u{8}';

/// Characters allowed after a backslash, mapped to the character they denote.
pub static ESCAPES: phf::Map<char, char> = phf_map! {
    'b' => BACKSPACE,
    'n' => '\n',
    'r' => '\r',
    't' => '\t',
    '\\' => '\\',
    '\'' => '\'',
    '"' => '"',
};

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    Character,
    String,
    Operator,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Identifier => "IDENTIFIER",
                Self::Integer => "INTEGER",
                Self::Decimal => "DECIMAL",
                Self::Character => "CHARACTER",
                Self::String => "STRING",
                Self::Operator => "OPERATOR",
            }
        )
    }
}

#[derive(Serialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            offset,
        }
    }

    /// The offset just past the last character of the token.
    pub fn end_offset(&self) -> usize {
        self.offset + self.literal.chars().count()
    }
}

impl HasOffset for Token {
    fn offset(&self) -> usize {
        self.offset
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.literal)
    }
}

/// Strips the delimiters off a character or string literal and decodes its escape sequences.
///
/// Returns `None` if the literal is not properly delimited or contains an unknown escape.
pub fn unescape(literal: &str, delimiter: char) -> Option<String> {
    let inner = literal
        .strip_prefix(delimiter)?
        .strip_suffix(delimiter)?;
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            result.push(*ESCAPES.get(&chars.next()?)?);
        } else {
            result.push(c);
        }
    }

    Some(result)
}


mod cursor;
mod lexer;
mod parser;
pub mod token;
mod token_stream;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use parser::{Matcher, Parser, DEFAULT_RECURSION_LIMIT};
pub use token::{Token, TokenKind};
pub use token_stream::TokenStream;

use std::error::Error;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::position::HasOffset;
use crate::source::SourceId;

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    // lexical
    IllegalSingleQuote,
    MissingCharacter,
    UnterminatedCharacter,
    DoubleQuoteInString,
    UnterminatedString,
    InvalidEscape,
    EndOfInput,

    // syntactic
    MissingSemicolon,
    MissingIdentifier,
    TrailingComma,
    MissingClosingParen,
    InvalidPrimaryExpression,
    Expected(&'static str),
    MalformedLiteral,
    RecursionLimit,
}

impl ParseErrorKind {
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            Self::IllegalSingleQuote
                | Self::MissingCharacter
                | Self::UnterminatedCharacter
                | Self::DoubleQuoteInString
                | Self::UnterminatedString
                | Self::InvalidEscape
                | Self::EndOfInput
        )
    }
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Expected(what) = self {
            return write!(f, "expected {}", what);
        }

        write!(
            f,
            "{}",
            match self {
                Self::IllegalSingleQuote => "a single quote cannot be a character literal",
                Self::MissingCharacter => "the character literal is empty",
                Self::UnterminatedCharacter => {
                    "the character literal is not terminated or spans multiple characters"
                }
                Self::DoubleQuoteInString => "the string starts with a run of double quotes",
                Self::UnterminatedString => "the string is not terminated",
                Self::InvalidEscape => "invalid escape sequence",
                Self::EndOfInput => "unexpected end of input",

                Self::MissingSemicolon => "missing semicolon after the statement",
                Self::MissingIdentifier => "missing identifier after `.`",
                Self::TrailingComma => "trailing comma in the argument list",
                Self::MissingClosingParen => "missing closing parenthesis",
                Self::InvalidPrimaryExpression => "invalid primary expression",
                Self::MalformedLiteral => "the literal token cannot be decoded",
                Self::RecursionLimit => "a recursion limit has been reached while parsing",

                Self::Expected(_) => unreachable!(),
            }
        )
    }
}

/// A lexical or syntax error at a character offset.
///
/// Errors detected at the end of input point just past the last token.
#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_lexical() {
            write!(f, "lexical analysis failed: {}", self.kind)
        } else {
            write!(f, "syntax analysis failed: {}", self.kind)
        }
    }
}

impl Error for ParseError {}

impl HasOffset for ParseError {
    fn offset(&self) -> usize {
        self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub source_id: SourceId,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub location: Option<Location>,
    pub message: String,
}

impl DiagnosticMessage {
    pub fn new(message: String) -> Self {
        Self {
            location: None,
            message,
        }
    }

    pub fn with_location(location: Location, message: String) -> Self {
        Self {
            location: Some(location),
            message,
        }
    }
}

impl From<String> for DiagnosticMessage {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

#[derive(Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: DiagnosticMessage,
    pub source: Option<Box<dyn Error + 'static>>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

impl Error for Diagnostic {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref()
    }
}

pub trait OffsetError: Error + HasOffset {}

impl<T: Error + HasOffset> OffsetError for T {}

#[must_use = "DiagnosticBuilder is useless unless emitted"]
pub struct DiagnosticBuilder<'a, 'emt> {
    owner: &'a mut Diagnostics<'emt>,
    level: Level,
    message: Option<DiagnosticMessage>,
    source: Option<Box<dyn Error + 'static>>,
}

impl<'a, 'emt> DiagnosticBuilder<'a, 'emt> {
    fn new(owner: &'a mut Diagnostics<'emt>, level: Level) -> Self {
        Self {
            owner,
            level,
            message: None,
            source: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<DiagnosticMessage>) -> Self {
        self.message = Some(message.into());

        self
    }

    pub fn with_source(mut self, source: Box<dyn Error + 'static>) -> Self {
        self.source = Some(source);

        self
    }

    /// Uses the `error` to fill in the location and the message (unless already set), and
    /// records it as the source of the diagnostic.
    pub fn with_offset_and_error(
        mut self,
        source_id: SourceId,
        error: impl OffsetError + 'static,
    ) -> Self {
        self.message = self.message.or_else(|| {
            Some(DiagnosticMessage::with_location(
                Location {
                    source_id,
                    offset: error.offset(),
                },
                format!("{}", error),
            ))
        });

        self.source = Some(Box::new(error));

        self
    }

    /// Emits the diagnostic.
    ///
    /// Panics if the message is not set.
    pub fn emit(self) {
        let diagnostic = Diagnostic {
            level: self.level,
            message: self.message.expect("message must be set"),
            source: self.source,
        };

        self.owner.emit(diagnostic);
    }
}

pub type Emitter<'emt> = Box<dyn FnMut(&Diagnostic) + 'emt>;

pub struct Diagnostics<'emt> {
    diagnostics: Vec<Diagnostic>,
    emitter: Option<Emitter<'emt>>,
    error_count: usize,
}

impl Default for Diagnostics<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'emt> Diagnostics<'emt> {
    pub fn new() -> Self {
        Self {
            diagnostics: vec![],
            emitter: None,
            error_count: 0,
        }
    }

    /// Sets a callback invoked on every emitted diagnostic.
    pub fn set_emitter(&mut self, emitter: Emitter<'emt>) {
        self.emitter = Some(emitter);
    }

    pub fn with_level(&mut self, level: Level) -> DiagnosticBuilder<'_, 'emt> {
        DiagnosticBuilder::new(self, level)
    }

    pub fn error(&mut self) -> DiagnosticBuilder<'_, 'emt> {
        self.with_level(Level::Error)
    }

    pub fn warn(&mut self) -> DiagnosticBuilder<'_, 'emt> {
        self.with_level(Level::Warn)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level <= Level::Error {
            self.error_count += 1;
        }

        if let Some(emitter) = &mut self.emitter {
            emitter(&diagnostic);
        }

        self.diagnostics.push(diagnostic);
    }
}

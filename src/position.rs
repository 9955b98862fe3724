use std::fmt::{self, Display};

/// Anything that points at a character offset in the source text.
pub trait HasOffset {
    fn offset(&self) -> usize;
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl Default for LineCol {
    fn default() -> Self {
        Self { line: 1, col: 1 }
    }
}

impl LineCol {
    /// Resolves a character offset into a 1-based line and column.
    ///
    /// `\r\n` counts as a single line break. Offsets past the end of `text` resolve to the
    /// position just after the last character.
    pub fn locate(text: &str, offset: usize) -> Self {
        let mut pos = Self::default();
        let mut chars = text.chars().peekable();

        for _ in 0..offset {
            let Some(c) = chars.next() else { break };

            match c {
                // the break happens at the `\n`
                '\r' if chars.peek() == Some(&'\n') => pos.col += 1,

                '\n' | '\r' => {
                    pos.line += 1;
                    pos.col = 1;
                }

                _ => pos.col += 1,
            }
        }

        pos
    }
}

impl Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

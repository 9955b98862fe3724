use std::fmt;
use std::io::{self, Write};

use ron::ser::PrettyConfig;
use serde::Serialize;

use crate::ast;
use crate::parse::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpFormat {
    Debug,
    Ron,
}

pub fn dump_tokens(format: DumpFormat, tokens: &[Token], out: impl Write) -> io::Result<()> {
    dump(format, &tokens, out)
}

pub fn dump_ast(format: DumpFormat, ast: &ast::Source, out: impl Write) -> io::Result<()> {
    dump(format, ast, out)
}

fn dump<T>(format: DumpFormat, value: &T, mut out: impl Write) -> io::Result<()>
where
    T: Serialize + fmt::Debug,
{
    match format {
        DumpFormat::Debug => writeln!(out, "{:#?}", value),

        DumpFormat::Ron => {
            let config = PrettyConfig::new().indentor("  ".to_owned());
            let text = ron::ser::to_string_pretty(value, config)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            writeln!(out, "{}", text)
        }
    }
}

use std::path::PathBuf;

use clap::{arg, command, value_parser, ValueEnum};

use plc::dump::DumpFormat;
use plc::parse::DEFAULT_RECURSION_LIMIT;

#[derive(Debug, Clone)]
pub struct PlcConfig {
    pub paths: Vec<PathBuf>,
    pub output: OutputKind,
    pub recursion_limit: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Lexer,
    Parser,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Parser
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Debug,
    Ron,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Debug
    }
}

impl From<OutputFormat> for DumpFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Debug => Self::Debug,
            OutputFormat::Ron => Self::Ron,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Lexer(DumpFormat),
    Parser(DumpFormat),
}

pub fn parse_args_or_exit() -> PlcConfig {
    let matches = command!()
        .arg(
            arg!(files: <FILE> ... "input files")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            arg!(-s --stage <STAGE> "the stage to stop after")
                .value_parser(value_parser!(Stage))
                .required(false),
        )
        .arg(
            arg!(-f --format <FORMAT> "the output format")
                .value_parser(value_parser!(OutputFormat))
                .required(false),
        )
        .arg(
            arg!(--"recursion-limit" <DEPTH> "how deeply the parser may nest")
                .value_parser(value_parser!(usize))
                .required(false),
        )
        .get_matches();

    let paths = matches
        .get_many::<PathBuf>("files")
        .expect("files")
        .cloned()
        .collect();

    let stage = matches
        .get_one::<Stage>("stage")
        .copied()
        .unwrap_or_default();
    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or_default()
        .into();

    let output = match stage {
        Stage::Lexer => OutputKind::Lexer(format),
        Stage::Parser => OutputKind::Parser(format),
    };

    let recursion_limit = matches
        .get_one::<usize>("recursion-limit")
        .copied()
        .unwrap_or(DEFAULT_RECURSION_LIMIT);

    PlcConfig {
        paths,
        output,
        recursion_limit,
    }
}

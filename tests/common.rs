#![allow(dead_code)]

use std::borrow::Cow;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use once_cell::unsync::OnceCell;

use plc::ast::{Expr, Literal, Stmt};
use plc::errors::ParseError;
use plc::parse::{Parser, Token};

pub struct Dump<'a> {
    bytes: Cow<'a, [u8]>,
    string: OnceCell<String>,
}

impl PartialEq for Dump<'_> {
    fn eq(&self, other: &Dump) -> bool {
        self.bytes == other.bytes
    }
}

impl AsRef<str> for Dump<'_> {
    fn as_ref(&self) -> &str {
        self.string.get_or_init(|| {
            String::from_utf8_lossy(&self.bytes).into_owned()
        })
    }
}

impl<'a> From<&'a [u8]> for Dump<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            string: OnceCell::new(),
        }
    }
}

impl From<Vec<u8>> for Dump<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Cow::Owned(bytes),
            string: OnceCell::new(),
        }
    }
}

pub fn tokens(input: &str) -> Vec<Token> {
    plc::lex(input).unwrap_or_else(|e| panic!("could not lex {:?}: {}", input, e))
}

pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    Parser::new(&tokens(input)).parse_expression()
}

pub fn parse_statement(input: &str) -> Result<Stmt, ParseError> {
    Parser::new(&tokens(input)).parse_statement()
}

pub fn parse_source(input: &str) -> Result<plc::ast::Source, ParseError> {
    plc::parse(&tokens(input))
}

pub fn var(name: &str) -> Expr {
    Expr::access(None, name)
}

pub fn int(value: i64) -> Expr {
    Literal::Integer(BigInt::from(value)).into()
}

pub fn dec(value: &str) -> Expr {
    Literal::Decimal(BigDecimal::from_str(value).unwrap()).into()
}

pub fn string(value: &str) -> Expr {
    Literal::String(value.to_owned()).into()
}

pub fn bin(operator: &str, left: Expr, right: Expr) -> Expr {
    Expr::binary(operator, left, right)
}

pub fn call(name: &str, arguments: Vec<Expr>) -> Expr {
    Expr::function(None, name, arguments)
}

pub fn group(inner: Expr) -> Expr {
    Expr::Group(Box::new(inner))
}

use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use tracing::{instrument, trace};

use crate::ast::{self, Expr, Literal, Stmt};
use crate::errors::{ParseError, ParseErrorKind};
use crate::parse::token::{unescape, Token, TokenKind};
use crate::parse::token_stream::TokenStream;

pub const DEFAULT_RECURSION_LIMIT: usize = 64;

const LOGICAL_OPS: [&str; 2] = ["AND", "OR"];
const EQUALITY_OPS: [&str; 6] = ["<", "<=", ">", ">=", "==", "!="];
const ADDITIVE_OPS: [&str; 2] = ["+", "-"];
const MULTIPLICATIVE_OPS: [&str; 2] = ["*", "/"];

type ParseResult<T> = Result<T, ParseError>;

/// A single-token pattern: either a token kind or an exact literal.
pub trait Matcher {
    fn matches(&self, token: &Token) -> bool;
}

impl Matcher for TokenKind {
    fn matches(&self, token: &Token) -> bool {
        *self == token.kind
    }
}

impl Matcher for str {
    fn matches(&self, token: &Token) -> bool {
        token.literal == self
    }
}

impl<const N: usize> Matcher for [&str; N] {
    fn matches(&self, token: &Token) -> bool {
        self.iter().any(|literal| *literal == token.literal)
    }
}

impl<M: Matcher + ?Sized> Matcher for &M {
    fn matches(&self, token: &Token) -> bool {
        (**self).matches(token)
    }
}

struct BoundedParser<'t, 'a> {
    parser: &'a mut Parser<'t>,
}

impl Drop for BoundedParser<'_, '_> {
    fn drop(&mut self) {
        self.parser.recursion_limit += 1;
    }
}

impl<'t> Deref for BoundedParser<'t, '_> {
    type Target = Parser<'t>;

    fn deref(&self) -> &Parser<'t> {
        self.parser
    }
}

impl<'t> DerefMut for BoundedParser<'t, '_> {
    fn deref_mut(&mut self) -> &mut Parser<'t> {
        self.parser
    }
}

pub struct Parser<'t> {
    tokens: TokenStream<'t>,
    recursion_limit: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Sets how deeply expressions and statement blocks may nest.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;

        self
    }

    fn bounded(&mut self) -> ParseResult<BoundedParser<'t, '_>> {
        self.recursion_limit = match self.recursion_limit.checked_sub(1) {
            Some(limit) => limit,
            None => return Err(self.error(ParseErrorKind::RecursionLimit)),
        };

        Ok(BoundedParser { parser: self })
    }

    /// Creates an error positioned at the next token, or just past the input if none is left.
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.tokens.next_offset())
    }

    /// Checks whether the next tokens match the patterns, one token per pattern.
    pub fn peek(&self, patterns: &[&dyn Matcher]) -> bool {
        patterns.iter().enumerate().all(|(i, pattern)| {
            self.tokens
                .get(i)
                .map_or(false, |token| pattern.matches(token))
        })
    }

    /// Same as [`peek`](Self::peek), but consumes the tokens if all of them match.
    pub fn try_match(&mut self, patterns: &[&dyn Matcher]) -> bool {
        let matched = self.peek(patterns);

        if matched {
            for _ in patterns {
                self.tokens.advance();
            }
        }

        matched
    }

    fn try_consume(&mut self, matcher: impl Matcher) -> Option<&'t Token> {
        let token = self.tokens.get(0)?;

        self.try_match(&[&matcher]).then_some(token)
    }

    fn expect(&mut self, matcher: impl Matcher, kind: ParseErrorKind) -> ParseResult<&'t Token> {
        trace!(token = ?self.tokens.get(0));

        match self.try_consume(matcher) {
            Some(token) => Ok(token),
            None => Err(self.error(kind)),
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        self.expect(TokenKind::Identifier, ParseErrorKind::Expected("an identifier"))
            .map(|token| token.literal.clone())
    }

    fn expect_semicolon(&mut self) -> ParseResult<()> {
        self.expect(";", ParseErrorKind::MissingSemicolon).map(drop)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_source(&mut self) -> ParseResult<ast::Source> {
        let mut source = ast::Source::default();

        while self.peek(&[&"LET"]) {
            source.fields.push(self.parse_field()?);
        }

        while self.peek(&[&"DEF"]) {
            source.methods.push(self.parse_method()?);
        }

        if self.tokens.has(0) {
            return Err(self.error(ParseErrorKind::Expected("`DEF`")));
        }

        Ok(source)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_field(&mut self) -> ParseResult<ast::Field> {
        self.expect("LET", ParseErrorKind::Expected("`LET`"))?;
        let (name, type_name, value) = self.parse_binding()?;
        self.expect_semicolon()?;

        Ok(ast::Field {
            name,
            type_name,
            value,
        })
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_method(&mut self) -> ParseResult<ast::Method> {
        self.expect("DEF", ParseErrorKind::Expected("`DEF`"))?;
        let name = self.expect_identifier()?;
        self.expect("(", ParseErrorKind::Expected("`(`"))?;
        let mut parameters = Vec::new();

        if self.try_consume(")").is_none() {
            parameters.push(self.expect_identifier()?);

            while self.try_consume(",").is_some() {
                if self.peek(&[&")"]) {
                    return Err(self.error(ParseErrorKind::TrailingComma));
                }

                parameters.push(self.expect_identifier()?);
            }

            self.expect(")", ParseErrorKind::MissingClosingParen)?;
        }

        self.expect("DO", ParseErrorKind::Expected("`DO`"))?;
        let statements = self.parse_block(&"END")?;
        self.expect("END", ParseErrorKind::Expected("`END`"))?;

        Ok(ast::Method {
            name,
            parameters,
            statements,
        })
    }

    /// Parses `identifier (':' identifier)? ('=' expression)?`, shared by fields and declarations.
    fn parse_binding(&mut self) -> ParseResult<(String, Option<String>, Option<Expr>)> {
        let name = self.expect_identifier()?;

        let type_name = match self.try_consume(":") {
            Some(_) => Some(self.expect_identifier()?),
            None => None,
        };

        let value = match self.try_consume("=") {
            Some(_) => Some(self.parse_expression()?),
            None => None,
        };

        Ok((name, type_name, value))
    }

    /// Parses statements up to (not including) a token matching `terminator` or the end of input.
    fn parse_block(&mut self, terminator: &dyn Matcher) -> ParseResult<Vec<Stmt>> {
        let mut this = self.bounded()?;
        let mut statements = Vec::new();

        while this.tokens.has(0) && !this.peek(&[terminator]) {
            statements.push(this.parse_statement()?);
        }

        Ok(statements)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.peek(&[&"LET"]) {
            self.parse_declaration_statement()
        } else if self.peek(&[&"IF"]) {
            self.parse_if_statement()
        } else if self.peek(&[&"FOR"]) {
            self.parse_for_statement()
        } else if self.peek(&[&"WHILE"]) {
            self.parse_while_statement()
        } else if self.peek(&[&"RETURN"]) {
            self.parse_return_statement()
        } else {
            self.parse_expression_statement()
        }
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let receiver = self.parse_expression()?;

        if self.try_consume("=").is_some() {
            let value = self.parse_expression()?;
            self.expect_semicolon()?;

            return Ok(Stmt::Assignment(ast::Assignment { receiver, value }));
        }

        self.expect_semicolon()?;

        Ok(Stmt::Expression(receiver))
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_declaration_statement(&mut self) -> ParseResult<Stmt> {
        self.expect("LET", ParseErrorKind::Expected("`LET`"))?;
        let (name, type_name, value) = self.parse_binding()?;
        self.expect_semicolon()?;

        Ok(Stmt::Declaration(ast::Declaration {
            name,
            type_name,
            value,
        }))
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect("IF", ParseErrorKind::Expected("`IF`"))?;
        let condition = self.parse_expression()?;
        self.expect("DO", ParseErrorKind::Expected("`DO`"))?;
        let then_statements = self.parse_block(&["ELSE", "END"])?;

        let else_statements = match self.try_consume("ELSE") {
            Some(_) => self.parse_block(&"END")?,
            None => Vec::new(),
        };

        self.expect("END", ParseErrorKind::Expected("`END`"))?;

        Ok(Stmt::If(ast::If {
            condition,
            then_statements,
            else_statements,
        }))
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect("FOR", ParseErrorKind::Expected("`FOR`"))?;
        let name = self.expect_identifier()?;
        self.expect("IN", ParseErrorKind::Expected("`IN`"))?;
        let value = self.parse_expression()?;
        self.expect("DO", ParseErrorKind::Expected("`DO`"))?;
        let statements = self.parse_block(&"END")?;
        self.expect("END", ParseErrorKind::Expected("`END`"))?;

        Ok(Stmt::For(ast::For {
            name,
            value,
            statements,
        }))
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect("WHILE", ParseErrorKind::Expected("`WHILE`"))?;
        let condition = self.parse_expression()?;
        self.expect("DO", ParseErrorKind::Expected("`DO`"))?;
        let statements = self.parse_block(&"END")?;
        self.expect("END", ParseErrorKind::Expected("`END`"))?;

        Ok(Stmt::While(ast::While {
            condition,
            statements,
        }))
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        self.expect("RETURN", ParseErrorKind::Expected("`RETURN`"))?;

        let value = if self.peek(&[&";"]) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon()?;

        Ok(Stmt::Return(value))
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.bounded()?.parse_logical_expression()
    }

    #[inline(always)]
    fn parse_bin_op_lassoc<D>(
        &mut self,
        operators: impl Matcher + Copy,
        mut descend: D,
    ) -> ParseResult<Expr>
    where
        D: FnMut(&mut Self) -> ParseResult<Expr>,
    {
        let mut left = descend(self)?;

        while let Some(operator) = self.try_consume(operators) {
            let right = descend(self)?;
            left = Expr::binary(operator.literal.as_str(), left, right);
        }

        Ok(left)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_logical_expression(&mut self) -> ParseResult<Expr> {
        self.parse_bin_op_lassoc(&LOGICAL_OPS, Self::parse_equality_expression)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_equality_expression(&mut self) -> ParseResult<Expr> {
        self.parse_bin_op_lassoc(&EQUALITY_OPS, Self::parse_additive_expression)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_additive_expression(&mut self) -> ParseResult<Expr> {
        self.parse_bin_op_lassoc(&ADDITIVE_OPS, Self::parse_multiplicative_expression)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_multiplicative_expression(&mut self) -> ParseResult<Expr> {
        self.parse_bin_op_lassoc(&MULTIPLICATIVE_OPS, Self::parse_secondary_expression)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_secondary_expression(&mut self) -> ParseResult<Expr> {
        let mut receiver = self.parse_primary_expression()?;

        while self.try_consume(".").is_some() {
            let name = self
                .expect(TokenKind::Identifier, ParseErrorKind::MissingIdentifier)?
                .literal
                .clone();

            receiver = if self.try_consume("(").is_some() {
                let arguments = self.parse_arguments()?;

                Expr::function(Some(receiver), name, arguments)
            } else {
                Expr::access(Some(receiver), name)
            };
        }

        Ok(receiver)
    }

    /// Parses the argument list of a call whose opening parenthesis has been consumed.
    ///
    /// A trailing comma is reported at the closing parenthesis that follows it.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut arguments = Vec::new();

        if self.try_consume(")").is_some() {
            return Ok(arguments);
        }

        arguments.push(self.parse_expression()?);

        while self.try_consume(",").is_some() {
            if self.peek(&[&")"]) {
                return Err(self.error(ParseErrorKind::TrailingComma));
            }

            arguments.push(self.parse_expression()?);
        }

        self.expect(")", ParseErrorKind::MissingClosingParen)?;

        Ok(arguments)
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_primary_expression(&mut self) -> ParseResult<Expr> {
        if self.try_consume("NIL").is_some() {
            return Ok(Literal::Nil.into());
        }

        if self.try_consume("TRUE").is_some() {
            return Ok(Literal::Bool(true).into());
        }

        if self.try_consume("FALSE").is_some() {
            return Ok(Literal::Bool(false).into());
        }

        if let Some(token) = self.try_consume(TokenKind::Integer) {
            return parse_integer(token).map(Expr::from);
        }

        if let Some(token) = self.try_consume(TokenKind::Decimal) {
            return parse_decimal(token).map(Expr::from);
        }

        if let Some(token) = self.try_consume(TokenKind::Character) {
            return parse_character(token).map(Expr::from);
        }

        if let Some(token) = self.try_consume(TokenKind::String) {
            return unescape(&token.literal, '"')
                .map(|value| Literal::String(value).into())
                .ok_or_else(|| malformed(token));
        }

        if self.try_consume("(").is_some() {
            let expr = self.parse_expression()?;
            self.expect(")", ParseErrorKind::MissingClosingParen)?;

            return Ok(Expr::Group(Box::new(expr)));
        }

        if let Some(token) = self.try_consume(TokenKind::Identifier) {
            let name = token.literal.clone();

            return if self.try_consume("(").is_some() {
                let arguments = self.parse_arguments()?;

                Ok(Expr::function(None, name, arguments))
            } else {
                Ok(Expr::access(None, name))
            };
        }

        Err(self.error(ParseErrorKind::InvalidPrimaryExpression))
    }
}

fn malformed(token: &Token) -> ParseError {
    ParseError::new(ParseErrorKind::MalformedLiteral, token.offset)
}

fn strip_plus(literal: &str) -> &str {
    literal.strip_prefix('+').unwrap_or(literal)
}

fn parse_integer(token: &Token) -> ParseResult<Literal> {
    BigInt::from_str(strip_plus(&token.literal))
        .map(Literal::Integer)
        .map_err(|_| malformed(token))
}

fn parse_decimal(token: &Token) -> ParseResult<Literal> {
    BigDecimal::from_str(strip_plus(&token.literal))
        .map(Literal::Decimal)
        .map_err(|_| malformed(token))
}

fn parse_character(token: &Token) -> ParseResult<Literal> {
    let value = unescape(&token.literal, '\'').ok_or_else(|| malformed(token))?;
    let mut chars = value.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Literal::Character(c)),
        _ => Err(malformed(token)),
    }
}

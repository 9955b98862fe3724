mod common;

use std::str::FromStr;

use insta::assert_debug_snapshot;
use num_bigint::BigInt;
use paste::paste;
use pretty_assertions::assert_eq;

use plc::ast::{self, Expr, Literal, Stmt};
use plc::errors::{ParseError, ParseErrorKind};
use plc::parse::{Parser, Token, TokenKind, DEFAULT_RECURSION_LIMIT};

use self::common::{
    bin, call, dec, group, int, parse_expression, parse_source, parse_statement, string, tokens,
    var,
};

fn check_statement_error(input: &str, kind: ParseErrorKind, offset: usize) {
    assert_eq!(parse_statement(input), Err(ParseError::new(kind, offset)));
}

macro_rules! expression_tests {
    ($( $name:ident: $input:expr => $expected:expr ),+ $(,)?) => {
        $(
            paste! {
                #[test]
                fn [< test_expression_ $name >]() {
                    assert_eq!(parse_expression($input), Ok($expected));
                }
            }
        )+
    };
}

expression_tests! {
    precedence: "1 + 2 * 3" => bin("+", int(1), bin("*", int(2), int(3))),
    subtraction_is_left_associative: "a - b - c" => bin("-", bin("-", var("a"), var("b")), var("c")),
    division_is_left_associative: "a / b / c" => bin("/", bin("/", var("a"), var("b")), var("c")),
    logical_is_left_associative: "a AND b OR c" => bin("OR", bin("AND", var("a"), var("b")), var("c")),
    comparison_chain: "a < b == c" => bin("==", bin("<", var("a"), var("b")), var("c")),
    full_ladder: "a OR b != c + d * e" => bin(
        "OR",
        var("a"),
        bin("!=", var("b"), bin("+", var("c"), bin("*", var("d"), var("e")))),
    ),
    group: "(1 + 2) * 3" => bin("*", group(bin("+", int(1), int(2))), int(3)),
    nested_group: "((x))" => group(group(var("x"))),
    variable: "name" => var("name"),
    call_without_arguments: "f()" => call("f", vec![]),
    call_with_arguments: "f(1, x + 2)" => call("f", vec![int(1), bin("+", var("x"), int(2))]),
    nested_calls: "f(g(h()))" => call("f", vec![call("g", vec![call("h", vec![])])]),
    field_access: "obj.field" => Expr::access(Some(var("obj")), "field"),
    method_call: "obj.method()" => Expr::function(Some(var("obj")), "method", vec![]),
    access_chain: "a.b(1, 2).c" => Expr::access(
        Some(Expr::function(Some(var("a")), "b", vec![int(1), int(2)])),
        "c",
    ),
    long_chain: "a.b.c(d).e" => Expr::access(
        Some(Expr::function(
            Some(Expr::access(Some(var("a")), "b")),
            "c",
            vec![var("d")],
        )),
        "e",
    ),
    chain_binds_tighter: "a.b * c.d()" => bin(
        "*",
        Expr::access(Some(var("a")), "b"),
        Expr::function(Some(var("c")), "d", vec![]),
    ),
    group_receiver: "(a + b).c" => Expr::access(Some(group(bin("+", var("a"), var("b")))), "c"),
    nil: "NIL" => Expr::from(Literal::Nil),
    true_literal: "TRUE" => Expr::from(Literal::Bool(true)),
    false_literal: "FALSE" => Expr::from(Literal::Bool(false)),
    integer: "123" => int(123),
    negative_integer: "-5" => int(-5),
    positive_integer: "+7" => int(7),
    decimal: "1.50" => dec("1.50"),
    negative_decimal: "-0.25" => dec("-0.25"),
    character: "'c'" => Expr::from(Literal::Character('c')),
    string: "\"Hello, World!\"" => string("Hello, World!"),
    empty_string: "\"\"" => string(""),
    escaped_string: "\"a\\tb\\\\c\\\"d\\'e\"" => string("a\tb\\c\"d'e"),
}

macro_rules! escape_tests {
    ($( $name:ident: $escape:expr => $decoded:expr ),+ $(,)?) => {
        $(
            paste! {
                #[test]
                fn [< test_escape_ $name >]() {
                    let character = format!("'{}'", $escape);
                    let string = format!("\"<{}>\"", $escape);

                    assert_eq!(
                        parse_expression(&character),
                        Ok(Expr::from(Literal::Character($decoded)))
                    );
                    assert_eq!(
                        parse_expression(&string),
                        Ok(Expr::from(Literal::String(format!("<{}>", $decoded))))
                    );
                }
            }
        )+
    };
}

escape_tests! {
    backspace: "\\b" => '\u{8}',
    newline: "\\n" => '\n',
    carriage_return: "\\r" => '\r',
    tab: "\\t" => '\t',
    backslash: "\\\\" => '\\',
    single_quote: "\\'" => '\'',
    double_quote: "\\\"" => '"',
}

#[test]
fn test_huge_integer() {
    let literal = "123456789012345678901234567890";

    assert_eq!(
        parse_expression(literal),
        Ok(Expr::from(Literal::Integer(BigInt::from_str(literal).unwrap())))
    );
}

#[test]
fn test_expression_statement() {
    assert_eq!(
        parse_statement("1 + 2 * 3;"),
        Ok(Stmt::Expression(bin(
            "+",
            int(1),
            bin("*", int(2), int(3))
        )))
    );

    assert_eq!(
        parse_statement("print(\"Hello\");"),
        Ok(Stmt::Expression(call("print", vec![string("Hello")])))
    );
}

#[test]
fn test_assignment_statement() {
    assert_eq!(
        parse_statement("obj.count = obj.count + 1;"),
        Ok(Stmt::Assignment(ast::Assignment {
            receiver: Expr::access(Some(var("obj")), "count"),
            value: bin("+", Expr::access(Some(var("obj")), "count"), int(1)),
        }))
    );
}

#[test]
fn test_declaration_statement() {
    assert_eq!(
        parse_statement("LET x;"),
        Ok(Stmt::Declaration(ast::Declaration {
            name: "x".into(),
            type_name: None,
            value: None,
        }))
    );

    assert_eq!(
        parse_statement("LET x: Integer = 1;"),
        Ok(Stmt::Declaration(ast::Declaration {
            name: "x".into(),
            type_name: Some("Integer".into()),
            value: Some(int(1)),
        }))
    );
}

#[test]
fn test_if_statement() {
    assert_eq!(
        parse_statement("IF a DO b(); ELSE c(); d = 1; END"),
        Ok(Stmt::If(ast::If {
            condition: var("a"),
            then_statements: vec![Stmt::Expression(call("b", vec![]))],
            else_statements: vec![
                Stmt::Expression(call("c", vec![])),
                Stmt::Assignment(ast::Assignment {
                    receiver: var("d"),
                    value: int(1),
                }),
            ],
        }))
    );

    assert_eq!(
        parse_statement("IF a == b DO END"),
        Ok(Stmt::If(ast::If {
            condition: bin("==", var("a"), var("b")),
            then_statements: vec![],
            else_statements: vec![],
        }))
    );
}

#[test]
fn test_for_statement() {
    assert_eq!(
        parse_statement("FOR item IN list DO print(item); END"),
        Ok(Stmt::For(ast::For {
            name: "item".into(),
            value: var("list"),
            statements: vec![Stmt::Expression(call("print", vec![var("item")]))],
        }))
    );
}

#[test]
fn test_while_statement() {
    assert_eq!(
        parse_statement("WHILE i < 10 DO i = i + 1; END"),
        Ok(Stmt::While(ast::While {
            condition: bin("<", var("i"), int(10)),
            statements: vec![Stmt::Assignment(ast::Assignment {
                receiver: var("i"),
                value: bin("+", var("i"), int(1)),
            })],
        }))
    );
}

#[test]
fn test_return_statement() {
    assert_eq!(parse_statement("RETURN;"), Ok(Stmt::Return(None)));
    assert_eq!(
        parse_statement("RETURN x * 2;"),
        Ok(Stmt::Return(Some(bin("*", var("x"), int(2)))))
    );
}

#[test]
fn test_nested_blocks() {
    let stmt = parse_statement(
        "WHILE TRUE DO
            IF done() DO RETURN; END
            FOR x IN xs DO LET y = x; END
        END",
    );

    assert_eq!(
        stmt,
        Ok(Stmt::While(ast::While {
            condition: Expr::from(Literal::Bool(true)),
            statements: vec![
                Stmt::If(ast::If {
                    condition: call("done", vec![]),
                    then_statements: vec![Stmt::Return(None)],
                    else_statements: vec![],
                }),
                Stmt::For(ast::For {
                    name: "x".into(),
                    value: var("xs"),
                    statements: vec![Stmt::Declaration(ast::Declaration {
                        name: "y".into(),
                        type_name: None,
                        value: Some(var("x")),
                    })],
                }),
            ],
        }))
    );
}

#[test]
fn test_source() {
    let source = parse_source(
        "LET count: Integer = 0;
        LET name = \"plc\";
        DEF main() DO
            print(name);
            RETURN count;
        END
        DEF add(a, b) DO RETURN a + b; END",
    );

    assert_eq!(
        source,
        Ok(ast::Source {
            fields: vec![
                ast::Field {
                    name: "count".into(),
                    type_name: Some("Integer".into()),
                    value: Some(int(0)),
                },
                ast::Field {
                    name: "name".into(),
                    type_name: None,
                    value: Some(string("plc")),
                },
            ],
            methods: vec![
                ast::Method {
                    name: "main".into(),
                    parameters: vec![],
                    statements: vec![
                        Stmt::Expression(call("print", vec![var("name")])),
                        Stmt::Return(Some(var("count"))),
                    ],
                },
                ast::Method {
                    name: "add".into(),
                    parameters: vec!["a".into(), "b".into()],
                    statements: vec![Stmt::Return(Some(bin("+", var("a"), var("b"))))],
                },
            ],
        })
    );
}

#[test]
fn test_empty_source() {
    assert_eq!(parse_source(""), Ok(ast::Source::default()));
}

#[test]
fn test_missing_semicolon_at_end_of_input() {
    assert_eq!(
        parse_source("LET x = 5"),
        Err(ParseError::new(ParseErrorKind::MissingSemicolon, 9))
    );
    check_statement_error("x = 1", ParseErrorKind::MissingSemicolon, 5);
    check_statement_error("f() g();", ParseErrorKind::MissingSemicolon, 4);
}

#[test]
fn test_argument_errors() {
    check_statement_error("f(1, );", ParseErrorKind::TrailingComma, 5);
    check_statement_error("a.f(1,)", ParseErrorKind::TrailingComma, 6);
    check_statement_error("f(1, 2;", ParseErrorKind::MissingClosingParen, 6);
    check_statement_error("f(a b);", ParseErrorKind::MissingClosingParen, 4);
    check_statement_error("f(1", ParseErrorKind::MissingClosingParen, 3);
}

#[test]
fn test_group_errors() {
    check_statement_error("(1 + 2;", ParseErrorKind::MissingClosingParen, 6);
    check_statement_error("(", ParseErrorKind::InvalidPrimaryExpression, 1);
}

#[test]
fn test_access_errors() {
    check_statement_error("a.;", ParseErrorKind::MissingIdentifier, 2);
    check_statement_error("a.", ParseErrorKind::MissingIdentifier, 2);
    check_statement_error("a.1;", ParseErrorKind::MissingIdentifier, 2);
}

#[test]
fn test_invalid_primary() {
    check_statement_error(";", ParseErrorKind::InvalidPrimaryExpression, 0);
    check_statement_error("x = ;", ParseErrorKind::InvalidPrimaryExpression, 4);
    check_statement_error("1 + * 2;", ParseErrorKind::InvalidPrimaryExpression, 4);
    check_statement_error("", ParseErrorKind::InvalidPrimaryExpression, 0);
}

#[test]
fn test_structural_errors() {
    check_statement_error("IF a DO b();", ParseErrorKind::Expected("`END`"), 12);
    check_statement_error("IF a b();", ParseErrorKind::Expected("`DO`"), 5);
    check_statement_error("FOR 1 IN x DO END", ParseErrorKind::Expected("an identifier"), 4);
    check_statement_error("FOR i x DO END", ParseErrorKind::Expected("`IN`"), 6);
    check_statement_error("LET = 1;", ParseErrorKind::Expected("an identifier"), 4);

    assert_eq!(
        parse_source("DEF f(a, ) DO END"),
        Err(ParseError::new(ParseErrorKind::TrailingComma, 9))
    );
    assert_eq!(
        parse_source("DEF f(a DO END"),
        Err(ParseError::new(ParseErrorKind::MissingClosingParen, 8))
    );
    assert_eq!(
        parse_source("DEF f() DO END LET x;"),
        Err(ParseError::new(ParseErrorKind::Expected("`DEF`"), 15))
    );
}

#[test]
fn test_error_display() {
    let error = parse_source("DEF f() RETURN; END").unwrap_err();

    assert_debug_snapshot!(error, @r###"
    ParseError {
        kind: Expected(
            "`DO`",
        ),
        offset: 8,
    }
    "###);
    assert_eq!(error.to_string(), "syntax analysis failed: expected `DO`");
}

#[test]
fn test_malformed_literal() {
    let tokens = vec![
        Token::new(TokenKind::Character, "'ab'", 0),
        Token::new(TokenKind::Operator, ";", 4),
    ];

    assert_eq!(
        Parser::new(&tokens).parse_statement(),
        Err(ParseError::new(ParseErrorKind::MalformedLiteral, 0))
    );
}

#[test]
fn test_recursion_limit() {
    let deep = tokens(&format!("{}1{};", "(".repeat(1000), ")".repeat(1000)));

    assert_eq!(
        Parser::new(&deep).with_recursion_limit(20).parse_statement(),
        Err(ParseError::new(ParseErrorKind::RecursionLimit, 20))
    );

    let shallow = tokens(&format!("{}1{};", "(".repeat(10), ")".repeat(10)));
    let expected = (0..10).fold(int(1), |expr, _| group(expr));

    assert_eq!(
        Parser::new(&shallow).with_recursion_limit(20).parse_statement(),
        Ok(Stmt::Expression(expected))
    );
}

fn nested(open: &str, depth: usize, close: &str) -> Vec<Token> {
    tokens(&format!("{}1{};", open.repeat(depth), close.repeat(depth)))
}

#[test]
fn test_default_recursion_limit() {
    let depth = DEFAULT_RECURSION_LIMIT - 1;

    let groups = nested("(", depth, ")");
    let expected = (0..depth).fold(int(1), |expr, _| group(expr));

    assert_eq!(
        Parser::new(&groups).parse_statement(),
        Ok(Stmt::Expression(expected))
    );

    let calls = nested("f(", depth, ")");
    let expected = (0..depth).fold(int(1), |expr, _| call("f", vec![expr]));

    assert_eq!(
        Parser::new(&calls).parse_statement(),
        Ok(Stmt::Expression(expected))
    );
}

#[test]
fn test_default_recursion_limit_exceeded() {
    let depth = DEFAULT_RECURSION_LIMIT * 3;

    assert_eq!(
        Parser::new(&nested("(", depth, ")")).parse_statement(),
        Err(ParseError::new(
            ParseErrorKind::RecursionLimit,
            DEFAULT_RECURSION_LIMIT
        ))
    );
    assert_eq!(
        Parser::new(&nested("f(", depth, ")")).parse_statement(),
        Err(ParseError::new(
            ParseErrorKind::RecursionLimit,
            2 * DEFAULT_RECURSION_LIMIT
        ))
    );
}

#[test]
fn test_recursion_limit_on_blocks() {
    let input = format!("{}{}", "WHILE x DO ".repeat(5), "END ".repeat(5));
    let tokens = tokens(&input);

    let result = Parser::new(&tokens).with_recursion_limit(4).parse_statement();

    assert_eq!(result.map_err(|e| e.kind()), Err(ParseErrorKind::RecursionLimit));
}

#[test]
fn test_parser_consumes_only_one_statement() {
    let tokens = tokens("a; b;");
    let mut parser = Parser::new(&tokens);

    assert_eq!(parser.parse_statement(), Ok(Stmt::Expression(var("a"))));
    assert_eq!(parser.parse_statement(), Ok(Stmt::Expression(var("b"))));
    assert!(!parser.peek(&[&TokenKind::Identifier]));
}

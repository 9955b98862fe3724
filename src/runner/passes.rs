use std::io;

use tracing::{debug, info};

use plc::ast;
use plc::dump::{dump_ast, dump_tokens};
use plc::parse::{Parser, Token};
use plc::source::SourceId;

use super::config::OutputKind;
use super::{PassOutput, RunnerCtx};

pub fn load_files(ctx: &mut RunnerCtx<'_>) -> PassOutput<()> {
    for path in &ctx.config.paths {
        let loaded = ctx.source.borrow_mut().load(path.clone());

        if let Err(e) = loaded {
            ctx.diagnostics
                .error()
                .with_message(format!("could not load file {}", path.display()))
                .with_source(Box::new(e))
                .emit();
        }
    }

    ctx.stop_if_errors(())
}

pub fn lex_files(ctx: &mut RunnerCtx<'_>) -> PassOutput<Vec<(SourceId, Vec<Token>)>> {
    let mut result = Vec::new();
    let source = ctx.source.clone();

    for src_file in source.borrow().iter() {
        match plc::lex(src_file.text()) {
            Ok(tokens) => {
                debug!(path = %src_file.path().display(), count = tokens.len(), "lexed");
                result.push((src_file.id(), tokens));
            }

            Err(e) => ctx
                .diagnostics
                .error()
                .with_offset_and_error(src_file.id(), e)
                .emit(),
        }
    }

    ctx.stop_if_errors(result)
}

pub fn dump_tokens_if_asked(
    ctx: &mut RunnerCtx<'_>,
    tokens: Vec<(SourceId, Vec<Token>)>,
) -> PassOutput<Vec<(SourceId, Vec<Token>)>> {
    let OutputKind::Lexer(format) = ctx.config.output else {
        return PassOutput::continue_with_output(tokens);
    };

    for (_, file_tokens) in &tokens {
        if let Err(e) = dump_tokens(format, file_tokens, io::stdout()) {
            ctx.diagnostics
                .error()
                .with_message("could not dump the tokens to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    PassOutput::stop_with_output(tokens)
}

pub fn parse_all(
    ctx: &mut RunnerCtx<'_>,
    tokens: Vec<(SourceId, Vec<Token>)>,
) -> PassOutput<Vec<ast::Source>> {
    let mut result = Vec::with_capacity(tokens.len());

    for (source_id, file_tokens) in &tokens {
        let mut parser =
            Parser::new(file_tokens).with_recursion_limit(ctx.config.recursion_limit);

        match parser.parse_source() {
            Ok(ast) => result.push(ast),

            Err(e) => ctx
                .diagnostics
                .error()
                .with_offset_and_error(*source_id, e)
                .emit(),
        }
    }

    ctx.stop_if_errors(result)
}

pub fn dump_asts(ctx: &mut RunnerCtx<'_>, asts: Vec<ast::Source>) -> PassOutput<()> {
    let OutputKind::Parser(format) = ctx.config.output else {
        return PassOutput::continue_with_output(());
    };

    for ast in &asts {
        if let Err(e) = dump_ast(format, ast, io::stdout()) {
            ctx.diagnostics
                .error()
                .with_message("could not dump an ast to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    info!(files = asts.len(), "parsed");

    PassOutput::stop_with_output(())
}

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use plc::errors::{Diagnostic, Diagnostics};
use plc::source::Source;

use self::config::{parse_args_or_exit, PlcConfig};
use self::errors::print_diagnostic;

pub mod config;
mod errors;
mod passes;

pub enum CompilationControl {
    Continue,
    Stop,
}

pub struct PassOutput<O> {
    pub output: O,
    pub compilation_control: CompilationControl,
}

impl<O> PassOutput<O> {
    pub fn stop_with_output(output: O) -> Self {
        Self {
            output,
            compilation_control: CompilationControl::Stop,
        }
    }

    pub fn continue_with_output(output: O) -> Self {
        Self {
            output,
            compilation_control: CompilationControl::Continue,
        }
    }
}

pub struct RunnerCtx<'emt> {
    pub config: PlcConfig,
    pub source: Rc<RefCell<Source>>,
    pub diagnostics: Diagnostics<'emt>,
}

impl RunnerCtx<'_> {
    pub fn stop_if_errors<O>(&self, output: O) -> PassOutput<O> {
        PassOutput {
            output,
            compilation_control: if self.diagnostics.has_errors() {
                CompilationControl::Stop
            } else {
                CompilationControl::Continue
            },
        }
    }
}

macro_rules! return_if_stopped {
    ($ctx:expr, $e:expr) => {
        match $e {
            PassOutput {
                compilation_control: CompilationControl::Stop,
                ..
            } => {
                return if $ctx.diagnostics.has_errors() {
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                }
            }

            PassOutput { output, .. } => output,
        }
    };
}

fn run(mut ctx: RunnerCtx<'_>) -> ExitCode {
    return_if_stopped!(ctx, passes::load_files(&mut ctx));

    // lexical analysis
    let tokens = return_if_stopped!(ctx, passes::lex_files(&mut ctx));
    let tokens = return_if_stopped!(ctx, passes::dump_tokens_if_asked(&mut ctx, tokens));

    // syntax analysis
    let asts = return_if_stopped!(ctx, passes::parse_all(&mut ctx, tokens));
    return_if_stopped!(ctx, passes::dump_asts(&mut ctx, asts));

    if ctx.diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub fn prepare_and_run() -> ExitCode {
    let config = parse_args_or_exit();
    let source = Rc::new(RefCell::new(Source::new()));

    let mut diagnostics = Diagnostics::new();

    diagnostics.set_emitter({
        let source = source.clone();

        Box::new(move |diagnostic: &Diagnostic| {
            print_diagnostic(&source.borrow(), diagnostic);
        })
    });

    let ctx = RunnerCtx {
        config,
        source,
        diagnostics,
    };

    run(ctx)
}

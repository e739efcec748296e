//! Owns the pipeline state for one `lp` invocation: the source map, the
//! diagnostic handler, and the phase-by-phase walk from source text to
//! a linked executable (or printed IR).

use std::path::PathBuf;

use inkwell::context::Context;
use thiserror::Error;

use lpc_lex::Lexer;
use lpc_opt::fold;
use lpc_par::Parser;
use lpc_util::{Handler, SourceMap};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("E: cannot read '{path}'", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("E: lex")]
    Lex,

    /// Never constructed by this parser (`Parser::parse` always returns a
    /// tree, even from malformed token soup) but kept so a future
    /// error-returning parser doesn't need a new top-level variant.
    #[error("E: parse")]
    Parse,

    #[error("E: emit")]
    Emit(#[source] lpc_gen::CodeGenError),

    #[error("E: compile")]
    Link(#[source] lpc_gen::CodeGenError),
}

pub struct Session {
    pub sources: SourceMap,
    pub handler: Handler,
}

impl Session {
    pub fn new() -> Self {
        Session {
            sources: SourceMap::new(),
            handler: Handler::new(),
        }
    }

    /// Runs the full pipeline for one input file, stopping at the first
    /// hard failure. Always flushes any accumulated non-fatal
    /// diagnostics to stderr before returning, success or not.
    pub fn compile(&mut self, config: &Config) -> Result<(), CompileError> {
        let result = self.run(config);
        for diag in self.handler.diagnostics() {
            eprintln!("{diag}");
        }
        result
    }

    fn run(&mut self, config: &Config) -> Result<(), CompileError> {
        tracing::info!(path = %config.input.display(), "reading");
        let content = std::fs::read_to_string(&config.input).map_err(|e| CompileError::Read {
            path: config.input.clone(),
            source: e,
        })?;
        let file_id = self.sources.add_file(config.input.clone(), content);
        let source = &self.sources.get(file_id).content;

        tracing::debug!("lexing");
        let tokens = Lexer::new(source, file_id).tokenize();
        if matches!(tokens.last(), Some(t) if t.kind.is_error()) {
            return Err(CompileError::Lex);
        }

        tracing::debug!("parsing");
        let ast = Parser::new(&tokens).parse();

        tracing::debug!("folding");
        let ast = fold(ast);

        tracing::debug!("codegen");
        let context = Context::create();
        let module_name = config.input.to_string_lossy();
        let mut codegen = lpc_gen::CodeGen::new(&context, &module_name, None, config.opt_level)
            .map_err(CompileError::Emit)?;
        codegen
            .compile_program(&ast, &self.handler)
            .map_err(CompileError::Emit)?;

        if config.emit_llvm {
            let ir = codegen.emit_ir();
            if config.output == PathBuf::from("a.out") {
                print!("{ir}");
            } else {
                std::fs::write(&config.output, ir)
                    .map_err(|e| CompileError::Emit(lpc_gen::CodeGenError::Io(e)))?;
            }
            return Ok(());
        }

        let object_path = PathBuf::from(format!("{}.o", config.output.display()));
        codegen
            .write_object_file(&object_path)
            .map_err(CompileError::Emit)?;

        tracing::debug!("linking");
        lpc_gen::link(&object_path, &config.output, config.opt_level)
            .map_err(CompileError::Link)?;

        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

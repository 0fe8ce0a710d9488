//! # Introduction
//!
//! cir2c translates CIR, a small indentation-delimited language, into a C
//! source skeleton. Block structure comes entirely from leading whitespace;
//! the generated C carries an include section, a header/macro/typedef
//! section, and a function-body section.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Syntax tree → Generator → C text
//! ```
//!
//! 1. [`parser::lexer`] — tokenises the source; every token keeps its exact
//!    source slice, so the token stream round-trips to the input.
//! 2. [`parser::parser`] — derives nesting from indentation magnitude and
//!    builds a forest of [`parser::ast::SyntaxNode`]s.
//! 3. [`codegen`] — walks the tree once, tracking variable types and
//!    mutability, conditional-compilation modes, and a pool of synthesized
//!    loop counters, and accumulates the three output streams.
//!
//! The whole pipeline is pure and synchronous: no I/O, no shared state
//! across runs, deterministic output. Shells (the CLI in `main.rs`, or any
//! other front end) own file handling and error reporting.

pub mod codegen;
pub mod parser;

use codegen::errors::GenError;
use codegen::generator::Generator;
use parser::lexer::{LexError, Lexer};
use parser::parser::{ParseError, Parser};
use std::fmt;

/// Any failure the pipeline can produce, by stage.
#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Gen(GenError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(err) => write!(f, "{}", err),
            CompileError::Parse(err) => write!(f, "{}", err),
            CompileError::Gen(err) => write!(f, "Generation error: {}", err),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<GenError> for CompileError {
    fn from(err: GenError) -> Self {
        CompileError::Gen(err)
    }
}

/// Compile CIR source text to C source text.
///
/// Pure function of the input: no I/O, fresh state per call. Errors from
/// any stage abort the run; there is no partial output.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    let nodes = Parser::new(tokens).parse()?;
    let output = Generator::new().generate(&nodes)?;
    Ok(output)
}

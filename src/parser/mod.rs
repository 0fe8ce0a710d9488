//! CIR front end
//!
//! This module transforms CIR source text into a syntax tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Indentation-driven parsing (tokens → syntax tree)
//! - [`ast`]: Syntax node definitions
//!
//! # The CIR surface
//!
//! CIR is indentation-delimited: there are no begin/end tokens, and block
//! nesting is computed from leading-whitespace width relative to the unit
//! established by the first indented line. Statements cover structure and
//! method declarations, typed variable declarations (immutable unless
//! prefixed with MUTABLE), assignments, calls, control flow (IF/ELSEIF/
//! ELSE, WHILE, FOR, REPEAT), compile-time mode selection (SETMODE /
//! DEFAULT / DEFINE / CHOOSE), and PASS/TODO placeholders.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with an explicit cursor save/restore for
//! dedents. Expressions are not parsed into sub-trees: condition, argument,
//! and assignment token runs are captured verbatim for the code generator to
//! re-render.

pub mod ast;
pub mod lexer;
pub mod parser;
mod statements;

//! Code generation error types
//!
//! This module defines [`GenError`], which represents all semantic errors
//! raised while walking the syntax tree (as opposed to lexical or parse
//! errors). All generation errors are fatal: the pipeline run aborts and no
//! partial output is produced.

use std::fmt;

/// Semantic errors that can occur during code generation
#[derive(Debug, Clone)]
pub enum GenError {
    /// Assignment to (or lookup of) a variable with no prior declaration
    UndeclaredVariable { name: String, line: usize },

    /// A CIR type name with no entry in the type table
    UnknownType { name: String, line: usize },

    /// DEFINE/DEFAULT/CHOOSE referenced a mode never introduced by SETMODE
    UndefinedMode { mode: String, line: usize },

    /// An option outside the mode's registered option set
    InvalidOption {
        mode: String,
        option: String,
        valid: String,
        line: usize,
    },

    /// A method call at nesting depth 0
    TopLevelCall { name: String, line: usize },

    /// No free slot left in the temporary-name pool
    TempPoolExhausted { capacity: usize, line: usize },

    /// Internal: an emit-indentation group was closed without being opened
    NoOpenGroup,

    /// A node or child shape the generator does not implement
    Unsupported { what: String, line: usize },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::UndeclaredVariable { name, line } => {
                write!(f, "Undeclared variable '{}' at line {}", name, line)
            }
            GenError::UnknownType { name, line } => {
                write!(f, "Unknown type '{}' at line {}", name, line)
            }
            GenError::UndefinedMode { mode, line } => {
                write!(
                    f,
                    "Mode '{}' at line {} was never declared with SETMODE",
                    mode, line
                )
            }
            GenError::InvalidOption {
                mode,
                option,
                valid,
                line,
            } => {
                write!(
                    f,
                    "'{}' is not an option of mode '{}' at line {} (valid options: {})",
                    option, mode, line, valid
                )
            }
            GenError::TopLevelCall { name, line } => {
                write!(
                    f,
                    "Cannot call '{}' at top level (line {}): calls are only valid inside a body",
                    name, line
                )
            }
            GenError::TempPoolExhausted { capacity, line } => {
                write!(
                    f,
                    "Temporary pool exhausted at line {}: all {} loop counters are in use",
                    line, capacity
                )
            }
            GenError::NoOpenGroup => {
                write!(f, "Internal generator error: no open group to end")
            }
            GenError::Unsupported { what, line } => {
                write!(f, "Not implemented: {} at line {}", what, line)
            }
        }
    }
}

impl std::error::Error for GenError {}

//! C back end
//!
//! This module turns the syntax tree into C source text:
//! - [`generator`]: the tree walker, emission streams, and expression
//!   rendering
//! - [`types`]: the type table and the variable type environment
//! - [`modes`]: the conditional-compilation mode registry
//! - [`temps`]: the loop-counter name pool
//! - [`errors`]: semantic error definitions
//!
//! Output is a skeleton: structurally valid C whose bodies may contain
//! placeholder statements where the source used PASS or TODO.

pub mod errors;
pub mod generator;
pub mod modes;
mod statements;
pub mod temps;
pub mod types;

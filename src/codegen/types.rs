//! Type table and type environment
//!
//! The type table maps CIR type names to their C spellings; it is seeded
//! with the built-ins and grows one opaque entry per STRUCTURE. The type
//! environment records every declared variable's C type and mutability so
//! assignments can choose between a plain write and a value macro.
//!
//! There is no block scoping: names are never removed from the environment,
//! so a name declared inside one body shadows nothing and leaks into the
//! rest of the unit. This matches the source language's flat-namespace
//! semantics.

use crate::codegen::errors::GenError;
use crate::parser::ast::CirType;
use rustc_hash::FxHashMap;

/// CIR type name → C type spelling.
pub struct TypeTable {
    map: FxHashMap<String, String>,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert("Int".to_string(), "int".to_string());
        map.insert("Byte".to_string(), "unsigned char".to_string());
        Self { map }
    }

    /// STRUCTURE names become opaque typedefs that map to themselves.
    pub fn register_structure(&mut self, name: &str) {
        self.map.insert(name.to_string(), name.to_string());
    }

    pub fn resolve(&self, name: &str, line: usize) -> Result<&str, GenError> {
        self.map
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| GenError::UnknownType {
                name: name.to_string(),
                line,
            })
    }

    /// Render a (possibly array-shaped) parameter: `int buf[8][8]`.
    pub fn render_param(
        &self,
        ty: &CirType,
        name: &str,
        line: usize,
    ) -> Result<String, GenError> {
        let base = self.resolve(&ty.base, line)?;
        let mut rendered = format!("{} {}", base, name);
        for dim in &ty.dims {
            rendered.push('[');
            rendered.push_str(dim);
            rendered.push(']');
        }
        Ok(rendered)
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// What the generator knows about one declared variable.
#[derive(Debug, Clone)]
pub struct VarInfo {
    pub c_type: String,
    pub mutable: bool,
}

/// Variable name → declared type and mutability.
#[derive(Default)]
pub struct TypeEnv {
    map: FxHashMap<String, VarInfo>,
}

impl TypeEnv {
    pub fn declare(&mut self, name: &str, c_type: &str, mutable: bool) {
        self.map.insert(
            name.to_string(),
            VarInfo {
                c_type: c_type.to_string(),
                mutable,
            },
        );
    }

    pub fn lookup(&self, name: &str, line: usize) -> Result<&VarInfo, GenError> {
        self.map
            .get(name)
            .ok_or_else(|| GenError::UndeclaredVariable {
                name: name.to_string(),
                line,
            })
    }
}

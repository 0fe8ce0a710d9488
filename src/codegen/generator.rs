//! C code generation engine
//!
//! Walks the syntax tree depth-first, accumulating output into three ordered
//! streams (`includes`, `header_lines`, `code_lines`) that are concatenated
//! at the end. The generator threads all of its mutable state — the type
//! environment, the mode registry, the temporary pool, the emit-indent
//! counter, and the body-nesting depth — through itself, so a fresh
//! `Generator` per run keeps generation deterministic and re-entrant.
//!
//! Expression rendering is textual: token runs captured verbatim by the
//! parser are reassembled with the three word-operator spellings rewritten
//! to their C symbols. No operator arity or operand types are checked.

use crate::codegen::errors::GenError;
use crate::codegen::modes::ModeRegistry;
use crate::codegen::temps::TempPool;
use crate::codegen::types::{TypeEnv, TypeTable};
use crate::parser::ast::{NodeKind, SyntaxNode};
use crate::parser::lexer::{Token, TokenKind};

/// Width of one emitted indentation level, in spaces.
const EMIT_INDENT: usize = 4;

/// The code generator: owns every piece of per-run state.
pub struct Generator {
    /// Include section of the output. The output contract orders it first,
    /// ahead of the header and body sections; no CIR construct emits an
    /// include yet, so it assembles empty today.
    pub(crate) includes: Vec<String>,
    pub(crate) header_lines: Vec<String>,
    pub(crate) code_lines: Vec<String>,
    /// Emit-indentation level for `code_lines`, adjusted in matched pairs
    /// around every nested body.
    emit_level: usize,
    /// Tree-nesting depth; 0 means top level, where calls are illegal.
    pub(crate) depth: usize,
    pub(crate) types: TypeTable,
    pub(crate) env: TypeEnv,
    pub(crate) modes: ModeRegistry,
    pub(crate) temps: TempPool,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            includes: Vec::new(),
            header_lines: Vec::new(),
            code_lines: Vec::new(),
            emit_level: 0,
            depth: 0,
            types: TypeTable::new(),
            env: TypeEnv::default(),
            modes: ModeRegistry::default(),
            temps: TempPool::new(),
        }
    }

    /// Generate C source for a parsed forest. Deterministic: the same tree
    /// through a fresh generator yields byte-identical output.
    pub fn generate(&mut self, nodes: &[SyntaxNode]) -> Result<String, GenError> {
        for node in nodes {
            self.generate_node(node)?;
        }
        Ok(self.assemble())
    }

    /// Exhaustive dispatch over every node kind.
    pub(crate) fn generate_node(&mut self, node: &SyntaxNode) -> Result<(), GenError> {
        match &node.kind {
            // Source comments are elided from output (reserved for a future
            // doc-comment pass-through).
            NodeKind::Comment { .. } => Ok(()),
            NodeKind::Declaration {
                declared_type,
                names,
                mutable,
            } => self.gen_declaration(declared_type, names, *mutable, node.line),
            NodeKind::Assignment { name, expression } => {
                self.gen_assignment(name, expression, node.line)
            }
            NodeKind::Structure { name } => self.gen_structure(name, node),
            NodeKind::MethodDeclaration {
                name,
                params,
                return_type,
            } => self.gen_method(name, params, return_type.as_deref(), node),
            NodeKind::MethodCall { name, arguments } => {
                self.gen_call(name, arguments, node.line)
            }
            NodeKind::If { condition } => self.gen_branch("if", Some(condition), node),
            NodeKind::ElseIf { condition } => self.gen_branch("else if", Some(condition), node),
            NodeKind::Else => self.gen_branch("else", None, node),
            NodeKind::While { condition } => self.gen_branch("while", Some(condition), node),
            NodeKind::For { from, to } => self.gen_for(from, to, node),
            NodeKind::Repeat { count } => self.gen_repeat(count, node),
            NodeKind::Choose { mode } => self.gen_choose(mode, node),
            NodeKind::ChooseOption { .. } => Err(GenError::Unsupported {
                what: "a CHOOSE option group outside a CHOOSE block".to_string(),
                line: node.line,
            }),
            NodeKind::Pass | NodeKind::Todo => {
                self.emit_code("; /* TODO */");
                Ok(())
            }
            NodeKind::DefaultDefine { mode, option } => {
                self.gen_default_define(mode, option, node.line)
            }
            NodeKind::Define { mode, option } => self.gen_define(mode, option, node.line),
            NodeKind::SetMode { mode, options } => self.gen_setmode(mode, options),
            NodeKind::Return { expression } => {
                let rendered = render_expression(expression);
                if rendered.is_empty() {
                    self.emit_code("return;");
                } else {
                    self.emit_code(&format!("return {};", rendered));
                }
                Ok(())
            }
        }
    }

    /// Generate a nested body: open an indent group, bump the nesting
    /// depth, walk the children, and close the group again. Every body
    /// opening is paired with exactly one closing.
    pub(crate) fn generate_body(&mut self, node: &SyntaxNode) -> Result<(), GenError> {
        self.open_group();
        self.depth += 1;
        for child in &node.children {
            self.generate_node(child)?;
        }
        self.depth -= 1;
        self.close_group()
    }

    // --- emission -------------------------------------------------------

    /// Append a line to the code stream at the current emit indent.
    pub(crate) fn emit_code(&mut self, line: &str) {
        let indent = " ".repeat(self.emit_level * EMIT_INDENT);
        self.code_lines.push(format!("{}{}", indent, line));
    }

    /// Append a line to the code stream at column 0 (preprocessor lines).
    pub(crate) fn emit_code_unindented(&mut self, line: &str) {
        self.code_lines.push(line.to_string());
    }

    /// Append a line to the header/macro/typedef stream.
    pub(crate) fn emit_header(&mut self, line: String) {
        self.header_lines.push(line);
    }

    pub(crate) fn open_group(&mut self) {
        self.emit_level += 1;
    }

    pub(crate) fn close_group(&mut self) -> Result<(), GenError> {
        if self.emit_level == 0 {
            return Err(GenError::NoOpenGroup);
        }
        self.emit_level -= 1;
        Ok(())
    }

    /// Concatenate the three streams — includes, header, code — separated
    /// by blank lines, skipping empty streams.
    fn assemble(&self) -> String {
        let sections: Vec<String> = [&self.includes, &self.header_lines, &self.code_lines]
            .into_iter()
            .filter(|stream| !stream.is_empty())
            .map(|stream| stream.join("\n"))
            .collect();
        if sections.is_empty() {
            return String::new();
        }
        let mut output = sections.join("\n\n");
        output.push('\n');
        output
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a captured token run as C expression text.
///
/// Purely textual: whitespace tokens are dropped, the word operators AND /
/// OR / EQUALS become `&&` / `||` / `==`, and everything else passes
/// through verbatim with canonical spacing.
pub(crate) fn render_expression(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<TokenKind> = None;
    for tok in tokens {
        if matches!(tok.kind, TokenKind::Spaces | TokenKind::LineBreak) {
            continue;
        }
        let text = if tok.kind == TokenKind::Operator {
            match tok.upper().as_str() {
                "AND" => "&&".to_string(),
                "OR" => "||".to_string(),
                "EQUALS" => "==".to_string(),
                _ => tok.text.clone(),
            }
        } else {
            tok.text.clone()
        };

        let needs_space = match (prev, tok.kind) {
            (None, _) => false,
            (Some(TokenKind::OpenParen), _) => false,
            (_, TokenKind::CloseParen | TokenKind::Comma) => false,
            // Call style: `name(` with no gap.
            (Some(TokenKind::Word | TokenKind::Number), TokenKind::OpenParen) => false,
            _ => true,
        };
        if needs_space {
            out.push(' ');
        }
        out.push_str(&text);
        prev = Some(tok.kind);
    }
    out
}

//! Per-node C emission
//!
//! All node emitters are implemented as `pub(crate)` methods on
//! [`Generator`], letting them read and update the generator's state (type
//! environment, mode registry, temporary pool, emit indent).

use crate::codegen::errors::GenError;
use crate::codegen::generator::{render_expression, Generator};
use crate::codegen::modes::ModeRegistry;
use crate::parser::ast::{NodeKind, Param, SyntaxNode};
use crate::parser::lexer::{Token, TokenKind};

impl Generator {
    /// Variable declaration. Mutable names become C variables; immutable
    /// names are only recorded — their binding materializes as a value
    /// macro when they are assigned, and emitting `int x;` next to
    /// `#define x …` would be mangled by the preprocessor.
    pub(crate) fn gen_declaration(
        &mut self,
        declared_type: &str,
        names: &[String],
        mutable: bool,
        line: usize,
    ) -> Result<(), GenError> {
        if declared_type == "Array" {
            return Err(GenError::Unsupported {
                what: "an Array declaration outside a STRUCTURE".to_string(),
                line,
            });
        }
        let c_type = self.types.resolve(declared_type, line)?.to_string();
        for name in names {
            self.env.declare(name, &c_type, mutable);
            if mutable {
                self.emit_code(&format!("{} {};", c_type, name));
            }
        }
        Ok(())
    }

    /// Assignment. A mutable target gets a plain write; an immutable target
    /// becomes a compile-time constant via a value macro in the header.
    pub(crate) fn gen_assignment(
        &mut self,
        name: &str,
        expression: &[Token],
        line: usize,
    ) -> Result<(), GenError> {
        let var = self.env.lookup(name, line)?.clone();
        let rendered = render_expression(expression);
        if var.mutable {
            self.emit_code(&format!("{} = {};", name, rendered));
        } else {
            self.emit_header(format!("#define {} (({}) {})", name, var.c_type, rendered));
        }
        Ok(())
    }

    /// `STRUCTURE Name:` becomes a typedef in the header stream. An
    /// Array-shaped child yields an array typedef; a placeholder child
    /// yields an opaque stub.
    pub(crate) fn gen_structure(
        &mut self,
        name: &str,
        node: &SyntaxNode,
    ) -> Result<(), GenError> {
        self.types.register_structure(name);

        let child = node.children.first().ok_or_else(|| GenError::Unsupported {
            what: format!("STRUCTURE '{}' with no child", name),
            line: node.line,
        })?;
        match &child.kind {
            NodeKind::Declaration {
                declared_type,
                names,
                ..
            } if declared_type == "Array" => {
                let (element, dims) = names.split_first().ok_or_else(|| {
                    GenError::Unsupported {
                        what: format!("STRUCTURE '{}' Array child with no element type", name),
                        line: child.line,
                    }
                })?;
                let element_c = self.types.resolve(element, child.line)?.to_string();
                let suffix: String = dims.iter().map(|d| format!("[{}]", d)).collect();
                self.emit_header(format!("typedef {} {}{};", element_c, name, suffix));
                Ok(())
            }
            NodeKind::Pass | NodeKind::Todo => {
                self.emit_header(format!("typedef struct {0} {0};", name));
                Ok(())
            }
            other => Err(GenError::Unsupported {
                what: format!(
                    "STRUCTURE '{}' child of kind {}",
                    name,
                    other.name()
                ),
                line: child.line,
            }),
        }
    }

    /// Method declaration: forward declaration to the header stream, full
    /// definition to the code stream. An empty parameter list renders as
    /// the canonical `(void)`.
    pub(crate) fn gen_method(
        &mut self,
        name: &str,
        params: &[Param],
        return_type: Option<&str>,
        node: &SyntaxNode,
    ) -> Result<(), GenError> {
        let ret = match return_type {
            Some(ty) => self.types.resolve(ty, node.line)?.to_string(),
            None => "void".to_string(),
        };

        let rendered_params = if params.is_empty() {
            "void".to_string()
        } else {
            let mut rendered = Vec::with_capacity(params.len());
            for param in params {
                rendered.push(self.types.render_param(&param.ty, &param.name, node.line)?);
                // Parameters take part in expression type inference just
                // like declared variables.
                self.env.declare(
                    &param.name,
                    self.types.resolve(&param.ty.base, node.line)?,
                    true,
                );
            }
            rendered.join(", ")
        };

        self.emit_header(format!("{} {}({});", ret, name, rendered_params));
        self.emit_code(&format!("{} {}({}) {{", ret, name, rendered_params));
        self.generate_body(node)?;
        self.emit_code("}");
        Ok(())
    }

    /// Method call — only legal inside a body.
    pub(crate) fn gen_call(
        &mut self,
        name: &str,
        arguments: &[Token],
        line: usize,
    ) -> Result<(), GenError> {
        if self.depth == 0 {
            return Err(GenError::TopLevelCall {
                name: name.to_string(),
                line,
            });
        }
        self.emit_code(&format!("{}({});", name, render_expression(arguments)));
        Ok(())
    }

    /// Shared shape for if / else if / else / while.
    pub(crate) fn gen_branch(
        &mut self,
        keyword: &str,
        condition: Option<&[Token]>,
        node: &SyntaxNode,
    ) -> Result<(), GenError> {
        match condition {
            Some(tokens) => {
                self.emit_code(&format!("{} ({}) {{", keyword, render_expression(tokens)));
            }
            None => self.emit_code(&format!("{} {{", keyword)),
        }
        self.generate_body(node)?;
        self.emit_code("}");
        Ok(())
    }

    /// Canonical counted loop. The from-clause supplies both the
    /// initializer and the iterator name (its first identifier token); the
    /// to-clause is the inclusive upper bound.
    pub(crate) fn gen_for(
        &mut self,
        from: &[Token],
        to: &[Token],
        node: &SyntaxNode,
    ) -> Result<(), GenError> {
        let iterator = from
            .iter()
            .find(|t| t.kind == TokenKind::Word)
            .map(|t| t.text.clone())
            .ok_or_else(|| GenError::Unsupported {
                what: "a FOR from-clause without an iterator variable".to_string(),
                line: node.line,
            })?;
        self.emit_code(&format!(
            "for ({}; {} <= {}; {}++) {{",
            render_expression(from),
            iterator,
            render_expression(to),
            iterator
        ));
        self.generate_body(node)?;
        self.emit_code("}");
        Ok(())
    }

    /// `REPEAT n TIMES:` — a zero-based counted loop over a pool-assigned
    /// counter. The slot is held for the lifetime of the loop and released
    /// once the body has been generated.
    pub(crate) fn gen_repeat(
        &mut self,
        count: &[Token],
        node: &SyntaxNode,
    ) -> Result<(), GenError> {
        let slot = self.temps.acquire(node.line)?;
        self.emit_code(&format!(
            "for (int {0} = 0; {0} < {1}; {0}++) {{",
            slot.name,
            render_expression(count)
        ));
        self.generate_body(node)?;
        self.emit_code("}");
        self.temps.release(&slot);
        Ok(())
    }

    /// `CHOOSE mode:` — one preprocessor-conditional block per option
    /// group, gated on that option's macro. Preprocessor lines go out at
    /// column 0.
    pub(crate) fn gen_choose(&mut self, mode: &str, node: &SyntaxNode) -> Result<(), GenError> {
        self.modes.get(mode, node.line)?;
        for child in &node.children {
            let option = match &child.kind {
                NodeKind::ChooseOption { option } => option.clone(),
                other => {
                    return Err(GenError::Unsupported {
                        what: format!("a {} inside CHOOSE '{}'", other.name(), mode),
                        line: child.line,
                    });
                }
            };
            self.modes.validate(mode, &option, child.line)?;
            let gate = ModeRegistry::macro_name(mode, &option);
            self.emit_code_unindented(&format!("#ifdef {}", gate));
            self.generate_body(child)?;
            self.emit_code_unindented("#endif");
        }
        Ok(())
    }

    /// `SETMODE mode(options…)` — registers the mode and documents the
    /// option macros in the header.
    pub(crate) fn gen_setmode(
        &mut self,
        mode: &str,
        options: &[String],
    ) -> Result<(), GenError> {
        self.modes.register(mode, options.to_vec());
        let macros: Vec<String> = options
            .iter()
            .map(|o| ModeRegistry::macro_name(mode, o))
            .collect();
        self.emit_header(format!("/* mode {}: {} */", mode, macros.join(" ")));
        Ok(())
    }

    /// `DEFAULT mode = option` — defines the default's macro only when no
    /// option of the mode has been chosen, giving it the lowest priority.
    /// The registry selection is likewise only filled in, never replaced:
    /// an option a DEFINE already activated unconditionally stays the one
    /// the next DEFINE undefines.
    pub(crate) fn gen_default_define(
        &mut self,
        mode: &str,
        option: &str,
        line: usize,
    ) -> Result<(), GenError> {
        self.modes.select_default(mode, option, line)?;
        let guard: Vec<String> = self
            .modes
            .get(mode, line)?
            .options
            .iter()
            .map(|o| format!("!defined({})", ModeRegistry::macro_name(mode, o)))
            .collect();
        self.emit_header(format!("#if {}", guard.join(" && ")));
        self.emit_header(format!("#define {}", ModeRegistry::macro_name(mode, option)));
        self.emit_header("#endif".to_string());
        Ok(())
    }

    /// `DEFINE mode = option` — undefines the previously active option's
    /// macro (if any) and defines the new one.
    pub(crate) fn gen_define(
        &mut self,
        mode: &str,
        option: &str,
        line: usize,
    ) -> Result<(), GenError> {
        let previous = self.modes.select(mode, option, line)?;
        if let Some(previous) = previous {
            self.emit_header(format!("#undef {}", ModeRegistry::macro_name(mode, &previous)));
        }
        self.emit_header(format!("#define {}", ModeRegistry::macro_name(mode, option)));
        Ok(())
    }
}

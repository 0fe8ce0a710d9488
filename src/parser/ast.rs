// Syntax tree definitions for the CIR-to-C compiler

use crate::parser::lexer::Token;

/// A CIR type reference: a base type name plus optional array dimensions.
///
/// `dims` is empty for plain types; for the `Array` form it holds the raw
/// dimension tokens (e.g. `["8", "8"]`), rendered as one C bracket suffix
/// each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirType {
    pub base: String,
    pub dims: Vec<String>,
}

impl CirType {
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            dims: Vec::new(),
        }
    }

    pub fn array(base: impl Into<String>, dims: Vec<String>) -> Self {
        Self {
            base: base.into(),
            dims,
        }
    }
}

/// Method parameter: declared type plus parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: CirType,
    pub name: String,
}

/// Tag-plus-payload for every syntax node the parser can produce.
///
/// The expression-bearing variants (`Assignment`, `If`, `Return`, …) keep
/// their expressions as raw token runs captured verbatim from the source;
/// the generator re-renders them textually rather than parsing them into a
/// sub-tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `# ...` source comment. No children.
    Comment { text: String },
    /// `Type(a, b)` or `MUTABLE Type(a, b)`.
    Declaration {
        declared_type: String,
        names: Vec<String>,
        mutable: bool,
    },
    /// `name = <expression tokens>`.
    Assignment { name: String, expression: Vec<Token> },
    /// `STRUCTURE Name:` with exactly one child (a declaration or a
    /// placeholder).
    Structure { name: String },
    /// `METHOD name(params) [-> Type]:` with body statements as children.
    MethodDeclaration {
        name: String,
        params: Vec<Param>,
        return_type: Option<String>,
    },
    /// `name(args)` — leaf, valid only inside a body.
    MethodCall { name: String, arguments: Vec<Token> },
    /// `IF cond:` with body children.
    If { condition: Vec<Token> },
    /// `ELSEIF cond:` (also spelled ELSIF / ELIF) with body children.
    ElseIf { condition: Vec<Token> },
    /// `ELSE:` with body children.
    Else,
    /// `WHILE cond:` with body children.
    While { condition: Vec<Token> },
    /// `FOR <from> TO <to>:` with body children.
    For { from: Vec<Token>, to: Vec<Token> },
    /// `REPEAT <count> TIMES:` with body children.
    Repeat { count: Vec<Token> },
    /// `CHOOSE mode:` with one [`NodeKind::ChooseOption`] child per option.
    Choose { mode: String },
    /// One option group under a CHOOSE; children are the option's body.
    ChooseOption { option: String },
    /// `PASS` — placeholder, no children.
    Pass,
    /// `TODO` — placeholder, no children.
    Todo,
    /// `DEFAULT mode = option`.
    DefaultDefine { mode: String, option: String },
    /// `DEFINE mode = option`.
    Define { mode: String, option: String },
    /// `SETMODE mode(opt1, opt2, ...)`.
    SetMode { mode: String, options: Vec<String> },
    /// `RETURN <expression tokens>`.
    Return { expression: Vec<Token> },
}

impl NodeKind {
    /// Short human-readable tag name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Comment { .. } => "Comment",
            NodeKind::Declaration { .. } => "Declaration",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Structure { .. } => "Structure",
            NodeKind::MethodDeclaration { .. } => "MethodDeclaration",
            NodeKind::MethodCall { .. } => "MethodCall",
            NodeKind::If { .. } => "If",
            NodeKind::ElseIf { .. } => "ElseIf",
            NodeKind::Else => "Else",
            NodeKind::While { .. } => "While",
            NodeKind::For { .. } => "For",
            NodeKind::Repeat { .. } => "Repeat",
            NodeKind::Choose { .. } => "Choose",
            NodeKind::ChooseOption { .. } => "ChooseOption",
            NodeKind::Pass => "Pass",
            NodeKind::Todo => "Todo",
            NodeKind::DefaultDefine { .. } => "DefaultDefine",
            NodeKind::Define { .. } => "Define",
            NodeKind::SetMode { .. } => "SetMode",
            NodeKind::Return { .. } => "Return",
        }
    }
}

/// One node of the syntax tree: a tag-specific payload plus owned, ordered
/// children. The tree has no back-edges and no sharing.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub children: Vec<SyntaxNode>,
    pub line: usize,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self {
            kind,
            children: Vec::new(),
            line,
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<SyntaxNode>, line: usize) -> Self {
        Self {
            kind,
            children,
            line,
        }
    }
}

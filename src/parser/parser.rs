//! Indentation parser for CIR
//!
//! Converts the flat token stream into a forest of [`SyntaxNode`]s. There
//! are no explicit block delimiters in CIR: nesting is derived purely from
//! the magnitude of leading whitespace. The first indented line fixes the
//! indentation unit for the whole source; every later run must be an exact
//! multiple of it.
//!
//! # Block descent
//!
//! Constructs that own a body call back into [`Parser::parse_block`] with
//! `min_level` one deeper than their own line. When a line shallower than
//! `min_level` is encountered, the cursor is rolled back to before its
//! leading whitespace and the block reports "done" — the line is left for an
//! ancestor to reprocess. This save/restore is ordinary control flow, not an
//! error.

use crate::parser::ast::{NodeKind, SyntaxNode};
use crate::parser::lexer::{LexError, Token, TokenKind};
use rustc_hash::FxHashSet;
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            line: err.line,
        }
    }
}

/// Recursive-descent parser driven by indentation depth.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Width of one indentation level, fixed by the first indented line.
    unit_width: Option<usize>,
    /// Recognized type names: built-ins plus every STRUCTURE seen so far.
    type_names: FxHashSet<String>,
}

impl Parser {
    /// Create a parser over an already-lexed token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut type_names = FxHashSet::default();
        for builtin in ["Int", "Byte", "Array"] {
            type_names.insert(builtin.to_string());
        }
        Self {
            tokens,
            position: 0,
            unit_width: None,
            type_names,
        }
    }

    /// Parse the whole stream into top-level nodes.
    pub fn parse(&mut self) -> Result<Vec<SyntaxNode>, ParseError> {
        let nodes = self.parse_block(0)?;
        if !self.is_at_end() {
            let tok = &self.tokens[self.position];
            return Err(ParseError::new(
                format!("Unconsumed input starting at {}", tok),
                tok.line,
            ));
        }
        Ok(nodes)
    }

    /// Tokens not yet consumed; a diagnostic shell can report these after a
    /// failure.
    pub fn remaining_tokens(&self) -> &[Token] {
        &self.tokens[self.position.min(self.tokens.len())..]
    }

    /// Parse statements at `min_level` or deeper until a shallower line (or
    /// end of input) hands control back to the caller.
    pub(crate) fn parse_block(
        &mut self,
        min_level: usize,
    ) -> Result<Vec<SyntaxNode>, ParseError> {
        self.parse_block_with(min_level, |parser, level| parser.parse_statement(level))
    }

    /// The general block loop, parameterized over the per-line parser so
    /// that CHOOSE can reuse it for its option-group grammar.
    pub(crate) fn parse_block_with<F>(
        &mut self,
        min_level: usize,
        mut parse_line: F,
    ) -> Result<Vec<SyntaxNode>, ParseError>
    where
        F: FnMut(&mut Parser, usize) -> Result<SyntaxNode, ParseError>,
    {
        let mut nodes = Vec::new();
        loop {
            self.skip_line_breaks();
            if self.is_at_end() {
                break;
            }

            // A whitespace-only line carries no statement and does not
            // count toward the indentation unit.
            if self.peek_kind() == Some(TokenKind::Spaces)
                && matches!(
                    self.tokens.get(self.position + 1).map(|t| t.kind),
                    Some(TokenKind::LineBreak) | None
                )
            {
                self.position += 1;
                continue;
            }

            let saved = self.position;
            let level = self.measure_indent()?;
            if level < min_level {
                // Too shallow for this block: roll back so an ancestor can
                // reprocess the line.
                self.position = saved;
                break;
            }

            let before = self.position;
            let node = parse_line(self, level)?;
            if self.position == before {
                // Guard against infinite loops on malformed input.
                return Err(ParseError::new(
                    "Internal parser error: no progress made",
                    self.current_line(),
                ));
            }
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Measure the indentation level of the upcoming line, consuming its
    /// leading whitespace run (if any). Establishes the unit width on first
    /// sight; later runs must be exact multiples.
    fn measure_indent(&mut self) -> Result<usize, ParseError> {
        let Some(tok) = self.peek() else {
            return Ok(0);
        };
        if tok.kind != TokenKind::Spaces {
            return Ok(0);
        }
        let width = tok.text.chars().count();
        let line = tok.line;
        self.position += 1;

        let unit = *self.unit_width.get_or_insert(width);
        if width % unit != 0 {
            return Err(ParseError::new(
                format!(
                    "Indentation of {} is not a multiple of the unit width {}",
                    width, unit
                ),
                line,
            ));
        }
        Ok(width / unit)
    }

    /// Dispatch on the first token of a logical line.
    fn parse_statement(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let tok = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::new("Unexpected end of input", self.current_line()))?;

        match tok.kind {
            TokenKind::Comment => {
                self.position += 1;
                Ok(SyntaxNode::new(
                    NodeKind::Comment { text: tok.text },
                    tok.line,
                ))
            }
            TokenKind::Keyword => self.parse_keyword_statement(&tok, level),
            TokenKind::Word => self.parse_head_expression(level),
            _ => Err(ParseError::new(
                format!("Unexpected {} at start of statement", tok),
                tok.line,
            )),
        }
    }

    fn parse_keyword_statement(
        &mut self,
        tok: &Token,
        level: usize,
    ) -> Result<SyntaxNode, ParseError> {
        match tok.upper().as_str() {
            "STRUCTURE" => self.parse_structure(level),
            "METHOD" => self.parse_method(level),
            "PASS" => self.parse_placeholder(NodeKind::Pass),
            "TODO" => self.parse_placeholder(NodeKind::Todo),
            "DEFAULT" => self.parse_mode_binding("DEFAULT"),
            "DEFINE" => self.parse_mode_binding("DEFINE"),
            "SETMODE" => self.parse_setmode(),
            "MUTABLE" => self.parse_mutable_declaration(),
            "REPEAT" => self.parse_repeat(level),
            "IF" => self.parse_conditional(level, "IF"),
            "ELSEIF" | "ELSIF" | "ELIF" => self.parse_conditional(level, "ELSEIF"),
            "ELSE" => self.parse_else(level),
            "WHILE" => self.parse_conditional(level, "WHILE"),
            "FOR" => self.parse_for(level),
            "CHOOSE" => self.parse_choose(level),
            "RETURN" => self.parse_return(),
            other => Err(ParseError::new(
                format!("Keyword '{}' cannot start a statement", other),
                tok.line,
            )),
        }
    }

    /// A line starting with a plain word: a type declaration, a method call,
    /// or an assignment.
    ///
    /// `Word(` is a declaration when the word is a recognized type name and
    /// a call otherwise; `Word =` is an assignment.
    fn parse_head_expression(&mut self, _level: usize) -> Result<SyntaxNode, ParseError> {
        let word = self.bump_expecting(TokenKind::Word, "identifier")?;

        if self.peek_kind() == Some(TokenKind::OpenParen) {
            if self.is_type_name(&word.text) {
                return self.parse_declaration(word, false);
            }
            self.position += 1; // consume '('
            let arguments = self.capture_call_arguments(&word.text)?;
            self.expect_line_end("call")?;
            return Ok(SyntaxNode::new(
                NodeKind::MethodCall {
                    name: word.text,
                    arguments,
                },
                word.line,
            ));
        }

        self.skip_spaces();
        if self.peek_kind() == Some(TokenKind::SetEquals) {
            self.position += 1;
            let expression = self.capture_until_line_break();
            return Ok(SyntaxNode::new(
                NodeKind::Assignment {
                    name: word.text,
                    expression,
                },
                word.line,
            ));
        }

        Err(ParseError::new(
            format!(
                "Expected '(' or '=' after '{}' at start of statement",
                word.text
            ),
            word.line,
        ))
    }

    /// `Type(a, b, ...)`, optionally flagged mutable by a MUTABLE prefix.
    pub(crate) fn parse_declaration(
        &mut self,
        type_word: Token,
        mutable: bool,
    ) -> Result<SyntaxNode, ParseError> {
        let items = self.parse_paren_list("declaration")?;
        if items.is_empty() {
            return Err(ParseError::new(
                format!("Declaration of '{}' names no variables", type_word.text),
                type_word.line,
            ));
        }
        self.expect_line_end("declaration")?;
        Ok(SyntaxNode::new(
            NodeKind::Declaration {
                declared_type: type_word.text,
                names: items.into_iter().map(|t| t.text).collect(),
                mutable,
            },
            type_word.line,
        ))
    }

    pub(crate) fn is_type_name(&self, word: &str) -> bool {
        self.type_names.contains(word)
    }

    pub(crate) fn register_type_name(&mut self, name: &str) {
        self.type_names.insert(name.to_string());
    }

    // --- token cursor helpers -------------------------------------------

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.position).cloned();
        if tok.is_some() {
            self.position += 1;
        }
        tok
    }

    pub(crate) fn bump_expecting(
        &mut self,
        kind: TokenKind,
        what: &str,
    ) -> Result<Token, ParseError> {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                let tok = tok.clone();
                self.position += 1;
                Ok(tok)
            }
            Some(tok) => Err(ParseError::new(
                format!("Expected {}, found {}", what, tok),
                tok.line,
            )),
            None => Err(ParseError::new(
                format!("Expected {}, found end of input", what),
                self.current_line(),
            )),
        }
    }

    pub(crate) fn skip_spaces(&mut self) {
        while self.peek_kind() == Some(TokenKind::Spaces) {
            self.position += 1;
        }
    }

    fn skip_line_breaks(&mut self) {
        while self.peek_kind() == Some(TokenKind::LineBreak) {
            self.position += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn current_line(&self) -> usize {
        self.peek()
            .map(|t| t.line)
            .or_else(|| self.tokens.last().map(|t| t.line))
            .unwrap_or(1)
    }

    /// After a complete statement head: only trailing spaces and then a line
    /// break (or end of input) are allowed.
    pub(crate) fn expect_line_end(&mut self, construct: &str) -> Result<(), ParseError> {
        self.skip_spaces();
        match self.peek() {
            None => Ok(()),
            Some(tok) if tok.kind == TokenKind::LineBreak => Ok(()),
            Some(tok) => Err(ParseError::new(
                format!("Unexpected {} after {}", tok, construct),
                tok.line,
            )),
        }
    }

    /// Consume and return every token up to (not including) the next line
    /// break, verbatim. Used for assignment right-hand sides and RETURN
    /// expressions.
    pub(crate) fn capture_until_line_break(&mut self) -> Vec<Token> {
        let mut captured = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.kind == TokenKind::LineBreak {
                break;
            }
            captured.push(tok.clone());
            self.position += 1;
        }
        captured
    }

    /// Consume and return every token up to a terminating colon (consumed,
    /// not returned). Reaching a line break or end of input first is a fatal
    /// grammar error naming the construct.
    pub(crate) fn capture_until_colon(&mut self, construct: &str) -> Result<Vec<Token>, ParseError> {
        let mut captured = Vec::new();
        loop {
            match self.peek() {
                Some(tok) if tok.kind == TokenKind::Colon => {
                    self.position += 1;
                    return Ok(captured);
                }
                Some(tok) if tok.kind == TokenKind::LineBreak => {
                    return Err(ParseError::new(
                        format!("Expected ':' to end {} header", construct),
                        tok.line,
                    ));
                }
                Some(tok) => {
                    captured.push(tok.clone());
                    self.position += 1;
                }
                None => {
                    return Err(ParseError::new(
                        format!("Expected ':' to end {} header", construct),
                        self.current_line(),
                    ));
                }
            }
        }
    }

    /// Parse `(a, b, c)`: a flat sequence of Word/Number items. Commas and
    /// spaces both separate items, so `(Int a, Int b)` and `(Array, Int, 8,
    /// buf)` flatten to the same item shape. The list must close on the same
    /// line; an unclosed list is a fatal "runaway" error.
    pub(crate) fn parse_paren_list(&mut self, construct: &str) -> Result<Vec<Token>, ParseError> {
        self.skip_spaces();
        self.bump_expecting(TokenKind::OpenParen, &format!("'(' in {}", construct))?;

        let mut items = Vec::new();
        loop {
            self.skip_spaces();
            match self.peek() {
                Some(tok) if tok.kind == TokenKind::CloseParen => {
                    self.position += 1;
                    return Ok(items);
                }
                Some(tok) if matches!(tok.kind, TokenKind::Word | TokenKind::Number) => {
                    items.push(tok.clone());
                    self.position += 1;
                }
                Some(tok) if tok.kind == TokenKind::Comma => {
                    self.position += 1;
                }
                Some(tok) if tok.kind == TokenKind::LineBreak => {
                    return Err(ParseError::new(
                        format!("Runaway parenthesis list in {}", construct),
                        tok.line,
                    ));
                }
                Some(tok) => {
                    return Err(ParseError::new(
                        format!("Unexpected {} in {} list", tok, construct),
                        tok.line,
                    ));
                }
                None => {
                    return Err(ParseError::new(
                        format!("Runaway parenthesis list in {}", construct),
                        self.current_line(),
                    ));
                }
            }
        }
    }

    /// Capture call-argument tokens verbatim up to the matching `)`. Inner
    /// parentheses nest; the list must close before the line ends.
    pub(crate) fn capture_call_arguments(&mut self, callee: &str) -> Result<Vec<Token>, ParseError> {
        let mut captured = Vec::new();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Some(tok) if tok.kind == TokenKind::CloseParen && depth == 0 => {
                    self.position += 1;
                    return Ok(captured);
                }
                Some(tok) if tok.kind == TokenKind::LineBreak => {
                    return Err(ParseError::new(
                        format!("Runaway argument list in call to '{}'", callee),
                        tok.line,
                    ));
                }
                Some(tok) => {
                    match tok.kind {
                        TokenKind::OpenParen => depth += 1,
                        TokenKind::CloseParen => depth -= 1,
                        _ => {}
                    }
                    captured.push(tok.clone());
                    self.position += 1;
                }
                None => {
                    return Err(ParseError::new(
                        format!("Runaway argument list in call to '{}'", callee),
                        self.current_line(),
                    ));
                }
            }
        }
    }
}

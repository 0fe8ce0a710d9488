//! Keyword statement sub-parsers
//!
//! Each reserved keyword that can start a logical line gets a dedicated
//! parse method here, implemented on [`Parser`]. Body-owning constructs
//! descend with `parse_block(level + 1)`, which is how nesting falls out of
//! relative indentation alone.

use crate::parser::ast::{CirType, NodeKind, Param, SyntaxNode};
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{ParseError, Parser};

impl Parser {
    /// `STRUCTURE Name:` with exactly one child line (a declaration or a
    /// placeholder) one indent deeper.
    pub(crate) fn parse_structure(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "STRUCTURE")?;
        self.skip_spaces();
        let name = self.bump_expecting(TokenKind::Word, "structure name")?;
        self.skip_spaces();
        self.bump_expecting(TokenKind::Colon, "':' after structure name")?;
        self.expect_line_end("STRUCTURE header")?;

        // The structure's name is a type name for everything that follows,
        // including its own body.
        self.register_type_name(&name.text);

        let children = self.parse_block(level + 1)?;
        if children.len() != 1 {
            return Err(ParseError::new(
                format!(
                    "STRUCTURE '{}' must have exactly one declaration or placeholder child \
                     (complex structures are not supported)",
                    name.text
                ),
                kw.line,
            ));
        }
        Ok(SyntaxNode::with_children(
            NodeKind::Structure { name: name.text },
            children,
            kw.line,
        ))
    }

    /// `METHOD name(params) [-> Type]:` with the body one indent deeper.
    /// Methods are only legal at the top level.
    pub(crate) fn parse_method(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "METHOD")?;
        if level != 0 {
            return Err(ParseError::new(
                "METHOD declarations are only allowed at top level",
                kw.line,
            ));
        }
        self.skip_spaces();
        let name = self.bump_expecting(TokenKind::Word, "method name")?;
        let items = self.parse_paren_list("METHOD parameter")?;
        let params = Self::interpret_params(&name.text, items, kw.line)?;

        self.skip_spaces();
        let return_type = if self.peek_kind() == Some(TokenKind::ReturnTypeIndicator) {
            self.bump();
            self.skip_spaces();
            let ty = self.bump_expecting(TokenKind::Word, "return type")?;
            Some(ty.text)
        } else {
            None
        };

        self.skip_spaces();
        self.bump_expecting(TokenKind::Colon, "':' after METHOD header")?;
        self.expect_line_end("METHOD header")?;

        let children = self.parse_block(level + 1)?;
        Ok(SyntaxNode::with_children(
            NodeKind::MethodDeclaration {
                name: name.text,
                params,
                return_type,
            },
            children,
            kw.line,
        ))
    }

    /// Interpret a flat parameter item list as (type, name) pairs. The
    /// literal word `Array` instead consumes `Array, elem, dims…, name`
    /// (dims = the run of numbers) and collapses into a single parameter
    /// with a compound type.
    fn interpret_params(
        method: &str,
        items: Vec<crate::parser::lexer::Token>,
        line: usize,
    ) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        let mut iter = items.into_iter().peekable();
        while let Some(first) = iter.next() {
            if first.text == "Array" {
                let elem = iter.next().ok_or_else(|| ParseError::new(
                    format!("Array parameter of METHOD '{}' is missing an element type", method),
                    line,
                ))?;
                let mut dims = Vec::new();
                while iter
                    .peek()
                    .is_some_and(|t| t.kind == TokenKind::Number)
                {
                    dims.push(iter.next().map(|t| t.text).unwrap_or_default());
                }
                let name = iter.next().ok_or_else(|| ParseError::new(
                    format!("Array parameter of METHOD '{}' is missing a name", method),
                    line,
                ))?;
                params.push(Param {
                    ty: CirType::array(elem.text, dims),
                    name: name.text,
                });
            } else {
                let name = iter.next().ok_or_else(|| ParseError::new(
                    format!(
                        "Parameter list of METHOD '{}' has a type '{}' with no name",
                        method, first.text
                    ),
                    line,
                ))?;
                params.push(Param {
                    ty: CirType::plain(first.text),
                    name: name.text,
                });
            }
        }
        Ok(params)
    }

    /// Bare `PASS` / `TODO` placeholder line.
    pub(crate) fn parse_placeholder(&mut self, kind: NodeKind) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "placeholder keyword")?;
        self.expect_line_end("placeholder")?;
        Ok(SyntaxNode::new(kind, kw.line))
    }

    /// `DEFAULT mode = option` / `DEFINE mode = option`. Any deviation from
    /// the exact keyword-identifier-punctuation sequence is fatal.
    pub(crate) fn parse_mode_binding(&mut self, which: &str) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, which)?;
        let malformed = |detail: String, line| {
            ParseError::new(format!("Malformed {} command: {}", which, detail), line)
        };

        self.skip_spaces();
        let mode = self
            .bump_expecting(TokenKind::Word, "mode name")
            .map_err(|e| malformed(e.message, e.line))?;
        self.skip_spaces();
        self.bump_expecting(TokenKind::SetEquals, "'='")
            .map_err(|e| malformed(e.message, e.line))?;
        self.skip_spaces();
        let option = self
            .bump_expecting(TokenKind::Word, "option name")
            .map_err(|e| malformed(e.message, e.line))?;
        self.expect_line_end(which)?;

        let kind = if which == "DEFAULT" {
            NodeKind::DefaultDefine {
                mode: mode.text,
                option: option.text,
            }
        } else {
            NodeKind::Define {
                mode: mode.text,
                option: option.text,
            }
        };
        Ok(SyntaxNode::new(kind, kw.line))
    }

    /// `SETMODE mode(opt1, opt2, ...)`.
    pub(crate) fn parse_setmode(&mut self) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "SETMODE")?;
        self.skip_spaces();
        let mode = self
            .bump_expecting(TokenKind::Word, "mode name")
            .map_err(|e| {
                ParseError::new(format!("Malformed SETMODE command: {}", e.message), e.line)
            })?;
        let items = self.parse_paren_list("SETMODE option")?;
        if items.is_empty() {
            return Err(ParseError::new(
                format!("Malformed SETMODE command: mode '{}' lists no options", mode.text),
                kw.line,
            ));
        }
        for item in &items {
            if item.kind != TokenKind::Word {
                return Err(ParseError::new(
                    format!(
                        "Malformed SETMODE command: option {} is not an identifier",
                        item
                    ),
                    item.line,
                ));
            }
        }
        self.expect_line_end("SETMODE")?;
        Ok(SyntaxNode::new(
            NodeKind::SetMode {
                mode: mode.text,
                options: items.into_iter().map(|t| t.text).collect(),
            },
            kw.line,
        ))
    }

    /// `MUTABLE Type(a, b)` — MUTABLE must be immediately followed by a
    /// valid type declaration.
    pub(crate) fn parse_mutable_declaration(&mut self) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "MUTABLE")?;
        self.skip_spaces();
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Word && self.is_type_name(&tok.text) => {
                let type_word = tok.clone();
                self.bump();
                self.parse_declaration(type_word, true)
            }
            _ => Err(ParseError::new(
                "MUTABLE must be followed by a type declaration",
                kw.line,
            )),
        }
    }

    /// `REPEAT <count tokens> TIMES:` with the body one indent deeper.
    pub(crate) fn parse_repeat(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "REPEAT")?;
        let mut count = Vec::new();
        loop {
            match self.peek() {
                Some(tok) if tok.is_keyword("TIMES") => {
                    self.bump();
                    break;
                }
                Some(tok) if tok.kind == TokenKind::LineBreak => {
                    return Err(ParseError::new(
                        "Malformed REPEAT command: expected TIMES",
                        tok.line,
                    ));
                }
                Some(tok) => {
                    count.push(tok.clone());
                    self.bump();
                }
                None => {
                    return Err(ParseError::new(
                        "Malformed REPEAT command: expected TIMES",
                        self.current_line(),
                    ));
                }
            }
        }
        self.skip_spaces();
        self.bump_expecting(TokenKind::Colon, "':' after TIMES")?;
        self.expect_line_end("REPEAT header")?;

        let children = self.parse_block(level + 1)?;
        Ok(SyntaxNode::with_children(
            NodeKind::Repeat { count },
            children,
            kw.line,
        ))
    }

    /// `IF cond:` / `ELSEIF cond:` / `WHILE cond:` — shared shape, distinct
    /// node kinds.
    pub(crate) fn parse_conditional(
        &mut self,
        level: usize,
        which: &str,
    ) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, which)?;
        let condition = self.capture_until_colon(which)?;
        self.expect_line_end(&format!("{} header", which))?;
        let children = self.parse_block(level + 1)?;
        let kind = match which {
            "IF" => NodeKind::If { condition },
            "ELSEIF" => NodeKind::ElseIf { condition },
            _ => NodeKind::While { condition },
        };
        Ok(SyntaxNode::with_children(kind, children, kw.line))
    }

    /// `ELSE:` with the body one indent deeper.
    pub(crate) fn parse_else(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "ELSE")?;
        self.skip_spaces();
        self.bump_expecting(TokenKind::Colon, "':' after ELSE")?;
        self.expect_line_end("ELSE header")?;
        let children = self.parse_block(level + 1)?;
        Ok(SyntaxNode::with_children(NodeKind::Else, children, kw.line))
    }

    /// `FOR <from tokens> TO <to tokens>:`.
    pub(crate) fn parse_for(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "FOR")?;
        let mut from = Vec::new();
        loop {
            match self.peek() {
                Some(tok) if tok.is_keyword("TO") => {
                    self.bump();
                    break;
                }
                Some(tok) if tok.kind == TokenKind::LineBreak => {
                    return Err(ParseError::new("Malformed FOR command: expected TO", tok.line));
                }
                Some(tok) => {
                    from.push(tok.clone());
                    self.bump();
                }
                None => {
                    return Err(ParseError::new(
                        "Malformed FOR command: expected TO",
                        self.current_line(),
                    ));
                }
            }
        }
        let to = self.capture_until_colon("FOR")?;
        self.expect_line_end("FOR header")?;
        let children = self.parse_block(level + 1)?;
        Ok(SyntaxNode::with_children(
            NodeKind::For { from, to },
            children,
            kw.line,
        ))
    }

    /// `CHOOSE mode:` whose body is a sequence of option groups, each
    /// written `option:` with that option's statements one indent deeper
    /// still.
    pub(crate) fn parse_choose(&mut self, level: usize) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "CHOOSE")?;
        self.skip_spaces();
        let mode = self.bump_expecting(TokenKind::Word, "mode name")?;
        self.skip_spaces();
        self.bump_expecting(TokenKind::Colon, "':' after mode name")?;
        self.expect_line_end("CHOOSE header")?;

        let groups = self.parse_block_with(level + 1, |parser, _opt_level| {
            let option = parser.bump_expecting(TokenKind::Word, "CHOOSE option name")?;
            parser.skip_spaces();
            parser.bump_expecting(TokenKind::Colon, "':' after CHOOSE option name")?;
            parser.expect_line_end("CHOOSE option header")?;
            let body = parser.parse_block(level + 2)?;
            Ok(SyntaxNode::with_children(
                NodeKind::ChooseOption {
                    option: option.text,
                },
                body,
                option.line,
            ))
        })?;

        Ok(SyntaxNode::with_children(
            NodeKind::Choose { mode: mode.text },
            groups,
            kw.line,
        ))
    }

    /// `RETURN <expression tokens>` (expression may be empty).
    pub(crate) fn parse_return(&mut self) -> Result<SyntaxNode, ParseError> {
        let kw = self.bump_expecting(TokenKind::Keyword, "RETURN")?;
        let expression = self.capture_until_line_break();
        Ok(SyntaxNode::new(NodeKind::Return { expression }, kw.line))
    }
}

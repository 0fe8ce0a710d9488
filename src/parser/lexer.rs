//! Lexer (tokenizer) for CIR source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! indentation parser. Tokens carry the exact source slice they were matched
//! from, so concatenating every token's `text` in order reproduces the input
//! byte-for-byte. Whitespace is significant: runs of spaces/tabs and line
//! breaks are tokens of their own, because the parser derives block nesting
//! from them.

use std::fmt;

/// Reserved statement keywords, matched case-insensitively.
const KEYWORDS: &[&str] = &[
    "STRUCTURE",
    "METHOD",
    "REPEAT",
    "TIMES",
    "SETMODE",
    "DEFAULT",
    "DEFINE",
    "CHOOSE",
    "FOR",
    "TO",
    "PASS",
    "TODO",
    "RETURN",
    "IF",
    "WHILE",
    "ELSE",
    "ELSEIF",
    "ELSIF",
    "ELIF",
    "MUTABLE",
];

/// Word-spelled operators, rewritten to C symbols by the code generator.
const WORD_OPERATORS: &[&str] = &["AND", "OR", "EQUALS"];

/// Lexical class of a token. Tokens never carry semantic meaning beyond
/// this class; all interpretation happens in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Keyword,
    Number,
    Colon,
    SetEquals,
    OpenParen,
    CloseParen,
    Comma,
    Spaces,
    LineBreak,
    Comment,
    Operator,
    ReturnTypeIndicator,
}

/// A single token: lexical class plus the exact source slice it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// The token text folded to uppercase, for case-insensitive keyword
    /// comparison.
    pub fn upper(&self) -> String {
        self.text.to_ascii_uppercase()
    }

    /// True if this token is the given keyword (case-insensitive).
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.upper() == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::LineBreak => write!(f, "line break"),
            TokenKind::Spaces => write!(f, "whitespace"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub line: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexer error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}

/// Lexer for CIR source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    warnings: Vec<String>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            warnings: Vec::new(),
        }
    }

    /// Non-fatal diagnostics collected while scanning (e.g. lowercase
    /// keywords). The core never prints; shells decide what to do with these.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    /// Scan the next token using longest-match-first rules.
    fn next_token(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        let ch = self.peek().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            line,
        })?;

        match ch {
            '#' => Ok(self.comment()),
            '\n' => {
                self.advance();
                self.line += 1;
                Ok(Token::new(TokenKind::LineBreak, "\n", line))
            }
            '\r' => {
                self.advance();
                let text = if self.peek() == Some('\n') {
                    self.advance();
                    "\r\n"
                } else {
                    "\r"
                };
                self.line += 1;
                Ok(Token::new(TokenKind::LineBreak, text, line))
            }
            ' ' | '\t' => self.whitespace_run(),
            '0'..='9' => Ok(self.number()),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.word_or_keyword()),
            '-' => {
                self.advance();
                if self.peek() == Some('>') {
                    self.advance();
                    Ok(Token::new(TokenKind::ReturnTypeIndicator, "->", line))
                } else {
                    Ok(Token::new(TokenKind::Operator, "-", line))
                }
            }
            '=' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::Operator, "==", line))
                } else {
                    Ok(Token::new(TokenKind::SetEquals, "=", line))
                }
            }
            '<' | '>' | '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::Operator, format!("{}=", ch), line))
                } else {
                    Ok(Token::new(TokenKind::Operator, ch.to_string(), line))
                }
            }
            '+' | '*' | '/' | '%' | '&' | '|' => {
                self.advance();
                Ok(Token::new(TokenKind::Operator, ch.to_string(), line))
            }
            ':' => {
                self.advance();
                Ok(Token::new(TokenKind::Colon, ":", line))
            }
            '(' => {
                self.advance();
                Ok(Token::new(TokenKind::OpenParen, "(", line))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenKind::CloseParen, ")", line))
            }
            ',' => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, ",", line))
            }
            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                line,
            }),
        }
    }

    /// `#` to end of line (line break not included).
    fn comment(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            text.push(ch);
            self.advance();
        }
        Token::new(TokenKind::Comment, text, line)
    }

    /// A run of spaces or a run of tabs. Mixing the two within one run is a
    /// fatal error: the parser measures indentation by run length and a mixed
    /// run has no well-defined width.
    fn whitespace_run(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        let mut text = String::new();
        let mut saw_space = false;
        let mut saw_tab = false;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => saw_space = true,
                '\t' => saw_tab = true,
                _ => break,
            }
            text.push(ch);
            self.advance();
        }
        if saw_space && saw_tab {
            return Err(LexError {
                message: "Indentation mixes spaces and tabs in a single run"
                    .to_string(),
                line,
            });
        }
        Ok(Token::new(TokenKind::Spaces, text, line))
    }

    fn number(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number, text, line)
    }

    /// An identifier-shaped run: keyword, word operator, or plain word.
    fn word_or_keyword(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let upper = text.to_ascii_uppercase();
        let kind = if KEYWORDS.contains(&upper.as_str()) {
            TokenKind::Keyword
        } else if WORD_OPERATORS.contains(&upper.as_str()) {
            TokenKind::Operator
        } else {
            TokenKind::Word
        };

        // Keywords and word operators match case-insensitively, but the
        // canonical spelling is all-uppercase.
        if kind != TokenKind::Word && text != upper {
            self.warnings.push(format!(
                "line {}: reserved word '{}' is not written in uppercase (canonical spelling is '{}')",
                line, text, upper
            ));
        }

        Token::new(kind, text, line)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_declaration_line() {
        let tokens = Lexer::new("Int(x)").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "Int");
        assert_eq!(tokens[1].kind, TokenKind::OpenParen);
        assert_eq!(tokens[2].kind, TokenKind::Word);
        assert_eq!(tokens[3].kind, TokenKind::CloseParen);
    }

    #[test]
    fn test_keywords_and_punctuation() {
        assert_eq!(
            kinds("METHOD add(Int a, Int b):"),
            vec![
                TokenKind::Keyword,
                TokenKind::Spaces,
                TokenKind::Word,
                TokenKind::OpenParen,
                TokenKind::Word,
                TokenKind::Spaces,
                TokenKind::Word,
                TokenKind::Comma,
                TokenKind::Spaces,
                TokenKind::Word,
                TokenKind::Spaces,
                TokenKind::Word,
                TokenKind::CloseParen,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_return_type_indicator() {
        let tokens = Lexer::new("-> Int").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::ReturnTypeIndicator);
        assert_eq!(tokens[0].text, "->");
    }

    #[test]
    fn test_word_operators() {
        let tokens = Lexer::new("a AND b OR c EQUALS d").tokenize().unwrap();
        let ops: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["AND", "OR", "EQUALS"]);
    }

    #[test]
    fn test_round_trip() {
        let source = "STRUCTURE Grid:\n    Array(Int, 8, 8)\n\n# comment\nMUTABLE Int(x)\nx = 1 + 2\n";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_mixed_indentation_is_fatal() {
        let result = Lexer::new("IF x:\n \tPASS\n").tokenize();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.message.contains("spaces and tabs"));
    }

    #[test]
    fn test_lowercase_keyword_warns() {
        let mut lexer = Lexer::new("method f():");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "method");
        assert_eq!(lexer.warnings().len(), 1);
        assert!(lexer.warnings()[0].contains("'method'"));
    }

    #[test]
    fn test_lowercase_word_operator_warns() {
        let mut lexer = Lexer::new("a and b");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Operator);
        assert_eq!(lexer.warnings().len(), 1);
        assert!(lexer.warnings()[0].contains("'and'"));
    }

    #[test]
    fn test_comment_excludes_line_break() {
        let tokens = Lexer::new("# note\nPASS").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "# note");
        assert_eq!(tokens[1].kind, TokenKind::LineBreak);
    }

    #[test]
    fn test_unknown_character() {
        let result = Lexer::new("Int(x) @").tokenize();
        assert!(result.is_err());
    }
}

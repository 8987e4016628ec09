//! MiniJava lexer - tokenizes source code into tokens
//!
//! The lexer never fails: malformed input is reported as a
//! [`TokenKind::Error`] token and scanning continues after it.

use crate::ast::BinaryOperator;
use crate::token::{Keyword, Token, TokenKind, TokenSource, BUILTIN_TYPES};
use core_types::SourcePosition;

/// Lexer for MiniJava source code
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the whole input, ending with a single end-of-input token
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let done = token.is_end();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn scan_token(&mut self) -> Token {
        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }

        let start_pos = self.current_position();
        if self.is_at_end() {
            return Token::new(TokenKind::EndOfInput, start_pos);
        }

        let ch = self.advance();
        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '!' => TokenKind::Not,
            '+' => TokenKind::BinaryOperator(BinaryOperator::Add),
            '-' => TokenKind::BinaryOperator(BinaryOperator::Sub),
            '*' => TokenKind::BinaryOperator(BinaryOperator::Mul),
            '/' => TokenKind::BinaryOperator(BinaryOperator::Div),
            '%' => TokenKind::BinaryOperator(BinaryOperator::Mod),
            '<' => TokenKind::BinaryOperator(BinaryOperator::Less),
            '>' => TokenKind::BinaryOperator(BinaryOperator::Greater),
            '=' => {
                if self.match_char('=') {
                    TokenKind::BinaryOperator(BinaryOperator::Equal)
                } else {
                    TokenKind::Assign
                }
            }
            '&' => {
                if self.match_char('&') {
                    TokenKind::BinaryOperator(BinaryOperator::And)
                } else {
                    TokenKind::Error("expected `&&` but found a single `&`".to_string())
                }
            }
            '|' => {
                if self.match_char('|') {
                    TokenKind::BinaryOperator(BinaryOperator::Or)
                } else {
                    TokenKind::Error("expected `||` but found a single `|`".to_string())
                }
            }
            c if c.is_ascii_digit() => self.scan_number(c),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(c),
            c => TokenKind::Error(format!("invalid character `{}`", c)),
        };

        Token::new(kind, start_pos)
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        let mut digits = first.to_string();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            digits.push(self.advance());
        }

        match digits.parse::<i32>() {
            Ok(value) => TokenKind::IntegerLiteral(value),
            Err(_) => TokenKind::Error(format!("integer literal `{}` is out of range", digits)),
        }
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut ident = first.to_string();
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            ident.push(self.advance());
        }

        if BUILTIN_TYPES.contains(&ident.as_str()) {
            return TokenKind::TypeName {
                name: ident,
                builtin: true,
            };
        }

        match Keyword::from_word(&ident) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(ident),
        }
    }

    /// Skips whitespace and comments; an unterminated block comment becomes an error token
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' | '\u{000C}' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => {
                    let start_pos = self.current_position();
                    self.advance(); // /
                    self.advance(); // *
                    let mut found_end = false;
                    while !self.is_at_end() {
                        if self.peek() == '*' && self.peek_next() == Some('/') {
                            self.advance();
                            self.advance();
                            found_end = true;
                            break;
                        }
                        if self.advance() == '\n' {
                            self.line += 1;
                            self.column = 1;
                        }
                    }
                    if !found_end {
                        return Some(Token::new(
                            TokenKind::Error("unterminated block comment".to_string()),
                            start_pos,
                        ));
                    }
                }
                _ => break,
            }
        }
        None
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.position]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.column += 1;
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.position] != expected {
            false
        } else {
            self.position += 1;
            self.column += 1;
            true
        }
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        self.scan_token()
    }
}

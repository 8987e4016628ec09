//! Token vocabulary and the token source contract

use crate::ast::BinaryOperator;
use core_types::SourcePosition;
use std::collections::VecDeque;
use std::fmt;

/// MiniJava keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// class keyword
    Class,
    /// public keyword
    Public,
    /// static keyword
    Static,
    /// main keyword
    Main,
    /// extends keyword
    Extends,
    /// return keyword
    Return,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// while keyword
    While,
    /// System keyword
    System,
    /// out keyword
    Out,
    /// println keyword
    Println,
    /// assert keyword
    Assert,
    /// new keyword
    New,
    /// this keyword
    This,
    /// true keyword
    True,
    /// false keyword
    False,
    /// length keyword
    Length,
}

impl Keyword {
    /// Look up a keyword by its spelling
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "class" => Keyword::Class,
            "public" => Keyword::Public,
            "static" => Keyword::Static,
            "main" => Keyword::Main,
            "extends" => Keyword::Extends,
            "return" => Keyword::Return,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "System" => Keyword::System,
            "out" => Keyword::Out,
            "println" => Keyword::Println,
            "assert" => Keyword::Assert,
            "new" => Keyword::New,
            "this" => Keyword::This,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "length" => Keyword::Length,
            _ => return None,
        };
        Some(keyword)
    }

    /// Spelling of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Public => "public",
            Keyword::Static => "static",
            Keyword::Main => "main",
            Keyword::Extends => "extends",
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::System => "System",
            Keyword::Out => "out",
            Keyword::Println => "println",
            Keyword::Assert => "assert",
            Keyword::New => "new",
            Keyword::This => "this",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Length => "length",
        }
    }
}

/// Names of the built-in types
pub const BUILTIN_TYPES: [&str; 3] = ["int", "boolean", "void"];

/// Token kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier (class, method or variable name)
    Identifier(String),
    /// Keyword
    Keyword(Keyword),
    /// Type name; `builtin` is set for `int`, `boolean` and `void`
    TypeName {
        /// Type name
        name: String,
        /// Whether this is a built-in type
        builtin: bool,
    },
    /// Integer literal
    IntegerLiteral(i32),
    /// Binary operator
    BinaryOperator(BinaryOperator),
    /// `!`
    Not,
    /// `=`
    Assign,
    /// `.`
    Dot,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// Malformed input, with a message describing the problem
    Error(String),
    /// End of input
    EndOfInput,
}

impl TokenKind {
    /// Whether this token can name a type (built-in type name or identifier)
    pub fn is_type(&self) -> bool {
        matches!(self, TokenKind::TypeName { .. } | TokenKind::Identifier(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier `{}`", name),
            TokenKind::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            TokenKind::TypeName { name, .. } => write!(f, "type `{}`", name),
            TokenKind::IntegerLiteral(value) => write!(f, "integer `{}`", value),
            TokenKind::BinaryOperator(op) => write!(f, "`{}`", op),
            TokenKind::Not => f.write_str("`!`"),
            TokenKind::Assign => f.write_str("`=`"),
            TokenKind::Dot => f.write_str("`.`"),
            TokenKind::LeftParen => f.write_str("`(`"),
            TokenKind::RightParen => f.write_str("`)`"),
            TokenKind::LeftBracket => f.write_str("`[`"),
            TokenKind::RightBracket => f.write_str("`]`"),
            TokenKind::LeftBrace => f.write_str("`{`"),
            TokenKind::RightBrace => f.write_str("`}`"),
            TokenKind::Semicolon => f.write_str("`;`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::Error(_) => f.write_str("invalid token"),
            TokenKind::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// A token with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is
    pub kind: TokenKind,
    /// Where the token starts
    pub position: SourcePosition,
}

impl Token {
    /// Create a token
    pub fn new(kind: TokenKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    /// Whether this is an error token
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }

    /// Whether this is the end of input
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

/// A producer of tokens for the parser.
///
/// Once the input is exhausted the source must keep returning
/// [`TokenKind::EndOfInput`] tokens.
pub trait TokenSource {
    /// Produce the next token
    fn next_token(&mut self) -> Token;
}

/// Token source over an already tokenized sequence
#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
    tokens: VecDeque<Token>,
    end: SourcePosition,
}

impl TokenBuffer {
    /// Create a buffer; end-of-input is reported after the last token
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens: VecDeque<Token> = tokens
            .into_iter()
            .take_while(|token| !token.is_end())
            .collect();
        let end = tokens
            .back()
            .map(|token| token.position)
            .unwrap_or_default();
        Self { tokens, end }
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Token {
        self.tokens
            .pop_front()
            .unwrap_or_else(|| Token::new(TokenKind::EndOfInput, self.end))
    }
}

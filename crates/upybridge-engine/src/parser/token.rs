//! Token definitions for the Python declaration subset.
//!
//! Only the syntax needed to recognize top-level functions, classes, and
//! decorators is tokenized precisely; everything else that can appear inside
//! a skipped statement body is covered by literal and operator catch-alls.

use std::fmt;

/// Source location of a token or AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Combine two spans into one covering both.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(
            self.start.min(other.start),
            self.end.max(other.end),
            self.line.min(other.line),
            if self.line <= other.line {
                self.column
            } else {
                other.column
            },
        )
    }
}

/// A token in the Python declaration subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Def,
    Class,

    // Constant literals
    True,
    False,
    None,

    // Literals
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),

    // Identifiers (includes every Python keyword the subset does not model)
    Identifier(String),

    // Punctuation
    At,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Colon,
    Comma,
    Dot,
    Equal,
    Arrow,
    Star,
    StarStar,
    Semicolon,

    /// Any other operator; only ever consumed while skipping statements
    Op(String),

    // Line structure
    Newline,
    Indent,
    Dedent,

    Eof,
}

impl Token {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Def => "'def'".to_string(),
            Token::Class => "'class'".to_string(),
            Token::True => "'True'".to_string(),
            Token::False => "'False'".to_string(),
            Token::None => "'None'".to_string(),
            Token::IntLiteral(v) => format!("integer '{}'", v),
            Token::FloatLiteral(v) => format!("float '{}'", v),
            Token::StringLiteral(_) => "string literal".to_string(),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::At => "'@'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::LeftBracket => "'['".to_string(),
            Token::RightBracket => "']'".to_string(),
            Token::LeftBrace => "'{'".to_string(),
            Token::RightBrace => "'}'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Equal => "'='".to_string(),
            Token::Arrow => "'->'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::StarStar => "'**'".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Op(op) => format!("'{}'", op),
            Token::Newline => "end of line".to_string(),
            Token::Indent => "indent".to_string(),
            Token::Dedent => "dedent".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

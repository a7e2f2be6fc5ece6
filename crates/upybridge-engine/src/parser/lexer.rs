//! Lexer for the Python declaration subset.
//!
//! In-line tokens are produced by a logos-derived enum. A manual outer loop
//! owns everything logos cannot see on its own: line structure (an
//! indentation stack emitting `Indent`/`Dedent`), `#` comments, blank lines,
//! implicit line joining inside brackets, backslash continuations, and
//! string literals (including triple-quoted and prefixed forms).

use crate::parser::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum for in-line lexing.
///
/// Whitespace, newlines, comments, and strings never reach this enum; the
/// outer loop consumes them first.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Keywords (must come before identifiers)
    #[token("def")]
    Def,

    #[token("class")]
    Class,

    #[token("True")]
    True,

    #[token("False")]
    False,

    #[token("None")]
    NoneLit,

    // Identifiers; Python keywords the subset does not model lex as plain
    // identifiers and are only ever consumed while skipping statements
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", parse_float)]
    FloatLiteral(f64),

    #[regex(r"[0-9][0-9_]*", parse_int)]
    #[regex(r"0[xX][0-9a-fA-F_]+", parse_int)]
    IntLiteral(i64),

    // Punctuation the parser dispatches on
    #[token("@")]
    At,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("=")]
    Equal,

    #[token("->")]
    Arrow,

    #[token("*")]
    Star,

    #[token("**")]
    StarStar,

    #[token(";")]
    Semicolon,

    // Operator catch-all for skipped statement bodies
    #[regex(
        r"(==|!=|<=|>=|<<=|>>=|//=|\*\*=|:=|@=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|//|<<|>>|[+\-/%<>&|^~!])",
        |lex| lex.slice().to_string()
    )]
    Op(String),
}

fn parse_float(lex: &mut logos::Lexer<LogosToken>) -> f64 {
    lex.slice().replace('_', "").parse().unwrap_or(f64::MAX)
}

fn parse_int(lex: &mut logos::Lexer<LogosToken>) -> i64 {
    let text = lex.slice().replace('_', "");
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(i64::MAX)
    } else {
        text.parse().unwrap_or(i64::MAX)
    }
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    InconsistentDedent { span: Span },
}

impl LexError {
    /// Get the span of this error
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InconsistentDedent { span } => span,
        }
    }

    /// Get a description of this error
    pub fn description(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { char, .. } => {
                format!("Unexpected character '{}'", char)
            }
            LexError::UnterminatedString { .. } => "Unterminated string literal".to_string(),
            LexError::InconsistentDedent { .. } => {
                "Unindent does not match any outer indentation level".to_string()
            }
        }
    }

    /// Get a hint for fixing this error
    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("Add a matching closing quote to terminate the string".to_string())
            }
            LexError::InconsistentDedent { .. } => {
                Some("Align the line with one of the enclosing blocks".to_string())
            }
            _ => None,
        }
    }

    /// Format the error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        let span = self.span();
        let mut result = String::new();

        result.push_str(&format!(
            "Error at {}:{}: {}\n",
            span.line,
            span.column,
            self.description()
        ));

        if let Some(error_line) = source.lines().nth(span.line.saturating_sub(1) as usize) {
            result.push_str("  |\n");
            result.push_str(&format!("{:3} | {}\n", span.line, error_line));
            result.push_str(&format!(
                "  | {}^\n",
                " ".repeat(span.column.saturating_sub(1) as usize)
            ));
        }

        if let Some(hint) = self.hint() {
            result.push_str(&format!("\nHint: {}\n", hint));
        }

        result
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.description(),
            self.span().line,
            self.span().column
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer over one Python module's source text.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Format all errors with source context
    pub fn format_errors(errors: &[LexError], source: &str) -> String {
        errors
            .iter()
            .map(|e| e.format_with_source(source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let bytes = self.source.as_bytes();
        let mut pos = 0usize;
        let mut line = 1u32;
        let mut column = 1u32;
        // Indentation widths of the open blocks; tabs advance to the next
        // multiple of 8, as in the CPython tokenizer
        let mut indents: Vec<u32> = vec![0];
        let mut bracket_depth = 0usize;
        let mut at_line_start = true;

        while pos < bytes.len() {
            if at_line_start && bracket_depth == 0 {
                let mut width = 0u32;
                while pos < bytes.len() {
                    match bytes[pos] {
                        b' ' => {
                            width += 1;
                            pos += 1;
                        }
                        b'\t' => {
                            width = (width / 8 + 1) * 8;
                            pos += 1;
                        }
                        _ => break,
                    }
                }
                column = width + 1;
                if pos >= bytes.len() {
                    break;
                }
                // Blank and comment-only lines carry no indentation
                match bytes[pos] {
                    b'\n' => {
                        pos += 1;
                        line += 1;
                        column = 1;
                        continue;
                    }
                    b'\r' => {
                        pos += 1;
                        continue;
                    }
                    b'#' => {
                        while pos < bytes.len() && bytes[pos] != b'\n' {
                            pos += 1;
                        }
                        continue;
                    }
                    _ => {}
                }

                let span = Span::new(pos, pos, line, column);
                let current = *indents.last().unwrap();
                if width > current {
                    indents.push(width);
                    self.tokens.push((Token::Indent, span));
                } else if width < current {
                    while *indents.last().unwrap() > width {
                        indents.pop();
                        self.tokens.push((Token::Dedent, span));
                    }
                    if *indents.last().unwrap() != width {
                        self.errors.push(LexError::InconsistentDedent { span });
                        // Resynchronize so one bad line doesn't cascade
                        indents.push(width);
                    }
                }
                at_line_start = false;
                continue;
            }

            let ch = bytes[pos];
            match ch {
                b' ' | b'\t' => {
                    pos += 1;
                    column += 1;
                    continue;
                }
                b'\r' => {
                    pos += 1;
                    continue;
                }
                b'#' => {
                    while pos < bytes.len() && bytes[pos] != b'\n' {
                        pos += 1;
                    }
                    continue;
                }
                b'\n' => {
                    if bracket_depth == 0 {
                        self.tokens
                            .push((Token::Newline, Span::new(pos, pos + 1, line, column)));
                        at_line_start = true;
                    }
                    pos += 1;
                    line += 1;
                    column = 1;
                    continue;
                }
                b'\\' if pos + 1 < bytes.len() && bytes[pos + 1] == b'\n' => {
                    pos += 2;
                    line += 1;
                    column = 1;
                    continue;
                }
                b'\\' if pos + 2 < bytes.len()
                    && bytes[pos + 1] == b'\r'
                    && bytes[pos + 2] == b'\n' =>
                {
                    pos += 3;
                    line += 1;
                    column = 1;
                    continue;
                }
                _ => {}
            }

            // String literals, with an optional 1-2 letter prefix (r, b, u,
            // f in any case or combination) immediately before the quote
            if let Some((prefix_len, quote, triple)) = string_start(&bytes[pos..]) {
                let start_span = Span::new(pos, pos, line, column);
                let quote_len = if triple { 3 } else { 1 };
                let content_start = pos + prefix_len + quote_len;
                match scan_string(bytes, content_start, quote, triple) {
                    Some(content_end) => {
                        let content = self.source[content_start..content_end].to_string();
                        let token_end = content_end + quote_len;
                        let span = Span::new(pos, token_end, line, column);
                        self.tokens.push((Token::StringLiteral(content), span));
                        for c in self.source[pos..token_end].chars() {
                            if c == '\n' {
                                line += 1;
                                column = 1;
                            } else {
                                column += 1;
                            }
                        }
                        pos = token_end;
                    }
                    None => {
                        self.errors.push(LexError::UnterminatedString {
                            span: start_span,
                        });
                        // Give up on the rest of the input; everything after
                        // an unterminated quote is inside the string
                        pos = bytes.len();
                    }
                }
                continue;
            }

            // Single logos token
            let mut logos_lexer = LogosToken::lexer(&self.source[pos..]);
            if let Some(token_result) = logos_lexer.next() {
                let range = logos_lexer.span();
                let abs_start = pos + range.start;
                let abs_end = pos + range.end;
                let span = Span::new(abs_start, abs_end, line, column);

                match token_result {
                    Ok(logos_token) => {
                        match &logos_token {
                            LogosToken::LeftParen
                            | LogosToken::LeftBracket
                            | LogosToken::LeftBrace => bracket_depth += 1,
                            LogosToken::RightParen
                            | LogosToken::RightBracket
                            | LogosToken::RightBrace => {
                                bracket_depth = bracket_depth.saturating_sub(1)
                            }
                            _ => {}
                        }
                        self.tokens.push((convert_token(logos_token), span));
                    }
                    Err(_) => {
                        let char = self.source[abs_start..].chars().next().unwrap_or('\0');
                        self.errors.push(LexError::UnexpectedCharacter { char, span });
                    }
                }

                for c in self.source[abs_start..abs_end].chars() {
                    if c == '\n' {
                        line += 1;
                        column = 1;
                    } else {
                        column += 1;
                    }
                }
                pos = abs_end;
            } else {
                break;
            }
        }

        // Close out the final line and any open blocks
        if !at_line_start && !self.tokens.is_empty() {
            let span = Span::new(self.source.len(), self.source.len(), line, column);
            self.tokens.push((Token::Newline, span));
        }
        let eof_span = Span::new(self.source.len(), self.source.len(), line, column);
        while indents.len() > 1 {
            indents.pop();
            self.tokens.push((Token::Dedent, eof_span));
        }
        self.tokens.push((Token::Eof, eof_span));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

/// Detect the start of a string literal at the head of `rest`.
///
/// Returns `(prefix_len, quote_char, is_triple)`.
fn string_start(rest: &[u8]) -> Option<(usize, u8, bool)> {
    let mut prefix_len = 0usize;
    while prefix_len < 2 && prefix_len < rest.len() {
        match rest[prefix_len] {
            b'r' | b'R' | b'b' | b'B' | b'u' | b'U' | b'f' | b'F' => prefix_len += 1,
            _ => break,
        }
    }
    let quote = *rest.get(prefix_len)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let triple = rest.len() >= prefix_len + 3
        && rest[prefix_len + 1] == quote
        && rest[prefix_len + 2] == quote;
    Some((prefix_len, quote, triple))
}

/// Scan past string content starting at `start` (after the opening quotes).
///
/// Returns the byte offset of the closing quote. Contents are kept raw; the
/// generator never needs unescaped values. Backslash always consumes the
/// next character, matching the CPython rule that even raw strings cannot
/// end in a lone backslash.
fn scan_string(bytes: &[u8], start: usize, quote: u8, triple: bool) -> Option<usize> {
    let mut pos = start;
    while pos < bytes.len() {
        let ch = bytes[pos];
        if ch == b'\\' {
            pos += 2;
            continue;
        }
        if ch == quote {
            if !triple {
                return Some(pos);
            }
            if pos + 2 < bytes.len() && bytes[pos + 1] == quote && bytes[pos + 2] == quote {
                return Some(pos);
            }
        }
        if ch == b'\n' && !triple {
            return None;
        }
        pos += 1;
    }
    None
}

fn convert_token(token: LogosToken) -> Token {
    match token {
        LogosToken::Def => Token::Def,
        LogosToken::Class => Token::Class,
        LogosToken::True => Token::True,
        LogosToken::False => Token::False,
        LogosToken::NoneLit => Token::None,
        LogosToken::Identifier(name) => Token::Identifier(name),
        LogosToken::FloatLiteral(value) => Token::FloatLiteral(value),
        LogosToken::IntLiteral(value) => Token::IntLiteral(value),
        LogosToken::At => Token::At,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        LogosToken::Colon => Token::Colon,
        LogosToken::Comma => Token::Comma,
        LogosToken::Dot => Token::Dot,
        LogosToken::Equal => Token::Equal,
        LogosToken::Arrow => Token::Arrow,
        LogosToken::Star => Token::Star,
        LogosToken::StarStar => Token::StarStar,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Op(op) => Token::Op(op),
    }
}

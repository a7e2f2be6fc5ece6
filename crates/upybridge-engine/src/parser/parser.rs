//! Recursive-descent parser for the Python declaration subset.
//!
//! Only top-level `def` and `class` statements (plus their decorators and
//! parameter lists) are modeled. Every other statement, and every statement
//! body, is skipped using the lexer's indent structure. Malformed
//! declaration syntax is fatal; unrecognized decorator shapes degrade to
//! [`Decorator::Other`] instead of erroring.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::token::{Span, Token};
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid syntax: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Lex(Vec<LexError>),

    #[error("Unexpected {found}, expected {expected} at {}:{}", .span.line, .span.column)]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input at {}:{}", .span.line, .span.column)]
    UnexpectedEof { span: Span },

    #[error("Unexpected indent at {}:{}", .span.line, .span.column)]
    UnexpectedIndent { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<&Span> {
        match self {
            ParseError::Lex(errors) => errors.first().map(|e| e.span()),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span }
            | ParseError::UnexpectedIndent { span } => Some(span),
        }
    }

    fn description(&self) -> String {
        match self {
            ParseError::Lex(_) => "invalid syntax".to_string(),
            ParseError::UnexpectedToken {
                expected, found, ..
            } => format!("Unexpected {}, expected {}", found, expected),
            ParseError::UnexpectedEof { .. } => "Unexpected end of input".to_string(),
            ParseError::UnexpectedIndent { .. } => "Unexpected indent".to_string(),
        }
    }

    /// Format the error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        match self {
            ParseError::Lex(errors) => Lexer::format_errors(errors, source),
            _ => {
                let span = self.span().copied().unwrap_or(Span::new(0, 0, 1, 1));
                let mut result = format!(
                    "Error at {}:{}: {}\n",
                    span.line,
                    span.column,
                    self.description()
                );
                if let Some(error_line) =
                    source.lines().nth(span.line.saturating_sub(1) as usize)
                {
                    result.push_str("  |\n");
                    result.push_str(&format!("{:3} | {}\n", span.line, error_line));
                    result.push_str(&format!(
                        "  | {}^\n",
                        " ".repeat(span.column.saturating_sub(1) as usize)
                    ));
                }
                result
            }
        }
    }
}

/// Parser over the token stream of one module.
pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

impl Parser {
    /// Lex the source and construct a parser. Lexical errors surface here.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize().map_err(ParseError::Lex)?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Parse the module into its ordered top-level definitions.
    pub fn parse_module(mut self) -> Result<Vec<Definition>, ParseError> {
        let mut defs = Vec::new();
        loop {
            match self.current() {
                Token::Eof => break,
                Token::Newline | Token::Dedent => self.advance(),
                Token::Indent => {
                    return Err(ParseError::UnexpectedIndent {
                        span: self.current_span(),
                    })
                }
                Token::At | Token::Def | Token::Class => {
                    let decorators = self.parse_decorators()?;
                    match self.current() {
                        Token::Def => {
                            defs.push(Definition::Function(self.parse_function(decorators)?))
                        }
                        Token::Class => {
                            defs.push(Definition::Class(self.parse_class(decorators)?))
                        }
                        // decorated statement that is not a plain def or
                        // class (e.g. async def): not modeled
                        _ => self.skip_statement(),
                    }
                }
                _ => self.skip_statement(),
            }
        }
        Ok(defs)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_decorators(&mut self) -> Result<Vec<Decorator>, ParseError> {
        let mut decorators = Vec::new();
        while self.check(&Token::At) {
            let at_span = self.current_span();
            self.advance();
            decorators.push(self.parse_decorator(at_span)?);
            if self.check(&Token::Newline) {
                self.advance();
            }
        }
        Ok(decorators)
    }

    fn parse_decorator(&mut self, at_span: Span) -> Result<Decorator, ParseError> {
        let mut segments = Vec::new();
        match self.current().clone() {
            Token::Identifier(name) => {
                segments.push(name);
                self.advance();
            }
            _ => return Ok(self.unrecognized_decorator(at_span)),
        }
        while self.check(&Token::Dot) {
            self.advance();
            match self.current().clone() {
                Token::Identifier(name) => {
                    segments.push(name);
                    self.advance();
                }
                _ => return Ok(self.unrecognized_decorator(at_span)),
            }
        }
        let path = DottedPath(segments);

        if self.check(&Token::LeftParen) {
            self.advance();
            let (keywords, close_span) = self.parse_call_keywords()?;
            if !self.check(&Token::Newline) && !self.check(&Token::Eof) {
                return Ok(self.unrecognized_decorator(at_span));
            }
            return Ok(Decorator::Call {
                path,
                keywords,
                span: at_span.to(&close_span),
            });
        }

        // Anything trailing a bare dotted name (subscripts, calls on calls)
        // is a shape the subset does not recognize
        if !self.check(&Token::Newline) && !self.check(&Token::Eof) {
            return Ok(self.unrecognized_decorator(at_span));
        }
        let span = at_span.to(&self.prev_span());
        Ok(Decorator::Name { path, span })
    }

    fn unrecognized_decorator(&mut self, at_span: Span) -> Decorator {
        let span = at_span.to(&self.current_span());
        self.skip_line();
        Decorator::Other { span }
    }

    /// Parse decorator call arguments, starting just after `(`.
    ///
    /// Keyword arguments with literal values are captured; positional and
    /// non-literal arguments are skipped. Consumes through the closing `)`.
    fn parse_call_keywords(&mut self) -> Result<(Vec<Keyword>, Span), ParseError> {
        let mut keywords = Vec::new();
        loop {
            match self.current() {
                Token::RightParen => {
                    let span = self.current_span();
                    self.advance();
                    return Ok((keywords, span));
                }
                Token::Eof | Token::Newline => {
                    return Err(ParseError::UnexpectedEof {
                        span: self.current_span(),
                    })
                }
                _ => {}
            }

            if let Token::Identifier(name) = self.current().clone() {
                if matches!(self.peek(), Some(Token::Equal)) {
                    let kw_span = self.current_span();
                    self.advance();
                    self.advance();
                    let value = self.parse_literal_value();
                    keywords.push(Keyword {
                        name,
                        value,
                        span: kw_span,
                    });
                    if self.check(&Token::Comma) {
                        self.advance();
                    }
                    continue;
                }
            }

            // positional or otherwise unrecognized argument
            self.skip_balanced_until(&[Token::Comma, Token::RightParen]);
            if self.check(&Token::Comma) {
                self.advance();
            }
        }
    }

    fn parse_literal_value(&mut self) -> Literal {
        let literal = match self.current().clone() {
            Token::True => Some(Literal::Bool(true)),
            Token::False => Some(Literal::Bool(false)),
            Token::None => Some(Literal::None),
            Token::IntLiteral(value) => Some(Literal::Int(value)),
            Token::FloatLiteral(value) => Some(Literal::Float(value)),
            Token::StringLiteral(value) => Some(Literal::Str(value)),
            _ => None,
        };
        match literal {
            Some(value) => {
                self.advance();
                if self.check(&Token::Comma) || self.check(&Token::RightParen) {
                    value
                } else {
                    // literal followed by more expression: not a plain constant
                    self.skip_balanced_until(&[Token::Comma, Token::RightParen]);
                    Literal::Other
                }
            }
            None => {
                self.skip_balanced_until(&[Token::Comma, Token::RightParen]);
                Literal::Other
            }
        }
    }

    fn parse_function(&mut self, decorators: Vec<Decorator>) -> Result<FunctionDef, ParseError> {
        let def_span = self.expect(Token::Def, "'def'")?;
        let (name, name_span) = self.expect_identifier("function name")?;
        self.expect(Token::LeftParen, "'('")?;
        let params = self.parse_params()?;
        if self.check(&Token::Arrow) {
            self.advance();
            self.skip_balanced_until(&[Token::Colon]);
        }
        self.expect(Token::Colon, "':'")?;
        self.skip_statement();
        Ok(FunctionDef {
            name,
            decorators,
            params,
            span: def_span.to(&name_span),
        })
    }

    /// Parse a parameter list, starting just after `(`; consumes the `)`.
    ///
    /// Star parameters and the positional-only `/` marker are dropped, as in
    /// the modeled subset.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        loop {
            match self.current().clone() {
                Token::RightParen => {
                    self.advance();
                    return Ok(params);
                }
                Token::Star | Token::StarStar => {
                    self.advance();
                    self.skip_balanced_until(&[Token::Comma, Token::RightParen]);
                }
                Token::Op(op) if op == "/" => {
                    self.advance();
                }
                Token::Identifier(name) => {
                    let span = self.current_span();
                    self.advance();
                    let annotation = if self.check(&Token::Colon) {
                        self.advance();
                        Some(self.parse_type_expr())
                    } else {
                        None
                    };
                    if self.check(&Token::Equal) {
                        self.advance();
                        self.skip_balanced_until(&[Token::Comma, Token::RightParen]);
                    }
                    params.push(Param {
                        name,
                        annotation,
                        span,
                    });
                }
                Token::Eof | Token::Newline => {
                    return Err(ParseError::UnexpectedEof {
                        span: self.current_span(),
                    })
                }
                _ => return Err(self.unexpected("parameter name or ')'")),
            }
            if self.check(&Token::Comma) {
                self.advance();
            }
        }
    }

    /// Parse an annotation. Only a bare identifier immediately followed by a
    /// parameter delimiter counts as a named type; everything else is
    /// `TypeExpr::Other`.
    fn parse_type_expr(&mut self) -> TypeExpr {
        if let Token::Identifier(name) = self.current().clone() {
            if matches!(
                self.peek(),
                Some(Token::Comma | Token::RightParen | Token::Equal)
            ) {
                self.advance();
                return TypeExpr::Name(name);
            }
        }
        self.skip_balanced_until(&[Token::Comma, Token::RightParen, Token::Equal]);
        TypeExpr::Other
    }

    fn parse_class(&mut self, decorators: Vec<Decorator>) -> Result<ClassDef, ParseError> {
        let class_span = self.expect(Token::Class, "'class'")?;
        let (name, name_span) = self.expect_identifier("class name")?;
        if self.check(&Token::LeftParen) {
            self.advance();
            self.skip_balanced_until(&[Token::RightParen]);
            self.expect(Token::RightParen, "')'")?;
        }
        self.expect(Token::Colon, "':'")?;

        let mut methods = Vec::new();
        if self.check(&Token::Newline) {
            self.advance();
            if self.check(&Token::Indent) {
                self.advance();
                loop {
                    match self.current() {
                        Token::Dedent => {
                            self.advance();
                            break;
                        }
                        Token::Eof => break,
                        Token::Newline => self.advance(),
                        Token::At | Token::Def => {
                            let decorators = self.parse_decorators()?;
                            if self.check(&Token::Def) {
                                methods.push(self.parse_function(decorators)?);
                            } else {
                                // decorated statement that is not a method
                                // (e.g. a nested class): not modeled
                                self.skip_statement();
                            }
                        }
                        _ => self.skip_statement(),
                    }
                }
            }
        } else {
            self.skip_line();
        }

        Ok(ClassDef {
            name,
            decorators,
            methods,
            span: class_span.to(&name_span),
        })
    }

    // ========================================================================
    // Statement skipping
    // ========================================================================

    /// Skip a statement the subset does not model, including any suite that
    /// follows it.
    fn skip_statement(&mut self) {
        self.skip_line();
        if self.check(&Token::Indent) {
            self.advance();
            self.skip_suite();
        }
    }

    /// Skip tokens through the end of the current logical line.
    fn skip_line(&mut self) {
        self.skip_balanced_until(&[]);
        if self.check(&Token::Newline) {
            self.advance();
        }
    }

    /// Skip a suite whose opening `Indent` has already been consumed.
    fn skip_suite(&mut self) {
        let mut depth = 1usize;
        while depth > 0 {
            match self.current() {
                Token::Eof => return,
                Token::Indent => {
                    depth += 1;
                    self.advance();
                }
                Token::Dedent => {
                    depth -= 1;
                    self.advance();
                }
                _ => self.advance(),
            }
        }
    }

    /// Skip tokens until one of `stop` appears outside any bracket nesting.
    /// Also stops (without consuming) at `Newline` outside brackets and at
    /// `Eof`. The stopping token is not consumed.
    fn skip_balanced_until(&mut self, stop: &[Token]) {
        let mut depth = 0usize;
        loop {
            let token = self.current();
            match token {
                Token::Eof => return,
                Token::Newline if depth == 0 => return,
                Token::LeftParen | Token::LeftBracket | Token::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                Token::RightParen | Token::RightBracket | Token::RightBrace => {
                    if depth > 0 {
                        depth -= 1;
                        self.advance();
                    } else if stop.contains(token) {
                        return;
                    } else {
                        // stray closer in a skipped statement: noise
                        self.advance();
                    }
                }
                _ if depth == 0 && stop.contains(token) => return,
                _ => self.advance(),
            }
        }
    }

    // ========================================================================
    // Token stream helpers
    // ========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].1
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(token, _)| token)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<Span, ParseError> {
        if self.current() == &token {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else if self.current() == &Token::Eof {
            Err(ParseError::UnexpectedEof {
                span: self.current_span(),
            })
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<(String, Span), ParseError> {
        match self.current().clone() {
            Token::Identifier(name) => {
                let span = self.current_span();
                self.advance();
                Ok((name, span))
            }
            Token::Eof => Err(ParseError::UnexpectedEof {
                span: self.current_span(),
            }),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current().describe(),
            span: self.current_span(),
        }
    }
}

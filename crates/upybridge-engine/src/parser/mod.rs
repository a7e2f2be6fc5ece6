//! Lexer and parser for the Python declaration subset.
//!
//! This module recognizes exactly the syntax the translator needs: top-level
//! functions, top-level classes, the methods directly inside them, and their
//! decorators and typed parameter lists. Statement bodies are traversed only
//! far enough to skip them.
//!
//! # Example
//!
//! ```ignore
//! use upybridge_engine::parser::Parser;
//!
//! let source = r#"
//! def ping():
//!     pass
//! "#;
//!
//! let defs = Parser::new(source)?.parse_module()?;
//! for def in &defs {
//!     println!("{}", def.name());
//! }
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

// Re-exports for convenience
pub use ast::{ClassDef, Decorator, Definition, DottedPath, FunctionDef, Keyword, Literal, Param, TypeExpr};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use token::{Span, Token};

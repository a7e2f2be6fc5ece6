//! Definition-level AST for the Python declaration subset.
//!
//! Only the shapes that drive translation are modeled: top-level functions
//! and classes, their decorators, and typed parameter lists. Statement
//! bodies are skipped by the parser and never appear here.

use crate::parser::token::Span;

/// A top-level definition, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Function(FunctionDef),
    Class(ClassDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Function(def) => &def.name,
            Definition::Class(def) => &def.name,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Definition::Function(def) => &def.span,
            Definition::Class(def) => &def.span,
        }
    }
}

/// A `def` — top-level function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub params: Vec<Param>,
    pub span: Span,
}

/// A top-level `class` with the methods found directly in its body.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub methods: Vec<FunctionDef>,
    pub span: Span,
}

/// One formal parameter. Star parameters (`*args`, `**kwargs`) and the
/// positional-only marker are dropped during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub span: Span,
}

/// A parameter type annotation.
///
/// `Name` is a bare identifier (`int`, `str`, ...); anything more involved
/// (dotted names, subscripts) is `Other` and maps to the fallback type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Name(String),
    Other,
}

/// A decorator, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Decorator {
    /// `@name` or `@a.b.c`
    Name { path: DottedPath, span: Span },
    /// `@a.b(...)` with any keyword arguments captured
    Call {
        path: DottedPath,
        keywords: Vec<Keyword>,
        span: Span,
    },
    /// Any shape the subset does not recognize; ignored during
    /// classification rather than raised as an error
    Other { span: Span },
}

impl Decorator {
    pub fn span(&self) -> &Span {
        match self {
            Decorator::Name { span, .. }
            | Decorator::Call { span, .. }
            | Decorator::Other { span } => span,
        }
    }
}

/// A dotted decorator name such as `unreal.uclass`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedPath(pub Vec<String>);

impl DottedPath {
    /// Last path segment, e.g. `uclass` in `unreal.uclass`.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// Exact match against a qualified name.
    pub fn is(&self, segments: &[&str]) -> bool {
        self.0.len() == segments.len()
            && self.0.iter().zip(segments).all(|(a, b)| a == b)
    }
}

impl std::fmt::Display for DottedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A keyword argument inside a call-form decorator.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Literal,
    pub span: Span,
}

/// A literal keyword value. Non-literal expressions are `Other` and never
/// count as truthy markers.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    None,
    Other,
}

impl Literal {
    /// Python truthiness for constant values; `Other` is never truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Bool(value) => *value,
            Literal::Int(value) => *value != 0,
            Literal::Float(value) => *value != 0.0,
            Literal::Str(value) => !value.is_empty(),
            Literal::None | Literal::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_path_matching() {
        let path = DottedPath(vec!["unreal".to_string(), "uclass".to_string()]);
        assert!(path.is(&["unreal", "uclass"]));
        assert!(!path.is(&["unreal"]));
        assert!(!path.is(&["unreal", "ufunction"]));
        assert_eq!(path.last(), "uclass");
        assert_eq!(path.to_string(), "unreal.uclass");
    }

    #[test]
    fn test_literal_truthiness() {
        assert!(Literal::Bool(true).is_truthy());
        assert!(Literal::Int(1).is_truthy());
        assert!(Literal::Str("x".to_string()).is_truthy());
        assert!(!Literal::Bool(false).is_truthy());
        assert!(!Literal::Int(0).is_truthy());
        assert!(!Literal::Str(String::new()).is_truthy());
        assert!(!Literal::None.is_truthy());
        assert!(!Literal::Other.is_truthy());
    }
}

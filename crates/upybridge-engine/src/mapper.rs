//! Identifier and type mapping from Python to Unreal C++.
//!
//! Pure functions; same input always yields the same output. Type mapping
//! is total: every annotation (or its absence) produces a C++ type name.

use crate::parser::ast::TypeExpr;

/// Convert a snake_case identifier to CamelCase.
///
/// Splits on underscores and capitalizes the first letter of each segment.
/// Already-PascalCase input without underscores passes through unchanged.
pub fn snake_to_camel(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// Capitalize only the first character; used for synthesized class names and
/// parameter names.
pub fn upper_first(name: &str) -> String {
    capitalize(name)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Map a parameter annotation to its Unreal C++ type.
///
/// Unannotated parameters and non-name annotations pass strings by const
/// reference; unknown type names fall back to `FString` by value.
pub fn map_type(annotation: Option<&TypeExpr>) -> &'static str {
    match annotation {
        None | Some(TypeExpr::Other) => "const FString&",
        Some(TypeExpr::Name(name)) => match name.as_str() {
            "str" => "const FString&",
            "int" => "int32",
            "float" => "float",
            "bool" => "bool",
            _ => "FString",
        },
    }
}

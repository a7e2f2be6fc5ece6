//! Template rendering of the two output artifacts.
//!
//! [`header`] emits the declarations file (`<module>.h`), [`source`] the
//! definitions file (`<module>.cpp`). Both iterate classes in model order
//! and, within each class, static functions before instance functions, each
//! in source order.

pub mod header;
pub mod source;

pub use header::render_header;
pub use source::render_source;

use crate::model::Param;

/// `const FString& Msg, int32 Count`
pub(crate) fn param_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|param| format!("{} {}", param.cpp_type, param.cpp_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Msg, Count`
pub(crate) fn arg_names(params: &[Param]) -> String {
    params
        .iter()
        .map(|param| param.cpp_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format string and argument list for the bridge command's
/// `FString::Printf`: one `%s` placeholder per parameter, each argument
/// dereferenced.
pub(crate) fn printf_args(params: &[Param]) -> (String, String) {
    let fmt = params
        .iter()
        .map(|_| "%s")
        .collect::<Vec<_>>()
        .join(", ");
    let values = params
        .iter()
        .map(|param| format!("*{}", param.cpp_name))
        .collect::<Vec<_>>()
        .join(", ");
    (fmt, values)
}

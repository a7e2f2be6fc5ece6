//! UPyBridge translation engine.
//!
//! Translates a restricted Python module (top-level functions, classes, and
//! the `unreal.uclass` / `unreal.ufunction` / `staticmethod` decorators)
//! into Unreal Engine C++ binding code: a declarations file and a
//! definitions file whose glue bodies dispatch back into the originating
//! Python module through the engine's Python script plugin.
//!
//! The pipeline is synchronous and stateless per run:
//!
//! 1. [`parser`] — source text to ordered top-level definitions;
//! 2. [`mapper`] — identifier and type conversion;
//! 3. [`model`] — classification into a [`model::ModuleModel`];
//! 4. [`codegen`] — template rendering of both artifacts.

pub mod codegen;
pub mod mapper;
pub mod model;
pub mod parser;

// Re-exports for convenience
pub use codegen::{render_header, render_source};
pub use model::ModuleModel;
pub use parser::{ParseError, Parser};

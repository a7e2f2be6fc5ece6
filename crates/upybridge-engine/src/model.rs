//! Structured module model built from parsed definitions.
//!
//! One ordered walk over the definition list classifies everything the
//! renderer needs: reflected-object vs plain-data classes, static vs
//! instance methods, override hooks, and mapped parameter lists. The model
//! is immutable after construction and discarded after rendering.

use crate::mapper::{map_type, snake_to_camel, upper_first};
use crate::parser::ast::{ClassDef, Decorator, Definition, FunctionDef, Param as AstParam};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A mapped parameter: C++ type and capitalized name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub cpp_type: String,
    pub cpp_name: String,
}

/// One translated function or method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionModel {
    /// Original Python name, used in bridge commands
    pub py_name: String,
    /// CamelCase C++ name
    pub cpp_name: String,
    pub params: Vec<Param>,
    /// Script-side override of a native extension point
    pub is_override: bool,
    pub is_static: bool,
}

/// One translated class: `U`-prefixed reflected object or `F`-prefixed
/// plain-data struct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassModel {
    pub name: String,
    pub is_reflected: bool,
    pub statics: Vec<FunctionModel>,
    pub instances: Vec<FunctionModel>,
}

/// The whole module, classes in first-encounter order with the synthesized
/// module-level class always first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleModel {
    pub module_name: String,
    classes: Vec<ClassModel>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl ModuleModel {
    /// Build the model from parsed definitions in one ordered pass.
    pub fn build(module_name: &str, defs: &[Definition]) -> Self {
        let mut model = Self {
            module_name: module_name.to_string(),
            classes: Vec::new(),
            index: FxHashMap::default(),
        };

        // Bare top-level functions live on a synthesized reflected class
        let top_name = format!("U{}", upper_first(module_name));
        let top = model.class_entry(top_name, true);

        for def in defs {
            match def {
                Definition::Function(func) => {
                    let function = build_function(func, &func.params, false, true);
                    model.classes[top].statics.push(function);
                }
                Definition::Class(class) => model.add_class(class),
            }
        }

        model
    }

    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    /// Look up a class by its C++ name.
    pub fn class(&self, name: &str) -> Option<&ClassModel> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    fn add_class(&mut self, class: &ClassDef) {
        let is_reflected = class.decorators.iter().any(is_reflect_marker);
        let prefix = if is_reflected { 'U' } else { 'F' };
        let cpp_name = format!("{}{}", prefix, upper_first(&class.name));
        // Duplicate target names merge into the first entry, which keeps
        // its original classification
        let slot = self.class_entry(cpp_name, is_reflected);

        for method in &class.methods {
            let is_override = method.decorators.iter().any(is_override_marker);
            let has_self = method
                .params
                .first()
                .is_some_and(|param| param.name == "self");
            let is_static =
                method.decorators.iter().any(is_static_marker) || !has_self;
            let args = if is_static {
                &method.params[..]
            } else {
                &method.params[1..]
            };
            let function = build_function(method, args, is_override, is_static);
            if is_static {
                self.classes[slot].statics.push(function);
            } else {
                self.classes[slot].instances.push(function);
            }
        }
    }

    fn class_entry(&mut self, name: String, is_reflected: bool) -> usize {
        if let Some(&slot) = self.index.get(&name) {
            return slot;
        }
        let slot = self.classes.len();
        self.index.insert(name.clone(), slot);
        self.classes.push(ClassModel {
            name,
            is_reflected,
            statics: Vec::new(),
            instances: Vec::new(),
        });
        slot
    }
}

fn build_function(
    def: &FunctionDef,
    args: &[AstParam],
    is_override: bool,
    is_static: bool,
) -> FunctionModel {
    FunctionModel {
        py_name: def.name.clone(),
        cpp_name: snake_to_camel(&def.name),
        params: args
            .iter()
            .map(|param| Param {
                cpp_type: map_type(param.annotation.as_ref()).to_string(),
                cpp_name: upper_first(&param.name),
            })
            .collect(),
        is_override,
        is_static,
    }
}

/// `@unreal.uclass()` marks a reflected-object class.
fn is_reflect_marker(decorator: &Decorator) -> bool {
    matches!(decorator, Decorator::Call { path, .. } if path.is(&["unreal", "uclass"]))
}

/// `@staticmethod` (bare or attribute form) in any decorator position.
fn is_static_marker(decorator: &Decorator) -> bool {
    matches!(decorator, Decorator::Name { path, .. } if path.last() == "staticmethod")
}

/// `@unreal.ufunction(override=True)` — the override keyword must be a
/// truthy literal.
fn is_override_marker(decorator: &Decorator) -> bool {
    match decorator {
        Decorator::Call { path, keywords, .. } if path.is(&["unreal", "ufunction"]) => keywords
            .iter()
            .any(|kw| kw.name == "override" && kw.value.is_truthy()),
        _ => false,
    }
}

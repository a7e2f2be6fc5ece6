//! Definitions artifact (`<module>.cpp`).

use super::{arg_names, param_list, printf_args};
use crate::model::{ClassModel, FunctionModel, ModuleModel};

const CPP_TEMPLATE: &str = r#"#include "{ModuleName}.h"
#include "IPythonScriptPlugin.h"

{ClassDefs}
"#;

const GET_IMPL_TEMPLATE: &str = r#"{ClassName}* {ClassName}::Get()
{
    static TWeakObjectPtr<{ClassName}> Cached;
    if (Cached.IsValid()) return Cached.Get();

    TArray<UClass*> PythonClasses;
    GetDerivedClasses({ClassName}::StaticClass(), PythonClasses);

    if (PythonClasses.Num() == 0) {
        FPythonCommandEx Cmd;
        Cmd.ExecutionMode = EPythonCommandExecutionMode::ExecuteStatement;
        Cmd.Command = TEXT("import {ModuleName}");
        IPythonScriptPlugin::Get()->ExecPythonCommandEx(Cmd);
        GetDerivedClasses({ClassName}::StaticClass(), PythonClasses);
    }

    if (PythonClasses.Num() > 0) {
        Cached = Cast<{ClassName}>(PythonClasses.Last()->GetDefaultObject());
        return Cached.Get();
    }
    return nullptr;
}
"#;

/// Render the definitions file for the whole module.
///
/// Reflected classes get the singleton accessor body: a process-lifetime
/// weak cache, re-resolved by enumerating registered subclasses with a
/// one-shot `import <module>` fallback, binding to the last subclass in the
/// host's enumeration order. The generated accessor assumes the scripting
/// bridge's single-threaded execution context; it carries no locking.
pub fn render_source(model: &ModuleModel) -> String {
    let class_defs = model
        .classes()
        .iter()
        .map(|class| render_class_def(class, &model.module_name))
        .collect::<Vec<_>>()
        .join("\n");

    CPP_TEMPLATE
        .replace("{ModuleName}", &model.module_name)
        .replace("{ClassDefs}", &class_defs)
}

fn render_class_def(class: &ClassModel, module_name: &str) -> String {
    let mut defs = String::new();

    if class.is_reflected {
        defs.push_str(
            &GET_IMPL_TEMPLATE
                .replace("{ClassName}", &class.name)
                .replace("{ModuleName}", module_name),
        );
    }

    if class.statics.is_empty() {
        defs.push_str("// (no static methods)\n");
    } else {
        for func in &class.statics {
            defs.push_str(&bridge_command_def(class, func, module_name));
        }
    }

    if class.instances.is_empty() {
        defs.push_str("// (no instance methods)\n");
    } else {
        for func in &class.instances {
            if func.is_override {
                defs.push_str(&dispatcher_def(class, func));
            } else {
                defs.push_str(&bridge_command_def(class, func, module_name));
            }
        }
    }

    defs
}

/// Body that formats `import <module>; <module>.<fn>(...)` and submits it
/// to the bridge's statement-execution entry point. Static and instance
/// definitions read identically in the .cpp.
fn bridge_command_def(class: &ClassModel, func: &FunctionModel, module_name: &str) -> String {
    let (fmt, values) = printf_args(&func.params);
    let command = if func.params.is_empty() {
        format!(
            "FString PyCmd = TEXT(\"import {0}; {0}.{1}()\");",
            module_name, func.py_name
        )
    } else {
        format!(
            "FString PyCmd = FString::Printf(TEXT(\"import {0}; {0}.{1}({2})\"), {3});",
            module_name, func.py_name, fmt, values
        )
    };
    format!(
        "FString {}::{}({})\n{{\n    FPythonCommandEx Cmd;\n    {}\n    Cmd.Command = PyCmd;\n    Cmd.ExecutionMode = EPythonCommandExecutionMode::ExecuteStatement;\n    IPythonScriptPlugin::Get()->ExecPythonCommandEx(Cmd);\n    return FString();\n}}\n",
        class.name,
        func.cpp_name,
        param_list(&func.params),
        command
    )
}

/// Static dispatcher for an override hook: resolve the singleton, bail out
/// with a default value when no script subclass is live, otherwise forward.
fn dispatcher_def(class: &ClassModel, func: &FunctionModel) -> String {
    format!(
        "bool {0}::Call{1}({2})\n{{\n    {0}* Bridge = {0}::Get();\n    if (!Bridge) return bool();\n    return Bridge->{1}({3});\n}}\n",
        class.name,
        func.cpp_name,
        param_list(&func.params),
        arg_names(&func.params)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleModel;
    use crate::parser::Parser;

    fn render(module_name: &str, source: &str) -> String {
        let defs = Parser::new(source)
            .expect("should lex")
            .parse_module()
            .expect("should parse");
        render_source(&ModuleModel::build(module_name, &defs))
    }

    #[test]
    fn test_prolog_includes() {
        let source = render("game_api", "");
        assert!(source.starts_with("#include \"game_api.h\""));
        assert!(source.contains("#include \"IPythonScriptPlugin.h\""));
    }

    #[test]
    fn test_static_command_body() {
        let source = render("mod", "def send_message(msg: str, count: int):\n    pass\n");
        assert!(source.contains("FString UMod::SendMessage(const FString& Msg, int32 Count)"));
        assert!(source.contains(
            "FString PyCmd = FString::Printf(TEXT(\"import mod; mod.send_message(%s, %s)\"), *Msg, *Count);"
        ));
        assert!(source.contains("Cmd.ExecutionMode = EPythonCommandExecutionMode::ExecuteStatement;"));
        assert!(source.contains("return FString();"));
    }

    #[test]
    fn test_zero_param_command_has_no_placeholders() {
        let source = render("mod", "def ping():\n    pass\n");
        assert!(source.contains("FString PyCmd = TEXT(\"import mod; mod.ping()\");"));
        assert!(!source.contains("Printf(TEXT(\"import mod; mod.ping()\")"));
    }

    #[test]
    fn test_accessor_only_for_reflected_classes() {
        let source = render(
            "mod",
            "@unreal.uclass()\nclass Bridge:\n    pass\n\nclass Config:\n    pass\n",
        );
        assert!(source.contains("UBridge* UBridge::Get()"));
        assert!(!source.contains("FConfig* FConfig::Get()"));
    }

    #[test]
    fn test_accessor_enumerates_before_import_fallback() {
        let source = render("mod", "@unreal.uclass()\nclass Bridge:\n    pass\n");
        let body_start = source.find("UBridge* UBridge::Get()").unwrap();
        let body = &source[body_start..];
        let first_enumerate = body.find("GetDerivedClasses(UBridge::StaticClass()").unwrap();
        let import = body.find("Cmd.Command = TEXT(\"import mod\");").unwrap();
        assert!(first_enumerate < import);
        assert!(body.contains("static TWeakObjectPtr<UBridge> Cached;"));
        assert!(body.contains("PythonClasses.Last()->GetDefaultObject()"));
        assert!(body.contains("return nullptr;"));
    }

    #[test]
    fn test_dispatcher_resolves_singleton_and_forwards() {
        let source = "\
@unreal.uclass()
class Bridge:
    @unreal.ufunction(override=True)
    def on_update(self, delta: float):
        pass
";
        let cpp = render("mod", source);
        assert!(cpp.contains("bool UBridge::CallOnUpdate(float Delta)"));
        assert!(cpp.contains("UBridge* Bridge = UBridge::Get();"));
        assert!(cpp.contains("if (!Bridge) return bool();"));
        assert!(cpp.contains("return Bridge->OnUpdate(Delta);"));
        // no hook body: the script side implements it
        assert!(!cpp.contains("bool UBridge::OnUpdate"));
    }

    #[test]
    fn test_instance_non_override_gets_command_body() {
        let source = "\
class Bridge:
    def send(self, msg: str):
        pass
";
        let cpp = render("mod", source);
        assert!(cpp.contains("FString FBridge::Send(const FString& Msg)"));
        assert!(cpp.contains("mod.send(%s)"));
    }
}

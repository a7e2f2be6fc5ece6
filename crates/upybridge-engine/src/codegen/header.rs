//! Declarations artifact (`<module>.h`).

use super::param_list;
use crate::model::{ClassModel, FunctionModel, ModuleModel};

const HEADER_TEMPLATE: &str = r#"#pragma once
#include "CoreMinimal.h"
#include "UObject/Object.h"
#include "{ModuleName}.generated.h"

{ClassDecls}
"#;

const UCLASS_TEMPLATE: &str = r#"
UCLASS()
class {ModuleNameUpper}_API {ClassName} : public UObject
{
    GENERATED_BODY()
public:
    static {ClassName}* Get();

    // ---- Static methods ----
{StaticDecls}

    // ---- Instance methods ----
{InstanceDecls}
};
"#;

const USTRUCT_TEMPLATE: &str = r#"
USTRUCT(BlueprintType)
struct {ModuleNameUpper}_API {ClassName}
{
    GENERATED_BODY()

    // ---- Static methods ----
{StaticDecls}

    // ---- Instance methods ----
{InstanceDecls}
};
"#;

/// Render the declarations file for the whole module.
pub fn render_header(model: &ModuleModel) -> String {
    let class_decls = model
        .classes()
        .iter()
        .map(|class| render_class_decl(class, &model.module_name))
        .collect::<Vec<_>>()
        .join("\n");

    HEADER_TEMPLATE
        .replace("{ModuleName}", &model.module_name)
        .replace("{ClassDecls}", &class_decls)
}

fn render_class_decl(class: &ClassModel, module_name: &str) -> String {
    let static_decls = if class.statics.is_empty() {
        "    // (no static methods)".to_string()
    } else {
        class
            .statics
            .iter()
            .map(|func| static_decl(func, module_name))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let instance_decls = if class.instances.is_empty() {
        "    // (no instance methods)".to_string()
    } else {
        class
            .instances
            .iter()
            .flat_map(|func| instance_decl_lines(func, module_name))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let template = if class.is_reflected {
        UCLASS_TEMPLATE
    } else {
        USTRUCT_TEMPLATE
    };
    template
        .replace("{ModuleNameUpper}", &module_name.to_uppercase())
        .replace("{ClassName}", &class.name)
        .replace("{StaticDecls}", &static_decls)
        .replace("{InstanceDecls}", &instance_decls)
}

fn static_decl(func: &FunctionModel, module_name: &str) -> String {
    format!(
        "    UFUNCTION(BlueprintCallable, Category=\"{}\")\n    static FString {}({});",
        module_name,
        func.cpp_name,
        param_list(&func.params)
    )
}

/// One declaration for a plain accessor; two for an override: the
/// script-implemented hook plus its static dispatcher.
fn instance_decl_lines(func: &FunctionModel, module_name: &str) -> Vec<String> {
    let params = param_list(&func.params);
    if func.is_override {
        vec![
            format!(
                "    UFUNCTION(BlueprintImplementableEvent, Category=\"{}\")\n    bool {}({});",
                module_name, func.cpp_name, params
            ),
            format!(
                "    UFUNCTION(BlueprintCallable, Category=\"{}\")\n    static bool Call{}({});",
                module_name, func.cpp_name, params
            ),
        ]
    } else {
        vec![format!(
            "    UFUNCTION(BlueprintCallable, Category=\"{}\")\n    FString {}({});",
            module_name, func.cpp_name, params
        )]
    }
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
        render_header(&ModuleModel::build(module_name, &defs))
    }

    #[test]
    fn test_prolog_names_generated_include() {
        let header = render("game_api", "");
        assert!(header.starts_with("#pragma once"));
        assert!(header.contains("#include \"game_api.generated.h\""));
    }

    #[test]
    fn test_reflected_class_gets_singleton_accessor() {
        let header = render(
            "mod",
            "@unreal.uclass()\nclass Bridge:\n    pass\n",
        );
        assert!(header.contains("class MOD_API UBridge : public UObject"));
        assert!(header.contains("static UBridge* Get();"));
    }

    #[test]
    fn test_plain_class_has_no_accessor() {
        let header = render("mod", "class Config:\n    pass\n");
        assert!(header.contains("struct MOD_API FConfig"));
        let struct_decl = header
            .split("USTRUCT(BlueprintType)")
            .nth(1)
            .expect("struct block");
        assert!(!struct_decl.contains("Get();"));
    }

    #[test]
    fn test_static_function_declaration() {
        let header = render("mod", "def send_message(msg: str, count: int):\n    pass\n");
        assert!(header.contains(
            "    UFUNCTION(BlueprintCallable, Category=\"mod\")\n    static FString SendMessage(const FString& Msg, int32 Count);"
        ));
    }

    #[test]
    fn test_override_emits_hook_and_dispatcher() {
        let source = "\
@unreal.uclass()
class Bridge:
    @unreal.ufunction(override=True)
    def on_update(self, delta: float):
        pass
";
        let header = render("mod", source);
        let hook = header
            .find("    bool OnUpdate(float Delta);")
            .expect("hook declaration");
        let dispatcher = header
            .find("    static bool CallOnUpdate(float Delta);")
            .expect("dispatcher declaration");
        assert!(header.contains("UFUNCTION(BlueprintImplementableEvent, Category=\"mod\")"));
        assert!(hook < dispatcher);
    }

    #[test]
    fn test_empty_class_placeholder_comments() {
        let header = render("mod", "class Config:\n    pass\n");
        assert!(header.contains("    // (no static methods)"));
        assert!(header.contains("    // (no instance methods)"));
    }
}

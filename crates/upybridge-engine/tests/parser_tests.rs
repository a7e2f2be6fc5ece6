//! Integration tests for the declaration-subset parser.

use upybridge_engine::parser::{Decorator, Definition, Literal, ParseError, Parser, TypeExpr};

fn parse(source: &str) -> Vec<Definition> {
    Parser::new(source)
        .expect("should lex")
        .parse_module()
        .expect("should parse")
}

// ============================================================================
// Full-module scenarios
// ============================================================================

#[test]
fn test_realistic_module() {
    let source = r#"# Game bridge module
import unreal
from typing import Optional

MAX_RETRIES = 3


def ping():
    """Top-level heartbeat."""
    print("pong")


def spawn_actor(name: str, x: float, y: float, count: int = 1):
    for _ in range(count):
        print(name, x, y)


@unreal.uclass()
class GameBridge(unreal.Object):
    """Main script bridge."""

    retries = 0

    @staticmethod
    def reset_state(hard: bool):
        GameBridge.retries = 0

    @unreal.ufunction(override=True)
    def on_update(self, delta: float):
        return True

    def send_event(self, payload: str):
        print(payload)


class EventRecord:
    def describe(self):
        return "event"
"#;
    let defs = parse(source);
    assert_eq!(defs.len(), 4);

    match &defs[0] {
        Definition::Function(def) => {
            assert_eq!(def.name, "ping");
            assert!(def.params.is_empty());
        }
        _ => panic!("Expected function"),
    }

    match &defs[1] {
        Definition::Function(def) => {
            assert_eq!(def.name, "spawn_actor");
            assert_eq!(def.params.len(), 4);
            assert_eq!(
                def.params[3].annotation,
                Some(TypeExpr::Name("int".to_string()))
            );
        }
        _ => panic!("Expected function"),
    }

    match &defs[2] {
        Definition::Class(class) => {
            assert_eq!(class.name, "GameBridge");
            assert_eq!(class.methods.len(), 3);
            assert_eq!(class.methods[0].name, "reset_state");
            assert_eq!(class.methods[1].name, "on_update");
            assert_eq!(class.methods[2].name, "send_event");
            match &class.decorators[0] {
                Decorator::Call { path, keywords, .. } => {
                    assert!(path.is(&["unreal", "uclass"]));
                    assert!(keywords.is_empty());
                }
                other => panic!("Expected call decorator, got {:?}", other),
            }
        }
        _ => panic!("Expected class"),
    }

    match &defs[3] {
        Definition::Class(class) => {
            assert_eq!(class.name, "EventRecord");
            assert_eq!(class.methods.len(), 1);
        }
        _ => panic!("Expected class"),
    }
}

#[test]
fn test_multiline_signature() {
    let source = "\
def configure(
    name: str,
    level: int,
    strict: bool = False,
):
    pass
";
    let defs = parse(source);
    match &defs[0] {
        Definition::Function(def) => {
            assert_eq!(def.params.len(), 3);
            assert_eq!(def.params[2].name, "strict");
        }
        _ => panic!("Expected function"),
    }
}

#[test]
fn test_decorator_keyword_variants() {
    let source = r#"
class Bridge:
    @unreal.ufunction(override=True, meta="fast")
    def a(self):
        pass

    @unreal.ufunction(ret=str, override=1)
    def b(self):
        pass
"#;
    let defs = parse(source);
    match &defs[0] {
        Definition::Class(class) => {
            match &class.methods[0].decorators[0] {
                Decorator::Call { keywords, .. } => {
                    assert_eq!(keywords[0].value, Literal::Bool(true));
                    assert_eq!(keywords[1].value, Literal::Str("fast".to_string()));
                }
                other => panic!("Expected call decorator, got {:?}", other),
            }
            match &class.methods[1].decorators[0] {
                Decorator::Call { keywords, .. } => {
                    // ret=str is a non-literal value
                    assert_eq!(keywords[0].name, "ret");
                    assert_eq!(keywords[0].value, Literal::Other);
                    assert_eq!(keywords[1].value, Literal::Int(1));
                }
                other => panic!("Expected call decorator, got {:?}", other),
            }
        }
        _ => panic!("Expected class"),
    }
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn test_malformed_def_is_fatal() {
    let result = Parser::new("def 123():\n    pass\n")
        .and_then(|p| p.parse_module());
    assert!(result.is_err());
}

#[test]
fn test_malformed_class_is_fatal() {
    let err = Parser::new("class :\n    pass\n")
        .unwrap()
        .parse_module()
        .unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_lex_error_surfaces_as_parse_error() {
    let result = Parser::new("def f():\n    x = \"unterminated\n");
    match result {
        Err(ParseError::Lex(errors)) => assert!(!errors.is_empty()),
        other => panic!("Expected lex error, got {:?}", other.map(|_| ())),
    }
}

//! Environment tests

use crisp::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// Basic Operations
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_environment_new_is_empty() {
    let env = Environment::new();
    assert!(env.is_empty());
    assert_eq!(env.depth(), 1);
    assert!(env.is_global_scope());
}

#[test]
fn test_environment_define_and_get() {
    let mut env = Environment::new();
    env.define("x", Value::Integer(42));

    assert_eq!(env.get("x"), Some(&Value::Integer(42)));
    assert_eq!(env.get("y"), None);
    assert!(env.contains("x"));
}

#[test]
fn test_environment_prelude_is_immutable() {
    let env = Environment::with_prelude();
    let binding = env.get_binding("car").unwrap();
    assert!(!binding.mutable);
    assert!(env.get("println").unwrap().is_callable());
}

#[test]
fn test_environment_define_cannot_replace_builtin_in_place() {
    let mut env = Environment::with_prelude();
    let before = env.len();
    env.define("car", Value::Integer(1));

    // Shadowed, not overwritten
    assert_eq!(env.len(), before + 1);
    assert_eq!(env.get("car"), Some(&Value::Integer(1)));
}

// ═══════════════════════════════════════════════════════════════════════
// Scoping and Shadowing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_environment_shadowing_restored_on_pop() {
    let mut env = Environment::new();
    env.define("x", Value::Integer(1));

    env.push_frame();
    env.define("x", Value::Integer(2));
    assert_eq!(env.get("x"), Some(&Value::Integer(2)));
    assert!(env.contains_in_current_scope("x"));

    env.pop_frame();
    assert_eq!(env.get("x"), Some(&Value::Integer(1)));
}

#[test]
fn test_environment_pop_global_is_noop() {
    let mut env = Environment::new();
    env.define("x", Value::Integer(1));
    env.pop_frame();
    env.pop_frame();
    assert_eq!(env.depth(), 1);
    assert_eq!(env.get("x"), Some(&Value::Integer(1)));
}

#[test]
fn test_environment_get_local_ignores_globals() {
    let mut env = Environment::new();
    env.define("g", Value::Integer(1));
    assert_eq!(env.get_local("g"), None);

    env.push_frame();
    env.define("l", Value::Integer(2));
    env.push_frame();
    assert_eq!(env.get_local("l"), Some(&Value::Integer(2)));
    assert_eq!(env.get_local("g"), None);
}

#[test]
fn test_environment_names_in_current_scope() {
    let mut env = Environment::new();
    env.define("a", Value::Integer(1));
    env.push_frame();
    env.define("b", Value::Integer(2));
    env.define("c", Value::Integer(3));

    assert_eq!(env.names_in_current_scope(), vec!["b", "c"]);
    assert_eq!(env.all_names(), vec!["a", "b", "c"]);
}

#[test]
fn test_scope_guard_pops_on_drop() {
    let mut env = Environment::new();
    {
        let mut scope = env.scope_guard();
        scope.define("temp", Value::Integer(1));
        assert_eq!(scope.depth(), 2);
    }
    assert_eq!(env.depth(), 1);
    assert!(!env.contains("temp"));
}

// ═══════════════════════════════════════════════════════════════════════
// Assignment
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_environment_assign_innermost() {
    let mut env = Environment::new();
    env.define("x", Value::Integer(1));
    env.push_frame();
    env.define("x", Value::Integer(2));

    env.assign("x", Value::Integer(3)).unwrap();
    assert_eq!(env.get("x"), Some(&Value::Integer(3)));

    env.pop_frame();
    assert_eq!(env.get("x"), Some(&Value::Integer(1)));
}

#[test]
fn test_environment_assign_errors() {
    let mut env = Environment::with_prelude();
    assert_eq!(
        env.assign("missing", Value::Void),
        Err(EnvironmentError::UndefinedVariable {
            name: "missing".to_string()
        })
    );
    assert_eq!(
        env.assign("cons", Value::Void),
        Err(EnvironmentError::ImmutableBinding {
            name: "cons".to_string()
        })
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Call Depth
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_environment_call_depth_limit() {
    let mut env = Environment::with_max_call_depth(2);
    env.enter_call().unwrap();
    env.enter_call().unwrap();
    assert_eq!(
        env.enter_call(),
        Err(EnvironmentError::StackOverflow { depth: 2, max: 2 })
    );

    env.exit_call();
    assert_eq!(env.call_depth(), 1);
    env.enter_call().unwrap();
}

#[test]
fn test_environment_clear_resets_everything() {
    let mut env = Environment::with_prelude();
    env.push_frame();
    env.enter_call().unwrap();
    env.clear();

    assert!(env.is_empty());
    assert_eq!(env.depth(), 1);
    assert_eq!(env.call_depth(), 0);
}

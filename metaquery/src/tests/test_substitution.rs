//! Tests for symbol substitution and free symbol collection

use crate::config::{EngineConfig, SubstitutionMode};
use crate::environment::MetaEnvironment;
use crate::expr::Expr;
use crate::registry::{MetaOption, SymbolDescriptor, SymbolRegistry};
use crate::substitution::Bindings;
use crate::types::{BasicTypes, TypeExpression};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn create_test_registry() -> SymbolRegistry {
    SymbolRegistry::new()
        .with(
            SymbolDescriptor::builder("F")
                .arg("xs", TypeExpression::many(TypeExpression::Wildcard, true), "Values.")
                .build(),
        )
        .unwrap()
        .with(
            SymbolDescriptor::builder("G")
                .arg("xs", TypeExpression::many(TypeExpression::Wildcard, true), "Values.")
                .option(MetaOption::new("Mode", BasicTypes::string(), Expr::value("fast"), "Mode."))
                .build(),
        )
        .unwrap()
}

fn create_test_environment() -> MetaEnvironment {
    MetaEnvironment::new(create_test_registry())
}

fn bindings(pairs: impl IntoIterator<Item = (&'static str, Expr)>) -> Bindings {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn lambda_x_over_f_x_y(env: &MetaEnvironment) -> Expr {
    let x = env.create_symbol("x");
    let body = env.call("F", [x.clone(), env.create_symbol("y")]).unwrap();
    env.create_lambda(&x, body).unwrap()
}

#[test]
fn test_free_symbols_are_replaced() {
    let env = create_test_environment();
    let expr = env
        .call("F", [env.create_symbol("x"), env.create_symbol("y")])
        .unwrap();

    let substituted = env
        .substitute_symbols(&expr, &bindings([("x", env.create_value(1))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "F[1,y]");
}

#[test]
fn test_names_match_ignoring_case() {
    let env = create_test_environment();
    let expr = env
        .call("F", [env.create_symbol("X"), env.create_symbol("y")])
        .unwrap();

    let substituted = env
        .substitute_symbols(&expr, &bindings([("x", env.create_value(1))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "F[1,y]");

    let upper = env.create_symbol("X");
    let lambda = env
        .create_lambda(&upper, env.call("F", [env.create_symbol("x")]).unwrap())
        .unwrap();
    let shadowed = env
        .substitute_symbols(&lambda, &bindings([("x", env.create_value(1))]))
        .unwrap();
    assert!(shadowed.ptr_eq(&lambda));

    let names: Vec<String> = lambda.free_symbols().into_iter().collect();
    assert!(names.is_empty());
}

#[test]
fn test_empty_bindings_return_the_same_node() {
    let env = create_test_environment();
    let expr = env.call("F", [env.create_symbol("x")]).unwrap();

    let substituted = env.substitute_symbols(&expr, &Bindings::new()).unwrap();
    assert!(substituted.ptr_eq(&expr));
}

#[test]
fn test_lambda_arguments_shadow_bindings() {
    let env = create_test_environment();
    let x = env.create_symbol("x");
    let inner = env
        .create_lambda(&x, env.call("F", [x.clone()]).unwrap())
        .unwrap();
    let expr = env.call("F", [x, inner]).unwrap();

    let substituted = env
        .substitute_symbols(&expr, &bindings([("x", env.create_value(1))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "F[1,x => F[x]]");
}

#[test]
fn test_literal_mode_captures_free_names() {
    let env = create_test_environment();
    let lambda = lambda_x_over_f_x_y(&env);

    let substituted = env
        .substitute_symbols(&lambda, &bindings([("y", env.create_symbol("x"))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "x => F[x,x]");
}

#[test]
fn test_capture_avoiding_mode_renames_arguments() {
    let config = EngineConfig::default().with_substitution(SubstitutionMode::CaptureAvoiding);
    let env = MetaEnvironment::with_config(Arc::new(create_test_registry()), config);
    let lambda = lambda_x_over_f_x_y(&env);

    let substituted = env
        .substitute_symbols(&lambda, &bindings([("y", env.create_symbol("x"))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "x$1 => F[x$1,x]");

    let renamed: Vec<&str> = substituted
        .as_lambda()
        .unwrap()
        .argument_names()
        .collect();
    assert_eq!(renamed, vec!["x$1"]);
}

#[test]
fn test_capture_avoiding_mode_leaves_unrelated_arguments() {
    let config = EngineConfig::default().with_substitution(SubstitutionMode::CaptureAvoiding);
    let env = MetaEnvironment::with_config(Arc::new(create_test_registry()), config);
    let lambda = lambda_x_over_f_x_y(&env);

    let substituted = env
        .substitute_symbols(&lambda, &bindings([("y", env.create_value(2))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "x => F[x,2]");
}

#[test]
fn test_substitution_mode_from_toml() {
    let config = EngineConfig::from_toml_str("substitution = \"capture_avoiding\"").unwrap();
    assert_eq!(config.substitution, SubstitutionMode::CaptureAvoiding);
}

#[test]
fn test_let_binding_shadows_its_name() {
    let env = create_test_environment();
    let x = env.create_symbol("x");
    let y = env.create_symbol("y");

    let assign = env.create_assign(&x, y.clone()).unwrap();
    let binding = env
        .create_let(&assign, env.call("F", [x, y]).unwrap())
        .unwrap();
    assert_eq!(binding.to_string(), "let x = y in F[x,y]");

    let substituted = env
        .substitute_symbols(&binding, &bindings([("y", env.create_value(2))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "let x = 2 in F[x,2]");
    assert_eq!(substituted.as_let().unwrap().substituted().to_string(), "F[2,2]");

    let untouched = env
        .substitute_symbols(&binding, &bindings([("x", env.create_value(5))]))
        .unwrap();
    assert!(untouched.ptr_eq(&binding));
}

#[test]
fn test_option_values_are_substituted() {
    let env = create_test_environment();
    let mode = env
        .create_assign(&env.create_symbol("Mode"), env.create_symbol("m"))
        .unwrap();
    let expr = env.call("G", [mode, env.create_value(1)]).unwrap();
    assert_eq!(expr.to_string(), "G[Mode=m,1]");

    let substituted = env
        .substitute_symbols(&expr, &bindings([("m", env.create_value("slow"))]))
        .unwrap();
    assert_eq!(substituted.to_string(), "G[Mode=\"slow\",1]");
}

#[test]
fn test_substituting_a_head_rebuilds_the_application() {
    let env = create_test_environment();
    let raw = env.call("h", [env.create_value(1)]).unwrap();
    assert_eq!(raw.to_string(), "h[1]");

    let x = env.create_symbol("x");
    let lambda = env
        .create_lambda(&x, env.call("F", [x.clone()]).unwrap())
        .unwrap();
    let substituted = env
        .substitute_symbols(&raw, &bindings([("h", lambda)]))
        .unwrap();

    assert_eq!(substituted.to_string(), "(x => F[x])[1]");
    assert!(substituted.as_apply().unwrap().head().as_lambda().is_some());
}

#[test]
fn test_substituted_sequences_are_spliced() {
    let env = create_test_environment();
    let registry = create_test_registry()
        .with(
            SymbolDescriptor::builder("Sequence")
                .arg("xs", TypeExpression::many(TypeExpression::Wildcard, true), "Values.")
                .build(),
        )
        .unwrap();
    let with_sequence = MetaEnvironment::new(registry);
    let sequence = with_sequence
        .call("Sequence", [env.create_value(1), env.create_value(2)])
        .unwrap();

    let expr = with_sequence
        .call("F", [with_sequence.create_symbol("xs"), env.create_value(3)])
        .unwrap();
    let substituted = with_sequence
        .substitute_symbols(&expr, &bindings([("xs", sequence)]))
        .unwrap();

    assert_eq!(substituted.to_string(), "F[1,2,3]");
}

#[test]
fn test_free_symbols() {
    let env = create_test_environment();
    let y = env.create_symbol("y");
    let w = env.create_symbol("w");

    let lambda = env
        .create_lambda(&y, env.call("F", [y.clone(), env.create_symbol("z")]).unwrap())
        .unwrap();
    let binding = env
        .create_let(
            &env.create_assign(&w, env.create_value(1)).unwrap(),
            env.call("F", [w.clone(), env.create_symbol("v")]).unwrap(),
        )
        .unwrap();
    let expr = env
        .call("F", [env.create_symbol("x"), lambda, binding])
        .unwrap();

    let names: Vec<String> = expr.free_symbols().into_iter().collect();
    assert_eq!(names, vec!["x", "z", "v"]);
}

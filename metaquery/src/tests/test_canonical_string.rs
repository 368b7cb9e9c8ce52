//! Tests for the canonical string form of every node kind

use crate::environment::MetaEnvironment;
use crate::expr::{Expr, ExprKind};
use crate::registry::{MetaOption, SymbolDescriptor, SymbolRegistry};
use crate::types::{BasicTypes, TypeExpression};
use pretty_assertions::assert_eq;

fn create_test_environment() -> MetaEnvironment {
    let registry = SymbolRegistry::new()
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
        .unwrap();

    MetaEnvironment::new(registry)
}

#[test]
fn test_symbols_and_values() {
    let env = create_test_environment();

    assert_eq!(env.create_symbol("x").to_string(), "x");
    assert_eq!(env.create_value(true).to_string(), "True");
    assert_eq!(env.create_value(42).to_string(), "42");
    assert_eq!(env.create_value(1.5).to_string(), "1.5");
    assert_eq!(env.create_value("NAG").to_string(), "\"NAG\"");
    assert_eq!(
        env.create_value(vec![vec![0.0, 1.5], vec![2.0, 3.0]]).to_string(),
        "[[0.0,1.5],[2.0,3.0]]"
    );
    assert_eq!(env.create_empty().to_string(), "Empty");
}

#[test]
fn test_reals_never_read_as_integers() {
    let env = create_test_environment();

    let integer = env.create_value(1);
    let real = env.create_value(1.0);
    assert_eq!(real.to_string(), "1.0");
    assert_ne!(integer, real);
    assert_ne!(env.compile(&integer).unwrap(), env.compile(&real).unwrap());

    let mixed = env.call("F", [integer, real]).unwrap();
    assert_eq!(mixed.to_string(), "F[1,1.0]");
}

#[test]
fn test_strings_escape_quotes() {
    let env = create_test_environment();

    let quoted = env.create_value("a\",\"b");
    assert_eq!(quoted.to_string(), "\"a\\\",\\\"b\"");

    let split = env
        .call("F", [env.create_value("a"), env.create_value("b")])
        .unwrap();
    let joined = env.call("F", [quoted]).unwrap();
    assert_ne!(joined, split);
}

#[test]
fn test_builtin_symbol_takes_registered_spelling() {
    let env = create_test_environment();
    let symbol = env.create_symbol("g");

    assert_eq!(symbol.to_string(), "G");
    assert!(symbol.as_symbol().unwrap().is_builtin());
}

#[test]
fn test_tuples_are_flattened() {
    let env = create_test_environment();
    let inner = env.create_tuple([env.create_value(1), env.create_value(2)]);
    let outer = env.create_tuple([inner, env.create_value("a")]);

    assert_eq!(outer.to_string(), "[1,2,\"a\"]");
    assert_eq!(outer.as_tuple().unwrap().len(), 3);
    assert_eq!(outer.value_type().to_string(), "(Integer,Integer,String)");
}

#[test]
fn test_applications() {
    let env = create_test_environment();

    let plain = env.call("F", [env.create_value(1), env.create_symbol("x")]).unwrap();
    assert_eq!(plain.to_string(), "F[1,x]");

    let empty = env.call("F", Vec::<Expr>::new()).unwrap();
    assert_eq!(empty.to_string(), "F[]");

    let unknown = env.call("H", [env.create_value(1), env.create_value(2)]).unwrap();
    assert_eq!(unknown.to_string(), "H[1,2]");
    assert_eq!(unknown.value_type(), TypeExpression::Wildcard);
}

#[test]
fn test_options_come_first() {
    let env = create_test_environment();

    let defaulted = env.call("G", [env.create_value(1)]).unwrap();
    assert_eq!(defaulted.to_string(), "G[Mode=\"fast\",1]");

    let only_options = env.call("G", Vec::<Expr>::new()).unwrap();
    assert_eq!(only_options.to_string(), "G[Mode=\"fast\"]");

    let mode = env
        .create_assign(&env.create_symbol("mode"), env.create_value("slow"))
        .unwrap();
    let supplied = env.call("G", [mode, env.create_value(1)]).unwrap();
    assert_eq!(supplied.to_string(), "G[Mode=\"slow\",1]");
}

#[test]
fn test_lambdas() {
    let env = create_test_environment();
    let x = env.create_symbol("x");
    let y = env.create_symbol("y");

    let single = env
        .create_lambda(&x, env.call("F", [x.clone()]).unwrap())
        .unwrap();
    assert_eq!(single.to_string(), "x => F[x]");

    let pair = env
        .create_lambda(
            &env.create_tuple([x.clone(), y.clone()]),
            env.call("F", [x.clone(), y]).unwrap(),
        )
        .unwrap();
    assert_eq!(pair.to_string(), "(x,y) => F[x,y]");

    let nullary = env
        .create_lambda(&env.create_tuple(Vec::<Expr>::new()), env.create_value(1))
        .unwrap();
    assert_eq!(nullary.to_string(), "[] => 1");

    let applied = env.apply_to(single, [env.create_value(1)]).unwrap();
    assert_eq!(applied.to_string(), "(x => F[x])[1]");
}

#[test]
fn test_let_and_assign() {
    let env = create_test_environment();
    let x = env.create_symbol("x");

    let assign = env.create_assign(&x, env.create_value(1)).unwrap();
    assert_eq!(assign.to_string(), "x = 1");

    let binding = env
        .create_let(&assign, env.call("F", [x]).unwrap())
        .unwrap();
    assert_eq!(binding.to_string(), "let x = 1 in F[x]");
    assert_eq!(binding.as_let().unwrap().substituted().to_string(), "F[1]");
}

#[test]
fn test_canonical_string_is_stable() {
    let env = create_test_environment();
    let expr = env
        .call("G", [env.create_value("a"), env.create_symbol("b")])
        .unwrap();

    let first = expr.to_string();
    let second = expr.to_string();
    assert_eq!(first, second);
    assert!(std::ptr::eq(expr.canonical_string(), expr.canonical_string()));
}

#[test]
fn test_heads() {
    let env = create_test_environment();

    let apply = env.call("F", [env.create_value(1)]).unwrap();
    assert_eq!(apply.head().to_string(), "F");
    assert!(apply.head_equals("f"));

    assert_eq!(env.create_symbol("x").head().to_string(), "Symbol");
    assert_eq!(env.create_tuple(Vec::<Expr>::new()).head().to_string(), "Tuple");
    assert!(matches!(env.create_tuple(Vec::<Expr>::new()).head().kind(), ExprKind::Symbol(_)));
}

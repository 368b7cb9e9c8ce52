//! Full round trips: registry, construction, typing and compilation

use crate::environment::MetaEnvironment;
use crate::error::MetaQueryError;
use crate::query::{CallQuery, Query};
use crate::registry::{SymbolDescriptor, SymbolRegistry};
use crate::types::BasicTypes;
use miette::Diagnostic;
use pretty_assertions::assert_eq;

fn create_test_environment() -> MetaEnvironment {
    let residues = SymbolDescriptor::builder("Residues")
        .description("Residues with the given name.")
        .arg("name", BasicTypes::string(), "Residue name.")
        .returns(BasicTypes::pattern_seq())
        .compile(|apply, compiler| {
            let arguments = compiler.compile_all(apply.arguments())?;
            Ok(Query::motive(CallQuery::new("Residues", arguments)))
        })
        .build();

    MetaEnvironment::new(SymbolRegistry::new().with(residues).unwrap())
}

#[test]
fn test_residue_query_is_typed_and_compiled() {
    let env = create_test_environment();

    let expr = env
        .create_apply(
            env.create_symbol("Residues"),
            &env.create_tuple([env.create_value("NAG")]),
        )
        .unwrap();

    assert_eq!(expr.to_string(), "Residues[\"NAG\"]");
    assert_eq!(expr.value_type(), BasicTypes::pattern_seq());

    let compiled = env.compile(&expr).unwrap();
    assert_eq!(
        *compiled,
        Query::Motive(CallQuery::new("Residues", vec![Query::value("NAG")]))
    );
}

#[test]
fn test_residue_query_rejects_wrong_argument_type() {
    let env = create_test_environment();

    let err = env
        .create_apply(
            env.create_symbol("Residues"),
            &env.create_tuple([env.create_value(1)]),
        )
        .unwrap_err();

    assert_eq!(
        err,
        MetaQueryError::ArityOrTypeMismatch {
            symbol: "Residues".into(),
            arguments: "[1]".into(),
            argument_types: "Integer".into(),
            expected: "String".into(),
        }
    );
}

#[test]
fn test_symbol_names_resolve_ignoring_case() {
    let env = create_test_environment();

    let expr = env.call("RESIDUES", [env.create_value("NAG")]).unwrap();
    assert_eq!(expr.to_string(), "Residues[\"NAG\"]");
}

#[test]
fn test_errors_render_as_diagnostics() {
    let env = create_test_environment();

    let err = env.call("Residues", [env.create_value(1)]).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("Residues"));
    assert!(message.contains("[1]"));
    assert_eq!(
        err.code().map(|code| code.to_string()),
        Some("metaquery::construct::arity_or_type_mismatch".to_string())
    );
}

#[test]
fn test_inside_becomes_flatten_over_find() {
    let env = MetaEnvironment::standard();
    let carbons = env.call("Atoms", [env.create_value("C")]).unwrap();
    let histidines = env.call("Residues", [env.create_value("HIS")]).unwrap();

    let inside = env.call("Inside", [carbons, histidines]).unwrap();
    assert_eq!(
        inside.to_string(),
        "Flatten[Residues[\"HIS\"],$m => Find[$m,Atoms[\"C\"]]]"
    );
    assert_eq!(inside.value_type(), BasicTypes::pattern_seq());

    let compiled = env.compile(&inside).unwrap();
    assert_eq!(
        compiled.to_string(),
        "motive Flatten(motive Residues(\"HIS\"), fn($m) motive Find($$m, motive Atoms(\"C\")))"
    );
}

#[test]
fn test_query_with_lambda_and_let() {
    let env = MetaEnvironment::standard();
    let m = env.create_symbol("m");
    let target = env.create_symbol("target");

    let count = env.call("Count", [m.clone(), target.clone()]).unwrap();
    let predicate = env
        .create_lambda(&m, env.call("Greater", [count, env.create_value(0)]).unwrap())
        .unwrap();
    let filter = env
        .call("Filter", [env.call("AminoAcids", Vec::new()).unwrap(), predicate])
        .unwrap();

    let zinc = env.call("Atoms", [env.create_value("Zn")]).unwrap();
    let binding = env
        .create_let(&env.create_assign(&target, zinc).unwrap(), filter)
        .unwrap();

    assert_eq!(
        binding.as_let().unwrap().substituted().to_string(),
        "Filter[AminoAcids[ChargeType=\"\"],m => Greater[Count[m,Atoms[\"Zn\"]],0]]"
    );

    let compiled = env.compile(&binding).unwrap();
    assert_eq!(
        compiled.to_string(),
        "motive Filter(motive AminoAcids(ChargeType: \"\"), fn(m) Greater(Count($m, motive Atoms(\"Zn\")), 0))"
    );
}

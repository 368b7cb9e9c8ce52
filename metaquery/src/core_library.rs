//! Built-in symbol table
//!
//! Language primitives (`Sequence`, `List`, `Repeat`), boolean and relational
//! helpers, and the motif functions of the query language. The table is built
//! once per process; [`SymbolRegistry::standard`] copies it into a registry
//! the caller owns.

use crate::compiler::Compiler;
use crate::environment::MetaEnvironment;
use crate::error::{MetaQueryError, MetaResult};
use crate::expr::{Expr, Literal, MetaApply, SEQUENCE_SYMBOL};
use crate::query::{CallQuery, CompiledQuery, Query};
use crate::registry::{MetaOption, SymbolAttributes, SymbolDescriptor, SymbolRegistry};
use crate::types::{BasicTypes, FunctionTypeBuilder, TypeExpression};
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::error;

lazy_static! {
    static ref STANDARD_SYMBOLS: Vec<SymbolDescriptor> = standard_symbols();
}

/// Attributes of the set-like motif functions: `Atoms("C", "C")` is
/// `Atoms("C")` and argument order does not matter
const SET: SymbolAttributes = SymbolAttributes::FLAT
    .union(SymbolAttributes::UNIQUE_ARGS)
    .union(SymbolAttributes::ORDERLESS);

impl SymbolRegistry {
    /// A registry holding the built-in symbol table
    pub fn standard() -> Self {
        let mut registry = SymbolRegistry::new();
        for descriptor in STANDARD_SYMBOLS.iter() {
            if let Err(err) = registry.register(descriptor.clone()) {
                error!(%err, "built-in symbol table is inconsistent");
            }
        }
        registry
    }
}

fn call_name(apply: &MetaApply) -> String {
    apply.head().to_string()
}

/// Compile arguments and options into a call of the applied symbol
fn compile_call(apply: &MetaApply, compiler: &mut Compiler<'_>) -> MetaResult<CallQuery> {
    let arguments = compiler.compile_all(apply.arguments())?;
    let mut call = CallQuery::new(call_name(apply), arguments);
    for (name, value) in apply.options() {
        call = call.with_option(name.clone(), compiler.compile(value)?);
    }
    Ok(call)
}

fn compile_motive(apply: &MetaApply, compiler: &mut Compiler<'_>) -> MetaResult<CompiledQuery> {
    Ok(Query::motive(compile_call(apply, compiler)?))
}

fn compile_function(apply: &MetaApply, compiler: &mut Compiler<'_>) -> MetaResult<CompiledQuery> {
    Ok(Query::function(compile_call(apply, compiler)?))
}

/// Set motifs take their names as plain strings
fn compile_set(apply: &MetaApply, compiler: &mut Compiler<'_>) -> MetaResult<CompiledQuery> {
    let names = apply
        .arguments()
        .iter()
        .map(|argument| Ok(Query::value(argument.as_string()?)))
        .collect::<MetaResult<Vec<_>>>()?;

    let mut call = CallQuery::new(call_name(apply), names);
    for (name, value) in apply.options() {
        call = call.with_option(name.clone(), compiler.compile(value)?);
    }
    Ok(Query::motive(call))
}

/// A motif whose last argument is a function applied to each match
fn compile_with_selector(apply: &MetaApply, compiler: &mut Compiler<'_>) -> MetaResult<CompiledQuery> {
    let call = compile_call(apply, compiler)?;
    let has_selector = matches!(
        call.arguments.last().map(|selector| selector.as_ref()),
        Some(Query::Lambda { .. })
    );
    if !has_selector {
        return Err(MetaQueryError::uncompilable(
            apply,
            format!("the last argument of '{}' must be a lambda", call.name),
        ));
    }
    Ok(Query::motive(call))
}

/// `Repeat[x, n]` is `Sequence[x, ..., x]` when `n` is a literal
fn normalize_repeat(environment: &MetaEnvironment, expr: Expr) -> MetaResult<Expr> {
    let Some(apply) = expr.as_apply() else {
        return Ok(expr);
    };
    let [item, count] = apply.arguments() else {
        return Ok(expr);
    };
    let Some(Literal::Integer(count)) = count.as_literal() else {
        return Ok(expr);
    };

    let copies = usize::try_from(*count).unwrap_or(0);
    environment.call(SEQUENCE_SYMBOL, std::iter::repeat(item.clone()).take(copies))
}

/// `Inside[patterns, where]` is `Flatten[where, $m => Find[$m, patterns]]`
fn normalize_inside(environment: &MetaEnvironment, expr: Expr) -> MetaResult<Expr> {
    let Some(apply) = expr.as_apply() else {
        return Ok(expr);
    };
    let [patterns, place] = apply.arguments() else {
        return Ok(expr);
    };

    let current = environment.create_symbol("$m");
    let find = environment.call("Find", [current.clone(), patterns.clone()])?;
    let selector = environment.create_lambda(&current, find)?;
    environment.call("Flatten", [place.clone(), selector])
}

fn string_many(allow_empty: bool) -> TypeExpression {
    TypeExpression::many(BasicTypes::string(), allow_empty)
}

fn selector(returns: TypeExpression) -> TypeExpression {
    FunctionTypeBuilder::new().arg(BasicTypes::pattern()).returns(returns)
}

fn no_waters() -> MetaOption {
    MetaOption::new(
        "NoWaters",
        BasicTypes::bool(),
        Expr::value(true),
        "Ignore water residues such as HOH.",
    )
}

fn standard_symbols() -> Vec<SymbolDescriptor> {
    vec![
        // Language primitives
        SymbolDescriptor::builder(SEQUENCE_SYMBOL)
            .description("Elements spliced into the argument list of the enclosing call.")
            .arg("xs", TypeExpression::many(TypeExpression::Wildcard, true), "Values.")
            .returns(TypeExpression::Wildcard)
            .build(),
        SymbolDescriptor::builder("List")
            .description("A list of elements.")
            .arg("elements", TypeExpression::many(TypeExpression::Wildcard, false), "Elements.")
            .returns(BasicTypes::list())
            .compile(|apply, compiler| {
                Ok(Arc::new(Query::List(compiler.compile_all(apply.arguments())?)))
            })
            .build(),
        SymbolDescriptor::builder("Repeat")
            .description("A sequence of x repeated n times.")
            .arg("x", TypeExpression::Wildcard, "Expression to be repeated.")
            .arg("n", BasicTypes::integer(), "Count.")
            .returns(TypeExpression::Wildcard)
            .normalize(normalize_repeat)
            .build(),
        // Boolean and relational helpers
        SymbolDescriptor::builder("And")
            .description("Logical conjunction.")
            .arg("xs", TypeExpression::many(BasicTypes::bool(), false), "Conditions.")
            .returns(BasicTypes::bool())
            .attributes(
                SymbolAttributes::FLAT
                    | SymbolAttributes::ORDERLESS
                    | SymbolAttributes::UNIQUE_ARGS
                    | SymbolAttributes::ONE_IDENTITY,
            )
            .compile(compile_function)
            .build(),
        SymbolDescriptor::builder("Equal")
            .description("Equality of two values.")
            .arg("a", BasicTypes::value(), "Left value.")
            .arg("b", BasicTypes::value(), "Right value.")
            .returns(BasicTypes::bool())
            .compile(compile_function)
            .build(),
        SymbolDescriptor::builder("Less")
            .description("a < b.")
            .arg("a", BasicTypes::number(), "Left value.")
            .arg("b", BasicTypes::number(), "Right value.")
            .returns(BasicTypes::bool())
            .compile(compile_function)
            .build(),
        SymbolDescriptor::builder("Greater")
            .description("a > b.")
            .arg("a", BasicTypes::number(), "Left value.")
            .arg("b", BasicTypes::number(), "Right value.")
            .returns(BasicTypes::bool())
            .compile(compile_function)
            .build(),
        // Basic motifs
        SymbolDescriptor::builder("Atoms")
            .description("Atoms with the given element symbols; all atoms when none are given.")
            .arg("symbols", string_many(true), "Allowed element symbols.")
            .returns(BasicTypes::atoms())
            .attributes(SET)
            .compile(compile_set)
            .build(),
        SymbolDescriptor::builder("NotAtoms")
            .description("Atoms that are not the given elements.")
            .arg("symbols", string_many(false), "Forbidden element symbols.")
            .returns(BasicTypes::atoms())
            .attributes(SET)
            .compile(compile_set)
            .build(),
        SymbolDescriptor::builder("Residues")
            .description("Residues with the given names; all residues when none are given.")
            .arg("names", string_many(true), "Allowed residue names.")
            .returns(BasicTypes::residues())
            .attributes(SET)
            .compile(compile_set)
            .build(),
        SymbolDescriptor::builder("NotResidues")
            .description("Residues not called by the given names.")
            .arg("names", TypeExpression::many(BasicTypes::value(), false), "Forbidden residue names.")
            .returns(BasicTypes::residues())
            .attributes(SET)
            .compile(compile_set)
            .build(),
        SymbolDescriptor::builder("AminoAcids")
            .description("Residues with one of the 20 basic amino acid names.")
            .returns(BasicTypes::residues())
            .option(MetaOption::new(
                "ChargeType",
                BasicTypes::string(),
                Expr::value(""),
                "Charge type of the amino acids; empty for all.",
            ))
            .compile(compile_motive)
            .build(),
        SymbolDescriptor::builder("NotAminoAcids")
            .description("Residues that are not one of the 20 basic amino acids.")
            .returns(BasicTypes::residues())
            .option(no_waters())
            .compile(compile_motive)
            .build(),
        SymbolDescriptor::builder("HetResidues")
            .description("Residues that contain HET atoms.")
            .returns(BasicTypes::residues())
            .option(no_waters())
            .compile(compile_motive)
            .build(),
        SymbolDescriptor::builder("Rings")
            .description("Rings with the given atoms in order; all rings when none are given.")
            .arg("atoms", TypeExpression::many(BasicTypes::value(), true), "Ring atoms.")
            .returns(BasicTypes::rings())
            .compile(compile_set)
            .build(),
        // Combinators
        SymbolDescriptor::builder("Or")
            .description("Merges several pattern sequences into one.")
            .arg("patterns", TypeExpression::many(BasicTypes::pattern_seq(), false), "Patterns to merge.")
            .returns(BasicTypes::pattern_seq())
            .attributes(
                SymbolAttributes::IGNORE_EMPTY
                    | SymbolAttributes::ORDERLESS
                    | SymbolAttributes::UNIQUE_ARGS
                    | SymbolAttributes::FLAT
                    | SymbolAttributes::ONE_IDENTITY,
            )
            .compile(compile_motive)
            .build(),
        SymbolDescriptor::builder("Named")
            .description("Names each pattern by its lowest atom id.")
            .arg("patterns", BasicTypes::pattern_seq(), "Patterns to name.")
            .returns(BasicTypes::pattern_seq())
            .compile(compile_motive)
            .build(),
        SymbolDescriptor::builder("Count")
            .description("Number of occurrences of 'what' in 'where'.")
            .arg("where", BasicTypes::pattern(), "Where to count.")
            .arg("what", BasicTypes::pattern_seq(), "What to count.")
            .returns(BasicTypes::integer())
            .compile(compile_function)
            .build(),
        SymbolDescriptor::builder("Find")
            .description("Patterns found within the source pattern.")
            .arg("source", BasicTypes::pattern(), "Where to look.")
            .arg("patterns", BasicTypes::pattern_seq(), "Patterns to find.")
            .returns(BasicTypes::pattern_seq())
            .compile(compile_motive)
            .build(),
        SymbolDescriptor::builder("Filter")
            .description("Patterns for which the predicate holds.")
            .arg("patterns", BasicTypes::pattern_seq(), "Patterns to filter.")
            .arg("filter", selector(BasicTypes::bool()), "Filter predicate.")
            .returns(BasicTypes::pattern_seq())
            .compile(compile_with_selector)
            .build(),
        SymbolDescriptor::builder("Flatten")
            .description("Concatenates the sequences the selector yields for each pattern.")
            .arg("patterns", BasicTypes::pattern_seq(), "Patterns to project.")
            .arg("selector", selector(BasicTypes::pattern_seq()), "The selector.")
            .returns(BasicTypes::pattern_seq())
            .compile(compile_with_selector)
            .build(),
        SymbolDescriptor::builder("Inside")
            .description("Patterns found within other patterns.")
            .arg("patterns", BasicTypes::pattern_seq(), "Patterns to find.")
            .arg("where", BasicTypes::pattern_seq(), "Where to find them.")
            .returns(BasicTypes::pattern_seq())
            .normalize(normalize_inside)
            .build(),
    ]
}

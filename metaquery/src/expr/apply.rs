//! Application construction
//!
//! Building `F[args]` is where the algebra of a symbol is enforced. Elements of
//! the argument tuple go through, in order:
//!
//! 1. option split: `name = value` elements fill declared options, the rest
//!    default;
//! 2. one level of tuple/`Sequence` splicing;
//! 3. `Flat`: nested `F[...]` children are spliced (only for option-less
//!    symbols);
//! 4. `IgnoreEmpty`, 5. `UniqueArgs`, 6. `Orderless`;
//! 7. unification of the declared signature with the argument types;
//! 8. `OneIdentity` collapse of a single argument;
//! 9. the descriptor's normalization hook.
//!
//! Lambda heads run the same pipeline against a fixed descriptor without
//! options, without algebraic attributes other than `IgnoreEmpty` and without
//! a normalization hook.

use crate::environment::MetaEnvironment;
use crate::error::{MetaQueryError, MetaResult};
use crate::expr::tuple::splice_into;
use crate::expr::{Expr, ExprKind, MetaTuple};
use crate::inference::TypeEnvironment;
use crate::registry::{SymbolAttributes, SymbolDescriptor};
use crate::types::TypeExpression;
use crate::unification::{unify, UnificationResult};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Type variable standing for the return type of the call being built
const RETURN_VARIABLE: &str = "__ret__";

lazy_static! {
    static ref LAMBDA_DESCRIPTOR: SymbolDescriptor = SymbolDescriptor::builder("Lambda")
        .attributes(SymbolAttributes::IGNORE_EMPTY)
        .build();
}

/// `head[options, arguments]`
#[derive(Debug, Clone)]
pub struct MetaApply {
    head: Expr,
    arguments: Vec<Expr>,
    options: IndexMap<String, Expr>,
    value_type: TypeExpression,
}

impl MetaApply {
    pub(crate) fn from_parts(
        head: Expr,
        arguments: Vec<Expr>,
        options: IndexMap<String, Expr>,
        value_type: TypeExpression,
    ) -> Self {
        Self {
            head,
            arguments,
            options,
            value_type,
        }
    }

    /// Apply `head` to `arguments`; a non-tuple argument is a one-element
    /// argument list
    pub(crate) fn create(
        environment: &MetaEnvironment,
        head: Expr,
        arguments: &Expr,
    ) -> MetaResult<Expr> {
        let arguments = match arguments.as_tuple() {
            Some(tuple) => tuple.clone(),
            None => MetaTuple::flattened([arguments.clone()]),
        };

        match head.kind() {
            ExprKind::Symbol(symbol) => match symbol.descriptor().cloned() {
                Some(descriptor) => {
                    Self::apply_symbol(environment, head.clone(), &descriptor, &arguments)
                }
                None => Ok(Expr::from_kind(ExprKind::Apply(Self::from_parts(
                    head.clone(),
                    arguments.elements().to_vec(),
                    IndexMap::new(),
                    TypeExpression::Wildcard,
                )))),
            },
            ExprKind::Lambda(lambda) => {
                Self::apply_lambda(head.clone(), lambda.value_type().clone(), &arguments)
            }
            _ => Err(MetaQueryError::NotApplicable {
                expression: head.to_string(),
            }),
        }
    }

    fn apply_symbol(
        environment: &MetaEnvironment,
        head: Expr,
        descriptor: &SymbolDescriptor,
        arguments: &MetaTuple,
    ) -> MetaResult<Expr> {
        let (options, mut processed) = process_arguments(descriptor, arguments.elements())?;
        let unification = unify_call(descriptor.name(), descriptor.function_type(), arguments, &processed)?;

        if descriptor.has_attribute(SymbolAttributes::ONE_IDENTITY) && processed.len() == 1 {
            debug!(symbol = descriptor.name(), "one-identity collapse");
            return Ok(processed.remove(0));
        }

        let applied = Self::typed(head, processed, options, unification)?;
        let normalized = descriptor.normalize(environment, applied.clone())?;
        if !normalized.ptr_eq(&applied) {
            debug!(symbol = descriptor.name(), from = %applied, to = %normalized, "normalized");
        }
        Ok(normalized)
    }

    fn apply_lambda(head: Expr, lambda_type: TypeExpression, arguments: &MetaTuple) -> MetaResult<Expr> {
        let (options, processed) = process_arguments(&LAMBDA_DESCRIPTOR, arguments.elements())?;
        let unification = unify_call(head.canonical_string(), &lambda_type, arguments, &processed)?;
        Self::typed(head, processed, options, unification)
    }

    /// The application typed by the unification of its call
    fn typed(
        head: Expr,
        arguments: Vec<Expr>,
        options: IndexMap<String, Expr>,
        unification: UnificationResult,
    ) -> MetaResult<Expr> {
        let value_type = unification
            .b_substitutions
            .get(RETURN_VARIABLE)
            .cloned()
            .unwrap_or(TypeExpression::Wildcard);

        let applied = Expr::from_kind(ExprKind::Apply(Self::from_parts(
            head, arguments, options, value_type,
        )));
        applied.replace_types(&TypeEnvironment::from(unification.b_substitutions))
    }

    pub fn head(&self) -> &Expr {
        &self.head
    }

    pub fn arguments(&self) -> &[Expr] {
        &self.arguments
    }

    /// Every declared option, supplied or defaulted, in declaration order
    pub fn options(&self) -> &IndexMap<String, Expr> {
        &self.options
    }

    /// Case-insensitive option lookup
    pub fn option(&self, name: &str) -> Option<&Expr> {
        self.options
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn value_type(&self) -> &TypeExpression {
        &self.value_type
    }
}

/// Steps 1-6: split options from arguments and apply the list attributes
fn process_arguments(
    descriptor: &SymbolDescriptor,
    elements: &[Expr],
) -> MetaResult<(IndexMap<String, Expr>, Vec<Expr>)> {
    let mut supplied: HashMap<String, Expr> = HashMap::new();
    let mut arguments = Vec::with_capacity(elements.len());

    for element in elements {
        let Some(assign) = element.as_assign() else {
            splice_into(&mut arguments, element.clone());
            continue;
        };

        let option = descriptor
            .option(assign.name())
            .ok_or_else(|| MetaQueryError::UnknownOption {
                option: assign.name().to_string(),
                symbol: descriptor.name().to_string(),
            })?;

        let found = assign.value().value_type();
        if !unify(&option.value_type, &found).success {
            return Err(MetaQueryError::OptionTypeMismatch {
                option: option.name.clone(),
                symbol: descriptor.name().to_string(),
                expected: option.value_type.to_string(),
                found: found.to_string(),
            });
        }
        supplied.insert(option.name.clone(), assign.value().clone());
    }

    let options: IndexMap<String, Expr> = descriptor
        .options()
        .values()
        .map(|option| {
            let value = supplied
                .remove(&option.name)
                .unwrap_or_else(|| option.default_value.clone());
            (option.name.clone(), value)
        })
        .collect();

    if options.is_empty() && descriptor.has_attribute(SymbolAttributes::FLAT) {
        arguments = arguments
            .into_iter()
            .flat_map(|argument| {
                let nested = match argument.as_apply() {
                    Some(apply) if argument.head_name() == Some(descriptor.name()) => {
                        Some(apply.arguments().to_vec())
                    }
                    _ => None,
                };
                nested.unwrap_or_else(|| vec![argument])
            })
            .collect();
    }

    if descriptor.has_attribute(SymbolAttributes::IGNORE_EMPTY) {
        arguments.retain(|argument| !argument.is_empty_marker());
    }

    if descriptor.has_attribute(SymbolAttributes::UNIQUE_ARGS) {
        let mut seen = HashSet::new();
        arguments.retain(|argument| seen.insert(argument.canonical_string().to_string()));
    }

    if descriptor.has_attribute(SymbolAttributes::ORDERLESS) {
        arguments.sort_by(|a, b| a.canonical_string().cmp(b.canonical_string()));
    }

    Ok((options, arguments))
}

/// Step 7: unify `signature` with `(argument types) -> '__ret__`
fn unify_call(
    name: &str,
    signature: &TypeExpression,
    supplied: &MetaTuple,
    arguments: &[Expr],
) -> MetaResult<UnificationResult> {
    let call = TypeExpression::arrow(
        TypeExpression::tuple(arguments.iter().map(Expr::value_type)),
        TypeExpression::variable(RETURN_VARIABLE),
    );

    let unification = unify(signature, &call);
    if !unification.success {
        return Err(MetaQueryError::ArityOrTypeMismatch {
            symbol: name.to_string(),
            arguments: supplied.to_string(),
            argument_types: supplied.value_type().to_string(),
            expected: signature.arrow_from().to_string(),
        });
    }
    Ok(unification)
}

impl fmt::Display for MetaApply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.head.kind() {
            ExprKind::Symbol(_) => write!(f, "{}[", self.head)?,
            _ => write!(f, "({})[", self.head)?,
        }

        for (i, (name, value)) in self.options.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}={value}")?;
        }
        if !self.options.is_empty() && !self.arguments.is_empty() {
            write!(f, ",")?;
        }
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{argument}")?;
        }
        write!(f, "]")
    }
}

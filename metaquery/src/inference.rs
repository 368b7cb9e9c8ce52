//! Type inference over meta-expressions
//!
//! Two traversals thread a name -> type environment through a tree:
//!
//! - [`Expr::infer_types`] merges what each free symbol occurrence knows about
//!   its type into the environment;
//! - [`Expr::replace_types`] pushes settled types back down, rebuilding the
//!   tree with refined symbol occurrences.
//!
//! Lambda, let and assignment boundaries hide the names they bind. The inner
//! traversal sees a copy of the environment without those names, and only the
//! bindings it was allowed to see are written back, so an inner binding can
//! never leak into an outer occurrence of the same name.
//!
//! Names are matched ignoring case, the same way built-in symbols resolve.

use crate::error::MetaResult;
use crate::expr::{Expr, ExprKind, MetaApply, MetaAssign, MetaLet, MetaTuple};
use crate::types::expression::Substitutions;
use crate::types::TypeExpression;
use indexmap::IndexMap;

/// Key of a bound variable name
pub(crate) fn binding_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Name -> type bindings of one inference pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEnvironment {
    bindings: IndexMap<String, TypeExpression>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, ty: TypeExpression) {
        self.bindings.insert(binding_key(name), ty);
    }

    pub fn get(&self, name: &str) -> Option<&TypeExpression> {
        self.bindings.get(&binding_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(&binding_key(name))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeExpression)> {
        self.bindings.iter()
    }

    /// A copy without the given names
    pub fn without<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> TypeEnvironment {
        let mut inner = self.clone();
        for name in names {
            inner.bindings.shift_remove(&binding_key(name));
        }
        inner
    }

    /// Run `infer` in a scope where `names` are unbound
    ///
    /// Refinements of the visible bindings are copied back; the bindings of
    /// `names` keep their values. On error the environment is unchanged.
    pub fn scoped<'a, F>(&mut self, names: impl IntoIterator<Item = &'a str>, infer: F) -> MetaResult<()>
    where
        F: FnOnce(&mut TypeEnvironment) -> MetaResult<()>,
    {
        let mut inner = self.without(names);
        if inner.is_empty() {
            return Ok(());
        }

        infer(&mut inner)?;
        for (name, ty) in inner.bindings {
            self.bindings.insert(name, ty);
        }
        Ok(())
    }
}

impl From<Substitutions> for TypeEnvironment {
    fn from(bindings: Substitutions) -> Self {
        Self {
            bindings: bindings
                .into_iter()
                .map(|(name, ty)| (binding_key(&name), ty))
                .collect(),
        }
    }
}

impl Expr {
    /// Merge the types of free symbol occurrences into `environment`
    ///
    /// Only names already present in the environment are refined; a conflict
    /// between two occurrences raises `UnificationConflict`.
    pub fn infer_types(&self, environment: &mut TypeEnvironment) -> MetaResult<()> {
        match self.kind() {
            ExprKind::Symbol(symbol) => {
                if let Some(inferred) = symbol.unify_with(environment)? {
                    environment.bind(symbol.name(), inferred);
                }
                Ok(())
            }
            ExprKind::Value(_) | ExprKind::Empty => Ok(()),
            ExprKind::Tuple(tuple) => {
                for element in tuple.elements() {
                    element.infer_types(environment)?;
                }
                Ok(())
            }
            ExprKind::Lambda(lambda) => environment
                .scoped(lambda.argument_names(), |inner| lambda.body().infer_types(inner)),
            ExprKind::Assign(assign) => environment
                .scoped([assign.name()], |inner| assign.value().infer_types(inner)),
            ExprKind::Let(binding) => environment.scoped([binding.name()], |inner| {
                binding.assignment().value().infer_types(inner)?;
                binding.expression().infer_types(inner)?;
                binding.substituted().infer_types(inner)
            }),
            ExprKind::Apply(apply) => {
                apply.head().infer_types(environment)?;
                for argument in apply.arguments() {
                    argument.infer_types(environment)?;
                }
                for value in apply.options().values() {
                    value.infer_types(environment)?;
                }
                Ok(())
            }
        }
    }

    /// Rebuild the tree with every free occurrence of a bound name refined to
    /// its settled type; an incompatible occurrence raises
    /// `UnificationConflict`
    pub fn replace_types(&self, environment: &TypeEnvironment) -> MetaResult<Expr> {
        if environment.is_empty() {
            return Ok(self.clone());
        }

        let kind = match self.kind() {
            ExprKind::Symbol(symbol) => {
                if !environment.contains(symbol.name()) {
                    return Ok(self.clone());
                }
                ExprKind::Symbol(symbol.refine(environment)?)
            }
            ExprKind::Value(_) | ExprKind::Empty => return Ok(self.clone()),
            ExprKind::Tuple(tuple) => ExprKind::Tuple(MetaTuple::new(
                tuple
                    .elements()
                    .iter()
                    .map(|element| element.replace_types(environment))
                    .collect::<MetaResult<Vec<_>>>()?,
            )),
            ExprKind::Lambda(lambda) => {
                let inner = environment.without(lambda.argument_names());
                if inner.is_empty() {
                    return Ok(self.clone());
                }
                ExprKind::Lambda(lambda.with_body(lambda.body().replace_types(&inner)?))
            }
            ExprKind::Assign(assign) => {
                let inner = environment.without([assign.name()]);
                ExprKind::Assign(replace_assign(assign, &inner)?)
            }
            ExprKind::Let(binding) => {
                let inner = environment.without([binding.name()]);
                ExprKind::Let(MetaLet::from_parts(
                    replace_assign(binding.assignment(), &inner)?,
                    binding.expression().replace_types(&inner)?,
                    binding.substituted().replace_types(&inner)?,
                ))
            }
            ExprKind::Apply(apply) => ExprKind::Apply(replace_apply(apply, environment)?),
        };

        Ok(Expr::from_kind(kind))
    }
}

fn replace_assign(assign: &MetaAssign, environment: &TypeEnvironment) -> MetaResult<MetaAssign> {
    Ok(MetaAssign::new(
        assign.symbol().clone(),
        assign.value().replace_types(environment)?,
    ))
}

fn replace_apply(apply: &MetaApply, environment: &TypeEnvironment) -> MetaResult<MetaApply> {
    let head = apply.head().replace_types(environment)?;
    let arguments = apply
        .arguments()
        .iter()
        .map(|argument| argument.replace_types(environment))
        .collect::<MetaResult<Vec<_>>>()?;
    let options = apply
        .options()
        .iter()
        .map(|(name, value)| Ok((name.clone(), value.replace_types(environment)?)))
        .collect::<MetaResult<IndexMap<_, _>>>()?;

    Ok(MetaApply::from_parts(
        head,
        arguments,
        options,
        apply.value_type().clone(),
    ))
}

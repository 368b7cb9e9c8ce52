//! Symbol substitution
//!
//! Replaces free occurrences of names with expressions. Binders (lambda
//! arguments, assignment and let names) shadow the names they bind. In
//! [`SubstitutionMode::Literal`] a free name of a substituted value that
//! coincides with a lambda argument is captured by that lambda;
//! [`SubstitutionMode::CaptureAvoiding`] renames the argument first.
//!
//! Binding names, binders and occurrences are matched ignoring case.

use crate::config::SubstitutionMode;
use crate::environment::MetaEnvironment;
use crate::error::MetaResult;
use crate::expr::{Expr, ExprKind, MetaApply, MetaAssign, MetaLambda, MetaLet, MetaSymbol, MetaTuple};
use crate::inference::binding_key;
use indexmap::{IndexMap, IndexSet};
use tracing::trace;

/// Name -> replacement
pub type Bindings = IndexMap<String, Expr>;

impl Expr {
    /// Substitute `values` for the free symbols of this expression, with the
    /// environment's configured substitution mode
    pub fn substitute_symbols(&self, environment: &MetaEnvironment, values: &Bindings) -> MetaResult<Expr> {
        if values.is_empty() {
            return Ok(self.clone());
        }

        let keyed: Bindings = values
            .iter()
            .map(|(name, value)| (binding_key(name), value.clone()))
            .collect();
        Substitution {
            environment,
            mode: environment.config().substitution,
        }
        .apply(self, &keyed)
    }

    /// Names of the free, non-built-in symbols in first-occurrence order and
    /// spelling
    pub fn free_symbols(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        self.collect_free_symbols(&mut names);
        names
    }

    fn collect_free_symbols(&self, names: &mut IndexSet<String>) {
        match self.kind() {
            ExprKind::Symbol(symbol) => {
                if !symbol.is_builtin() {
                    insert_name(names, symbol.name());
                }
            }
            ExprKind::Value(_) | ExprKind::Empty => {}
            ExprKind::Tuple(tuple) => {
                for element in tuple.elements() {
                    element.collect_free_symbols(names);
                }
            }
            ExprKind::Lambda(lambda) => {
                for name in lambda.body().free_symbols() {
                    if !lambda
                        .argument_names()
                        .any(|bound| bound.eq_ignore_ascii_case(&name))
                    {
                        insert_name(names, &name);
                    }
                }
            }
            ExprKind::Assign(assign) => assign.value().collect_free_symbols(names),
            ExprKind::Let(binding) => {
                binding.assignment().value().collect_free_symbols(names);
                for name in binding.expression().free_symbols() {
                    if !name.eq_ignore_ascii_case(binding.name()) {
                        insert_name(names, &name);
                    }
                }
            }
            ExprKind::Apply(apply) => {
                apply.head().collect_free_symbols(names);
                for argument in apply.arguments() {
                    argument.collect_free_symbols(names);
                }
                for value in apply.options().values() {
                    value.collect_free_symbols(names);
                }
            }
        }
    }
}

fn insert_name(names: &mut IndexSet<String>, name: &str) {
    if !names.iter().any(|known| known.eq_ignore_ascii_case(name)) {
        names.insert(name.to_string());
    }
}

fn without<'a>(values: &Bindings, names: impl IntoIterator<Item = &'a str>) -> Bindings {
    let mut inner = values.clone();
    for name in names {
        inner.shift_remove(&binding_key(name));
    }
    inner
}

struct Substitution<'e> {
    environment: &'e MetaEnvironment,
    mode: SubstitutionMode,
}

impl Substitution<'_> {
    fn apply(&self, expr: &Expr, values: &Bindings) -> MetaResult<Expr> {
        if values.is_empty() {
            return Ok(expr.clone());
        }

        match expr.kind() {
            ExprKind::Symbol(symbol) => Ok(values
                .get(&binding_key(symbol.name()))
                .cloned()
                .unwrap_or_else(|| expr.clone())),
            ExprKind::Value(_) | ExprKind::Empty => Ok(expr.clone()),
            ExprKind::Tuple(tuple) => {
                let elements = tuple
                    .elements()
                    .iter()
                    .map(|element| self.apply(element, values))
                    .collect::<MetaResult<Vec<_>>>()?;
                Ok(Expr::from_kind(ExprKind::Tuple(MetaTuple::new(elements))))
            }
            ExprKind::Assign(assign) => {
                let inner = without(values, [assign.name()]);
                if inner.is_empty() {
                    return Ok(expr.clone());
                }
                Ok(Expr::from_kind(ExprKind::Assign(self.assign(assign, &inner)?)))
            }
            ExprKind::Let(binding) => {
                let inner = without(values, [binding.name()]);
                if inner.is_empty() {
                    return Ok(expr.clone());
                }
                Ok(Expr::from_kind(ExprKind::Let(MetaLet::from_parts(
                    self.assign(binding.assignment(), &inner)?,
                    self.apply(binding.expression(), &inner)?,
                    self.apply(binding.substituted(), &inner)?,
                ))))
            }
            ExprKind::Lambda(lambda) => {
                let inner = without(values, lambda.argument_names());
                if inner.is_empty() {
                    return Ok(expr.clone());
                }
                self.lambda(lambda, &inner)
            }
            ExprKind::Apply(apply) => self.application(apply, values),
        }
    }

    fn assign(&self, assign: &MetaAssign, values: &Bindings) -> MetaResult<MetaAssign> {
        Ok(MetaAssign::new(
            assign.symbol().clone(),
            self.apply(assign.value(), values)?,
        ))
    }

    fn lambda(&self, lambda: &MetaLambda, values: &Bindings) -> MetaResult<Expr> {
        let mut arguments = lambda.arguments().to_vec();
        let mut body = lambda.body().clone();

        if self.mode == SubstitutionMode::CaptureAvoiding {
            let captured: IndexSet<String> = values
                .values()
                .flat_map(Expr::free_symbols)
                .map(|name| binding_key(&name))
                .collect();
            let mut taken: IndexSet<String> = captured.clone();
            taken.extend(body.free_symbols().iter().map(|name| binding_key(name)));
            taken.extend(lambda.argument_names().map(binding_key));

            let mut renames = Bindings::new();
            for argument in arguments.iter_mut() {
                if !captured.contains(&binding_key(argument.name())) {
                    continue;
                }
                let fresh = fresh_name(argument.name(), &taken);
                trace!(from = argument.name(), to = %fresh, "renaming lambda argument");
                taken.insert(binding_key(&fresh));
                let renamed = MetaSymbol::resolve(self.environment.registry(), &fresh);
                renames.insert(
                    binding_key(argument.name()),
                    Expr::from_kind(ExprKind::Symbol(renamed.clone())),
                );
                *argument = renamed;
            }

            if !renames.is_empty() {
                body = self.apply(&body, &renames)?;
            }
        }

        MetaLambda::from_symbols(arguments, self.apply(&body, values)?)
    }

    /// Substitute into head, options and arguments, then rebuild through the
    /// construction pipeline
    fn application(&self, apply: &MetaApply, values: &Bindings) -> MetaResult<Expr> {
        let head = self.apply(apply.head(), values)?;

        let mut elements = Vec::with_capacity(apply.options().len() + apply.arguments().len());
        for (name, value) in apply.options() {
            let symbol = MetaSymbol::resolve(self.environment.registry(), name);
            elements.push(Expr::from_kind(ExprKind::Assign(MetaAssign::new(
                symbol,
                self.apply(value, values)?,
            ))));
        }
        for argument in apply.arguments() {
            elements.push(self.apply(argument, values)?);
        }

        let arguments = Expr::from_kind(ExprKind::Tuple(MetaTuple::flattened(elements)));
        MetaApply::create(self.environment, head, &arguments)
    }
}

/// `name$1`, `name$2`, ... whichever is not taken first; `taken` holds
/// binding keys
fn fresh_name(name: &str, taken: &IndexSet<String>) -> String {
    (1..)
        .map(|n| format!("{name}${n}"))
        .find(|candidate| !taken.contains(&binding_key(candidate)))
        .unwrap_or_else(|| format!("{name}$"))
}

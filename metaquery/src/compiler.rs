//! Compilation of meta-expressions into executable queries
//!
//! A [`Compiler`] lives for a single top-level `compile` call and owns that
//! call's cache. Applications are looked up by canonical string before they
//! are compiled; only motives are stored, every other kind of query is rebuilt
//! at each occurrence.

use crate::environment::MetaEnvironment;
use crate::error::{MetaQueryError, MetaResult};
use crate::expr::{Expr, ExprKind, MetaApply};
use crate::query::{CompiledQuery, Query};
use crate::substitution::Bindings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Canonical string -> compiled motive
pub type CompileCache = HashMap<String, CompiledQuery>;

pub struct Compiler<'e> {
    environment: &'e MetaEnvironment,
    cache: CompileCache,
}

impl<'e> Compiler<'e> {
    pub fn new(environment: &'e MetaEnvironment) -> Self {
        Self {
            environment,
            cache: CompileCache::new(),
        }
    }

    pub fn environment(&self) -> &'e MetaEnvironment {
        self.environment
    }

    pub fn cache(&self) -> &CompileCache {
        &self.cache
    }

    pub fn compile(&mut self, expr: &Expr) -> MetaResult<CompiledQuery> {
        match expr.kind() {
            ExprKind::Symbol(symbol) => {
                if symbol.is_builtin() {
                    let applied = self
                        .environment
                        .create_apply(expr.clone(), &self.environment.create_tuple([]))?;
                    return self.compile(&applied);
                }
                if !self.environment.config().allow_free_variables {
                    return Err(MetaQueryError::uncompilable(
                        expr,
                        format!("'{}' is not defined", symbol.name()),
                    ));
                }
                Ok(Arc::new(Query::Symbol(symbol.name().to_string())))
            }
            ExprKind::Value(literal) => Ok(Arc::new(Query::Value(literal.clone()))),
            ExprKind::Lambda(lambda) => Ok(Arc::new(Query::Lambda {
                parameters: lambda.argument_names().map(str::to_string).collect(),
                body: self.compile(lambda.body())?,
            })),
            ExprKind::Let(binding) => self.compile(binding.substituted()),
            ExprKind::Apply(apply) => self.compile_apply(expr, apply),
            ExprKind::Tuple(_) => Err(MetaQueryError::uncompilable(
                expr,
                "a tuple has no compiled form",
            )),
            ExprKind::Assign(_) => Err(MetaQueryError::uncompilable(
                expr,
                "an assignment is only valid as an option",
            )),
            ExprKind::Empty => Err(MetaQueryError::uncompilable(
                expr,
                "Empty is only valid in argument lists",
            )),
        }
    }

    /// Compile every expression, in order
    pub fn compile_all<'a>(
        &mut self,
        exprs: impl IntoIterator<Item = &'a Expr>,
    ) -> MetaResult<Vec<CompiledQuery>> {
        exprs.into_iter().map(|expr| self.compile(expr)).collect()
    }

    fn compile_apply(&mut self, expr: &Expr, apply: &MetaApply) -> MetaResult<CompiledQuery> {
        let key = expr.canonical_string();
        if let Some(cached) = self.cache.get(key) {
            trace!(key, "compile cache hit");
            return Ok(cached.clone());
        }

        let compiled = match apply.head().kind() {
            ExprKind::Symbol(symbol) => match symbol.descriptor() {
                Some(descriptor) => descriptor.compile(apply, self)?,
                None => {
                    return Err(MetaQueryError::uncompilable(
                        expr,
                        format!("'{}' is not a known function", symbol.name()),
                    ))
                }
            },
            ExprKind::Lambda(lambda) => {
                let bindings: Bindings = lambda
                    .argument_names()
                    .map(str::to_string)
                    .zip(apply.arguments().iter().cloned())
                    .collect();
                let reduced = lambda.body().substitute_symbols(self.environment, &bindings)?;
                // Shares this call's cache with the enclosing expression
                self.compile(&reduced)?
            }
            _ => {
                return Err(MetaQueryError::uncompilable(
                    expr,
                    "only symbols and lambdas can be applied",
                ))
            }
        };

        if compiled.is_motive() {
            trace!(key, "compile cache store");
            self.cache.insert(key.to_string(), compiled.clone());
        }
        Ok(compiled)
    }
}

//! Entry point for building, substituting and compiling meta-expressions
//!
//! A [`MetaEnvironment`] pairs a symbol registry with the engine
//! configuration. Every construction goes through it so that symbols resolve
//! against an explicit registry instead of a process-wide table.

use crate::compiler::Compiler;
use crate::config::EngineConfig;
use crate::error::MetaResult;
use crate::expr::{Expr, ExprKind, Literal, MetaApply, MetaAssign, MetaLambda, MetaLet, MetaSymbol, MetaTuple, ObjectValue};
use crate::query::CompiledQuery;
use crate::registry::SymbolRegistry;
use crate::substitution::Bindings;
use std::any::Any;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct MetaEnvironment {
    registry: Arc<SymbolRegistry>,
    config: EngineConfig,
}

impl MetaEnvironment {
    pub fn new(registry: SymbolRegistry) -> Self {
        Self::with_config(Arc::new(registry), EngineConfig::default())
    }

    pub fn with_config(registry: Arc<SymbolRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// An environment over the built-in symbol table
    pub fn standard() -> Self {
        Self::new(SymbolRegistry::standard())
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn create_value(&self, literal: impl Into<Literal>) -> Expr {
        Expr::value(literal)
    }

    pub fn create_object(&self, label: impl Into<String>, value: Arc<dyn Any + Send + Sync>) -> Expr {
        Expr::value(ObjectValue::new(label, value))
    }

    /// A symbol, resolved against the registry ignoring case
    pub fn create_symbol(&self, name: &str) -> Expr {
        Expr::from_kind(ExprKind::Symbol(MetaSymbol::resolve(&self.registry, name)))
    }

    /// A tuple; nested tuples and `Sequence` applications are spliced
    pub fn create_tuple(&self, elements: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::from_kind(ExprKind::Tuple(MetaTuple::flattened(elements)))
    }

    pub fn create_empty(&self) -> Expr {
        Expr::empty()
    }

    pub fn create_assign(&self, symbol: &Expr, value: Expr) -> MetaResult<Expr> {
        MetaAssign::create(symbol, value)
    }

    /// `arguments => body`; `arguments` is a symbol, a tuple of symbols or a
    /// `Sequence` of symbols
    pub fn create_lambda(&self, arguments: &Expr, body: Expr) -> MetaResult<Expr> {
        MetaLambda::create(arguments, body)
    }

    pub fn create_let(&self, assignment: &Expr, expression: Expr) -> MetaResult<Expr> {
        MetaLet::create(self, assignment, expression)
    }

    /// Apply a symbol or a lambda; the result is not necessarily an
    /// application once attributes and normalization have run
    pub fn create_apply(&self, head: Expr, arguments: &Expr) -> MetaResult<Expr> {
        MetaApply::create(self, head, arguments)
    }

    pub fn apply_to(&self, head: Expr, arguments: impl IntoIterator<Item = Expr>) -> MetaResult<Expr> {
        self.create_apply(head, &self.create_tuple(arguments))
    }

    /// `name[arguments]` for a symbol name
    pub fn call(&self, name: &str, arguments: impl IntoIterator<Item = Expr>) -> MetaResult<Expr> {
        self.apply_to(self.create_symbol(name), arguments)
    }

    pub fn substitute_symbols(&self, expr: &Expr, values: &Bindings) -> MetaResult<Expr> {
        expr.substitute_symbols(self, values)
    }

    /// Compile with a fresh cache
    #[instrument(skip_all, fields(expression = %expr))]
    pub fn compile(&self, expr: &Expr) -> MetaResult<CompiledQuery> {
        Compiler::new(self).compile(expr)
    }
}

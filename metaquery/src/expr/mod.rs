//! Meta-expression tree
//!
//! An [`Expr`] is a cheaply clonable handle to an immutable node. Nodes are
//! only built through the construction functions of each variant (reached via
//! [`MetaEnvironment`](crate::environment::MetaEnvironment)), which normalize
//! and type them; after that a node never changes. The canonical string of a
//! node is computed on first use and cached in the node.

pub mod apply;
pub mod binding;
pub mod lambda;
pub mod literal;
pub mod symbol;
pub mod tuple;

pub use apply::MetaApply;
pub use binding::{MetaAssign, MetaLet};
pub use lambda::MetaLambda;
pub use literal::{Literal, ObjectValue};
pub use symbol::MetaSymbol;
pub use tuple::MetaTuple;

use crate::error::{MetaQueryError, MetaResult};
use crate::types::TypeExpression;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Name of the splicing head: `Sequence[a, b]` inside a tuple or argument list
/// contributes `a, b`
pub const SEQUENCE_SYMBOL: &str = "Sequence";

const BUILTIN_HEADS: [&str; 12] = [
    "Symbol",
    "Bool",
    "Integer",
    "Real",
    "String",
    "StaticMatrix",
    "Object",
    "Tuple",
    "Lambda",
    "Let",
    "Assign",
    "Empty",
];

lazy_static! {
    static ref HEADS: HashMap<&'static str, Expr> = BUILTIN_HEADS
        .iter()
        .map(|name| (*name, Expr::from_kind(ExprKind::Symbol(MetaSymbol::unresolved(name)))))
        .collect();
}

/// The variants of a node
#[derive(Debug, Clone)]
pub enum ExprKind {
    Symbol(MetaSymbol),
    Value(Literal),
    Tuple(MetaTuple),
    Lambda(MetaLambda),
    Let(MetaLet),
    Assign(MetaAssign),
    Apply(MetaApply),
    /// Marker dropped from argument lists of `IgnoreEmpty` symbols
    Empty,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(symbol) => write!(f, "{symbol}"),
            Self::Value(literal) => write!(f, "{literal}"),
            Self::Tuple(tuple) => write!(f, "{tuple}"),
            Self::Lambda(lambda) => write!(f, "{lambda}"),
            Self::Let(binding) => write!(f, "{binding}"),
            Self::Assign(assign) => write!(f, "{assign}"),
            Self::Apply(apply) => write!(f, "{apply}"),
            Self::Empty => write!(f, "Empty"),
        }
    }
}

struct ExprNode {
    kind: ExprKind,
    canonical: OnceLock<String>,
}

/// A meta-expression
#[derive(Clone)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    pub(crate) fn from_kind(kind: ExprKind) -> Self {
        Self(Arc::new(ExprNode {
            kind,
            canonical: OnceLock::new(),
        }))
    }

    /// A value node
    pub fn value(literal: impl Into<Literal>) -> Self {
        Self::from_kind(ExprKind::Value(literal.into()))
    }

    /// The `Empty` marker
    pub fn empty() -> Self {
        Self::from_kind(ExprKind::Empty)
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Deterministic textual form, also used as the structural identity of
    /// the node
    pub fn canonical_string(&self) -> &str {
        self.0.canonical.get_or_init(|| self.0.kind.to_string())
    }

    pub fn value_type(&self) -> TypeExpression {
        match self.kind() {
            ExprKind::Symbol(symbol) => symbol.value_type(),
            ExprKind::Value(literal) => literal.value_type(),
            ExprKind::Tuple(tuple) => tuple.value_type().clone(),
            ExprKind::Lambda(lambda) => lambda.value_type().clone(),
            ExprKind::Let(binding) => binding.substituted().value_type(),
            ExprKind::Assign(assign) => assign.value().value_type(),
            ExprKind::Apply(apply) => apply.value_type().clone(),
            ExprKind::Empty => TypeExpression::Wildcard,
        }
    }

    /// The symbolic head: the applied symbol or lambda of an application, a
    /// built-in head symbol otherwise
    pub fn head(&self) -> Expr {
        match self.kind() {
            ExprKind::Apply(apply) => apply.head().clone(),
            kind => {
                let name = builtin_head_name(kind);
                HEADS.get(name).cloned().unwrap_or_else(|| {
                    Expr::from_kind(ExprKind::Symbol(MetaSymbol::unresolved(name)))
                })
            }
        }
    }

    /// Name of the head when the head is a symbol
    pub fn head_name(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Apply(apply) => apply.head().as_symbol().map(MetaSymbol::name),
            kind => Some(builtin_head_name(kind)),
        }
    }

    /// Case-insensitive test of the symbolic head
    pub fn head_equals(&self, name: &str) -> bool {
        self.head_name()
            .is_some_and(|head| head.eq_ignore_ascii_case(name))
    }

    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_empty_marker(&self) -> bool {
        matches!(self.kind(), ExprKind::Empty)
    }

    pub fn as_symbol(&self) -> Option<&MetaSymbol> {
        match self.kind() {
            ExprKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self.kind() {
            ExprKind::Value(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&MetaTuple> {
        match self.kind() {
            ExprKind::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&MetaLambda> {
        match self.kind() {
            ExprKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }

    pub fn as_let(&self) -> Option<&MetaLet> {
        match self.kind() {
            ExprKind::Let(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn as_assign(&self) -> Option<&MetaAssign> {
        match self.kind() {
            ExprKind::Assign(assign) => Some(assign),
            _ => None,
        }
    }

    pub fn as_apply(&self) -> Option<&MetaApply> {
        match self.kind() {
            ExprKind::Apply(apply) => Some(apply),
            _ => None,
        }
    }

    /// String literal; a symbol or a bare `F[]` reads as its name
    pub fn as_string(&self) -> MetaResult<String> {
        match self.kind() {
            ExprKind::Value(Literal::String(value)) => Ok(value.clone()),
            ExprKind::Symbol(symbol) => Ok(symbol.name().to_string()),
            ExprKind::Apply(apply) if apply.arguments().is_empty() => apply
                .head()
                .as_symbol()
                .map(|symbol| symbol.name().to_string())
                .ok_or_else(|| MetaQueryError::value_access("string", self)),
            _ => Err(MetaQueryError::value_access("string", self)),
        }
    }

    pub fn as_integer(&self) -> MetaResult<i64> {
        match self.kind() {
            ExprKind::Value(Literal::Integer(value)) => Ok(*value),
            _ => Err(MetaQueryError::value_access("integer", self)),
        }
    }

    /// Real literal; integers widen
    pub fn as_real(&self) -> MetaResult<f64> {
        match self.kind() {
            ExprKind::Value(Literal::Real(value)) => Ok(*value),
            ExprKind::Value(Literal::Integer(value)) => Ok(*value as f64),
            _ => Err(MetaQueryError::value_access("real", self)),
        }
    }

    pub fn as_bool(&self) -> MetaResult<bool> {
        match self.kind() {
            ExprKind::Value(Literal::Bool(value)) => Ok(*value),
            _ => Err(MetaQueryError::value_access("bool", self)),
        }
    }

    pub fn as_matrix(&self) -> MetaResult<&[Vec<f64>]> {
        match self.kind() {
            ExprKind::Value(Literal::Matrix(rows)) => Ok(rows),
            _ => Err(MetaQueryError::value_access("matrix", self)),
        }
    }

    pub fn as_object(&self) -> MetaResult<&ObjectValue> {
        match self.kind() {
            ExprKind::Value(Literal::Object(object)) => Ok(object),
            _ => Err(MetaQueryError::value_access("object", self)),
        }
    }
}

fn builtin_head_name(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::Symbol(_) => "Symbol",
        ExprKind::Value(literal) => literal.head_name(),
        ExprKind::Tuple(_) => "Tuple",
        ExprKind::Lambda(_) => "Lambda",
        ExprKind::Let(_) => "Let",
        ExprKind::Assign(_) => "Assign",
        // only reached through `head()`, which handles applications itself
        ExprKind::Apply(_) => "Apply",
        ExprKind::Empty => "Empty",
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_string())
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.canonical_string())
    }
}

/// Structural equality through the canonical string
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.canonical_string() == other.canonical_string()
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_heads() {
        assert_eq!(Expr::value(1).head().canonical_string(), "Integer");
        assert_eq!(Expr::value(1.5).head().canonical_string(), "Real");
        assert_eq!(Expr::value("a").head().canonical_string(), "String");
        assert_eq!(Expr::empty().head().canonical_string(), "Empty");
        assert!(Expr::value(true).head_equals("bool"));
    }

    #[test]
    fn test_canonical_string_is_cached() {
        let expr = Expr::value("NAG");
        let first = expr.canonical_string().as_ptr();
        let second = expr.canonical_string().as_ptr();
        assert_eq!(first, second);
        assert_eq!(expr.to_string(), "\"NAG\"");
    }

    #[test]
    fn test_literal_accessors() {
        assert_eq!(Expr::value(3).as_integer().unwrap(), 3);
        assert_eq!(Expr::value(3).as_real().unwrap(), 3.0);
        assert_eq!(Expr::value("HIS").as_string().unwrap(), "HIS");
        assert!(Expr::value(true).as_bool().unwrap());

        let err = Expr::value(2.5).as_integer().unwrap_err();
        assert_eq!(
            err,
            MetaQueryError::ValueAccess {
                expected: "integer",
                expression: "2.5".into()
            }
        );
    }
}

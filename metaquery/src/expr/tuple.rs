use crate::expr::{Expr, ExprKind, SEQUENCE_SYMBOL};
use crate::types::TypeExpression;
use std::fmt;

/// An ordered group of expressions, typed by the tuple of element types
#[derive(Debug, Clone)]
pub struct MetaTuple {
    elements: Vec<Expr>,
    value_type: TypeExpression,
}

impl MetaTuple {
    /// A tuple of exactly these elements
    pub(crate) fn new(elements: Vec<Expr>) -> Self {
        let value_type = TypeExpression::tuple(elements.iter().map(Expr::value_type));
        Self {
            elements,
            value_type,
        }
    }

    /// A tuple whose tuple and `Sequence` elements are spliced one level
    pub(crate) fn flattened(elements: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for element in elements {
            splice_into(&mut flat, element);
        }
        Self::new(flat)
    }

    pub fn elements(&self) -> &[Expr] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn value_type(&self) -> &TypeExpression {
        &self.value_type
    }
}

/// Children a tuple or a `Sequence` application contributes when spliced
pub(crate) fn spliced_children(expr: &Expr) -> Option<&[Expr]> {
    match expr.kind() {
        ExprKind::Tuple(tuple) => Some(tuple.elements()),
        ExprKind::Apply(apply) if expr.head_equals(SEQUENCE_SYMBOL) => Some(apply.arguments()),
        _ => None,
    }
}

pub(crate) fn splice_into(target: &mut Vec<Expr>, expr: Expr) {
    if let Some(children) = spliced_children(&expr) {
        target.extend_from_slice(children);
        return;
    }
    target.push(expr);
}

impl fmt::Display for MetaTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "]")
    }
}

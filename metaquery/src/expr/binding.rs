use crate::environment::MetaEnvironment;
use crate::error::{MetaQueryError, MetaResult};
use crate::expr::{Expr, ExprKind, MetaSymbol};
use crate::substitution::Bindings;
use std::fmt;

/// `name = value`; as an element of an argument list it supplies an option
#[derive(Debug, Clone)]
pub struct MetaAssign {
    symbol: MetaSymbol,
    value: Expr,
}

impl MetaAssign {
    pub(crate) fn new(symbol: MetaSymbol, value: Expr) -> Self {
        Self { symbol, value }
    }

    pub(crate) fn create(symbol: &Expr, value: Expr) -> MetaResult<Expr> {
        let symbol = symbol
            .as_symbol()
            .ok_or_else(|| MetaQueryError::InvalidAssignmentTarget {
                target: symbol.to_string(),
                construct: "an assignment".into(),
            })?;

        Ok(Expr::from_kind(ExprKind::Assign(Self::new(symbol.clone(), value))))
    }

    pub fn symbol(&self) -> &MetaSymbol {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        self.symbol.name()
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }
}

impl fmt::Display for MetaAssign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.symbol, self.value)
    }
}

/// `let name = value in expression`
///
/// The binding is substituted into the expression eagerly; the substituted
/// form carries the type and is what gets compiled, the unsubstituted pair is kept
/// for display.
#[derive(Debug, Clone)]
pub struct MetaLet {
    assignment: MetaAssign,
    expression: Expr,
    substituted: Expr,
}

impl MetaLet {
    pub(crate) fn create(
        environment: &MetaEnvironment,
        assignment: &Expr,
        expression: Expr,
    ) -> MetaResult<Expr> {
        let assignment = assignment
            .as_assign()
            .ok_or_else(|| MetaQueryError::InvalidAssignmentTarget {
                target: assignment.to_string(),
                construct: "a let binding".into(),
            })?;

        let mut bindings = Bindings::new();
        bindings.insert(assignment.name().to_string(), assignment.value().clone());
        let substituted = expression.substitute_symbols(environment, &bindings)?;

        Ok(Expr::from_kind(ExprKind::Let(Self {
            assignment: assignment.clone(),
            expression,
            substituted,
        })))
    }

    pub(crate) fn from_parts(assignment: MetaAssign, expression: Expr, substituted: Expr) -> Self {
        Self {
            assignment,
            expression,
            substituted,
        }
    }

    pub fn assignment(&self) -> &MetaAssign {
        &self.assignment
    }

    pub fn name(&self) -> &str {
        self.assignment.name()
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn substituted(&self) -> &Expr {
        &self.substituted
    }
}

impl fmt::Display for MetaLet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {} in {}", self.assignment, self.expression)
    }
}

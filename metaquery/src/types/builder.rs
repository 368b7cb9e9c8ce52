//! Function signature builder

use crate::types::{TypeClass, TypeExpression};
use std::sync::Arc;

/// Accumulates argument types and finishes with a return type
///
/// ```
/// use metaquery::types::{BasicTypes, FunctionTypeBuilder};
///
/// let ty = FunctionTypeBuilder::new()
///     .arg(BasicTypes::pattern())
///     .many(BasicTypes::string(), false)
///     .returns(BasicTypes::bool());
/// assert_eq!(ty.to_string(), "(Pattern,String+)->Bool");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FunctionTypeBuilder {
    args: Vec<TypeExpression>,
}

impl FunctionTypeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required argument
    pub fn arg(mut self, ty: TypeExpression) -> Self {
        self.args.push(ty);
        self
    }

    /// A required argument of the given class
    pub fn arg_class(self, class: Arc<TypeClass>) -> Self {
        self.arg(TypeExpression::constant(class))
    }

    /// A required argument typed by a variable
    pub fn arg_var(self, name: &str) -> Self {
        self.arg(TypeExpression::variable(name))
    }

    /// An optional trailing argument
    pub fn opt(mut self, ty: TypeExpression) -> Self {
        self.args.push(TypeExpression::optional(ty));
        self
    }

    /// A run of arguments of the same type
    pub fn many(mut self, ty: TypeExpression, allow_empty: bool) -> Self {
        self.args.push(TypeExpression::many(ty, allow_empty));
        self
    }

    pub fn returns(self, ty: TypeExpression) -> TypeExpression {
        TypeExpression::arrow(TypeExpression::Tuple(self.args), ty)
    }

    pub fn returns_var(self, name: &str) -> TypeExpression {
        self.returns(TypeExpression::variable(name))
    }
}

//! Type expressions
//!
//! Structured representation of the types carried by meta-expressions. Type
//! variables are named; a free symbol `x` starts out with the variable `'x`,
//! which is what lets unification results flow back onto symbol occurrences.

use crate::types::TypeClass;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Variable name -> type bindings produced by unification
pub type Substitutions = IndexMap<String, TypeExpression>;

/// A type in the meta-expression type language
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpression {
    /// Matches anything: `?`
    Wildcard,
    /// Type variable: `'name`
    Variable(String),
    /// Type constant of a given class: `PatternSeq`
    Constant(Arc<TypeClass>),
    /// Repetition inside a tuple: `T+`, `T*` or `?T`
    Many {
        inner: Box<TypeExpression>,
        allow_empty: bool,
        is_option: bool,
    },
    /// Ordered tuple: `(a,b)`
    Tuple(Vec<TypeExpression>),
    /// Function type: `a->b`
    Arrow {
        from: Box<TypeExpression>,
        to: Box<TypeExpression>,
    },
}

impl TypeExpression {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn constant(class: Arc<TypeClass>) -> Self {
        Self::Constant(class)
    }

    pub fn tuple(elements: impl IntoIterator<Item = TypeExpression>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    pub fn arrow(from: TypeExpression, to: TypeExpression) -> Self {
        Self::Arrow {
            from: Box::new(from),
            to: Box::new(to),
        }
    }

    /// One or more occurrences (`allow_empty`: zero or more)
    pub fn many(inner: TypeExpression, allow_empty: bool) -> Self {
        Self::Many {
            inner: Box::new(inner),
            allow_empty,
            is_option: false,
        }
    }

    /// Zero or one occurrence
    pub fn optional(inner: TypeExpression) -> Self {
        Self::Many {
            inner: Box::new(inner),
            allow_empty: true,
            is_option: true,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// The parameter side of an arrow, or the type itself otherwise
    pub fn arrow_from(&self) -> &TypeExpression {
        match self {
            Self::Arrow { from, .. } => from,
            other => other,
        }
    }

    /// Replace bound variables; unbound variables are kept as they are
    pub fn substitute(&self, values: &Substitutions) -> TypeExpression {
        match self {
            Self::Wildcard | Self::Constant(_) => self.clone(),
            Self::Variable(name) => values.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Many {
                inner,
                allow_empty,
                is_option,
            } => Self::Many {
                inner: Box::new(inner.substitute(values)),
                allow_empty: *allow_empty,
                is_option: *is_option,
            },
            Self::Tuple(elements) => Self::Tuple(elements.iter().map(|e| e.substitute(values)).collect()),
            Self::Arrow { from, to } => Self::arrow(from.substitute(values), to.substitute(values)),
        }
    }
}

impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "?"),
            Self::Variable(name) => write!(f, "'{name}"),
            Self::Constant(class) => write!(f, "{}", class.name()),
            Self::Many {
                inner,
                allow_empty,
                is_option,
            } => {
                let wrapped = if matches!(**inner, Self::Arrow { .. }) {
                    format!("({inner})")
                } else {
                    inner.to_string()
                };
                if *is_option {
                    write!(f, "?{wrapped}")
                } else if *allow_empty {
                    write!(f, "{wrapped}*")
                } else {
                    write!(f, "{wrapped}+")
                }
            }
            Self::Tuple(elements) => match elements.as_slice() {
                [] => write!(f, "()"),
                [single] => write!(f, "{single}"),
                many => {
                    let parts: Vec<String> = many.iter().map(|e| e.to_string()).collect();
                    write!(f, "({})", parts.join(","))
                }
            },
            Self::Arrow { from, to } => write!(f, "{from}->{to}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BasicTypes;

    #[test]
    fn test_display_forms() {
        let arrow = TypeExpression::arrow(
            TypeExpression::tuple([
                BasicTypes::string(),
                TypeExpression::many(BasicTypes::integer(), true),
                TypeExpression::optional(BasicTypes::real()),
            ]),
            TypeExpression::variable("b"),
        );

        assert_eq!(arrow.to_string(), "(String,Integer*,?Real)->'b");
        assert_eq!(TypeExpression::tuple([]).to_string(), "()");
        assert_eq!(TypeExpression::tuple([BasicTypes::bool()]).to_string(), "Bool");
        assert_eq!(
            TypeExpression::many(BasicTypes::pattern_seq(), false).to_string(),
            "PatternSeq+"
        );
    }

    #[test]
    fn test_substitute_replaces_only_bound_variables() {
        let mut values = Substitutions::new();
        values.insert("a".to_string(), BasicTypes::string());

        let ty = TypeExpression::arrow(
            TypeExpression::tuple([TypeExpression::variable("a")]),
            TypeExpression::variable("b"),
        );

        assert_eq!(ty.substitute(&values).to_string(), "String->'b");
    }
}

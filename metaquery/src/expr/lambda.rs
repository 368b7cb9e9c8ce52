use crate::error::{LambdaArgumentIssue, MetaQueryError, MetaResult};
use crate::expr::{Expr, ExprKind, MetaSymbol, SEQUENCE_SYMBOL};
use crate::inference::{binding_key, TypeEnvironment};
use crate::types::TypeExpression;
use std::collections::HashSet;
use std::fmt;

/// An anonymous function `x => body` or `(x,y) => body`
#[derive(Debug, Clone)]
pub struct MetaLambda {
    arguments: Vec<MetaSymbol>,
    body: Expr,
    value_type: TypeExpression,
}

impl MetaLambda {
    /// Build a lambda from its argument list: a tuple, a `Sequence`
    /// application or a single symbol
    pub(crate) fn create(arguments: &Expr, body: Expr) -> MetaResult<Expr> {
        let candidates: Vec<Expr> = match arguments.kind() {
            ExprKind::Tuple(tuple) => tuple.elements().to_vec(),
            ExprKind::Apply(apply) if arguments.head_equals(SEQUENCE_SYMBOL) => {
                apply.arguments().to_vec()
            }
            _ => vec![arguments.clone()],
        };

        let mut seen = HashSet::new();
        let mut symbols = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let issue = match candidate.as_symbol() {
                None => Some(LambdaArgumentIssue::NotASymbol),
                Some(symbol) if symbol.is_builtin() => Some(LambdaArgumentIssue::BuiltIn),
                Some(symbol) if !seen.insert(binding_key(symbol.name())) => {
                    Some(LambdaArgumentIssue::Duplicate)
                }
                Some(symbol) => {
                    symbols.push(symbol.clone());
                    None
                }
            };

            if let Some(issue) = issue {
                return Err(MetaQueryError::IllegalLambdaArgument {
                    argument: candidate.to_string(),
                    issue,
                });
            }
        }

        Self::from_symbols(symbols, body)
    }

    /// Type `body` with the arguments as fresh variables and build the lambda
    pub(crate) fn from_symbols(arguments: Vec<MetaSymbol>, body: Expr) -> MetaResult<Expr> {
        let mut types = TypeEnvironment::new();
        for argument in &arguments {
            types.bind(argument.name(), argument.value_type());
        }

        body.infer_types(&mut types)?;

        let arguments = arguments
            .iter()
            .map(|argument| argument.refine(&types))
            .collect::<MetaResult<Vec<_>>>()?;

        let value_type = TypeExpression::arrow(
            TypeExpression::tuple(arguments.iter().map(|a| a.inferred_type().clone())),
            body.value_type(),
        );

        Ok(Expr::from_kind(ExprKind::Lambda(Self {
            arguments,
            body,
            value_type,
        })))
    }

    pub(crate) fn with_body(&self, body: Expr) -> Self {
        Self {
            arguments: self.arguments.clone(),
            body,
            value_type: self.value_type.clone(),
        }
    }

    pub fn arguments(&self) -> &[MetaSymbol] {
        &self.arguments
    }

    pub fn argument_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.arguments.iter().map(MetaSymbol::name)
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// `(argument types) -> body type`
    pub fn value_type(&self) -> &TypeExpression {
        &self.value_type
    }
}

impl fmt::Display for MetaLambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arguments.as_slice() {
            [] => write!(f, "[]")?,
            [single] => write!(f, "{single}")?,
            many => {
                let names: Vec<&str> = many.iter().map(MetaSymbol::name).collect();
                write!(f, "({})", names.join(","))?;
            }
        }
        write!(f, " => {}", self.body)
    }
}

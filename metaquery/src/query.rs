//! Executable query tree
//!
//! The compiler's output. Walking it against a molecular structure is the
//! business of the execution engine; this crate only builds it.

use crate::expr::Literal;
use std::fmt;
use std::sync::Arc;

/// A compiled query, shared so cached motives can be reused by reference
pub type CompiledQuery = Arc<Query>;

/// A call to a built-in compiled by its descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct CallQuery {
    pub name: String,
    /// Options in their declaration order
    pub options: Vec<(String, CompiledQuery)>,
    pub arguments: Vec<CompiledQuery>,
}

impl CallQuery {
    pub fn new(name: impl Into<String>, arguments: Vec<CompiledQuery>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            arguments,
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: CompiledQuery) -> Self {
        self.options.push((name.into(), value));
        self
    }

    pub fn option(&self, name: &str) -> Option<&CompiledQuery> {
        self.options
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// A literal
    Value(Literal),
    /// A reference to a free variable, bound by the execution engine
    Symbol(String),
    /// A function value, e.g. a filter predicate
    Lambda {
        parameters: Vec<String>,
        body: CompiledQuery,
    },
    List(Vec<CompiledQuery>),
    /// A structural pattern search; the only kind the compiler memoizes
    Motive(CallQuery),
    /// Any other built-in computation
    Function(CallQuery),
}

impl Query {
    pub fn value(literal: impl Into<Literal>) -> CompiledQuery {
        Arc::new(Self::Value(literal.into()))
    }

    pub fn motive(call: CallQuery) -> CompiledQuery {
        Arc::new(Self::Motive(call))
    }

    pub fn function(call: CallQuery) -> CompiledQuery {
        Arc::new(Self::Function(call))
    }

    pub fn is_motive(&self) -> bool {
        matches!(self, Self::Motive(_))
    }

    pub fn as_call(&self) -> Option<&CallQuery> {
        match self {
            Self::Motive(call) | Self::Function(call) => Some(call),
            _ => None,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[CompiledQuery]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for CallQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_list(f, &self.arguments)?;
        for (i, (name, value)) in self.options.iter().enumerate() {
            if i > 0 || !self.arguments.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(literal) => write!(f, "{literal}"),
            Self::Symbol(name) => write!(f, "${name}"),
            Self::Lambda { parameters, body } => {
                write!(f, "fn({}) {body}", parameters.join(", "))
            }
            Self::List(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Self::Motive(call) => write!(f, "motive {call}"),
            Self::Function(call) => write!(f, "{call}"),
        }
    }
}

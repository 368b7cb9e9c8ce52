//! Literal payloads of value nodes

use crate::types::{BasicTypes, TypeExpression};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque host object carried through the tree, rendered by its label and
/// the address of the shared value
#[derive(Clone)]
pub struct ObjectValue {
    label: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    pub fn new(label: impl Into<String>, value: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.value
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectValue").field(&self.label).finish()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && Arc::ptr_eq(&self.value, &other.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Matrix(Vec<Vec<f64>>),
    Object(ObjectValue),
}

impl Literal {
    /// Name of the head symbol of a value node holding this literal
    pub fn head_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Integer(_) => "Integer",
            Self::Real(_) => "Real",
            Self::String(_) => "String",
            Self::Matrix(_) => "StaticMatrix",
            Self::Object(_) => "Object",
        }
    }

    pub fn value_type(&self) -> TypeExpression {
        match self {
            Self::Bool(_) => BasicTypes::bool(),
            Self::Integer(_) => BasicTypes::integer(),
            Self::Real(_) => BasicTypes::real(),
            Self::String(_) => BasicTypes::string(),
            Self::Matrix(_) => BasicTypes::static_matrix(),
            Self::Object(_) => BasicTypes::value(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Integer(value) => write!(f, "{value}"),
            // Always carries a fraction or exponent: `1.0`, never `1`
            Self::Real(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Matrix(rows) => {
                let rows: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<String> = row.iter().map(|c| format!("{c:?}")).collect();
                        format!("[{}]", cells.join(","))
                    })
                    .collect();
                write!(f, "[{}]", rows.join(","))
            }
            Self::Object(object) => {
                write!(f, "{}@{:p}", object.label, Arc::as_ptr(&object.value))
            }
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Vec<f64>>> for Literal {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Self::Matrix(value)
    }
}

impl From<ObjectValue> for Literal {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

//! Type classes
//!
//! A type class is a named node in a single-inheritance tree rooted at `Any`.
//! Constants of two classes unify when one class derives from the other.

use std::fmt;
use std::sync::Arc;

/// A named type class with an optional parent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeClass {
    name: String,
    parent: Option<Arc<TypeClass>>,
}

impl TypeClass {
    /// The root class every other class derives from
    pub fn any() -> Arc<TypeClass> {
        Arc::new(Self {
            name: "Any".to_string(),
            parent: None,
        })
    }

    /// Create a class deriving from `parent`, or from `Any` when no parent is given
    pub fn create(name: impl Into<String>, parent: Option<Arc<TypeClass>>) -> Arc<TypeClass> {
        Arc::new(Self {
            name: name.into(),
            parent: Some(parent.unwrap_or_else(TypeClass::any)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<TypeClass>> {
        self.parent.as_ref()
    }

    /// Check whether this class is `other` or one of its descendants
    pub fn is_derived_from(&self, other: &TypeClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.name == other.name {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

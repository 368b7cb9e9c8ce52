use crate::error::{MetaQueryError, MetaResult};
use crate::inference::TypeEnvironment;
use crate::registry::{SymbolDescriptor, SymbolRegistry};
use crate::types::TypeExpression;
use crate::unification::unify;
use std::fmt;
use std::sync::Arc;

/// A named reference, either to a built-in or to a free variable
#[derive(Debug, Clone)]
pub struct MetaSymbol {
    name: String,
    descriptor: Option<Arc<SymbolDescriptor>>,
    inferred_type: TypeExpression,
}

impl MetaSymbol {
    /// Resolve `name` against the registry; a built-in takes the descriptor's
    /// spelling of the name
    pub(crate) fn resolve(registry: &SymbolRegistry, name: &str) -> Self {
        match registry.try_get_descriptor(name) {
            Some(descriptor) => Self {
                name: descriptor.name().to_string(),
                inferred_type: TypeExpression::variable(descriptor.name()),
                descriptor: Some(descriptor),
            },
            None => Self::unresolved(name),
        }
    }

    pub(crate) fn unresolved(name: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: None,
            inferred_type: TypeExpression::variable(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> Option<&Arc<SymbolDescriptor>> {
        self.descriptor.as_ref()
    }

    pub fn is_builtin(&self) -> bool {
        self.descriptor.is_some()
    }

    /// The symbol's own type variable `'name`
    pub fn value_type(&self) -> TypeExpression {
        TypeExpression::variable(&self.name)
    }

    /// The type inference has settled on for this occurrence
    pub fn inferred_type(&self) -> &TypeExpression {
        &self.inferred_type
    }

    /// Unify this occurrence with the binding of its name, if there is one
    pub(crate) fn unify_with(&self, environment: &TypeEnvironment) -> MetaResult<Option<TypeExpression>> {
        let Some(bound) = environment.get(&self.name) else {
            return Ok(None);
        };

        let result = unify(bound, &self.inferred_type);
        match result.inferred {
            Some(inferred) if result.success => Ok(Some(inferred)),
            _ => Err(MetaQueryError::UnificationConflict {
                symbol: self.name.clone(),
                expected: bound.to_string(),
                found: self.inferred_type.to_string(),
            }),
        }
    }

    /// This occurrence with its inferred type refined by `environment`
    pub(crate) fn refine(&self, environment: &TypeEnvironment) -> MetaResult<MetaSymbol> {
        Ok(match self.unify_with(environment)? {
            Some(inferred_type) => Self {
                inferred_type,
                ..self.clone()
            },
            None => self.clone(),
        })
    }
}

impl fmt::Display for MetaSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

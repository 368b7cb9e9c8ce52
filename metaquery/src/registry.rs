//! Symbol registry
//!
//! Descriptors for built-in symbols: signature, options, algebraic attributes
//! and the hooks that normalize and compile applications of the symbol. A
//! registry is built once, wrapped in an `Arc` and only read afterwards.

use crate::compiler::Compiler;
use crate::environment::MetaEnvironment;
use crate::error::{MetaQueryError, MetaResult};
use crate::expr::{Expr, MetaApply};
use crate::query::CompiledQuery;
use crate::types::TypeExpression;
use indexmap::IndexMap;
use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

/// Compile hook of a descriptor
pub type CompileFn =
    Arc<dyn Fn(&MetaApply, &mut Compiler<'_>) -> MetaResult<CompiledQuery> + Send + Sync>;

/// Normalization hook of a descriptor, run last when an application is built
pub type NormalizeFn = Arc<dyn Fn(&MetaEnvironment, Expr) -> MetaResult<Expr> + Send + Sync>;

/// Algebraic attributes enforced while applications are constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolAttributes(u8);

impl SymbolAttributes {
    pub const NONE: Self = Self(0);
    /// `F[F[a, b], c]` is `F[a, b, c]`
    pub const FLAT: Self = Self(1);
    /// Arguments are sorted by their canonical string
    pub const ORDERLESS: Self = Self(1 << 1);
    /// `F[a]` is `a`
    pub const ONE_IDENTITY: Self = Self(1 << 2);
    /// Duplicate arguments are dropped
    pub const UNIQUE_ARGS: Self = Self(1 << 3);
    /// `Empty` arguments are dropped
    pub const IGNORE_EMPTY: Self = Self(1 << 4);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SymbolAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionArgument {
    pub name: String,
    pub description: String,
    pub value_type: TypeExpression,
}

/// A named option with a default value
#[derive(Debug, Clone)]
pub struct MetaOption {
    pub name: String,
    pub description: String,
    pub default_value: Expr,
    pub value_type: TypeExpression,
}

impl MetaOption {
    pub fn new(
        name: impl Into<String>,
        value_type: TypeExpression,
        default_value: Expr,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_value,
            value_type,
        }
    }
}

/// Registry metadata of a built-in symbol
#[derive(Clone)]
pub struct SymbolDescriptor {
    name: String,
    description: String,
    arguments: Vec<FunctionArgument>,
    return_type: TypeExpression,
    attributes: SymbolAttributes,
    options: IndexMap<String, MetaOption>,
    function_type: TypeExpression,
    compile: Option<CompileFn>,
    normalize: Option<NormalizeFn>,
}

impl SymbolDescriptor {
    pub fn builder(name: impl Into<String>) -> SymbolDescriptorBuilder {
        SymbolDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &[FunctionArgument] {
        &self.arguments
    }

    pub fn return_type(&self) -> &TypeExpression {
        &self.return_type
    }

    pub fn attributes(&self) -> SymbolAttributes {
        self.attributes
    }

    pub fn has_attribute(&self, attribute: SymbolAttributes) -> bool {
        self.attributes.contains(attribute)
    }

    /// Declared options in declaration order
    pub fn options(&self) -> &IndexMap<String, MetaOption> {
        &self.options
    }

    /// Case-insensitive option lookup
    pub fn option(&self, name: &str) -> Option<&MetaOption> {
        self.options
            .values()
            .find(|option| option.name.eq_ignore_ascii_case(name))
    }

    /// `(argument types) -> return type`
    pub fn function_type(&self) -> &TypeExpression {
        &self.function_type
    }

    pub fn compile(&self, apply: &MetaApply, compiler: &mut Compiler<'_>) -> MetaResult<CompiledQuery> {
        match &self.compile {
            Some(compile) => compile(apply, compiler),
            None => Err(MetaQueryError::uncompilable(
                apply,
                format!("'{}' has no compiled form", self.name),
            )),
        }
    }

    pub fn normalize(&self, environment: &MetaEnvironment, expr: Expr) -> MetaResult<Expr> {
        match &self.normalize {
            Some(normalize) => normalize(environment, expr),
            None => Ok(expr),
        }
    }
}

impl fmt::Debug for SymbolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolDescriptor")
            .field("name", &self.name)
            .field("function_type", &self.function_type.to_string())
            .field("attributes", &self.attributes)
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct SymbolDescriptorBuilder {
    name: String,
    description: String,
    arguments: Vec<FunctionArgument>,
    return_type: TypeExpression,
    attributes: SymbolAttributes,
    options: IndexMap<String, MetaOption>,
    compile: Option<CompileFn>,
    normalize: Option<NormalizeFn>,
}

impl SymbolDescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            arguments: Vec::new(),
            return_type: TypeExpression::Wildcard,
            attributes: SymbolAttributes::NONE,
            options: IndexMap::new(),
            compile: None,
            normalize: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arg(
        mut self,
        name: impl Into<String>,
        value_type: TypeExpression,
        description: impl Into<String>,
    ) -> Self {
        self.arguments.push(FunctionArgument {
            name: name.into(),
            description: description.into(),
            value_type,
        });
        self
    }

    pub fn returns(mut self, return_type: TypeExpression) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn attributes(mut self, attributes: SymbolAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn option(mut self, option: MetaOption) -> Self {
        self.options.insert(option.name.clone(), option);
        self
    }

    pub fn compile<F>(mut self, compile: F) -> Self
    where
        F: Fn(&MetaApply, &mut Compiler<'_>) -> MetaResult<CompiledQuery> + Send + Sync + 'static,
    {
        self.compile = Some(Arc::new(compile));
        self
    }

    pub fn normalize<F>(mut self, normalize: F) -> Self
    where
        F: Fn(&MetaEnvironment, Expr) -> MetaResult<Expr> + Send + Sync + 'static,
    {
        self.normalize = Some(Arc::new(normalize));
        self
    }

    pub fn build(self) -> SymbolDescriptor {
        let function_type = TypeExpression::arrow(
            TypeExpression::tuple(self.arguments.iter().map(|a| a.value_type.clone())),
            self.return_type.clone(),
        );

        SymbolDescriptor {
            name: self.name,
            description: self.description,
            arguments: self.arguments,
            return_type: self.return_type,
            attributes: self.attributes,
            options: self.options,
            function_type,
            compile: self.compile,
            normalize: self.normalize,
        }
    }
}

/// Built-in symbols, looked up case-insensitively
#[derive(Clone, Default)]
pub struct SymbolRegistry {
    symbols: IndexMap<String, Arc<SymbolDescriptor>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; names must be unique ignoring case
    pub fn register(&mut self, descriptor: SymbolDescriptor) -> MetaResult<()> {
        let key = descriptor.name.to_lowercase();
        if self.symbols.contains_key(&key) {
            return Err(MetaQueryError::DuplicateSymbol {
                name: descriptor.name,
            });
        }
        self.symbols.insert(key, Arc::new(descriptor));
        Ok(())
    }

    pub fn with(mut self, descriptor: SymbolDescriptor) -> MetaResult<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn try_get_descriptor(&self, name: &str) -> Option<Arc<SymbolDescriptor>> {
        self.symbols.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SymbolDescriptor>> {
        self.symbols.values()
    }
}

impl fmt::Debug for SymbolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.symbols.values().map(|d| d.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BasicTypes;
    use pretty_assertions::assert_eq;

    fn residues() -> SymbolDescriptor {
        SymbolDescriptor::builder("Residues")
            .arg("name", BasicTypes::string(), "Residue name.")
            .returns(BasicTypes::pattern_seq())
            .build()
    }

    #[test]
    fn test_function_type_is_built_from_arguments() {
        assert_eq!(residues().function_type().to_string(), "String->PatternSeq");
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = SymbolRegistry::new().with(residues()).unwrap();

        let descriptor = registry.try_get_descriptor("rEsIdUeS").unwrap();
        assert_eq!(descriptor.name(), "Residues");
        assert!(registry.try_get_descriptor("Atoms").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = SymbolRegistry::new();
        registry.register(residues()).unwrap();

        let err = registry
            .register(SymbolDescriptor::builder("RESIDUES").build())
            .unwrap_err();
        assert_eq!(
            err,
            MetaQueryError::DuplicateSymbol {
                name: "RESIDUES".into()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_attribute_sets() {
        let set = SymbolAttributes::FLAT | SymbolAttributes::ORDERLESS;
        assert!(set.contains(SymbolAttributes::FLAT));
        assert!(set.contains(SymbolAttributes::ORDERLESS));
        assert!(!set.contains(SymbolAttributes::ONE_IDENTITY));
        assert!(SymbolAttributes::NONE.is_empty());
    }
}

//! Engine configuration
//!
//! ```toml
//! substitution = "capture_avoiding"
//! allow_free_variables = false
//! ```

use crate::error::{MetaQueryError, MetaResult};
use serde::Deserialize;

/// How `substitute_symbols` treats lambdas whose bound names collide with free
/// names of the substituted values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// Plain textual replacement; a colliding free name is captured by the lambda
    #[default]
    Literal,
    /// Colliding bound names are renamed before substituting
    CaptureAvoiding,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub substitution: SubstitutionMode,
    /// Compile symbols without a descriptor to free-variable references
    pub allow_free_variables: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            substitution: SubstitutionMode::Literal,
            allow_free_variables: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> MetaResult<Self> {
        toml::from_str(source).map_err(|e| MetaQueryError::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn with_substitution(mut self, mode: SubstitutionMode) -> Self {
        self.substitution = mode;
        self
    }

    pub fn with_free_variables(mut self, allow: bool) -> Self {
        self.allow_free_variables = allow;
        self
    }
}

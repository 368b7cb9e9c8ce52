//! MetaQuery
//!
//! A typed meta-expression engine for a small pattern query language.

// Allow clippy lints for development
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::uninlined_format_args)]
//!
//! ## Architecture
//!
//! Expressions are built through a [`MetaEnvironment`], which resolves symbols
//! against an explicit [`SymbolRegistry`]:
//!
//! - **Expression model**: an immutable tree of symbols, literals, tuples,
//!   lambdas, let bindings, assignments and applications, each with a type and
//!   a cached canonical string
//! - **Construction**: applications enforce the algebraic attributes of their
//!   symbol (`Flat`, `Orderless`, `OneIdentity`, `UniqueArgs`, `IgnoreEmpty`),
//!   fill in options and unify the declared signature with the arguments
//! - **Inference**: lambda and let scopes infer the types of their free names
//!   with a scoped name -> type environment
//! - **Substitution**: replaces free names, literally or capture-avoiding
//! - **Compilation**: turns a tree into an executable [`Query`], beta-reducing
//!   lambda applications and memoizing motives by canonical string
//!
//! ```
//! use metaquery::MetaEnvironment;
//!
//! let env = MetaEnvironment::standard();
//! let his = env.call("Residues", [env.create_value("HIS")]).unwrap();
//! let zn = env.call("Atoms", [env.create_value("Zn")]).unwrap();
//! let either = env.call("Or", [zn, his]).unwrap();
//!
//! assert_eq!(either.to_string(), "Or[Atoms[\"Zn\"],Residues[\"HIS\"]]");
//! assert_eq!(either.value_type().to_string(), "PatternSeq");
//! assert!(env.compile(&either).unwrap().is_motive());
//! ```

pub mod compiler;
pub mod config;
pub mod core_library;
pub mod environment;
pub mod error;
pub mod expr;
pub mod inference;
pub mod query;
pub mod registry;
pub mod substitution;
pub mod types;
pub mod unification;

// Re-export public API
pub use compiler::{CompileCache, Compiler};
pub use config::{EngineConfig, SubstitutionMode};
pub use environment::MetaEnvironment;
pub use error::{LambdaArgumentIssue, MetaQueryError, MetaResult};
pub use expr::{
    Expr, ExprKind, Literal, MetaApply, MetaAssign, MetaLambda, MetaLet, MetaSymbol, MetaTuple,
    ObjectValue,
};
pub use inference::TypeEnvironment;
pub use query::{CallQuery, CompiledQuery, Query};
pub use registry::{FunctionArgument, MetaOption, SymbolAttributes, SymbolDescriptor, SymbolRegistry};
pub use substitution::Bindings;
pub use types::{BasicTypes, TypeClass, TypeClasses, TypeExpression};
pub use unification::{unify, UnificationResult};

#[cfg(test)]
mod tests;

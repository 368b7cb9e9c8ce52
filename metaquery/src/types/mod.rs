//! Type system core components
//!
//! This module contains the type language used by meta-expressions:
//! - Type classes with single inheritance (`Integer` derives from `Number`, ...)
//! - Type expressions (variables, constants, tuples, arrows and repetitions)
//! - A builder for function signatures
//! - The standard classes and types shared by every registry

pub mod basic;
pub mod builder;
pub mod class;
pub mod expression;

// Re-export core types
pub use basic::{BasicTypes, TypeClasses};
pub use builder::FunctionTypeBuilder;
pub use class::TypeClass;
pub use expression::TypeExpression;

//! Error types for the meta-expression engine
//!
//! Every failure is raised while a node is being constructed, type-checked or
//! compiled; none of them depends on the data a compiled query later runs on.

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type MetaResult<T> = Result<T, MetaQueryError>;

/// Why a lambda argument was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaArgumentIssue {
    /// The argument is an expression, not a plain symbol
    NotASymbol,
    /// The argument names a registered built-in function
    BuiltIn,
    /// The same name is bound twice by one lambda
    Duplicate,
}

impl fmt::Display for LambdaArgumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotASymbol => write!(f, "only symbols can be lambda arguments"),
            Self::BuiltIn => write!(f, "it is a built-in function"),
            Self::Duplicate => write!(f, "it is bound more than once"),
        }
    }
}

/// Errors raised while building, typing or compiling meta-expressions
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum MetaQueryError {
    #[error("Cannot apply '{symbol}' to {arguments} :: '{argument_types}', expected type '{expected}'.")]
    #[diagnostic(
        code(metaquery::construct::arity_or_type_mismatch),
        help("Check the number and the types of the arguments passed to {symbol}")
    )]
    ArityOrTypeMismatch {
        symbol: String,
        arguments: String,
        argument_types: String,
        expected: String,
    },

    #[error("Cannot assign to expression '{target}' in {construct}. Only symbols can be assigned to.")]
    #[diagnostic(
        code(metaquery::construct::invalid_assignment_target),
        help("The left side of an assignment must be a plain symbol")
    )]
    InvalidAssignmentTarget { target: String, construct: String },

    #[error("There is no option '{option}' for symbol '{symbol}'.")]
    #[diagnostic(
        code(metaquery::construct::unknown_option),
        help("Remove the option or use one declared by {symbol}")
    )]
    UnknownOption { option: String, symbol: String },

    #[error("The option '{option}' for symbol '{symbol}' must have type '{expected}' but got '{found}' instead.")]
    #[diagnostic(code(metaquery::construct::option_type_mismatch))]
    OptionTypeMismatch {
        option: String,
        symbol: String,
        expected: String,
        found: String,
    },

    #[error("Expression '{argument}' cannot be used as a lambda argument: {issue}.")]
    #[diagnostic(
        code(metaquery::construct::illegal_lambda_argument),
        help("Lambda arguments must be distinct symbols that are not built-in functions")
    )]
    IllegalLambdaArgument {
        argument: String,
        issue: LambdaArgumentIssue,
    },

    #[error("Expression {expression} cannot be applied. Only Symbols and Lambdas can be applied.")]
    #[diagnostic(code(metaquery::construct::not_applicable))]
    NotApplicable { expression: String },

    #[error("Could not unify types '{expected}' and '{found}' of symbol '{symbol}'.")]
    #[diagnostic(
        code(metaquery::inference::unification_conflict),
        help("Every occurrence of '{symbol}' in one scope must have the same type")
    )]
    UnificationConflict {
        symbol: String,
        expected: String,
        found: String,
    },

    #[error("Expression '{expression}' cannot be compiled: {reason}")]
    #[diagnostic(code(metaquery::compile::uncompilable))]
    UncompilableExpression { expression: String, reason: String },

    #[error("Cannot retrieve {expected} value from '{expression}'.")]
    #[diagnostic(code(metaquery::value::access))]
    ValueAccess {
        expected: &'static str,
        expression: String,
    },

    #[error("Symbol '{name}' is already registered.")]
    #[diagnostic(
        code(metaquery::registry::duplicate_symbol),
        help("Symbol names are case-insensitive; pick a different name")
    )]
    DuplicateSymbol { name: String },

    #[error("Invalid engine configuration: {message}")]
    #[diagnostic(code(metaquery::config::invalid))]
    InvalidConfig { message: String },
}

impl MetaQueryError {
    pub fn uncompilable(expression: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::UncompilableExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    pub fn value_access(expected: &'static str, expression: impl fmt::Display) -> Self {
        Self::ValueAccess {
            expected,
            expression: expression.to_string(),
        }
    }
}

//! Standard type classes and types
//!
//! The class tree is built once per process and shared read-only:
//!
//! ```text
//! Any
//! ├── Pattern
//! ├── PatternSeq ── Atoms, Residues, Rings
//! ├── Value ── Number ── Integer, Real
//! │        ├── StaticMatrix, Bool, String, Symbol
//! └── List
//! ```

use crate::types::{TypeClass, TypeExpression};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    static ref PATTERN: Arc<TypeClass> = TypeClass::create("Pattern", None);
    static ref PATTERN_SEQ: Arc<TypeClass> = TypeClass::create("PatternSeq", None);
    static ref ATOMS: Arc<TypeClass> = TypeClass::create("Atoms", Some(PATTERN_SEQ.clone()));
    static ref RESIDUES: Arc<TypeClass> = TypeClass::create("Residues", Some(PATTERN_SEQ.clone()));
    static ref RINGS: Arc<TypeClass> = TypeClass::create("Rings", Some(PATTERN_SEQ.clone()));
    static ref VALUE: Arc<TypeClass> = TypeClass::create("Value", None);
    static ref NUMBER: Arc<TypeClass> = TypeClass::create("Number", Some(VALUE.clone()));
    static ref INTEGER: Arc<TypeClass> = TypeClass::create("Integer", Some(NUMBER.clone()));
    static ref REAL: Arc<TypeClass> = TypeClass::create("Real", Some(NUMBER.clone()));
    static ref STATIC_MATRIX: Arc<TypeClass> = TypeClass::create("StaticMatrix", Some(VALUE.clone()));
    static ref BOOL: Arc<TypeClass> = TypeClass::create("Bool", Some(VALUE.clone()));
    static ref STRING: Arc<TypeClass> = TypeClass::create("String", Some(VALUE.clone()));
    static ref SYMBOL: Arc<TypeClass> = TypeClass::create("Symbol", Some(VALUE.clone()));
    static ref LIST: Arc<TypeClass> = TypeClass::create("List", None);
}

/// Accessors for the standard type classes
pub struct TypeClasses;

impl TypeClasses {
    pub fn pattern() -> Arc<TypeClass> {
        PATTERN.clone()
    }

    pub fn pattern_seq() -> Arc<TypeClass> {
        PATTERN_SEQ.clone()
    }

    pub fn atoms() -> Arc<TypeClass> {
        ATOMS.clone()
    }

    pub fn residues() -> Arc<TypeClass> {
        RESIDUES.clone()
    }

    pub fn rings() -> Arc<TypeClass> {
        RINGS.clone()
    }

    pub fn value() -> Arc<TypeClass> {
        VALUE.clone()
    }

    pub fn number() -> Arc<TypeClass> {
        NUMBER.clone()
    }

    pub fn integer() -> Arc<TypeClass> {
        INTEGER.clone()
    }

    pub fn real() -> Arc<TypeClass> {
        REAL.clone()
    }

    pub fn static_matrix() -> Arc<TypeClass> {
        STATIC_MATRIX.clone()
    }

    pub fn bool() -> Arc<TypeClass> {
        BOOL.clone()
    }

    pub fn string() -> Arc<TypeClass> {
        STRING.clone()
    }

    pub fn symbol() -> Arc<TypeClass> {
        SYMBOL.clone()
    }

    pub fn list() -> Arc<TypeClass> {
        LIST.clone()
    }
}

/// Constant types of the standard classes
pub struct BasicTypes;

impl BasicTypes {
    pub fn any() -> TypeExpression {
        TypeExpression::constant(TypeClass::any())
    }

    pub fn pattern() -> TypeExpression {
        TypeExpression::constant(TypeClasses::pattern())
    }

    pub fn pattern_seq() -> TypeExpression {
        TypeExpression::constant(TypeClasses::pattern_seq())
    }

    pub fn atoms() -> TypeExpression {
        TypeExpression::constant(TypeClasses::atoms())
    }

    pub fn residues() -> TypeExpression {
        TypeExpression::constant(TypeClasses::residues())
    }

    pub fn rings() -> TypeExpression {
        TypeExpression::constant(TypeClasses::rings())
    }

    pub fn value() -> TypeExpression {
        TypeExpression::constant(TypeClasses::value())
    }

    pub fn number() -> TypeExpression {
        TypeExpression::constant(TypeClasses::number())
    }

    pub fn integer() -> TypeExpression {
        TypeExpression::constant(TypeClasses::integer())
    }

    pub fn real() -> TypeExpression {
        TypeExpression::constant(TypeClasses::real())
    }

    pub fn static_matrix() -> TypeExpression {
        TypeExpression::constant(TypeClasses::static_matrix())
    }

    pub fn bool() -> TypeExpression {
        TypeExpression::constant(TypeClasses::bool())
    }

    pub fn string() -> TypeExpression {
        TypeExpression::constant(TypeClasses::string())
    }

    pub fn symbol() -> TypeExpression {
        TypeExpression::constant(TypeClasses::symbol())
    }

    pub fn list() -> TypeExpression {
        TypeExpression::constant(TypeClasses::list())
    }
}

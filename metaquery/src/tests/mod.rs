//! Tests for construction, inference, substitution and compilation of
//! meta-expressions

#![allow(clippy::assertions_on_constants)]

// Node model
mod test_canonical_string;


mod test_substitution;

// Built-in table and full round trips
mod test_end_to_end;

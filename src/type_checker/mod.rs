//! Type checking module (pass 3).
//!
//! This module computes a type for every expression of the resolved AST and
//! stores it in the expression's `ty` slot while:
//!
//! - Checking operator operands
//! - Checking assignments, initializers and returns against declared types
//! - Matching call arguments positionally against the callee's parameters
//! - Verifying that classes implement the interfaces they use
//!
//! Problems are reported to the compilation context and checking carries on
//! with a fallback type.

pub mod type_checker;

#[cfg(test)]
mod tests;

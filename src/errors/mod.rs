//! Error types for the fatal stages of the front end.
//!
//! Tokenizing and parsing stop at the first problem they find, so they
//! report through the [`errors::Error`] type defined here, which carries:
//!
//! - The specific error variant
//! - The source position it was raised at
//! - A short suggestion for the user
//!
//! Semantic problems are not fatal and are collected as diagnostics in
//! [`crate::semantics::diagnostics`] instead.

pub mod errors;

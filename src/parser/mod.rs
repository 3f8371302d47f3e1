//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`crate::ast::ast::Program`]. It handles:
//!
//! - Declaration parsing (classes, interfaces, functions, globals)
//! - Statement parsing (blocks, control flow, assignments, calls)
//! - Expression parsing with explicit operator and operand stacks
//! - Type parsing for annotations
//!
//! Parsing is fail-fast: the first structural error aborts with an
//! [`crate::errors::errors::Error`] that names the found and expected token.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

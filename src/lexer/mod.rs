//! Lexical analysis module for the front end.
//!
//! The parser only ever asks for "the next token" through the
//! [`source::TokenSource`] trait. This module provides two sources:
//!
//! - [`lexer::Lexer`], a regex driven tokenizer that lexes lazily
//! - [`source::TokenStream`], which replays a pre-built token vector
//!
//! The lexer recognises keywords, identifiers, literals and operators,
//! tracks 1-based row/column positions and skips whitespace and `//`
//! comments.

pub mod lexer;
pub mod source;
pub mod tokens;

#[cfg(test)]
mod tests;

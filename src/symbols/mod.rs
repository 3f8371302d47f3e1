//! Symbol model shared by the analysis passes.
//!
//! Classes, interfaces, functions, variables and scopes live in index
//! arenas owned by [`symbol_program::SymbolProgram`]. AST nodes refer to
//! them through the copyable ids in [`binding`], so the scope tree's parent
//! links are plain indices rather than references.

pub mod binding;
pub mod scope;
pub mod symbol_program;

#[cfg(test)]
mod tests;

/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Declarations and identifiers
/// - expressions: Definitions for the expression kinds
/// - statements: Definitions for the statement kinds
/// - types: Type syntax and semantic types
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

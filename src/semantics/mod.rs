//! Semantic analysis: the symbol table builder (pass 1), the name
//! resolver (pass 2) and the diagnostics they share.
//!
//! [`analyze`] runs all three passes, including the type checker, in order
//! over one compilation unit.

pub mod builder;
pub mod builtins;
pub mod context;
pub mod diagnostics;
pub mod resolver;


use log::info;

use crate::{ast::ast::Program, symbols::symbol_program::SymbolProgram, type_checker};

use self::context::CompilationContext;

/// Builds the symbol tables, resolves names and checks types. Diagnostics
/// accumulate in `context`; the returned tables describe the whole unit.
pub fn analyze(program: &mut Program, context: &mut CompilationContext) -> SymbolProgram {
    let symbols = builder::build_symbols(program, context);
    resolver::resolve_names(program, &symbols, context);
    type_checker::type_checker::check_types(program, &symbols, context);

    info!(
        "analysis finished: {} errors, {} warnings",
        context.error_count(),
        context.warning_count()
    );

    symbols
}

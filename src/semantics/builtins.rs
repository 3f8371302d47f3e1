//! Functions every program can call without declaring them.

use log::debug;

use crate::{
    ast::types::Type,
    symbols::{
        scope::ScopeKind,
        symbol_program::{FunctionOwner, SymbolFunction, SymbolProgram, SymbolVariable},
    },
    Position,
};

use super::context::CompilationContext;

struct Builtin {
    name: &'static str,
    parameters: Vec<(&'static str, Type)>,
    return_type: Type,
}

fn builtins() -> Vec<Builtin> {
    vec![
        Builtin {
            name: "print",
            parameters: vec![("value", Type::String)],
            return_type: Type::Void,
        },
        Builtin {
            name: "read_line",
            parameters: vec![],
            return_type: Type::String,
        },
        Builtin {
            name: "random",
            parameters: vec![("min", Type::Int), ("max", Type::Int)],
            return_type: Type::Int,
        },
        Builtin {
            name: "to_int",
            parameters: vec![("value", Type::String)],
            return_type: Type::Int,
        },
        Builtin {
            name: "to_string",
            parameters: vec![("value", Type::Int)],
            return_type: Type::String,
        },
    ]
}

/// Adds the built-in functions to a fresh symbol program. Each one gets a
/// function scope for its parameters like a declared function would.
pub fn register(program: &mut SymbolProgram, context: &mut CompilationContext) {
    let builtins = builtins();

    for builtin in &builtins {
        let scope = program.add_scope(ScopeKind::Function, program.root());

        let parameters = builtin
            .parameters
            .iter()
            .map(|(name, ty)| {
                let ordinal = context.next_ordinal();
                program
                    .declare_variable(SymbolVariable {
                        name: name.to_string(),
                        ty: ty.clone(),
                        ordinal,
                        position: Position::null(),
                        scope,
                    })
                    .id()
            })
            .collect();

        let ordinal = context.next_ordinal();
        program.add_function(
            SymbolFunction {
                name: builtin.name.to_string(),
                parameters,
                return_type: builtin.return_type.clone(),
                ordinal,
                position: Position::null(),
                class: None,
                scope: Some(scope),
                builtin: true,
            },
            FunctionOwner::Builtin,
        );
    }

    debug!("registered {} built-in functions", builtins.len());
}

//! Pass 1: builds the symbol tables and the scope tree.
//!
//! Declarations are visited in source order. Every name is inserted into
//! the table that owns it with its declared type computed structurally from
//! the type syntax, so forward references need no special handling. A
//! duplicate is reported and the first declaration stays reachable.
//!
//! Scopes are created for every class (properties), function (arguments),
//! function body, nested block and `for` header, and their ids are stored
//! on the AST for the later passes.

use std::collections::HashMap;

use log::{debug, info};

use crate::{
    ast::{
        ast::{Argument, Class, Declaration, Function, Identifier, Interface, Program, Variable},
        statements::{Block, Stmt, StmtKind},
        types::{Type, TypeNode},
    },
    symbols::{
        binding::{FunctionId, ScopeId, VariableId},
        scope::ScopeKind,
        symbol_program::{
            FunctionOwner, Insertion, SymbolClass, SymbolFunction, SymbolInterface,
            SymbolProgram, SymbolVariable,
        },
    },
};

use super::{builtins, context::CompilationContext, diagnostics::DiagnosticKind};

pub struct SymbolBuilder<'a> {
    pub symbols: SymbolProgram,
    pub context: &'a mut CompilationContext,
    /// Name of the function whose body is being visited.
    function: Option<String>,
}

/// Runs pass 1 over `program`. Never fails; problems go to `context`.
pub fn build_symbols(program: &mut Program, context: &mut CompilationContext) -> SymbolProgram {
    info!("building symbol tables for {} declarations", program.declarations.len());

    let mut symbols = SymbolProgram::new();
    builtins::register(&mut symbols, context);

    let mut builder = SymbolBuilder {
        symbols,
        context,
        function: None,
    };

    for declaration in program.declarations.iter_mut() {
        match declaration {
            Declaration::Class(class) => build_class(&mut builder, class),
            Declaration::Interface(interface) => build_interface(&mut builder, interface),
            Declaration::Function(function) => {
                let root = builder.symbols.root();
                build_function(&mut builder, function, root, FunctionOwner::Program);
            }
            Declaration::Variable(variable) => build_global(&mut builder, variable),
        }
    }

    info!(
        "symbol tables built: {} scopes, {} errors so far",
        builder.symbols.scope_count(),
        builder.context.error_count()
    );

    builder.symbols
}

fn declare(
    builder: &mut SymbolBuilder,
    name: &Identifier,
    ty: Type,
    scope: ScopeId,
) -> Insertion<VariableId> {
    let ordinal = builder.context.next_ordinal();
    builder.symbols.declare_variable(SymbolVariable {
        name: name.name.clone(),
        ty,
        ordinal,
        position: name.token.position,
        scope,
    })
}

pub fn build_class(builder: &mut SymbolBuilder, class: &mut Class) {
    let root = builder.symbols.root();
    let scope = builder.symbols.add_scope(ScopeKind::Class, root);
    debug!("class {} opens scope {}", class.name.name, scope.index());

    let ordinal = builder.context.next_ordinal();
    let insertion = builder.symbols.add_class(SymbolClass {
        name: class.name.name.clone(),
        parent: class.parent.as_ref().map(|parent| parent.name.clone()),
        interfaces: class.interfaces.iter().map(|i| i.name.clone()).collect(),
        functions: HashMap::new(),
        scope,
        ordinal,
        position: class.name.token.position,
    });

    if insertion.is_duplicate() {
        builder.context.add_error(
            class.token.position,
            DiagnosticKind::ClassAlreadyDefined {
                class: class.name.name.clone(),
            },
        );
    }

    class.scope = Some(scope);

    for property in &class.properties {
        if declare(builder, &property.name, property.ty.to_type(), scope).is_duplicate() {
            builder.context.add_error(
                property.name.token.position,
                DiagnosticKind::PropertyAlreadyDefined {
                    property: property.name.name.clone(),
                    class: class.name.name.clone(),
                },
            );
        }
    }

    let owner = FunctionOwner::Class(insertion.id());
    for function in class.functions.iter_mut() {
        build_function(builder, function, scope, owner);
    }
}

pub fn build_interface(builder: &mut SymbolBuilder, interface: &Interface) {
    let ordinal = builder.context.next_ordinal();
    let insertion = builder.symbols.add_interface(SymbolInterface {
        name: interface.name.name.clone(),
        extends: interface.extends.iter().map(|e| e.name.clone()).collect(),
        functions: vec![],
        ordinal,
        position: interface.name.token.position,
    });

    if insertion.is_duplicate() {
        builder.context.add_error(
            interface.token.position,
            DiagnosticKind::InterfaceAlreadyDefined {
                interface: interface.name.name.clone(),
            },
        );
    }

    let root = builder.symbols.root();
    let owner = FunctionOwner::Interface(insertion.id());

    for signature in &interface.functions {
        let (_, function) = declare_function(
            builder,
            &signature.name,
            &signature.arguments,
            &signature.return_type,
            root,
            owner,
        );

        if function.is_duplicate() {
            builder.context.add_error(
                signature.token.position,
                DiagnosticKind::SignatureAlreadyDefined {
                    function: signature.name.name.clone(),
                    interface: interface.name.name.clone(),
                },
            );
        }
    }
}

/// Creates the argument scope, declares the arguments into it and adds the
/// function to the table of `owner`.
fn declare_function(
    builder: &mut SymbolBuilder,
    name: &Identifier,
    arguments: &[Argument],
    return_type: &TypeNode,
    parent: ScopeId,
    owner: FunctionOwner,
) -> (ScopeId, Insertion<FunctionId>) {
    let scope = builder.symbols.add_scope(ScopeKind::Function, parent);
    debug!("function {} opens scope {}", name.name, scope.index());

    let mut parameters = Vec::with_capacity(arguments.len());
    for argument in arguments {
        let insertion = declare(builder, &argument.name, argument.ty.to_type(), scope);

        if insertion.is_duplicate() {
            builder.context.add_error(
                argument.name.token.position,
                DiagnosticKind::ArgumentAlreadyDefined {
                    argument: argument.name.name.clone(),
                    function: name.name.clone(),
                },
            );
        }

        parameters.push(insertion.id());
    }

    let class = match owner {
        FunctionOwner::Class(class) => Some(class),
        _ => None,
    };

    let ordinal = builder.context.next_ordinal();
    let insertion = builder.symbols.add_function(
        SymbolFunction {
            name: name.name.clone(),
            parameters,
            return_type: return_type.to_type(),
            ordinal,
            position: name.token.position,
            class,
            scope: Some(scope),
            builtin: false,
        },
        owner,
    );

    (scope, insertion)
}

pub fn build_function(
    builder: &mut SymbolBuilder,
    function: &mut Function,
    parent: ScopeId,
    owner: FunctionOwner,
) {
    let (scope, insertion) = declare_function(
        builder,
        &function.name,
        &function.arguments,
        &function.return_type,
        parent,
        owner,
    );

    if insertion.is_duplicate() {
        let kind = match owner {
            FunctionOwner::Class(class) => DiagnosticKind::MethodAlreadyDefined {
                function: function.name.name.clone(),
                class: builder.symbols.class(class).name.clone(),
            },
            _ => DiagnosticKind::FunctionAlreadyDefined {
                function: function.name.name.clone(),
            },
        };
        builder.context.add_error(function.token.position, kind);
    }

    function.scope = Some(scope);

    let previous = builder.function.replace(function.name.name.clone());
    build_block(builder, &mut function.body, scope);
    builder.function = previous;
}

fn build_global(builder: &mut SymbolBuilder, variable: &Variable) {
    let root = builder.symbols.root();

    if declare(builder, &variable.name, variable.ty.to_type(), root).is_duplicate() {
        builder.context.add_error(
            variable.name.token.position,
            DiagnosticKind::VariableAlreadyDefined {
                variable: variable.name.name.clone(),
            },
        );
    }
}

fn build_local(builder: &mut SymbolBuilder, variable: &Variable, scope: ScopeId) {
    if !declare(builder, &variable.name, variable.ty.to_type(), scope).is_duplicate() {
        return;
    }

    let kind = match &builder.function {
        Some(function) => DiagnosticKind::LocalAlreadyDefined {
            variable: variable.name.name.clone(),
            function: function.clone(),
        },
        None => DiagnosticKind::VariableAlreadyDefined {
            variable: variable.name.name.clone(),
        },
    };
    builder.context.add_error(variable.name.token.position, kind);
}

pub fn build_block(builder: &mut SymbolBuilder, block: &mut Block, parent: ScopeId) {
    let scope = builder.symbols.add_scope(ScopeKind::Block, parent);
    block.scope = Some(scope);

    for stmt in block.statements.iter_mut() {
        build_stmt(builder, stmt, scope);
    }
}

pub fn build_stmt(builder: &mut SymbolBuilder, stmt: &mut Stmt, scope: ScopeId) {
    match &mut stmt.kind {
        StmtKind::Block(block) => build_block(builder, block, scope),
        StmtKind::If {
            branches,
            otherwise,
        } => {
            for branch in branches.iter_mut() {
                build_body(builder, &mut branch.body, scope);
            }
            if let Some(otherwise) = otherwise {
                build_body(builder, otherwise, scope);
            }
        }
        StmtKind::While { body, .. } => build_body(builder, body, scope),
        StmtKind::For {
            init,
            update,
            body,
            scope: header,
            ..
        } => {
            let for_scope = builder.symbols.add_scope(ScopeKind::Block, scope);
            *header = Some(for_scope);

            build_local(builder, init, for_scope);
            build_stmt(builder, update, for_scope);
            build_body(builder, body, for_scope);
        }
        StmtKind::VarDecl(variable) => build_local(builder, variable, scope),
        StmtKind::Assign { .. }
        | StmtKind::ArrayAssign { .. }
        | StmtKind::Increment(_)
        | StmtKind::Return(_)
        | StmtKind::Call(_)
        | StmtKind::Skip => {}
    }
}

/// Builds the body of a branch or loop. A braced body gets its scope from
/// the block; any other statement gets a block scope of its own.
fn build_body(builder: &mut SymbolBuilder, body: &mut Stmt, parent: ScopeId) {
    if matches!(body.kind, StmtKind::Block(_)) {
        build_stmt(builder, body, parent);
        return;
    }

    let scope = builder.symbols.add_scope(ScopeKind::Block, parent);
    debug!("unbraced body at {} opens scope {}", body.token.position, scope.index());
    body.scope = Some(scope);
    build_stmt(builder, body, scope);
}

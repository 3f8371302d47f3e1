//! Pass 2: binds every name in the AST to its symbol.
//!
//! Uses walk the scope chain stored on the AST by pass 1. Names that cannot
//! be found are reported once at their token and keep a `None` binding.
//! Calls on a receiver whose class is not known from the receiver's syntax
//! are left for the type checker.

use std::collections::HashSet;

use log::{debug, info};

use crate::{
    ast::{
        ast::{Class, Declaration, Function, Identifier, Interface, Program, Variable},
        expressions::{Expr, ExprKind, FunctionCall},
        statements::{Block, Stmt, StmtKind},
        types::{Type, TypeNode, TypeNodeKind},
    },
    symbols::{
        binding::{Binding, ClassId, FunctionId, ScopeId},
        symbol_program::SymbolProgram,
    },
};

use super::{context::CompilationContext, diagnostics::DiagnosticKind};

pub struct NameResolver<'a> {
    pub symbols: &'a SymbolProgram,
    pub context: &'a mut CompilationContext,
    class: Option<ClassId>,
    function: Option<FunctionId>,
    processed_classes: HashSet<String>,
    processed_interfaces: HashSet<String>,
    processed_functions: HashSet<String>,
}

/// Runs pass 2 over `program`.
pub fn resolve_names(
    program: &mut Program,
    symbols: &SymbolProgram,
    context: &mut CompilationContext,
) {
    info!("resolving names");
    let errors_before = context.error_count();

    let mut resolver = NameResolver {
        symbols,
        context,
        class: None,
        function: None,
        processed_classes: HashSet::new(),
        processed_interfaces: HashSet::new(),
        processed_functions: HashSet::new(),
    };

    let root = symbols.root();
    for declaration in program.declarations.iter_mut() {
        match declaration {
            Declaration::Class(class) => resolve_class(&mut resolver, class),
            Declaration::Interface(interface) => resolve_interface(&mut resolver, interface),
            Declaration::Function(function) => resolve_function(&mut resolver, function),
            Declaration::Variable(variable) => resolve_variable(&mut resolver, variable, root),
        }
    }

    info!(
        "names resolved with {} new errors",
        resolver.context.error_count() - errors_before
    );
}

pub fn resolve_class(resolver: &mut NameResolver, class: &mut Class) {
    if !resolver.processed_classes.insert(class.name.name.clone()) {
        debug!("skipping duplicate class {}", class.name.name);
        return;
    }

    let Some(scope) = class.scope else {
        return;
    };

    let class_id = resolver.symbols.scope(scope).class;
    class.name.binding = class_id.map(Binding::Class);

    if let Some(parent) = &mut class.parent {
        match resolver.symbols.lookup_class(&parent.name) {
            Some(id) => parent.binding = Some(Binding::Class(id)),
            None => resolver.context.add_error(
                parent.token.position,
                DiagnosticKind::ClassNotDeclared {
                    class: parent.name.clone(),
                },
            ),
        }
    }

    if let Some(id) = class_id {
        if resolver.symbols.has_inheritance_cycle(id) {
            resolver.context.add_error(
                class.name.token.position,
                DiagnosticKind::InheritanceCycle {
                    class: class.name.name.clone(),
                },
            );
        }
    }

    for interface in class.interfaces.iter_mut() {
        match resolver.symbols.lookup_interface(&interface.name) {
            Some(id) => interface.binding = Some(Binding::Interface(id)),
            None => resolver.context.add_error(
                interface.token.position,
                DiagnosticKind::InterfaceNotDeclared {
                    interface: interface.name.clone(),
                },
            ),
        }
    }

    let previous_class = std::mem::replace(&mut resolver.class, class_id);
    let previous_functions = std::mem::take(&mut resolver.processed_functions);

    for property in class.properties.iter_mut() {
        resolve_type(resolver, &mut property.ty);
        if let Some(initializer) = &mut property.initializer {
            resolve_expr(resolver, initializer, scope);
        }
        property.name.binding = resolver
            .symbols
            .scope(scope)
            .get(&property.name.name)
            .map(Binding::Variable);
    }

    for function in class.functions.iter_mut() {
        resolve_function(resolver, function);
    }

    resolver.processed_functions = previous_functions;
    resolver.class = previous_class;
}

pub fn resolve_interface(resolver: &mut NameResolver, interface: &mut Interface) {
    if !resolver.processed_interfaces.insert(interface.name.name.clone()) {
        debug!("skipping duplicate interface {}", interface.name.name);
        return;
    }

    let interface_id = resolver.symbols.lookup_interface(&interface.name.name);
    interface.name.binding = interface_id.map(Binding::Interface);

    for parent in interface.extends.iter_mut() {
        match resolver.symbols.lookup_interface(&parent.name) {
            Some(id) => parent.binding = Some(Binding::Interface(id)),
            None => resolver.context.add_error(
                parent.token.position,
                DiagnosticKind::InterfaceNotDeclared {
                    interface: parent.name.clone(),
                },
            ),
        }
    }

    for signature in interface.functions.iter_mut() {
        for argument in signature.arguments.iter_mut() {
            resolve_type(resolver, &mut argument.ty);
        }
        resolve_type(resolver, &mut signature.return_type);

        let Some(function) = interface_id.and_then(|id| {
            resolver
                .symbols
                .interface(id)
                .functions
                .iter()
                .copied()
                .find(|f| resolver.symbols.function(*f).name == signature.name.name)
        }) else {
            continue;
        };

        signature.name.binding = Some(Binding::Function(function));
        let parameters = &resolver.symbols.function(function).parameters;
        for (argument, parameter) in signature.arguments.iter_mut().zip(parameters) {
            argument.name.binding = Some(Binding::Variable(*parameter));
        }
    }
}

pub fn resolve_function(resolver: &mut NameResolver, function: &mut Function) {
    if !resolver.processed_functions.insert(function.name.name.clone()) {
        debug!("skipping duplicate function {}", function.name.name);
        return;
    }

    let Some(scope) = function.scope else {
        return;
    };

    let function_id = resolver.symbols.scope(scope).function;
    function.name.binding = function_id.map(Binding::Function);

    let previous = std::mem::replace(&mut resolver.function, function_id);

    for argument in function.arguments.iter_mut() {
        resolve_type(resolver, &mut argument.ty);
        argument.name.binding = resolver
            .symbols
            .scope(scope)
            .get(&argument.name.name)
            .map(Binding::Variable);
    }
    resolve_type(resolver, &mut function.return_type);

    resolve_block(resolver, &mut function.body);

    if let Some(return_expr) = &mut function.return_expr {
        let body_scope = function.body.scope.unwrap_or(scope);
        resolve_expr(resolver, return_expr, body_scope);
    }

    resolver.function = previous;
}

/// Resolves a declaration's type and initializer, then binds its name to
/// the entry declared in `scope`.
fn resolve_variable(resolver: &mut NameResolver, variable: &mut Variable, scope: ScopeId) {
    resolve_type(resolver, &mut variable.ty);

    if let Some(initializer) = &mut variable.initializer {
        resolve_expr(resolver, initializer, scope);
    }

    variable.name.binding = resolver
        .symbols
        .scope(scope)
        .get(&variable.name.name)
        .map(Binding::Variable);
}

pub fn resolve_type(resolver: &mut NameResolver, ty: &mut TypeNode) {
    match &mut ty.kind {
        TypeNodeKind::Identifier(name) => resolve_type_name(resolver, name),
        TypeNodeKind::Function {
            parameters,
            return_type,
        } => {
            for parameter in parameters.iter_mut() {
                resolve_type(resolver, parameter);
            }
            resolve_type(resolver, return_type);
        }
        TypeNodeKind::Parameterized { name, arguments } => {
            resolve_type_name(resolver, name);
            for argument in arguments.iter_mut() {
                resolve_type(resolver, argument);
            }
        }
        TypeNodeKind::Int
        | TypeNodeKind::String
        | TypeNodeKind::Boolean
        | TypeNodeKind::Void
        | TypeNodeKind::IntArray
        | TypeNodeKind::StringArray => {}
    }
}

fn resolve_type_name(resolver: &mut NameResolver, name: &mut Identifier) {
    if let Some(class) = resolver.symbols.lookup_class(&name.name) {
        name.binding = Some(Binding::Class(class));
    } else if let Some(interface) = resolver.symbols.lookup_interface(&name.name) {
        name.binding = Some(Binding::Interface(interface));
    } else {
        resolver.context.add_error(
            name.token.position,
            DiagnosticKind::TypeNotDeclared {
                name: name.name.clone(),
            },
        );
    }
}

fn resolve_variable_use(resolver: &mut NameResolver, name: &mut Identifier, scope: ScopeId) {
    match resolver.symbols.lookup_variable(scope, &name.name) {
        Some(variable) => {
            debug!("{} at {} bound to variable {}", name.name, name.token.position, variable.index());
            name.binding = Some(Binding::Variable(variable));
        }
        None => resolver.context.add_error(
            name.token.position,
            DiagnosticKind::VariableNotDeclared {
                variable: name.name.clone(),
            },
        ),
    }
}

pub fn resolve_block(resolver: &mut NameResolver, block: &mut Block) {
    let Some(scope) = block.scope else {
        return;
    };

    for stmt in block.statements.iter_mut() {
        resolve_stmt(resolver, stmt, scope);
    }
}

pub fn resolve_stmt(resolver: &mut NameResolver, stmt: &mut Stmt, scope: ScopeId) {
    let scope = stmt.scope.unwrap_or(scope);

    match &mut stmt.kind {
        StmtKind::Block(block) => resolve_block(resolver, block),
        StmtKind::If {
            branches,
            otherwise,
        } => {
            for branch in branches.iter_mut() {
                resolve_expr(resolver, &mut branch.condition, scope);
                resolve_stmt(resolver, &mut branch.body, scope);
            }
            if let Some(otherwise) = otherwise {
                resolve_stmt(resolver, otherwise, scope);
            }
        }
        StmtKind::While { condition, body } => {
            resolve_expr(resolver, condition, scope);
            resolve_stmt(resolver, body, scope);
        }
        StmtKind::For {
            init,
            condition,
            update,
            body,
            scope: header,
        } => {
            let scope = header.unwrap_or(scope);
            resolve_variable(resolver, init, scope);
            resolve_expr(resolver, condition, scope);
            resolve_stmt(resolver, update, scope);
            resolve_stmt(resolver, body, scope);
        }
        StmtKind::Assign { target, value } => {
            resolve_variable_use(resolver, target, scope);
            resolve_expr(resolver, value, scope);
        }
        StmtKind::ArrayAssign {
            target,
            index,
            value,
        } => {
            resolve_variable_use(resolver, target, scope);
            resolve_expr(resolver, index, scope);
            resolve_expr(resolver, value, scope);
        }
        StmtKind::Increment(target) => resolve_variable_use(resolver, target, scope),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                resolve_expr(resolver, value, scope);
            }
        }
        StmtKind::Call(call) => resolve_expr(resolver, call, scope),
        StmtKind::VarDecl(variable) => resolve_variable(resolver, variable, scope),
        StmtKind::Skip => {}
    }
}

pub fn resolve_expr(resolver: &mut NameResolver, expr: &mut Expr, scope: ScopeId) {
    match &mut expr.kind {
        ExprKind::IntLiteral(_) | ExprKind::StringLiteral(_) | ExprKind::BoolLiteral(_) => {}
        ExprKind::Identifier(name) => resolve_variable_use(resolver, name, scope),
        ExprKind::Binary { left, right, .. } => {
            resolve_expr(resolver, left, scope);
            resolve_expr(resolver, right, scope);
        }
        ExprKind::Increment(inner) => resolve_expr(resolver, inner, scope),
        ExprKind::NewArray { length, .. } => resolve_expr(resolver, length, scope),
        ExprKind::NewInstance(class) => match resolver.symbols.lookup_class(&class.name) {
            Some(id) => class.binding = Some(Binding::Class(id)),
            None => resolver.context.add_error(
                class.token.position,
                DiagnosticKind::TypeNotDeclared {
                    name: class.name.clone(),
                },
            ),
        },
        ExprKind::ArrayIndex { array, index } => {
            resolve_expr(resolver, array, scope);
            resolve_expr(resolver, index, scope);
        }
        ExprKind::ArrayLiteral(elements) => {
            for element in elements.iter_mut() {
                resolve_expr(resolver, element, scope);
            }
        }
        ExprKind::Call(call) => resolve_call(resolver, call, scope),
    }
}

fn resolve_call(resolver: &mut NameResolver, call: &mut FunctionCall, scope: ScopeId) {
    if let Some(receiver) = &mut call.receiver {
        resolve_expr(resolver, receiver, scope);
    }
    for argument in call.arguments.iter_mut() {
        resolve_expr(resolver, argument, scope);
    }

    let Some(receiver) = &call.receiver else {
        match resolver
            .symbols
            .lookup_function(&call.name.name, resolver.class)
        {
            Some(function) => call.name.binding = Some(Binding::Function(function)),
            None => resolver.context.add_error(
                call.name.token.position,
                DiagnosticKind::FunctionNotDeclared {
                    function: call.name.name.clone(),
                },
            ),
        }
        return;
    };

    let Some(owner) = receiver_owner(resolver.symbols, receiver) else {
        debug!("deferring call {} to the type checker", call.name.name);
        return;
    };

    let (function, owner_name) = match owner {
        Binding::Class(class) => (
            resolver.symbols.lookup_method(class, &call.name.name),
            resolver.symbols.class(class).name.clone(),
        ),
        Binding::Interface(interface) => (
            resolver
                .symbols
                .lookup_interface_function(interface, &call.name.name),
            resolver.symbols.interface(interface).name.clone(),
        ),
        Binding::Function(_) | Binding::Variable(_) => return,
    };

    match function {
        Some(function) => call.name.binding = Some(Binding::Function(function)),
        None => resolver.context.add_error(
            call.name.token.position,
            DiagnosticKind::MethodNotDeclared {
                function: call.name.name.clone(),
                owner: owner_name,
            },
        ),
    }
}

/// The class or interface a receiver is known to be from its syntax alone:
/// a variable of class or interface type, or a `new` expression.
fn receiver_owner(symbols: &SymbolProgram, receiver: &Expr) -> Option<Binding> {
    match &receiver.kind {
        ExprKind::Identifier(name) => {
            let variable = name.binding?.as_variable()?;
            let Type::Identifier(type_name) = &symbols.variable(variable).ty else {
                return None;
            };

            symbols
                .lookup_class(type_name)
                .map(Binding::Class)
                .or_else(|| symbols.lookup_interface(type_name).map(Binding::Interface))
        }
        ExprKind::NewInstance(class) => class.binding,
        _ => None,
    }
}

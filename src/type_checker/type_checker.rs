use std::collections::HashSet;

use log::{debug, info};

use crate::{
    ast::{
        ast::{Class, Declaration, Function, Identifier, Program, Variable},
        expressions::{BinaryOp, Expr, ExprKind, FunctionCall},
        statements::{Stmt, StmtKind},
        types::{Type, TypeNode},
    },
    semantics::{context::CompilationContext, diagnostics::DiagnosticKind},
    symbols::{
        binding::{Binding, ClassId, FunctionId},
        symbol_program::SymbolProgram,
    },
    Position,
};

#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub symbols: &'a SymbolProgram,
    pub context: &'a mut CompilationContext,
    pub class: Option<ClassId>,
    pub function: Option<FunctionId>,
    processed_classes: HashSet<String>,
    processed_functions: HashSet<String>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolProgram, context: &'a mut CompilationContext) -> Self {
        TypeChecker {
            symbols,
            context,
            class: None,
            function: None,
            processed_classes: HashSet::new(),
            processed_functions: HashSet::new(),
        }
    }

    /// Type of the variable an identifier is bound to.
    fn variable_type(&self, name: &Identifier) -> Option<Type> {
        let variable = name.binding?.as_variable()?;
        Some(self.symbols.variable(variable).ty.clone())
    }

    fn current_function_name(&self) -> String {
        self.function
            .map(|f| self.symbols.function(f).name.clone())
            .unwrap_or_default()
    }
}

/// Runs pass 3 over `program`. Every visited expression gets its type
/// stored in its `ty` slot. Running it again yields the same types.
pub fn check_types(
    program: &mut Program,
    symbols: &SymbolProgram,
    context: &mut CompilationContext,
) {
    info!("checking types");
    let errors_before = context.error_count();

    let mut checker = TypeChecker::new(symbols, context);

    for declaration in program.declarations.iter_mut() {
        match declaration {
            Declaration::Class(class) => type_check_class(&mut checker, class),
            Declaration::Function(function) => type_check_function(&mut checker, function),
            Declaration::Variable(variable) => type_check_variable(&mut checker, variable),
            Declaration::Interface(_) => {}
        }
    }

    info!(
        "types checked with {} new errors",
        checker.context.error_count() - errors_before
    );
}

pub fn type_check_class(type_checker: &mut TypeChecker, class: &mut Class) {
    if !type_checker.processed_classes.insert(class.name.name.clone()) {
        debug!("skipping duplicate class {}", class.name.name);
        return;
    }

    let class_id = class
        .scope
        .and_then(|scope| type_checker.symbols.scope(scope).class);

    let previous_class = std::mem::replace(&mut type_checker.class, class_id);
    let previous_functions = std::mem::take(&mut type_checker.processed_functions);

    for property in class.properties.iter_mut() {
        type_check_initializer(
            type_checker,
            &property.name,
            &property.ty,
            property.initializer.as_mut(),
        );
    }

    for function in class.functions.iter_mut() {
        type_check_function(type_checker, function);
    }

    type_checker.processed_functions = previous_functions;

    if let Some(class_id) = class_id {
        type_check_interfaces(type_checker, class, class_id);
    }

    type_checker.class = previous_class;
}

/// Every function of every interface the class uses, including the ones
/// those interfaces extend, must be defined with the same type.
fn type_check_interfaces(type_checker: &mut TypeChecker, class: &Class, class_id: ClassId) {
    let symbols = type_checker.symbols;
    let mut visited = HashSet::new();

    for used in &class.interfaces {
        let Some(used) = symbols.lookup_interface(&used.name) else {
            continue;
        };

        for interface_id in symbols.interface_closure(used) {
            if !visited.insert(interface_id) {
                continue;
            }
            let interface = symbols.interface(interface_id);

            for &signature in &interface.functions {
                let name = &symbols.function(signature).name;

                match symbols.lookup_method(class_id, name) {
                    None => type_checker.context.add_error(
                        class.name.token.position,
                        DiagnosticKind::MissingInterfaceFunction {
                            class: class.name.name.clone(),
                            function: name.clone(),
                            interface: interface.name.clone(),
                        },
                    ),
                    Some(method) => {
                        if symbols.function_type(method) != symbols.function_type(signature) {
                            type_checker.context.add_error(
                                symbols.function(method).position,
                                DiagnosticKind::InterfaceFunctionMismatch {
                                    class: class.name.name.clone(),
                                    function: name.clone(),
                                    interface: interface.name.clone(),
                                },
                            );
                        }
                    }
                }
            }
        }
    }
}

pub fn type_check_function(type_checker: &mut TypeChecker, function: &mut Function) {
    if !type_checker
        .processed_functions
        .insert(function.name.name.clone())
    {
        debug!("skipping duplicate function {}", function.name.name);
        return;
    }

    let function_id = function
        .scope
        .and_then(|scope| type_checker.symbols.scope(scope).function);
    let previous = std::mem::replace(&mut type_checker.function, function_id);

    for stmt in function.body.statements.iter_mut() {
        type_check_stmt(type_checker, stmt);
    }

    match function.return_expr.as_mut() {
        Some(value) => {
            let position = value.token.position;
            type_check_return(type_checker, Some(value), position);
        }
        None => type_check_return(type_checker, None, function.token.position),
    }

    type_checker.function = previous;
}

pub fn type_check_variable(type_checker: &mut TypeChecker, variable: &mut Variable) {
    type_check_initializer(
        type_checker,
        &variable.name,
        &variable.ty,
        variable.initializer.as_mut(),
    );
}

fn type_check_initializer(
    type_checker: &mut TypeChecker,
    name: &Identifier,
    ty: &TypeNode,
    initializer: Option<&mut Expr>,
) {
    let Some(initializer) = initializer else {
        return;
    };

    let Some(found) = type_check_expr(type_checker, initializer) else {
        return;
    };
    let expected = ty.to_type();

    if !type_checker.symbols.is_assignable(&expected, &found) {
        type_checker.context.add_error(
            name.token.position,
            DiagnosticKind::CannotInitialize {
                target: name.name.clone(),
                expected,
                found,
            },
        );
    }
}

/// Checks a value returned from the current function against its declared
/// return type. `None` means the function ends without a value.
fn type_check_return(type_checker: &mut TypeChecker, value: Option<&mut Expr>, position: Position) {
    let Some(function) = type_checker.function else {
        if let Some(value) = value {
            type_check_expr(type_checker, value);
        }
        return;
    };

    let expected = type_checker.symbols.function(function).return_type.clone();
    let name = type_checker.current_function_name();

    match value {
        Some(value) => {
            let found = type_check_expr(type_checker, value);

            if expected == Type::Void {
                type_checker
                    .context
                    .add_error(position, DiagnosticKind::VoidReturnsValue { function: name });
            } else if let Some(found) = found {
                if !type_checker.symbols.is_assignable(&expected, &found) {
                    type_checker.context.add_error(
                        position,
                        DiagnosticKind::ReturnTypeMismatch {
                            function: name,
                            expected,
                            found,
                        },
                    );
                }
            }
        }
        None => {
            if expected != Type::Void {
                type_checker.context.add_error(
                    position,
                    DiagnosticKind::MissingReturn {
                        function: name,
                        expected,
                    },
                );
            }
        }
    }
}

fn type_check_condition(type_checker: &mut TypeChecker, condition: &mut Expr) {
    let Some(found) = type_check_expr(type_checker, condition) else {
        return;
    };

    if found != Type::Boolean {
        type_checker.context.add_error(
            condition.token.position,
            DiagnosticKind::ConditionNotBoolean { found },
        );
    }
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &mut Stmt) {
    let position = stmt.token.position;

    match &mut stmt.kind {
        StmtKind::Block(block) => {
            for stmt in block.statements.iter_mut() {
                type_check_stmt(type_checker, stmt);
            }
        }
        StmtKind::If {
            branches,
            otherwise,
        } => {
            for branch in branches.iter_mut() {
                type_check_condition(type_checker, &mut branch.condition);
                type_check_stmt(type_checker, &mut branch.body);
            }
            if let Some(otherwise) = otherwise {
                type_check_stmt(type_checker, otherwise);
            }
        }
        StmtKind::While { condition, body } => {
            type_check_condition(type_checker, condition);
            type_check_stmt(type_checker, body);
        }
        StmtKind::For {
            init,
            condition,
            update,
            body,
            ..
        } => {
            type_check_variable(type_checker, init);
            type_check_condition(type_checker, condition);
            type_check_stmt(type_checker, update);
            type_check_stmt(type_checker, body);
        }
        StmtKind::Assign { target, value } => {
            let found = type_check_expr(type_checker, value);
            let (Some(expected), Some(found)) = (type_checker.variable_type(target), found) else {
                return;
            };

            if !type_checker.symbols.is_assignable(&expected, &found) {
                type_checker.context.add_error(
                    position,
                    DiagnosticKind::CannotAssign {
                        target: target.name.clone(),
                        expected,
                        found,
                    },
                );
            }
        }
        StmtKind::ArrayAssign {
            target,
            index,
            value,
        } => {
            let index_type = type_check_expr(type_checker, index);
            type_check_index(type_checker, index_type, index.token.position);

            let found = type_check_expr(type_checker, value);
            let Some(array) = type_checker.variable_type(target) else {
                return;
            };

            match array.element() {
                Some(expected) => {
                    let Some(found) = found else {
                        return;
                    };
                    if expected != found {
                        type_checker.context.add_error(
                            position,
                            DiagnosticKind::CannotAssign {
                                target: format!("{}[]", target.name),
                                expected,
                                found,
                            },
                        );
                    }
                }
                None => type_checker.context.add_error(
                    target.token.position,
                    DiagnosticKind::NotAnArray { found: array },
                ),
            }
        }
        StmtKind::Increment(target) => {
            if let Some(found) = type_checker.variable_type(target) {
                if found != Type::Int {
                    type_checker
                        .context
                        .add_error(position, DiagnosticKind::IncrementNotInt { found });
                }
            }
        }
        StmtKind::Return(value) => type_check_return(type_checker, value.as_mut(), position),
        StmtKind::Call(call) => {
            type_check_expr(type_checker, call);
        }
        StmtKind::VarDecl(variable) => type_check_variable(type_checker, variable),
        StmtKind::Skip => {}
    }
}

/// Computes, stores and returns the type of `expr`. Ill-typed expressions
/// are reported and given a fallback type so checking can continue.
/// `None` means the type is unknown because a name in the expression did
/// not resolve; that problem is already reported, so checks against an
/// unknown type are skipped.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &mut Expr) -> Option<Type> {
    let position = expr.token.position;

    let ty = match &mut expr.kind {
        ExprKind::IntLiteral(_) => Some(Type::Int),
        ExprKind::StringLiteral(_) => Some(Type::String),
        ExprKind::BoolLiteral(_) => Some(Type::Boolean),
        ExprKind::Identifier(name) => type_checker.variable_type(name),
        ExprKind::Binary { op, left, right } => {
            let op = *op;
            let left = type_check_expr(type_checker, left);
            let right = type_check_expr(type_checker, right);
            type_check_binary(type_checker, op, left, right, position)
        }
        ExprKind::Increment(inner) => {
            if let Some(found) = type_check_expr(type_checker, inner) {
                if found != Type::Int {
                    type_checker
                        .context
                        .add_error(position, DiagnosticKind::IncrementNotInt { found });
                }
            }
            Some(Type::Int)
        }
        ExprKind::NewArray { element, length } => {
            if let Some(found) = type_check_expr(type_checker, length) {
                if found != Type::Int {
                    type_checker.context.add_error(
                        length.token.position,
                        DiagnosticKind::ArrayLengthNotInt { found },
                    );
                }
            }
            Some(element.array_type())
        }
        ExprKind::NewInstance(class) => class
            .binding
            .map(|_| Type::Identifier(class.name.clone())),
        ExprKind::ArrayIndex { array, index } => {
            let array_type = type_check_expr(type_checker, array);
            let index_type = type_check_expr(type_checker, index);
            type_check_index(type_checker, index_type, index.token.position);

            match array_type {
                None => None,
                Some(array_type) => match array_type.element() {
                    Some(element) => Some(element),
                    None => {
                        type_checker.context.add_error(
                            array.token.position,
                            DiagnosticKind::NotAnArray { found: array_type },
                        );
                        Some(Type::Int)
                    }
                },
            }
        }
        ExprKind::ArrayLiteral(elements) => {
            let types: Option<Vec<Type>> = elements
                .iter_mut()
                .map(|element| type_check_expr(type_checker, element))
                .collect::<Vec<_>>()
                .into_iter()
                .collect();

            types.map(|types| {
                if types.iter().all(|ty| *ty == Type::Int) {
                    Type::IntArray
                } else if types.iter().all(|ty| *ty == Type::String) {
                    Type::StringArray
                } else {
                    type_checker
                        .context
                        .add_error(position, DiagnosticKind::MixedArrayLiteral);
                    Type::IntArray
                }
            })
        }
        ExprKind::Call(call) => type_check_call(type_checker, call),
    };

    expr.ty = ty.clone();
    ty
}

fn type_check_index(type_checker: &mut TypeChecker, index_type: Option<Type>, position: Position) {
    if let Some(found) = index_type {
        if found != Type::Int {
            type_checker
                .context
                .add_error(position, DiagnosticKind::IndexNotInt { found });
        }
    }
}

fn type_check_binary(
    type_checker: &mut TypeChecker,
    op: BinaryOp,
    left: Option<Type>,
    right: Option<Type>,
    position: Position,
) -> Option<Type> {
    let (left, right) = match (left, right) {
        (Some(left), Some(right)) => (left, right),
        // One side did not resolve: keep whatever the operator alone decides.
        (left, right) => {
            return match op {
                BinaryOp::Plus => (left == Some(Type::String) || right == Some(Type::String))
                    .then_some(Type::String),
                op if op.is_arithmetic() => Some(Type::Int),
                _ => Some(Type::Boolean),
            };
        }
    };

    let (valid, result) = match op {
        BinaryOp::Plus => {
            if left == Type::Int && right == Type::Int {
                (true, Type::Int)
            } else if left == Type::String || right == Type::String {
                if left != right {
                    type_checker
                        .context
                        .add_warning(position, DiagnosticKind::ImplicitStringConversion);
                }
                (true, Type::String)
            } else {
                (false, Type::Int)
            }
        }
        BinaryOp::Equals | BinaryOp::NotEquals => {
            let comparable = matches!(
                left,
                Type::Int
                    | Type::Boolean
                    | Type::String
                    | Type::IntArray
                    | Type::StringArray
                    | Type::Identifier(_)
            );
            (comparable && left == right, Type::Boolean)
        }
        op if op.is_arithmetic() => (left == Type::Int && right == Type::Int, Type::Int),
        op if op.is_relational() => (left == Type::Int && right == Type::Int, Type::Boolean),
        _ => (
            left == Type::Boolean && right == Type::Boolean,
            Type::Boolean,
        ),
    };

    if !valid {
        type_checker.context.add_error(
            position,
            DiagnosticKind::InvalidOperands {
                operator: op.to_string(),
                left,
                right,
            },
        );
    }

    Some(result)
}

fn type_check_call(type_checker: &mut TypeChecker, call: &mut FunctionCall) -> Option<Type> {
    let receiver_type = call
        .receiver
        .as_mut()
        .and_then(|receiver| type_check_expr(type_checker, receiver));

    let supplied: Vec<Option<Type>> = call
        .arguments
        .iter_mut()
        .map(|argument| type_check_expr(type_checker, argument))
        .collect();

    if call.name.binding.is_none() {
        if let (Some(receiver), Some(receiver_type)) = (call.receiver.as_deref(), receiver_type) {
            if let Some(function) =
                bind_deferred_call(type_checker, receiver, &call.name, receiver_type)
            {
                call.name.binding = Some(Binding::Function(function));
            }
        }
    }

    let function = call.name.binding.and_then(|b| b.as_function())?;

    let symbols = type_checker.symbols;
    let symbol = symbols.function(function);

    // Arguments of unknown type were reported where they failed to resolve.
    let Some(supplied) = supplied.into_iter().collect::<Option<Vec<Type>>>() else {
        return Some(symbol.return_type.clone());
    };

    let matches = symbol.parameters.len() == supplied.len()
        && symbol
            .parameters
            .iter()
            .zip(&supplied)
            .all(|(parameter, found)| symbols.is_assignable(&symbols.variable(*parameter).ty, found));

    if !matches {
        let supplied = supplied
            .iter()
            .map(Type::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        type_checker.context.add_error(
            call.name.token.position,
            DiagnosticKind::CallMismatch {
                signature: symbols.signature(function),
                supplied,
            },
        );
    }

    Some(symbol.return_type.clone())
}

/// Resolves a method call whose receiver's class is only known from the
/// receiver's type, such as `a.b().c()` or `xs[0].f()`.
fn bind_deferred_call(
    type_checker: &mut TypeChecker,
    receiver: &Expr,
    name: &Identifier,
    receiver_type: Type,
) -> Option<FunctionId> {
    let symbols = type_checker.symbols;

    match &receiver.kind {
        // Already reported by the name resolver.
        ExprKind::NewInstance(_) => return None,
        ExprKind::Identifier(identifier) => match identifier.binding {
            None => return None,
            Some(Binding::Variable(variable))
                if symbols.variable(variable).ty.class_name().is_some() =>
            {
                return None
            }
            _ => {}
        },
        ExprKind::Call(call) if call.name.binding.is_none() => return None,
        _ => {}
    }

    let owner = receiver_type.class_name().and_then(|class_name| {
        symbols
            .lookup_class(class_name)
            .map(|class| {
                (
                    symbols.lookup_method(class, &name.name),
                    symbols.class(class).name.clone(),
                )
            })
            .or_else(|| {
                symbols.lookup_interface(class_name).map(|interface| {
                    (
                        symbols.lookup_interface_function(interface, &name.name),
                        symbols.interface(interface).name.clone(),
                    )
                })
            })
    });

    match owner {
        Some((Some(function), _)) => {
            debug!("bound deferred call {} at {}", name.name, name.token.position);
            Some(function)
        }
        Some((None, owner)) => {
            type_checker.context.add_error(
                name.token.position,
                DiagnosticKind::MethodNotDeclared {
                    function: name.name.clone(),
                    owner,
                },
            );
            None
        }
        None => {
            type_checker.context.add_error(
                name.token.position,
                DiagnosticKind::InvalidReceiver {
                    function: name.name.clone(),
                    found: receiver_type,
                },
            );
            None
        }
    }
}

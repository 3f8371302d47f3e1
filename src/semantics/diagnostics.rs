use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::Type, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Every semantic problem the analysis passes can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("Class {class} already defined")]
    ClassAlreadyDefined { class: String },
    #[error("Interface {interface} already defined")]
    InterfaceAlreadyDefined { interface: String },
    #[error("Property {property} already defined in class {class}")]
    PropertyAlreadyDefined { property: String, class: String },
    #[error("Function {function} already defined")]
    FunctionAlreadyDefined { function: String },
    #[error("Function {function} already defined in class {class}")]
    MethodAlreadyDefined { function: String, class: String },
    #[error("Function {function} already defined in interface {interface}")]
    SignatureAlreadyDefined { function: String, interface: String },
    #[error("Variable {variable} already defined")]
    VariableAlreadyDefined { variable: String },
    #[error("Variable {variable} already defined in function {function}")]
    LocalAlreadyDefined { variable: String, function: String },
    #[error("Argument {argument} already defined in function {function}")]
    ArgumentAlreadyDefined { argument: String, function: String },

    #[error("{name} not declared")]
    TypeNotDeclared { name: String },
    #[error("Variable {variable} not declared")]
    VariableNotDeclared { variable: String },
    #[error("Function {function} not declared")]
    FunctionNotDeclared { function: String },
    #[error("Function {function} not declared in {owner}")]
    MethodNotDeclared { function: String, owner: String },
    #[error("Class {class} not declared")]
    ClassNotDeclared { class: String },
    #[error("Interface {interface} not declared")]
    InterfaceNotDeclared { interface: String },
    #[error("Class {class} inherits from itself")]
    InheritanceCycle { class: String },

    #[error("Implicit conversion to string in concatenation")]
    ImplicitStringConversion,
    #[error("Operator {operator} cannot be applied to {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: Type,
        right: Type,
    },
    #[error("Condition must be boolean type but got {found}")]
    ConditionNotBoolean { found: Type },
    #[error("Array expression must evaluate to an array type but got {found}")]
    NotAnArray { found: Type },
    #[error("Index expression must evaluate to be of Type int but got {found}")]
    IndexNotInt { found: Type },
    #[error("Array length must be of type int but got {found}")]
    ArrayLengthNotInt { found: Type },
    #[error("Array literal elements must all be int or all be string")]
    MixedArrayLiteral,
    #[error("Operand of ++ must be of type int but got {found}")]
    IncrementNotInt { found: Type },
    #[error("Cannot assign {found} to {target} of type {expected}")]
    CannotAssign {
        target: String,
        expected: Type,
        found: Type,
    },
    #[error("Cannot initialize {target} of type {expected} with {found}")]
    CannotInitialize {
        target: String,
        expected: Type,
        found: Type,
    },
    #[error("Function {signature} cannot be called with ({supplied})")]
    CallMismatch { signature: String, supplied: String },
    #[error("Cannot call {function} on a value of type {found}")]
    InvalidReceiver { function: String, found: Type },
    #[error("Function {function} must return {expected} but returns {found}")]
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        found: Type,
    },
    #[error("Function {function} must return a value of type {expected}")]
    MissingReturn { function: String, expected: Type },
    #[error("Function {function} is void but returns a value")]
    VoidReturnsValue { function: String },
    #[error("Class {class} does not implement function {function} of interface {interface}")]
    MissingInterfaceFunction {
        class: String,
        function: String,
        interface: String,
    },
    #[error("Function {function} of class {class} does not match its declaration in interface {interface}")]
    InterfaceFunctionMismatch {
        class: String,
        function: String,
        interface: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub position: Position,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn row(&self) -> u32 {
        self.position.row
    }

    pub fn col(&self) -> u32 {
        self.position.col
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.severity, self.kind)
    }
}

use std::fmt::Display;

use crate::lexer::tokens::Token;

use super::{ast::Identifier, types::Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Div,
    Modulus,
    And,
    Or,
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Minus | BinaryOp::Times | BinaryOp::Div | BinaryOp::Modulus
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::LessThan | BinaryOp::LessOrEqual | BinaryOp::GreaterThan | BinaryOp::GreaterOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equals | BinaryOp::NotEquals)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Div => "/",
            BinaryOp::Modulus => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterOrEqual => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// Element kind of a `new int[n]` / `new string[n]` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayElement {
    Int,
    String,
}

impl ArrayElement {
    pub fn array_type(&self) -> Type {
        match self {
            ArrayElement::Int => Type::IntArray,
            ArrayElement::String => Type::StringArray,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
    /// Filled in by the type checker.
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Expr {
            kind,
            token,
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLiteral(i32),
    StringLiteral(String),
    BoolLiteral(bool),
    Identifier(Identifier),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Postfix `++`.
    Increment(Box<Expr>),
    NewArray {
        element: ArrayElement,
        length: Box<Expr>,
    },
    NewInstance(Identifier),
    ArrayIndex {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Call(FunctionCall),
    ArrayLiteral(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub receiver: Option<Box<Expr>>,
    pub name: Identifier,
    pub arguments: Vec<Expr>,
}

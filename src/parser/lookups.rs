use crate::{
    ast::expressions::{ArrayElement, BinaryOp},
    lexer::tokens::{Token, TokenKind},
};

/// Everything that can sit on the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Bottom marker of one (sub-)expression; never reduced by priority.
    Sentinel,
    Binary(BinaryOp),
    Index,
    Member,
    NewInstance,
    NewArray(ArrayElement),
}

/// Priority of postfix `++`: above every binary operator, below indexing.
pub const INCREMENT_PRIORITY: i32 = 6;

impl Operator {
    pub fn priority(&self) -> i32 {
        match self {
            Operator::Sentinel => -1,
            Operator::Binary(op) => match op {
                BinaryOp::Or => 1,
                BinaryOp::And => 2,
                BinaryOp::Equals
                | BinaryOp::NotEquals
                | BinaryOp::LessThan
                | BinaryOp::LessOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterOrEqual => 3,
                BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Modulus => 4,
                BinaryOp::Times | BinaryOp::Div => 5,
            },
            Operator::Index => 7,
            Operator::Member => 8,
            Operator::NewInstance | Operator::NewArray(_) => 9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StackOperator {
    pub kind: Operator,
    pub token: Token,
}

pub fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Plus),
        TokenKind::Dash => Some(BinaryOp::Minus),
        TokenKind::Star => Some(BinaryOp::Times),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Modulus),
        TokenKind::And => Some(BinaryOp::And),
        TokenKind::Or => Some(BinaryOp::Or),
        TokenKind::Equals => Some(BinaryOp::Equals),
        TokenKind::NotEquals => Some(BinaryOp::NotEquals),
        TokenKind::Less => Some(BinaryOp::LessThan),
        TokenKind::LessEquals => Some(BinaryOp::LessOrEqual),
        TokenKind::Greater => Some(BinaryOp::GreaterThan),
        TokenKind::GreaterEquals => Some(BinaryOp::GreaterOrEqual),
        _ => None,
    }
}

/// Tokens that may follow a complete expression.
pub const EXPRESSION_TERMINATORS: [TokenKind; 4] = [
    TokenKind::CloseParen,
    TokenKind::Semicolon,
    TokenKind::Comma,
    TokenKind::CloseBracket,
];

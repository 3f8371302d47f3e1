use crate::{lexer::tokens::Token, symbols::binding::ScopeId};

use super::{
    ast::{Identifier, Variable},
    expressions::Expr,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub token: Token,
    /// Set by the symbol table builder.
    pub scope: Option<ScopeId>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, token: Token) -> Self {
        Block {
            statements,
            token,
            scope: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub token: Token,
    /// Scope opened for an unbraced branch or loop body.
    pub scope: Option<ScopeId>,
}

impl Stmt {
    pub fn new(kind: StmtKind, token: Token) -> Self {
        Stmt {
            kind,
            token,
            scope: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Block(Block),
    /// `if` followed by any number of `else if` branches and an optional `else`.
    If {
        branches: Vec<ConditionalBranch>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Variable,
        condition: Expr,
        update: Box<Stmt>,
        body: Box<Stmt>,
        /// Holds the loop variable, set by the symbol table builder.
        scope: Option<ScopeId>,
    },
    Assign {
        target: Identifier,
        value: Expr,
    },
    ArrayAssign {
        target: Identifier,
        index: Expr,
        value: Expr,
    },
    Increment(Identifier),
    Return(Option<Expr>),
    /// A call evaluated for its effect; the expression is always a call.
    Call(Expr),
    VarDecl(Variable),
    Skip,
}

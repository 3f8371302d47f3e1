use crate::{
    lexer::tokens::Token,
    symbols::binding::{Binding, ScopeId},
};

use super::{
    expressions::Expr,
    statements::{Block, Stmt, StmtKind},
    types::TypeNode,
};

/// A name in the source together with the symbol it resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub token: Token,
    pub binding: Option<Binding>,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        Identifier {
            name: token.value.clone(),
            token,
            binding: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(Class),
    Interface(Interface),
    Function(Function),
    Variable(Variable),
}

impl Program {
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Class(class) => Some(class),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Interface(interface) => Some(interface),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Variable(variable) => Some(variable),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Identifier,
    pub parent: Option<Identifier>,
    pub interfaces: Vec<Identifier>,
    pub properties: Vec<Property>,
    pub functions: Vec<Function>,
    pub token: Token,
    /// Scope holding the properties, set by the symbol table builder.
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: Identifier,
    pub extends: Vec<Identifier>,
    pub functions: Vec<FunctionSignature>,
    pub token: Token,
}

/// A bodiless function declared by an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub return_type: TypeNode,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub return_type: TypeNode,
    pub body: Block,
    /// The trailing `ret <expr>;` of the body, if any.
    pub return_expr: Option<Expr>,
    pub token: Token,
    /// Scope holding the arguments, set by the symbol table builder.
    pub scope: Option<ScopeId>,
}

impl Function {
    /// Variables declared directly in the function body.
    pub fn locals(&self) -> impl Iterator<Item = &Variable> {
        self.body.statements.iter().filter_map(|stmt: &Stmt| match &stmt.kind {
            StmtKind::VarDecl(variable) => Some(variable),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Identifier,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: Identifier,
    pub ty: TypeNode,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Identifier,
    pub ty: TypeNode,
    pub initializer: Option<Expr>,
}

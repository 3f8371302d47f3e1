//! Type representations.
//!
//! [`TypeNode`] is the syntax the parser produces for a type annotation. It
//! keeps its token and, for named types, a binding slot the name resolver
//! fills. [`Type`] is the semantic type the analysis passes compare.
//! Converting one into the other is purely structural.

use std::fmt::Display;

use crate::lexer::tokens::Token;

use super::ast::Identifier;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    String,
    Boolean,
    Void,
    IntArray,
    StringArray,
    /// A class or interface, by name.
    Identifier(String),
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
    Parameterized {
        name: String,
        arguments: Vec<Type>,
    },
}

impl Type {
    pub fn is_array(&self) -> bool {
        matches!(self, Type::IntArray | Type::StringArray)
    }

    /// Element type of an array type.
    pub fn element(&self) -> Option<Type> {
        match self {
            Type::IntArray => Some(Type::Int),
            Type::StringArray => Some(Type::String),
            _ => None,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, types: &[Type]) -> std::fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::String => write!(f, "string"),
            Type::Boolean => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::IntArray => write!(f, "int[]"),
            Type::StringArray => write!(f, "string[]"),
            Type::Identifier(name) => write!(f, "{}", name),
            Type::Function {
                parameters,
                return_type,
            } => {
                write!(f, "fn(")?;
                write_list(f, parameters)?;
                write!(f, "): {}", return_type)
            }
            Type::Parameterized { name, arguments } => {
                write!(f, "{}<", name)?;
                write_list(f, arguments)?;
                write!(f, ">")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNodeKind {
    Int,
    String,
    Boolean,
    Void,
    IntArray,
    StringArray,
    Identifier(Identifier),
    Function {
        parameters: Vec<TypeNode>,
        return_type: Box<TypeNode>,
    },
    Parameterized {
        name: Identifier,
        arguments: Vec<TypeNode>,
    },
}

impl TypeNode {
    pub fn new(kind: TypeNodeKind, token: Token) -> Self {
        TypeNode { kind, token }
    }

    pub fn to_type(&self) -> Type {
        match &self.kind {
            TypeNodeKind::Int => Type::Int,
            TypeNodeKind::String => Type::String,
            TypeNodeKind::Boolean => Type::Boolean,
            TypeNodeKind::Void => Type::Void,
            TypeNodeKind::IntArray => Type::IntArray,
            TypeNodeKind::StringArray => Type::StringArray,
            TypeNodeKind::Identifier(identifier) => Type::Identifier(identifier.name.clone()),
            TypeNodeKind::Function {
                parameters,
                return_type,
            } => Type::Function {
                parameters: parameters.iter().map(TypeNode::to_type).collect(),
                return_type: Box::new(return_type.to_type()),
            },
            TypeNodeKind::Parameterized { name, arguments } => Type::Parameterized {
                name: name.name.clone(),
                arguments: arguments.iter().map(TypeNode::to_type).collect(),
            },
        }
    }
}

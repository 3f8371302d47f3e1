//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and its token and stack
//! primitives. Declarations and statements are parsed by recursive descent
//! in `decl.rs` and `stmt.rs`. Expressions are parsed by precedence
//! climbing over two explicit stacks kept on the parser:
//!
//! - an operator stack, seeded with a sentinel for every sub-expression
//! - an operand stack of finished expression nodes
//!
//! The parser pulls tokens lazily from a [`TokenSource`] and holds exactly
//! one look-ahead token.

use log::{info, trace};

use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, ExprKind, FunctionCall},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        source::TokenSource,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    decl::parse_declaration,
    lookups::{Operator, StackOperator},
};

/// The main parser structure that maintains parsing state.
pub struct Parser<S: TokenSource> {
    /// Where tokens come from
    source: S,
    /// The single look-ahead token
    current: Token,
    /// Pending operators of the expressions being parsed
    operators: Vec<StackOperator>,
    /// Finished operands of the expressions being parsed
    operands: Vec<Expr>,
}

impl<S: TokenSource> Parser<S> {
    /// Creates a parser and reads the first look-ahead token.
    pub fn new(mut source: S) -> Result<Self, Error> {
        let current = source.next_token()?;

        Ok(Parser {
            source,
            current,
            operators: vec![],
            operands: vec![],
        })
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let next = self.source.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consumes a token of `expected_kind` or fails naming what was found.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current.kind != expected_kind {
            return Err(self.unexpected(&expected_kind.to_string()));
        }

        self.advance()
    }

    /// Builds the error for a token that does not fit here.
    pub fn unexpected(&self, expected: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                found: self.current.kind,
                value: self.current.value.clone(),
                expected: expected.to_string(),
            },
            self.current.position,
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    /// Returns the position of the look-ahead token.
    pub fn get_position(&self) -> Position {
        self.current.position
    }

    /// Opens a nested sub-expression.
    pub fn push_sentinel(&mut self) {
        let token = self.current.clone();
        self.operators.push(StackOperator {
            kind: Operator::Sentinel,
            token,
        });
    }

    pub fn push_operand(&mut self, operand: Expr) {
        trace!("shift operand at {}", operand.token.position);
        self.operands.push(operand);
    }

    pub fn pop_operand(&mut self) -> Result<Expr, Error> {
        self.operands
            .pop()
            .ok_or_else(|| Error::new(ErrorImpl::MalformedExpression, self.current.position))
    }

    fn top_priority(&self) -> i32 {
        self.operators
            .last()
            .map(|op| op.kind.priority())
            .unwrap_or(Operator::Sentinel.priority())
    }

    /// Reduces every stacked operator binding at least as tightly as the
    /// incoming one, then pushes it. Equal priorities reduce first, which
    /// makes binary operators left associative.
    pub fn push_operator(&mut self, kind: Operator, token: Token) -> Result<(), Error> {
        self.reduce_while(kind.priority())?;
        trace!("shift {:?}", kind);
        self.operators.push(StackOperator { kind, token });
        Ok(())
    }

    /// Reduces while the top operator has at least `priority`.
    pub fn reduce_while(&mut self, priority: i32) -> Result<(), Error> {
        while self.top_priority() >= priority {
            self.reduce()?;
        }
        Ok(())
    }

    /// Pops the top operator and combines its operands into one node.
    pub fn reduce(&mut self) -> Result<(), Error> {
        let Some(operator) = self.operators.pop() else {
            return Err(Error::new(ErrorImpl::MalformedExpression, self.current.position));
        };
        trace!("reduce {:?}", operator.kind);

        let reduced = match operator.kind {
            Operator::Sentinel => {
                return Err(Error::new(
                    ErrorImpl::MalformedExpression,
                    operator.token.position,
                ))
            }
            Operator::Binary(op) => {
                let right = self.pop_operand()?;
                let left = self.pop_operand()?;
                Expr::new(
                    ExprKind::Binary {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    operator.token,
                )
            }
            Operator::Index => {
                let index = self.pop_operand()?;
                let array = self.pop_operand()?;
                Expr::new(
                    ExprKind::ArrayIndex {
                        array: Box::new(array),
                        index: Box::new(index),
                    },
                    operator.token,
                )
            }
            Operator::Member => {
                let call = self.pop_operand()?;
                let receiver = self.pop_operand()?;
                attach_receiver(call, receiver)?
            }
            Operator::NewInstance => match self.pop_operand()? {
                Expr {
                    kind: ExprKind::Identifier(class),
                    ..
                } => Expr::new(ExprKind::NewInstance(class), operator.token),
                other => {
                    return Err(Error::new(
                        ErrorImpl::InvalidToken {
                            token: other.token.value,
                        },
                        other.token.position,
                    ))
                }
            },
            Operator::NewArray(element) => {
                let length = self.pop_operand()?;
                Expr::new(
                    ExprKind::NewArray {
                        element,
                        length: Box::new(length),
                    },
                    operator.token,
                )
            }
        };

        self.operands.push(reduced);
        Ok(())
    }

    /// Reduces down to the innermost sentinel, removes it and returns the
    /// single operand the sub-expression produced.
    pub fn finish_expression(&mut self) -> Result<Expr, Error> {
        while !matches!(
            self.operators.last().map(|op| op.kind),
            Some(Operator::Sentinel) | None
        ) {
            self.reduce()?;
        }

        if self.operators.pop().is_none() {
            return Err(Error::new(ErrorImpl::MalformedExpression, self.current.position));
        }

        self.pop_operand()
    }
}

fn attach_receiver(call: Expr, receiver: Expr) -> Result<Expr, Error> {
    match call.kind {
        ExprKind::Call(FunctionCall {
            receiver: None,
            name,
            arguments,
        }) => Ok(Expr::new(
            ExprKind::Call(FunctionCall {
                receiver: Some(Box::new(receiver)),
                name,
                arguments,
            }),
            call.token,
        )),
        _ => Err(Error::new(
            ErrorImpl::ExpectedMethodCall {
                token: call.token.value,
            },
            call.token.position,
        )),
    }
}

/// Parses a whole compilation unit.
///
/// This is the main entry point for parsing. It stops at the first
/// structural error.
pub fn parse<S: TokenSource>(source: S) -> Result<Program, Error> {
    let mut parser = Parser::new(source)?;
    let mut program = Program::default();

    while parser.has_tokens() {
        program.declarations.push(parse_declaration(&mut parser)?);
    }

    info!("parsed {} declarations", program.declarations.len());
    Ok(program)
}

/// Tokenizes and parses source text in one go.
pub fn parse_source(source: &str) -> Result<Program, Error> {
    parse(Lexer::new(source))
}

//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Primitive types (`int`, `string`, `bool`, `void`)
//! - Array types (`int[]`, `string[]`)
//! - Class and interface names
//! - Function types (`fn(int, string): bool`)
//! - Parameterized types (`List<int>`)

use crate::{
    ast::{
        ast::Identifier,
        types::{TypeNode, TypeNodeKind},
    },
    errors::errors::Error,
    lexer::{source::TokenSource, tokens::TokenKind},
};

use super::parser::Parser;

pub fn parse_type<S: TokenSource>(parser: &mut Parser<S>) -> Result<TypeNode, Error> {
    match parser.current_token_kind() {
        TokenKind::IntType => {
            let token = parser.advance()?;
            if parse_array_suffix(parser)? {
                Ok(TypeNode::new(TypeNodeKind::IntArray, token))
            } else {
                Ok(TypeNode::new(TypeNodeKind::Int, token))
            }
        }
        TokenKind::StringType => {
            let token = parser.advance()?;
            if parse_array_suffix(parser)? {
                Ok(TypeNode::new(TypeNodeKind::StringArray, token))
            } else {
                Ok(TypeNode::new(TypeNodeKind::String, token))
            }
        }
        TokenKind::BoolType => Ok(TypeNode::new(TypeNodeKind::Boolean, parser.advance()?)),
        TokenKind::VoidType => Ok(TypeNode::new(TypeNodeKind::Void, parser.advance()?)),
        TokenKind::Fn => parse_function_type(parser),
        TokenKind::Identifier => parse_symbol_type(parser),
        _ => Err(parser.unexpected("type")),
    }
}

fn parse_array_suffix<S: TokenSource>(parser: &mut Parser<S>) -> Result<bool, Error> {
    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Ok(false);
    }

    parser.advance()?;
    parser.expect(TokenKind::CloseBracket)?;
    Ok(true)
}

pub fn parse_symbol_type<S: TokenSource>(parser: &mut Parser<S>) -> Result<TypeNode, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let name = Identifier::new(token.clone());

    if parser.current_token_kind() != TokenKind::Less {
        return Ok(TypeNode::new(TypeNodeKind::Identifier(name), token));
    }

    parser.advance()?;
    let mut arguments = vec![parse_type(parser)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance()?;
        arguments.push(parse_type(parser)?);
    }
    parser.expect(TokenKind::Greater)?;

    Ok(TypeNode::new(
        TypeNodeKind::Parameterized { name, arguments },
        token,
    ))
}

pub fn parse_function_type<S: TokenSource>(parser: &mut Parser<S>) -> Result<TypeNode, Error> {
    let token = parser.expect(TokenKind::Fn)?;
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_type(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance()?;
            parameters.push(parse_type(parser)?);
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    parser.expect(TokenKind::Colon)?;
    let return_type = parse_type(parser)?;

    Ok(TypeNode::new(
        TypeNodeKind::Function {
            parameters,
            return_type: Box::new(return_type),
        },
        token,
    ))
}

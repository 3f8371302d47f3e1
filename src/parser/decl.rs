use crate::{
    ast::{
        ast::{
            Argument, Class, Declaration, Function, FunctionSignature, Identifier, Interface,
            Property,
        },
        expressions::Expr,
        statements::{Block, Stmt},
        types::{TypeNode, TypeNodeKind},
    },
    errors::errors::Error,
    lexer::{source::TokenSource, tokens::TokenKind},
};

use super::{
    expr::parse_expr,
    parser::Parser,
    stmt::{parse_stmt, parse_variable_rest},
    types::parse_type,
};

pub fn parse_declaration<S: TokenSource>(parser: &mut Parser<S>) -> Result<Declaration, Error> {
    match parser.current_token_kind() {
        TokenKind::Class => Ok(Declaration::Class(parse_class(parser)?)),
        TokenKind::Interface => Ok(Declaration::Interface(parse_interface(parser)?)),
        TokenKind::Fn => Ok(Declaration::Function(parse_function(parser)?)),
        TokenKind::Identifier => {
            let name = parser.advance()?;
            let variable = parse_variable_rest(parser, name)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Declaration::Variable(variable))
        }
        _ => Err(parser.unexpected("declaration")),
    }
}

fn parse_identifier_list<S: TokenSource>(
    parser: &mut Parser<S>,
) -> Result<Vec<Identifier>, Error> {
    let mut names = vec![Identifier::new(parser.expect(TokenKind::Identifier)?)];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance()?;
        names.push(Identifier::new(parser.expect(TokenKind::Identifier)?));
    }

    Ok(names)
}

pub fn parse_class<S: TokenSource>(parser: &mut Parser<S>) -> Result<Class, Error> {
    let token = parser.expect(TokenKind::Class)?;
    let name = Identifier::new(parser.expect(TokenKind::Identifier)?);

    let parent = if parser.current_token_kind() == TokenKind::Ext {
        parser.advance()?;
        Some(Identifier::new(parser.expect(TokenKind::Identifier)?))
    } else {
        None
    };

    let interfaces = if parser.current_token_kind() == TokenKind::Use {
        parser.advance()?;
        parse_identifier_list(parser)?
    } else {
        vec![]
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut properties = vec![];
    let mut functions = vec![];
    loop {
        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::Fn => functions.push(parse_function(parser)?),
            TokenKind::Identifier => properties.push(parse_property(parser)?),
            _ => return Err(parser.unexpected("property or function")),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Class {
        name,
        parent,
        interfaces,
        properties,
        functions,
        token,
        scope: None,
    })
}

fn parse_property<S: TokenSource>(parser: &mut Parser<S>) -> Result<Property, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    let variable = parse_variable_rest(parser, name)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Property {
        name: variable.name,
        ty: variable.ty,
        initializer: variable.initializer,
    })
}

pub fn parse_interface<S: TokenSource>(parser: &mut Parser<S>) -> Result<Interface, Error> {
    let token = parser.expect(TokenKind::Interface)?;
    let name = Identifier::new(parser.expect(TokenKind::Identifier)?);

    let extends = if parser.current_token_kind() == TokenKind::Ext {
        parser.advance()?;
        parse_identifier_list(parser)?
    } else {
        vec![]
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut functions = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        functions.push(parse_signature(parser)?);
        parser.expect(TokenKind::Semicolon)?;
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Interface {
        name,
        extends,
        functions,
        token,
    })
}

/// `fn name(args)[: type]`; a missing return type means `void`.
fn parse_signature<S: TokenSource>(parser: &mut Parser<S>) -> Result<FunctionSignature, Error> {
    let token = parser.expect(TokenKind::Fn)?;
    let name_token = parser.expect(TokenKind::Identifier)?;
    let arguments = parse_arguments(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance()?;
        parse_type(parser)?
    } else {
        TypeNode::new(TypeNodeKind::Void, name_token.clone())
    };

    Ok(FunctionSignature {
        name: Identifier::new(name_token),
        arguments,
        return_type,
        token,
    })
}

fn parse_arguments<S: TokenSource>(parser: &mut Parser<S>) -> Result<Vec<Argument>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let name = Identifier::new(parser.expect(TokenKind::Identifier)?);
            parser.expect(TokenKind::Colon)?;
            let ty = parse_type(parser)?;
            arguments.push(Argument { name, ty });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

pub fn parse_function<S: TokenSource>(parser: &mut Parser<S>) -> Result<Function, Error> {
    let signature = parse_signature(parser)?;
    let (body, return_expr) = parse_function_body(parser)?;

    Ok(Function {
        name: signature.name,
        arguments: signature.arguments,
        return_type: signature.return_type,
        body,
        return_expr,
        token: signature.token,
        scope: None,
    })
}

/// A `ret` directly inside the body ends it and supplies the function's
/// return expression. `ret` inside nested statements is a normal statement.
fn parse_function_body<S: TokenSource>(
    parser: &mut Parser<S>,
) -> Result<(Block, Option<Expr>), Error> {
    let token = parser.expect(TokenKind::OpenCurly)?;

    let mut statements: Vec<Stmt> = Vec::new();
    let mut return_expr = None;

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind() == TokenKind::Ret {
            parser.advance()?;
            if parser.current_token_kind() != TokenKind::Semicolon {
                return_expr = Some(parse_expr(parser)?);
            }
            parser.expect(TokenKind::Semicolon)?;

            if parser.current_token_kind() != TokenKind::CloseCurly {
                return Err(parser.unexpected(&TokenKind::CloseCurly.to_string()));
            }
            break;
        }

        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok((Block::new(statements, token), return_expr))
}

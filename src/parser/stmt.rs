use crate::{
    ast::{
        ast::{Identifier, Variable},
        expressions::{Expr, ExprKind},
        statements::{Block, ConditionalBranch, Stmt, StmtKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        source::TokenSource,
        tokens::{Token, TokenKind},
    },
};

use super::{
    expr::{parse_call, parse_expr, parse_expr_from},
    parser::Parser,
    types::parse_type,
};

pub fn parse_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    match parser.current_token_kind() {
        TokenKind::OpenCurly => {
            let block = parse_block(parser)?;
            let token = block.token.clone();
            Ok(Stmt::new(StmtKind::Block(block), token))
        }
        TokenKind::If => parse_if_stmt(parser),
        TokenKind::While => parse_while_stmt(parser),
        TokenKind::For => parse_for_stmt(parser),
        TokenKind::Ret => parse_return_stmt(parser),
        TokenKind::Semicolon => {
            let token = parser.advance()?;
            Ok(Stmt::new(StmtKind::Skip, token))
        }
        TokenKind::Identifier => parse_identifier_stmt(parser),
        _ => Err(parser.unexpected("statement")),
    }
}

pub fn parse_block<S: TokenSource>(parser: &mut Parser<S>) -> Result<Block, Error> {
    let token = parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Block::new(statements, token))
}

/// Statements that open with a name: declarations, assignments, `x++`
/// and calls. The token after the name decides which one it is.
fn parse_identifier_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    let name = parser.advance()?;

    let stmt = if parser.current_token_kind() == TokenKind::Colon {
        let variable = parse_variable_rest(parser, name.clone())?;
        Stmt::new(StmtKind::VarDecl(variable), name)
    } else {
        parse_simple_stmt_rest(parser, name)?
    };

    parser.expect(TokenKind::Semicolon)?;
    Ok(stmt)
}

/// Parses `: type [= expr]` after a variable name, without the semicolon.
pub fn parse_variable_rest<S: TokenSource>(
    parser: &mut Parser<S>,
    name: Token,
) -> Result<Variable, Error> {
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance()?;
        Some(parse_expr(parser)?)
    } else {
        None
    };

    Ok(Variable {
        name: Identifier::new(name),
        ty,
        initializer,
    })
}

fn parse_simple_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parse_simple_stmt_rest(parser, name)
}

fn parse_simple_stmt_rest<S: TokenSource>(
    parser: &mut Parser<S>,
    name: Token,
) -> Result<Stmt, Error> {
    match parser.current_token_kind() {
        TokenKind::Assignment => {
            parser.advance()?;
            let value = parse_expr(parser)?;

            Ok(Stmt::new(
                StmtKind::Assign {
                    target: Identifier::new(name.clone()),
                    value,
                },
                name,
            ))
        }
        TokenKind::OpenBracket => {
            parser.advance()?;
            let index = parse_expr(parser)?;
            parser.expect(TokenKind::CloseBracket)?;
            parser.expect(TokenKind::Assignment)?;
            let value = parse_expr(parser)?;

            Ok(Stmt::new(
                StmtKind::ArrayAssign {
                    target: Identifier::new(name.clone()),
                    index,
                    value,
                },
                name,
            ))
        }
        TokenKind::PlusPlus => {
            parser.advance()?;
            Ok(Stmt::new(
                StmtKind::Increment(Identifier::new(name.clone())),
                name,
            ))
        }
        TokenKind::OpenParen | TokenKind::Dot => {
            let first = if parser.current_token_kind() == TokenKind::OpenParen {
                parse_call(parser, name.clone())?
            } else {
                Expr::new(
                    ExprKind::Identifier(Identifier::new(name.clone())),
                    name.clone(),
                )
            };

            let expr = parse_expr_from(parser, first)?;
            if !matches!(expr.kind, ExprKind::Call(_)) {
                return Err(Error::new(
                    ErrorImpl::ExpectedMethodCall {
                        token: expr.token.value,
                    },
                    expr.token.position,
                ));
            }

            Ok(Stmt::new(StmtKind::Call(expr), name))
        }
        _ => Err(parser.unexpected("`:`, `=`, `[`, `++`, `(` or `.`")),
    }
}

fn parse_branch<S: TokenSource>(parser: &mut Parser<S>) -> Result<ConditionalBranch, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;
    let body = parse_stmt(parser)?;

    Ok(ConditionalBranch {
        condition,
        body: Box::new(body),
    })
}

pub fn parse_if_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::If)?;

    let mut branches = vec![parse_branch(parser)?];
    let mut otherwise = None;

    while parser.current_token_kind() == TokenKind::Else {
        parser.advance()?;

        if parser.current_token_kind() == TokenKind::If {
            parser.advance()?;
            branches.push(parse_branch(parser)?);
        } else {
            otherwise = Some(Box::new(parse_stmt(parser)?));
            break;
        }
    }

    Ok(Stmt::new(StmtKind::If { branches, otherwise }, token))
}

pub fn parse_while_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::While)?;
    let branch = parse_branch(parser)?;

    Ok(Stmt::new(
        StmtKind::While {
            condition: branch.condition,
            body: branch.body,
        },
        token,
    ))
}

pub fn parse_for_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::For)?;
    parser.expect(TokenKind::OpenParen)?;

    let name = parser.expect(TokenKind::Identifier)?;
    let init = parse_variable_rest(parser, name)?;
    parser.expect(TokenKind::Semicolon)?;

    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    let update = parse_simple_stmt(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::new(
        StmtKind::For {
            init,
            condition,
            update: Box::new(update),
            body: Box::new(body),
            scope: None,
        },
        token,
    ))
}

pub fn parse_return_stmt<S: TokenSource>(parser: &mut Parser<S>) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::Ret)?;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Return(value), token))
}

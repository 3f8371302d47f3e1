use crate::{
    ast::{
        ast::Identifier,
        expressions::{ArrayElement, Expr, ExprKind, FunctionCall},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        source::TokenSource,
        tokens::{Token, TokenKind},
    },
};

use super::{
    lookups::{binary_operator, Operator, EXPRESSION_TERMINATORS, INCREMENT_PRIORITY},
    parser::Parser,
};

/// Parses one expression inside its own sentinel.
pub fn parse_expr<S: TokenSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.push_sentinel();
    parse_operand(parser)?;
    parse_term_tail(parser)?;
    parser.finish_expression()
}

/// Parses an expression whose first operand was already consumed by the
/// caller, as statements do after reading a leading identifier.
pub fn parse_expr_from<S: TokenSource>(parser: &mut Parser<S>, first: Expr) -> Result<Expr, Error> {
    parser.push_sentinel();
    parser.push_operand(first);
    parse_term_tail(parser)?;
    parser.finish_expression()
}

fn parse_term_tail<S: TokenSource>(parser: &mut Parser<S>) -> Result<(), Error> {
    loop {
        parse_postfix(parser)?;

        let Some(op) = binary_operator(parser.current_token_kind()) else {
            if parser.current_token().is_one_of_many(&EXPRESSION_TERMINATORS) {
                return Ok(());
            }

            return Err(Error::new(
                ErrorImpl::InvalidToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        let token = parser.advance()?;
        parser.push_operator(Operator::Binary(op), token)?;
        parse_operand(parser)?;
    }
}

/// Handles indexing, member calls and `++` after an operand.
fn parse_postfix<S: TokenSource>(parser: &mut Parser<S>) -> Result<(), Error> {
    loop {
        match parser.current_token_kind() {
            TokenKind::OpenBracket => {
                let token = parser.advance()?;
                parser.push_operator(Operator::Index, token)?;

                let index = parse_expr(parser)?;
                parser.expect(TokenKind::CloseBracket)?;

                parser.push_operand(index);
                parser.reduce()?;
            }
            TokenKind::Dot => {
                let token = parser.advance()?;
                parser.push_operator(Operator::Member, token)?;

                let name = parser.expect(TokenKind::Identifier)?;
                if parser.current_token_kind() != TokenKind::OpenParen {
                    return Err(Error::new(
                        ErrorImpl::ExpectedMethodCall { token: name.value },
                        name.position,
                    ));
                }

                let call = parse_call(parser, name)?;
                parser.push_operand(call);
            }
            TokenKind::PlusPlus => {
                let token = parser.advance()?;
                parser.reduce_while(INCREMENT_PRIORITY)?;

                let operand = parser.pop_operand()?;
                parser.push_operand(Expr::new(ExprKind::Increment(Box::new(operand)), token));
            }
            _ => return Ok(()),
        }
    }
}

fn parse_operand<S: TokenSource>(parser: &mut Parser<S>) -> Result<(), Error> {
    let operand = match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance()?;
            let value = token.value.parse::<i32>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.position,
                )
            })?;
            Expr::new(ExprKind::IntLiteral(value), token)
        }
        TokenKind::String => {
            let token = parser.advance()?;
            Expr::new(ExprKind::StringLiteral(token.value.clone()), token)
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance()?;
            Expr::new(ExprKind::BoolLiteral(token.kind == TokenKind::True), token)
        }
        TokenKind::Identifier => {
            let token = parser.advance()?;
            if parser.current_token_kind() == TokenKind::OpenParen {
                parse_call(parser, token)?
            } else {
                Expr::new(ExprKind::Identifier(Identifier::new(token.clone())), token)
            }
        }
        TokenKind::OpenParen => {
            parser.advance()?;
            let inner = parse_expr(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            inner
        }
        TokenKind::OpenBracket => {
            let token = parser.advance()?;
            let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;
            Expr::new(ExprKind::ArrayLiteral(elements), token)
        }
        TokenKind::New => return parse_new(parser),
        _ => {
            return Err(Error::new(
                ErrorImpl::InvalidToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    parser.push_operand(operand);
    Ok(())
}

/// `new C()` and `new int[n]` push their operator first; the reduction
/// builds the node once the operand is on the stack.
fn parse_new<S: TokenSource>(parser: &mut Parser<S>) -> Result<(), Error> {
    let token = parser.advance()?;

    match parser.current_token_kind() {
        TokenKind::IntType | TokenKind::StringType => {
            let element = if parser.current_token_kind() == TokenKind::IntType {
                ArrayElement::Int
            } else {
                ArrayElement::String
            };
            parser.advance()?;
            parser.push_operator(Operator::NewArray(element), token)?;

            parser.expect(TokenKind::OpenBracket)?;
            let length = parse_expr(parser)?;
            parser.expect(TokenKind::CloseBracket)?;

            parser.push_operand(length);
            Ok(())
        }
        TokenKind::Identifier => {
            parser.push_operator(Operator::NewInstance, token)?;

            let name = parser.advance()?;
            parser.expect(TokenKind::OpenParen)?;
            parser.expect(TokenKind::CloseParen)?;

            parser.push_operand(Expr::new(
                ExprKind::Identifier(Identifier::new(name.clone())),
                name,
            ));
            Ok(())
        }
        _ => Err(parser.unexpected("class name or array element type")),
    }
}

/// Parses `(args)` after a function name.
pub fn parse_call<S: TokenSource>(parser: &mut Parser<S>, name: Token) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::new(
        ExprKind::Call(FunctionCall {
            receiver: None,
            name: Identifier::new(name.clone()),
            arguments,
        }),
        name,
    ))
}

/// Comma separated expressions up to and including `close`.
fn parse_expr_list<S: TokenSource>(
    parser: &mut Parser<S>,
    close: TokenKind,
) -> Result<Vec<Expr>, Error> {
    let mut items = vec![];

    if parser.current_token_kind() != close {
        loop {
            items.push(parse_expr(parser)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance()?;
        }
    }

    parser.expect(close)?;
    Ok(items)
}

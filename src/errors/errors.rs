use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

/// A fatal error raised while tokenizing or parsing.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn row(&self) -> u32 {
        self.position.row
    }

    pub fn col(&self) -> u32 {
        self.position.col
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::InvalidToken { .. } => "InvalidToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::ExpectedMethodCall { .. } => "ExpectedMethodCall",
            ErrorImpl::MalformedExpression => "MalformedExpression",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing quote"))
            }
            ErrorImpl::UnexpectedToken {
                found,
                value,
                expected,
            } => {
                if *found == TokenKind::EOF {
                    ErrorTip::Suggestion(format!("Unexpected end of input, expected {}", expected))
                } else {
                    ErrorTip::Suggestion(format!(
                        "Unexpected token: `{}`, expected {}",
                        value, expected
                    ))
                }
            }
            ErrorImpl::InvalidToken { token } => ErrorTip::Suggestion(format!(
                "Token `{}` cannot appear inside an expression, did you miss a semicolon?",
                token
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::ExpectedMethodCall { token } => ErrorTip::Suggestion(format!(
                "Only method calls may follow `.`, found `{}`",
                token
            )),
            ErrorImpl::MalformedExpression => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected token {found} ({value:?}), expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        value: String,
        expected: String,
    },
    #[error("invalid token in expression: {token:?}")]
    InvalidToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("expected a method call after `.`, found {token:?}")]
    ExpectedMethodCall { token: String },
    #[error("malformed expression")]
    MalformedExpression,
}

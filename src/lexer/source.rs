use crate::{errors::errors::Error, Position};

use super::tokens::{Token, TokenKind};

/// Anything the parser can pull tokens from, one at a time.
///
/// Once input is exhausted a source keeps returning an `EOF` token.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, Error>;
}

/// Adapts an already tokenized buffer to [`TokenSource`].
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    last_position: Position,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens: tokens.into_iter(),
            last_position: Position::null(),
        }
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        TokenStream::new(tokens)
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Token, Error> {
        match self.tokens.next() {
            Some(token) => {
                self.last_position = token.position;
                Ok(token)
            }
            None => Ok(Token::new(TokenKind::EOF, "EOF", self.last_position)),
        }
    }
}

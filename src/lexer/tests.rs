//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer and string literals
//! - Operators and punctuation
//! - Comments and positions
//! - Error cases

use crate::{errors::errors::ErrorImpl, Position};

use super::{
    lexer::{tokenize, Lexer},
    source::{TokenSource, TokenStream},
    tokens::{Token, TokenKind},
};

#[test]
fn test_tokenize_keywords() {
    let source = "class interface fn ret ext use new if else while for true false int string bool void";
    let tokens = tokenize(source).unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Class,
            TokenKind::Interface,
            TokenKind::Fn,
            TokenKind::Ret,
            TokenKind::Ext,
            TokenKind::Use,
            TokenKind::New,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::True,
            TokenKind::False,
            TokenKind::IntType,
            TokenKind::StringType,
            TokenKind::BoolType,
            TokenKind::VoidType,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar baz_123 _underscore CamelCase classy").unwrap();

    let values: Vec<&str> = tokens[..6].iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["foo", "bar", "baz_123", "_underscore", "CamelCase", "classy"]);
    assert!(tokens[..6].iter().all(|t| t.kind == TokenKind::Identifier));
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 0 100").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "100");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "multiple words" """#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].value, "");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = tokenize(r#""hello\nworld" "tab\there" "backslash\\" "quote\"test""#).unwrap();

    assert_eq!(tokens[0].value, "hello\nworld");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "backslash\\");
    assert_eq!(tokens[3].value, "quote\"test");
}

#[test]
fn test_tokenize_operators() {
    let tokens = tokenize("+ - * / % == != < > <= >= = && || ++").unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::PlusPlus,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let tokens = tokenize("( ) { } [ ] . , ; :").unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = tokenize("x: int = 5; // this is a comment\ny = 10;").unwrap();

    assert_eq!(tokens[0].value, "x");
    assert_eq!(tokens[4].kind, TokenKind::Number);
    assert_eq!(tokens[5].kind, TokenKind::Semicolon);
    assert_eq!(tokens[6].kind, TokenKind::Identifier);
    assert_eq!(tokens[6].value, "y");
    assert_eq!(tokens[9].kind, TokenKind::Semicolon);
    assert_eq!(tokens[10].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_tracks_rows_and_columns() {
    let tokens = tokenize("fn main() {\n    x = 1;\n}").unwrap();

    assert_eq!(tokens[0].position, Position::new(1, 1));
    assert_eq!(tokens[1].position, Position::new(1, 4));
    assert_eq!(tokens[5].value, "x");
    assert_eq!(tokens[5].position, Position::new(2, 5));
    assert_eq!(tokens[7].position, Position::new(2, 9));
    assert_eq!(tokens[9].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[9].position, Position::new(3, 1));
}

#[test]
fn test_string_position_is_opening_quote() {
    let tokens = tokenize(r#"s = "abc";"#).unwrap();

    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].position, Position::new(1, 5));
    assert_eq!(tokens[3].position, Position::new(1, 10));
}

#[test]
fn test_tokenize_unrecognized_token() {
    let result = tokenize("x = @;");

    let error = result.unwrap_err();
    assert_eq!(
        *error.get_error(),
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string()
        }
    );
    assert_eq!(*error.get_position(), Position::new(1, 5));
}

#[test]
fn test_tokenize_unterminated_string() {
    let result = tokenize("s = \"never closed;\n");

    assert_eq!(*result.unwrap_err().get_error(), ErrorImpl::UnterminatedString);
}

#[test]
fn test_lexer_is_lazy() {
    // The error sits after the first tokens, which are still delivered
    let mut lexer = Lexer::new("a b $");

    assert_eq!(lexer.next_token().unwrap().value, "a");
    assert_eq!(lexer.next_token().unwrap().value, "b");
    assert!(lexer.next_token().is_err());
}

#[test]
fn test_lexer_repeats_eof() {
    let mut lexer = Lexer::new("x");

    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
}

#[test]
fn test_token_stream_ends_with_eof() {
    let mut stream = TokenStream::new(vec![Token::new(
        TokenKind::Identifier,
        "x",
        Position::new(3, 7),
    )]);

    assert_eq!(stream.next_token().unwrap().kind, TokenKind::Identifier);

    let eof = stream.next_token().unwrap();
    assert_eq!(eof.kind, TokenKind::EOF);
    assert_eq!(eof.position, Position::new(3, 7));
}

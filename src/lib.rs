#![allow(clippy::module_inception)]

use std::{fmt::Display, path::Path};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantics;
pub mod symbols;
pub mod type_checker;

extern crate regex;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Position { row, col }
    }

    pub fn null() -> Self {
        Position { row: 0, col: 0 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

pub fn get_line_at_position(content: &str, position: Position) -> Option<String> {
    if position.row == 0 {
        return None;
    }

    content
        .split_inclusive('\n')
        .nth(position.row as usize - 1)
        .map(|line| line.trim_end_matches(['\n', '\r']).to_string())
}

pub fn display_error(error: &Error, file: &Path, content: &str) {
    /*
        Error: UnexpectedToken (found `;`, expected Identifier)
        -> program.kn
           |
        20 |     x: int = ;
           | -------------^
    */

    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}:{}", file.to_string_lossy(), position);

    let Some(line_text) = get_line_at_position(content, *position) else {
        return;
    };

    let line_string = position.row.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.col as usize).saturating_sub(removed_whitespace).max(1);

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (String::from(trimmed), string.len() - trimmed.len())
}

#[cfg(test)]
mod tests {
    use crate::Position;

    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\nsecond line\n\nTesting { }\n";

        let line = super::get_line_at_position(content, Position::new(1, 10));
        assert_eq!(line.as_deref(), Some("Hello, world!"));

        let line = super::get_line_at_position(content, Position::new(4, 8));
        assert_eq!(line.as_deref(), Some("Testing { }"));

        assert!(super::get_line_at_position(content, Position::new(9, 1)).is_none());
        assert!(super::get_line_at_position(content, Position::null()).is_none());
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 4));
        assert_eq!(Position::new(7, 3).to_string(), "7:3");
    }
}

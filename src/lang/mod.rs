/*!
# Rust Language Module

This Rust module turns BASIC source text into compacted lines and
per-statement token streams.

*/

/// Tokens a single line may produce.
pub const MAX_TOKENS: usize = 32;

/// Longest accepted source line.
pub const MAX_LINE_LEN: usize = 240;

/// Line number 0 is the immediate line.
pub type LineNumber = u16;

/// A statement inside a program line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: LineNumber,
    pub statement: u8,
}

impl Position {
    pub fn new(line: LineNumber, statement: u8) -> Position {
        Position { line, statement }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.statement)
    }
}

#[macro_use]
mod error;
mod lex;
mod line;
pub mod token;
mod tokenize;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use line::Line;
pub use tokenize::tokenize;

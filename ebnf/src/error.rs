use std::error;
use std::fmt::{self, Display};

use crate::position::Location;

/// The only failure the lexer and expander report. `offset` is a byte index
/// into the grammar text that was being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new<S: Into<String>>(message: S, offset: usize) -> Self {
        SyntaxError {
            message: message.into(),
            offset,
        }
    }

    /// Line and column of the error within `src`.
    pub fn location<'a>(&self, src: &'a str) -> Location<'a> {
        Location::locate(src, self.offset)
    }

    /// Render the error against the source it came from, pointing a caret at
    /// the offending column:
    ///
    /// ```text
    /// line 2: <b> ::= "x
    ///                 ^
    /// unterminated literal, missing closing "
    /// ```
    pub fn render(&self, src: &str) -> String {
        let loc = self.location(src);
        let prefix = format!("line {}: ", loc.line);
        format!(
            "{}{}\n{}^\n{}",
            prefix,
            loc.text,
            " ".repeat(prefix.len() + loc.column - 1),
            self.message
        )
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "syntax error at byte {}: {}", self.offset, self.message)
    }
}

impl error::Error for SyntaxError {}

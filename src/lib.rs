#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod macros;
pub mod pipeline;
pub mod scope;
pub mod type_checker;
pub mod types;

/// A line/column location inside a named source file.
///
/// Lines and columns are 1-based, as the parser reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub col: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, col: u32, file: Rc<String>) -> Self {
        Position { line, col, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn null() -> Self {
        Span::new(Position::null(), Position::null())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{Position, Span};

    #[test]
    fn test_position_display() {
        let position = Position::new(12, 5, Rc::new(String::from("main.lw")));
        assert_eq!(position.to_string(), "main.lw:12:5");
    }

    #[test]
    fn test_span_macro() {
        let span = crate::MK_SPAN!("main.lw", 1, 1, 1, 9);
        assert_eq!(span.start.col, 1);
        assert_eq!(span.end.col, 9);
        assert_eq!(span, Span::new(span.start.clone(), span.end.clone()));
    }
}

//! Utility macros for the compiler.
//!
//! - `MK_SPAN!` - Creates a Span from a file name and start/end line/column pairs
//! - `MK_NODE!` - Boxes a concrete node into a NodeWrapper

/// Creates a Span instance.
///
/// # Arguments
///
/// * `$file` - The source file name
/// * `$start_line`, `$start_col` - Where the span begins
/// * `$end_line`, `$end_col` - Where the span ends
///
/// # Example
///
/// ```ignore
/// let span = MK_SPAN!("main.lw", 3, 5, 3, 17);
/// ```
#[macro_export]
macro_rules! MK_SPAN {
    ($file:expr, $start_line:expr, $start_col:expr, $end_line:expr, $end_col:expr) => {{
        let file = std::rc::Rc::new(String::from($file));
        $crate::Span {
            start: $crate::Position {
                line: $start_line,
                col: $start_col,
                file: std::rc::Rc::clone(&file),
            },
            end: $crate::Position {
                line: $end_line,
                col: $end_col,
                file,
            },
        }
    }};
}

/// Boxes a concrete node into a NodeWrapper.
///
/// # Example
///
/// ```ignore
/// let literal = MK_NODE!(IntegerLiteral::new(scope, 42, i32_type, span));
/// ```
#[macro_export]
macro_rules! MK_NODE {
    ($node:expr) => {
        $crate::ast::ast::NodeWrapper::new($node)
    };
}

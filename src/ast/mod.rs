/// AST (Abstract Syntax Tree) module
/// Contains the checked-and-lowered tree of statements and expressions
///
/// Submodules:
/// - ast: The node trait and its owning wrapper
/// - expressions: Literals, variable uses, address-of and casts
/// - statements: Declarations, returns, blocks and functions
/// - cast: Implicit cast insertion
/// - walk: Generic tree traversal
pub mod ast;
pub mod cast;
pub mod expressions;
pub mod statements;
pub mod walk;

#[cfg(test)]
mod tests;

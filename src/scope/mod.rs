//! Scopes and symbols.
//!
//! Scopes form a tree rooted at the global scope; each owns the symbols
//! declared in it. Function body scopes also carry the declared return type
//! so return statements anywhere inside can find it.
//!
//! Symbols keep the versioned value history lowering uses to hand out scalar
//! values directly instead of going through memory.

pub mod scope;
pub mod symbol;

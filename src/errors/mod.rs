//! Error types and error handling for the compiler.
//!
//! This module defines the errors reported while type checking:
//!
//! - Error structures carrying the offending source span
//! - Specific error variants with messages built from type names
//! - Suggestions attached to each variant
//! - The diagnostics sink and the fatal flag shared across a compilation unit

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;

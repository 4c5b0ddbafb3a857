//! Type registry.
//!
//! Canonical, identity-comparable type descriptors together with:
//!
//! - Kind predicates (void, array, struct, slice, aggregate)
//! - Names and sizes
//! - Debug-type and IR-type representations
//! - The implicit cast oracle and the conversion policy used when lowering casts
//! - Resolution of textual type annotations

pub mod registry;
pub mod types;

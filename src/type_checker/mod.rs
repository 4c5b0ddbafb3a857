//! Type checking and semantic analysis module.
//!
//! Nodes check themselves against a shared [`TypeChecker`](type_checker::TypeChecker):
//!
//! - Children are checked before their parents
//! - Missing types are inferred from initializers
//! - Implicit conversions are made explicit by wrapping values in casts
//! - Mismatches are reported and mark the unit as fatal
//!
//! Errors never stop the walk; the pipeline decides afterwards whether the
//! unit can be lowered.

pub mod type_checker;

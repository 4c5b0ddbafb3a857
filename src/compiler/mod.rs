//! Code generation module for the compiler.
//!
//! This module contains everything checked nodes lower into:
//!
//! - The Compiler context nodes lower themselves through
//! - The IR builder interface and an in-memory module implementing it
//! - The debug-info builder interface and an in-memory record implementing it
//! - An LLVM-backed implementation of both, behind the `llvm` feature

pub mod compiler;
pub mod debug;
pub mod ir;
#[cfg(feature = "llvm")]
pub mod llvm;

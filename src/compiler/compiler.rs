//! Main compiler module.
//!
//! This module contains the Compiler context that nodes lower themselves
//! through. It ties the type registry and scopes produced by type checking to
//! the IR and debug-info builders lowering writes into.

use tracing::{debug, trace};

use crate::{
    ast::ast::{Node, NodeWrapper},
    scope::scope::Scopes,
    types::registry::TypeRegistry,
};

use super::{
    debug::DiBuilder,
    ir::{IrBuilder, ValueId},
};

/// The state shared by every node while a checked unit is lowered.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the borrowed registry, scopes and builders
pub struct Compiler<'a> {
    /// The registry the unit was checked against
    pub types: &'a TypeRegistry,
    /// Scopes of the unit. Lowering records symbol values and debug variables here
    pub scopes: &'a mut Scopes,
    /// The IR builder instructions are emitted through
    pub builder: &'a mut dyn IrBuilder,
    /// The debug-info builder subprograms and variables are registered with
    pub di_builder: &'a mut dyn DiBuilder,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `types` - The registry the unit was checked against
    /// * `scopes` - The scopes the unit's nodes were built in
    /// * `builder` - Destination for emitted instructions
    /// * `di_builder` - Destination for debug metadata
    pub fn new(
        types: &'a TypeRegistry,
        scopes: &'a mut Scopes,
        builder: &'a mut dyn IrBuilder,
        di_builder: &'a mut dyn DiBuilder,
    ) -> Self {
        Compiler {
            types,
            scopes,
            builder,
            di_builder,
        }
    }

    /// Lowers an expression and returns the value it computed.
    ///
    /// # Panics
    ///
    /// Panics if the node produced no value, which only statements do.
    pub fn lower_value(&mut self, node: &dyn Node) -> ValueId {
        match node.lower(self) {
            Some(value) => value,
            None => panic!(
                "{:?} at {} produced no value",
                node.get_node_type(),
                node.get_span().start
            ),
        }
    }

    /// Lowers every top-level node in order.
    pub fn lower(&mut self, nodes: &[NodeWrapper]) {
        for node in nodes {
            trace!("lowering {:?}", node.get_node_type());
            node.lower(self);
        }
        debug!("lowered {} top-level nodes", nodes.len());
    }
}

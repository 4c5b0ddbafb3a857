use crate::{
    compiler::{
        debug::DebugVarId,
        ir::{InsertPoint, ValueId},
    },
    types::types::TypeId,
};

use super::scope::ScopeId;

/// Non-owning handle to a symbol inside its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId {
    pub scope: ScopeId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Addressable storage allocated for the symbol.
    Storage,
    /// A computed value standing in for the symbol directly, without memory traffic.
    Direct,
}

/// One version of a symbol's value, valid from `point` onwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEntry {
    pub point: InsertPoint,
    pub value: ValueId,
    pub kind: ValueKind,
    pub address_query: Option<ValueId>,
    /// Debug variable of the address this value was computed from, if any.
    pub debug_pointer: Option<DebugVarId>,
}

impl ValueEntry {
    pub fn storage(point: InsertPoint, allocation: ValueId) -> Self {
        ValueEntry {
            point,
            value: allocation,
            kind: ValueKind::Storage,
            address_query: None,
            debug_pointer: None,
        }
    }

    pub fn direct(
        point: InsertPoint,
        value: ValueId,
        address_query: Option<ValueId>,
        debug_pointer: Option<DebugVarId>,
    ) -> Self {
        ValueEntry {
            point,
            value,
            kind: ValueKind::Direct,
            address_query,
            debug_pointer,
        }
    }
}

/// Compile-time record of a declared name.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    /// `None` until inference fills it in.
    pub ty: Option<TypeId>,
    pub values: Vec<ValueEntry>,
    pub debug_variable: Option<DebugVarId>,
}

impl Symbol {
    pub fn new(name: String, ty: Option<TypeId>) -> Self {
        Symbol {
            name,
            ty,
            values: vec![],
            debug_variable: None,
        }
    }

    pub fn push_value(&mut self, entry: ValueEntry) {
        debug_assert!(
            self.values
                .last()
                .map_or(true, |last| last.point <= entry.point),
            "value entries of `{}` must be appended in program order",
            self.name
        );
        self.values.push(entry);
    }

    /// The most recent entry at or before `point` in the same function.
    ///
    /// Blocks are numbered in emission order, so this assumes the straight-line
    /// path the lowering pass produces.
    pub fn value_at(&self, point: InsertPoint) -> Option<&ValueEntry> {
        self.values
            .iter()
            .rev()
            .find(|entry| entry.point.function == point.function && entry.point <= point)
    }

    pub fn latest_value(&self) -> Option<&ValueEntry> {
        self.values.last()
    }

    pub fn storage(&self) -> Option<&ValueEntry> {
        self.values
            .iter()
            .find(|entry| entry.kind == ValueKind::Storage)
    }

    pub fn allocation_count(&self) -> usize {
        self.values
            .iter()
            .filter(|entry| entry.kind == ValueKind::Storage)
            .count()
    }
}

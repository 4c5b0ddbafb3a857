//! Debug metadata emitted alongside lowering.
//!
//! Kept as its own output so debug records can be checked independently of
//! the instruction stream.

use super::ir::FunctionId;

/// Handle to a registered debug variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DebugVarId(pub u32);

/// DWARF-style base type encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugEncoding {
    Signed,
    Unsigned,
    Boolean,
    Address,
    Composite,
    None,
}

impl DebugEncoding {
    /// The `DW_ATE_*` constant for this encoding.
    pub fn dwarf_encoding(&self) -> u32 {
        match self {
            DebugEncoding::Address => 0x01,
            DebugEncoding::Boolean => 0x02,
            DebugEncoding::Signed => 0x05,
            DebugEncoding::Unsigned | DebugEncoding::Composite | DebugEncoding::None => 0x08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebugType {
    pub name: String,
    pub size_in_bits: u64,
    pub encoding: DebugEncoding,
}

/// Operations lowering needs from a debug-metadata backend.
pub trait DiBuilder {
    fn create_subprogram(&mut self, function: FunctionId, name: &str, line: u32, col: u32);
    fn create_local_variable(
        &mut self,
        name: &str,
        function: FunctionId,
        ty: &DebugType,
        line: u32,
        col: u32,
    ) -> DebugVarId;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subprogram {
    pub function: FunctionId,
    pub name: String,
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub id: DebugVarId,
    pub name: String,
    pub function: FunctionId,
    pub ty: DebugType,
    pub line: u32,
    pub col: u32,
}

/// In-memory record of every debug entity lowering registered.
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Source file every record belongs to
    pub file: String,
    pub subprograms: Vec<Subprogram>,
    pub variables: Vec<LocalVariable>,
}

impl DebugInfo {
    pub fn new(file: &str) -> Self {
        DebugInfo {
            file: file.to_string(),
            ..Default::default()
        }
    }

    pub fn get_variable(&self, id: DebugVarId) -> Option<&LocalVariable> {
        self.variables.get(id.0 as usize)
    }

    pub fn find_variable(&self, name: &str) -> Option<&LocalVariable> {
        self.variables.iter().rev().find(|variable| variable.name == name)
    }
}

impl DiBuilder for DebugInfo {
    fn create_subprogram(&mut self, function: FunctionId, name: &str, line: u32, col: u32) {
        self.subprograms.push(Subprogram {
            function,
            name: name.to_string(),
            line,
            col,
        });
    }

    fn create_local_variable(
        &mut self,
        name: &str,
        function: FunctionId,
        ty: &DebugType,
        line: u32,
        col: u32,
    ) -> DebugVarId {
        let id = DebugVarId(self.variables.len() as u32);
        self.variables.push(LocalVariable {
            id,
            name: name.to_string(),
            function,
            ty: ty.clone(),
            line,
            col,
        });
        id
    }
}

/// Debug builder used when debug info is switched off: hands out ids and keeps nothing.
#[derive(Debug, Default)]
pub struct DiscardDebugInfo {
    next: u32,
}

impl DiBuilder for DiscardDebugInfo {
    fn create_subprogram(&mut self, _function: FunctionId, _name: &str, _line: u32, _col: u32) {}

    fn create_local_variable(
        &mut self,
        _name: &str,
        _function: FunctionId,
        _ty: &DebugType,
        _line: u32,
        _col: u32,
    ) -> DebugVarId {
        self.next += 1;
        DebugVarId(self.next - 1)
    }
}

//! Target-independent intermediate representation.
//!
//! Lowering talks to the IR only through the [`IrBuilder`] trait and opaque
//! [`ValueId`] handles. [`IrModule`] is the in-memory implementation: it records
//! every emitted operation per function and block and can print itself.

use std::{collections::HashMap, fmt::Display};

use super::debug::DebugVarId;

/// Handle to a value produced by the builder (instruction result, constant or parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// A position in the emitted instruction stream.
///
/// Points order by function, then block (in emission order), then offset
/// inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InsertPoint {
    pub function: FunctionId,
    pub block: BlockId,
    pub offset: usize,
}

/// Lowered representation of a source type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Void,
    Int(u32),
    Ptr,
    Array(Box<IrType>, u64),
    Struct(Vec<IrType>),
}

impl Display for IrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::Int(bits) => write!(f, "i{}", bits),
            IrType::Ptr => write!(f, "ptr"),
            IrType::Array(element, length) => write!(f, "[{} x {}]", length, element),
            IrType::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| field.to_string())
                    .collect::<Vec<String>>();
                write!(f, "{{ {} }}", fields.join(", "))
            }
        }
    }
}

/// Conversion operations an implicit cast can lower to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastOp {
    Truncate,
    SignExtend,
    ZeroExtend,
    /// Same bits, different type (sign change, pointer to/from `void*`).
    Reinterpret,
}

impl Display for CastOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastOp::Truncate => write!(f, "trunc"),
            CastOp::SignExtend => write!(f, "sext"),
            CastOp::ZeroExtend => write!(f, "zext"),
            CastOp::Reinterpret => write!(f, "bitcast"),
        }
    }
}

/// Operations lowering needs from an IR backend.
pub trait IrBuilder {
    /// Starts a new function with an entry block and moves the insert point into it.
    fn begin_function(&mut self, name: &str, return_type: &IrType, params: &[IrType]) -> FunctionId;
    fn get_param(&self, function: FunctionId, index: usize) -> ValueId;
    fn get_insert_point(&self) -> InsertPoint;
    /// Whether the current block already ends in a terminator.
    fn is_terminated(&self) -> bool;

    fn const_int(&mut self, ty: &IrType, value: i64) -> ValueId;
    fn build_ret(&mut self, value: Option<ValueId>) -> ValueId;
    fn build_alloca(&mut self, ty: &IrType) -> ValueId;
    fn build_store(&mut self, ptr: ValueId, value: ValueId) -> ValueId;
    fn build_query_address(&mut self) -> ValueId;
    /// Takes the address of `value`, optionally tagging it with the debug
    /// variable it belongs to.
    fn build_addr(&mut self, value: ValueId, debug_variable: Option<DebugVarId>) -> ValueId;
    fn build_cast(&mut self, op: CastOp, value: ValueId, to: &IrType) -> ValueId;

    /// The debug variable an address produced by [`IrBuilder::build_addr`] carries, if any.
    fn debug_variable_of(&self, value: ValueId) -> Option<DebugVarId>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    Const(i64),
    Alloca(IrType),
    Store { ptr: ValueId, value: ValueId },
    QueryAddress,
    Addr {
        value: ValueId,
        debug_variable: Option<DebugVarId>,
    },
    Cast { op: CastOp, value: ValueId },
    Ret(Option<ValueId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub dest: ValueId,
    pub ty: IrType,
    pub opcode: Opcode,
}

impl Instruction {
    pub fn is_terminator(&self) -> bool {
        matches!(self.opcode, Opcode::Ret(_))
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.opcode {
            Opcode::Const(value) => write!(f, "%{} = const {} {}", self.dest.0, self.ty, value),
            Opcode::Alloca(ty) => write!(f, "%{} = alloca {}", self.dest.0, ty),
            Opcode::Store { ptr, value } => write!(f, "store %{}, %{}", ptr.0, value.0),
            Opcode::QueryAddress => write!(f, "%{} = query.addr", self.dest.0),
            Opcode::Addr {
                value,
                debug_variable: Some(variable),
            } => write!(f, "%{} = addr %{} !dbg {}", self.dest.0, value.0, variable.0),
            Opcode::Addr { value, .. } => write!(f, "%{} = addr %{}", self.dest.0, value.0),
            Opcode::Cast { op, value } => {
                write!(f, "%{} = {} %{} to {}", self.dest.0, op, value.0, self.ty)
            }
            Opcode::Ret(Some(value)) => write!(f, "ret %{}", value.0),
            Opcode::Ret(None) => write!(f, "ret void"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IrBlock {
    pub id: BlockId,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone)]
pub struct IrFunction {
    pub id: FunctionId,
    pub name: String,
    pub return_type: IrType,
    pub params: Vec<ValueId>,
    pub blocks: Vec<IrBlock>,
}

impl IrFunction {
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }
}

/// In-memory IR module recording everything lowering emits.
#[derive(Debug, Default)]
pub struct IrModule {
    pub name: String,
    functions: Vec<IrFunction>,
    value_types: Vec<IrType>,
    debug_links: HashMap<ValueId, DebugVarId>,
    current: Option<FunctionId>,
}

impl IrModule {
    pub fn new(name: &str) -> Self {
        IrModule {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn functions(&self) -> &[IrFunction] {
        &self.functions
    }

    pub fn get_function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn value_type(&self, value: ValueId) -> &IrType {
        &self.value_types[value.0 as usize]
    }

    fn new_value(&mut self, ty: IrType) -> ValueId {
        let id = ValueId(self.value_types.len() as u32);
        self.value_types.push(ty);
        id
    }

    fn current_block(&mut self) -> &mut IrBlock {
        let function = self
            .current
            .expect("instruction emitted outside of a function");
        self.functions[function.0 as usize]
            .blocks
            .last_mut()
            .expect("function without an entry block")
    }

    fn push(&mut self, ty: IrType, opcode: Opcode) -> ValueId {
        let dest = self.new_value(ty.clone());
        self.current_block()
            .instructions
            .push(Instruction { dest, ty, opcode });
        dest
    }
}

impl IrBuilder for IrModule {
    fn begin_function(&mut self, name: &str, return_type: &IrType, params: &[IrType]) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        let params = params
            .iter()
            .map(|param| self.new_value(param.clone()))
            .collect();

        self.functions.push(IrFunction {
            id,
            name: name.to_string(),
            return_type: return_type.clone(),
            params,
            blocks: vec![IrBlock {
                id: BlockId(0),
                instructions: vec![],
            }],
        });
        self.current = Some(id);
        id
    }

    fn get_param(&self, function: FunctionId, index: usize) -> ValueId {
        self.functions[function.0 as usize].params[index]
    }

    fn get_insert_point(&self) -> InsertPoint {
        let function = self
            .current
            .expect("insert point requested outside of a function");
        let block = self.functions[function.0 as usize]
            .blocks
            .last()
            .expect("function without an entry block");

        InsertPoint {
            function,
            block: block.id,
            offset: block.instructions.len(),
        }
    }

    fn is_terminated(&self) -> bool {
        self.current
            .and_then(|function| self.functions[function.0 as usize].blocks.last())
            .and_then(|block| block.instructions.last())
            .is_some_and(|instruction| instruction.is_terminator())
    }

    fn const_int(&mut self, ty: &IrType, value: i64) -> ValueId {
        self.push(ty.clone(), Opcode::Const(value))
    }

    fn build_ret(&mut self, value: Option<ValueId>) -> ValueId {
        self.push(IrType::Void, Opcode::Ret(value))
    }

    fn build_alloca(&mut self, ty: &IrType) -> ValueId {
        self.push(IrType::Ptr, Opcode::Alloca(ty.clone()))
    }

    fn build_store(&mut self, ptr: ValueId, value: ValueId) -> ValueId {
        self.push(IrType::Void, Opcode::Store { ptr, value })
    }

    fn build_query_address(&mut self) -> ValueId {
        self.push(IrType::Ptr, Opcode::QueryAddress)
    }

    fn build_addr(&mut self, value: ValueId, debug_variable: Option<DebugVarId>) -> ValueId {
        let dest = self.push(
            IrType::Ptr,
            Opcode::Addr {
                value,
                debug_variable,
            },
        );
        if let Some(variable) = debug_variable {
            self.debug_links.insert(dest, variable);
        }
        dest
    }

    fn build_cast(&mut self, op: CastOp, value: ValueId, to: &IrType) -> ValueId {
        self.push(to.clone(), Opcode::Cast { op, value })
    }

    fn debug_variable_of(&self, value: ValueId) -> Option<DebugVarId> {
        self.debug_links.get(&value).copied()
    }
}

impl Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "module {}", self.name)?;
        for function in &self.functions {
            let params = function
                .params
                .iter()
                .map(|param| format!("{} %{}", self.value_type(*param), param.0))
                .collect::<Vec<String>>();

            writeln!(
                f,
                "\nfn {}({}) -> {} {{",
                function.name,
                params.join(", "),
                function.return_type
            )?;
            for block in &function.blocks {
                writeln!(f, "bb{}:", block.id.0)?;
                for instruction in &block.instructions {
                    writeln!(f, "  {}", instruction)?;
                }
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

//! LLVM backend.
//!
//! Implements [`IrBuilder`] and [`DiBuilder`] on top of inkwell so checked
//! units can be lowered straight into an LLVM module.

use std::collections::HashMap;

use inkwell::{
    attributes::{Attribute, AttributeLoc},
    builder::Builder,
    context::Context,
    debug_info::{
        AsDIScope, DICompileUnit, DIFlags, DIFlagsConstants, DILocalVariable, DISubprogram,
        DWARFEmissionKind, DWARFSourceLanguage, DebugInfoBuilder,
    },
    module::{FlagBehavior, Module},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{BasicValueEnum, FunctionValue},
    AddressSpace,
};

use super::{
    debug::{DebugType, DebugVarId, DiBuilder},
    ir::{BlockId, CastOp, FunctionId, InsertPoint, IrBuilder, IrType, ValueId},
};

/// Emits instructions into an LLVM module.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the borrowed module
/// * `'ctx` - Lifetime of the LLVM context
pub struct LlvmBuilder<'a, 'ctx> {
    context: &'ctx Context,
    module: &'a Module<'ctx>,
    builder: Builder<'ctx>,

    /// `None` for instructions that produce no value
    values: Vec<Option<BasicValueEnum<'ctx>>>,
    functions: Vec<FunctionValue<'ctx>>,
    params: Vec<Vec<ValueId>>,
    debug_links: HashMap<ValueId, DebugVarId>,

    current: Option<FunctionId>,
    /// Values emitted into the current function so far
    offset: usize,
}

impl<'a, 'ctx> LlvmBuilder<'a, 'ctx> {
    pub fn new(context: &'ctx Context, module: &'a Module<'ctx>) -> Self {
        LlvmBuilder {
            context,
            module,
            builder: context.create_builder(),
            values: vec![],
            functions: vec![],
            params: vec![],
            debug_links: HashMap::new(),
            current: None,
            offset: 0,
        }
    }

    /// Converts an IR type to an LLVM basic type.
    ///
    /// # Panics
    ///
    /// Panics on `void`, which has no basic type.
    pub fn convert_type(&self, ty: &IrType) -> BasicTypeEnum<'ctx> {
        match ty {
            IrType::Void => panic!("Attempted to convert void to a basic type"),
            IrType::Int(bits) => self.context.custom_width_int_type(*bits).into(),
            IrType::Ptr => self
                .context
                .i8_type()
                .ptr_type(AddressSpace::default())
                .into(),
            IrType::Array(element, length) => self
                .convert_type(element)
                .array_type(*length as u32)
                .into(),
            IrType::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| self.convert_type(field))
                    .collect::<Vec<_>>();
                self.context.struct_type(&fields, false).into()
            }
        }
    }

    fn function_type(&self, return_type: &IrType, params: &[IrType]) -> FunctionType<'ctx> {
        let params = params
            .iter()
            .map(|param| self.convert_type(param).into())
            .collect::<Vec<BasicMetadataTypeEnum>>();

        match return_type {
            IrType::Void => self.context.void_type().fn_type(&params, false),
            _ => self.convert_type(return_type).fn_type(&params, false),
        }
    }

    fn value(&self, value: ValueId) -> BasicValueEnum<'ctx> {
        match self.values[value.0 as usize] {
            Some(value) => value,
            None => panic!("%{} does not produce a value", value.0),
        }
    }

    fn record(&mut self, value: Option<BasicValueEnum<'ctx>>) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(value);
        self.offset += 1;
        id
    }
}

impl<'a, 'ctx> IrBuilder for LlvmBuilder<'a, 'ctx> {
    fn begin_function(&mut self, name: &str, return_type: &IrType, params: &[IrType]) -> FunctionId {
        let function_type = self.function_type(return_type, params);
        let function = self
            .module
            .get_function(name)
            .unwrap_or_else(|| self.module.add_function(name, function_type, None));

        let attributes = [
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("uwtable"), 0),
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("nounwind"), 0),
        ];
        for attribute in attributes.iter() {
            function.add_attribute(AttributeLoc::Function, *attribute);
        }

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(function);
        self.current = Some(id);

        let params = (0..params.len())
            .map(|index| {
                let param = function.get_nth_param(index as u32);
                self.record(param)
            })
            .collect();
        self.params.push(params);
        self.offset = 0;
        id
    }

    fn get_param(&self, function: FunctionId, index: usize) -> ValueId {
        self.params[function.0 as usize][index]
    }

    fn get_insert_point(&self) -> InsertPoint {
        InsertPoint {
            function: self
                .current
                .expect("insert point requested outside of a function"),
            block: BlockId(0),
            offset: self.offset,
        }
    }

    fn is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    fn const_int(&mut self, ty: &IrType, value: i64) -> ValueId {
        let constant = self
            .convert_type(ty)
            .into_int_type()
            .const_int(value as u64, true);
        self.record(Some(constant.into()))
    }

    fn build_ret(&mut self, value: Option<ValueId>) -> ValueId {
        let value = value.map(|value| self.value(value));
        match &value {
            Some(value) => self.builder.build_return(Some(value)),
            None => self.builder.build_return(None),
        }
        .expect("failed to build return");
        self.record(None)
    }

    fn build_alloca(&mut self, ty: &IrType) -> ValueId {
        let allocation = self
            .builder
            .build_alloca(self.convert_type(ty), "")
            .expect("failed to build alloca");
        self.record(Some(allocation.into()))
    }

    fn build_store(&mut self, ptr: ValueId, value: ValueId) -> ValueId {
        let ptr = self.value(ptr).into_pointer_value();
        let value = self.value(value);
        self.builder
            .build_store(ptr, value)
            .expect("failed to build store");
        self.record(None)
    }

    fn build_query_address(&mut self) -> ValueId {
        // Placeholder until something takes the address; costs nothing in LLVM
        let placeholder = self
            .context
            .i8_type()
            .ptr_type(AddressSpace::default())
            .const_null();
        self.record(Some(placeholder.into()))
    }

    fn build_addr(&mut self, value: ValueId, debug_variable: Option<DebugVarId>) -> ValueId {
        let value = self.value(value);
        let storage = self
            .builder
            .build_alloca(value.get_type(), "")
            .expect("failed to build alloca");
        self.builder
            .build_store(storage, value)
            .expect("failed to build store");

        let dest = self.record(Some(storage.into()));
        if let Some(variable) = debug_variable {
            self.debug_links.insert(dest, variable);
        }
        dest
    }

    fn build_cast(&mut self, op: CastOp, value: ValueId, to: &IrType) -> ValueId {
        let value = self.value(value);
        let to = self.convert_type(to);

        let cast = match op {
            CastOp::Truncate => self
                .builder
                .build_int_truncate(value.into_int_value(), to.into_int_type(), "")
                .map(BasicValueEnum::from),
            CastOp::SignExtend => self
                .builder
                .build_int_s_extend(value.into_int_value(), to.into_int_type(), "")
                .map(BasicValueEnum::from),
            CastOp::ZeroExtend => self
                .builder
                .build_int_z_extend(value.into_int_value(), to.into_int_type(), "")
                .map(BasicValueEnum::from),
            CastOp::Reinterpret => self.builder.build_bitcast(value, to, ""),
        }
        .expect("failed to build cast");

        self.record(Some(cast))
    }

    fn debug_variable_of(&self, value: ValueId) -> Option<DebugVarId> {
        self.debug_links.get(&value).copied()
    }
}

/// Registers debug metadata through LLVM's debug-info builder.
pub struct LlvmDebugInfo<'a, 'ctx> {
    module: &'a Module<'ctx>,
    builder: DebugInfoBuilder<'ctx>,
    compile_unit: DICompileUnit<'ctx>,

    subprograms: HashMap<FunctionId, DISubprogram<'ctx>>,
    variables: Vec<DILocalVariable<'ctx>>,
}

impl<'a, 'ctx> LlvmDebugInfo<'a, 'ctx> {
    pub fn new(context: &'ctx Context, module: &'a Module<'ctx>, file: &str, directory: &str) -> Self {
        module.add_basic_value_flag(
            "Debug Info Version",
            FlagBehavior::Warning,
            context.i32_type().const_int(3, false),
        );

        let (builder, compile_unit) = module.create_debug_info_builder(
            true,
            DWARFSourceLanguage::C,
            file,
            directory,
            env!("CARGO_PKG_NAME"),
            false,
            "",
            0,
            "",
            DWARFEmissionKind::Full,
            0,
            false,
            false,
            "",
            "",
        );

        LlvmDebugInfo {
            module,
            builder,
            compile_unit,
            subprograms: HashMap::new(),
            variables: vec![],
        }
    }

    /// Resolves every pending debug node. Call once lowering is done.
    pub fn finalize(&self) {
        self.builder.finalize();
    }

    pub fn get_variable(&self, id: DebugVarId) -> Option<DILocalVariable<'ctx>> {
        self.variables.get(id.0 as usize).copied()
    }
}

impl<'a, 'ctx> DiBuilder for LlvmDebugInfo<'a, 'ctx> {
    fn create_subprogram(&mut self, function: FunctionId, name: &str, line: u32, _col: u32) {
        let file = self.compile_unit.get_file();
        let subroutine_type = self
            .builder
            .create_subroutine_type(file, None, &[], DIFlags::PUBLIC);
        let subprogram = self.builder.create_function(
            self.compile_unit.as_debug_info_scope(),
            name,
            None,
            file,
            line,
            subroutine_type,
            false,
            true,
            line,
            DIFlags::PUBLIC,
            false,
        );

        if let Some(value) = self.module.get_function(name) {
            value.set_subprogram(subprogram);
        }
        self.subprograms.insert(function, subprogram);
    }

    fn create_local_variable(
        &mut self,
        name: &str,
        function: FunctionId,
        ty: &DebugType,
        line: u32,
        _col: u32,
    ) -> DebugVarId {
        let scope = match self.subprograms.get(&function) {
            Some(subprogram) => subprogram.as_debug_info_scope(),
            None => self.compile_unit.as_debug_info_scope(),
        };

        // LLVM rejects zero-sized basic types
        let basic_type = self
            .builder
            .create_basic_type(
                &ty.name,
                ty.size_in_bits.max(8),
                ty.encoding.dwarf_encoding(),
                DIFlags::PUBLIC,
            )
            .expect("failed to create debug type");

        let variable = self.builder.create_auto_variable(
            scope,
            name,
            self.compile_unit.get_file(),
            line,
            basic_type.as_type(),
            true,
            DIFlags::ZERO,
            0,
        );

        let id = DebugVarId(self.variables.len() as u32);
        self.variables.push(variable);
        id
    }
}

//! Two-phase compilation of a unit: check everything, then lower only if
//! nothing fatal was reported.

use tracing::{debug, info};

use crate::{
    ast::ast::NodeWrapper,
    compiler::{
        compiler::Compiler,
        debug::{DebugInfo, DiBuilder, DiscardDebugInfo},
        ir::{IrBuilder, IrModule},
    },
    errors::diagnostics::Diagnostics,
    scope::scope::Scopes,
    type_checker::type_checker::TypeChecker,
    types::registry::TypeRegistry,
};

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name given to the emitted module
    pub module_name: String,
    /// File the unit was parsed from, recorded in debug info
    pub source_file: String,
    /// When false, debug records are handed out but not kept
    pub emit_debug_info: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            module_name: String::from("main"),
            source_file: String::from("main.lw"),
            emit_debug_info: true,
        }
    }
}

/// What a successful compilation produces.
#[derive(Debug)]
pub struct CompiledUnit {
    pub module: IrModule,
    pub debug_info: DebugInfo,
    /// Non-fatal diagnostics reported while checking
    pub diagnostics: Diagnostics,
}

/// Runs the type-check phase over every node of the unit.
pub fn check(unit: &mut [NodeWrapper], types: &mut TypeRegistry, scopes: &mut Scopes) -> Diagnostics {
    let mut type_checker = TypeChecker::new(types, scopes);
    type_checker.check(unit);
    type_checker.into_diagnostics()
}

/// Checks the unit and, when no fatal error was reported, lowers it into the given builders.
///
/// Returns the diagnostics either way; `Err` means nothing was lowered.
pub fn compile_with(
    unit: &mut [NodeWrapper],
    types: &mut TypeRegistry,
    scopes: &mut Scopes,
    builder: &mut dyn IrBuilder,
    di_builder: &mut dyn DiBuilder,
) -> Result<Diagnostics, Diagnostics> {
    debug!("type checking {} top-level nodes", unit.len());
    let diagnostics = check(unit, types, scopes);

    if diagnostics.has_fatal() {
        info!(
            errors = diagnostics.len(),
            "fatal errors reported, skipping lowering"
        );
        return Err(diagnostics);
    }

    let mut compiler = Compiler::new(types, scopes, builder, di_builder);
    compiler.lower(unit);
    Ok(diagnostics)
}

/// Compiles the unit into an in-memory module.
///
/// # Example
///
/// ```ignore
/// let unit = compile(&mut nodes, &mut types, &mut scopes, &CompileOptions::default())?;
/// println!("{}", unit.module);
/// ```
pub fn compile(
    unit: &mut [NodeWrapper],
    types: &mut TypeRegistry,
    scopes: &mut Scopes,
    options: &CompileOptions,
) -> Result<CompiledUnit, Diagnostics> {
    let mut module = IrModule::new(&options.module_name);
    let mut debug_info = DebugInfo::new(&options.source_file);

    let diagnostics = if options.emit_debug_info {
        compile_with(unit, types, scopes, &mut module, &mut debug_info)?
    } else {
        compile_with(unit, types, scopes, &mut module, &mut DiscardDebugInfo::default())?
    };

    info!(
        module = options.module_name.as_str(),
        functions = module.functions().len(),
        "compiled"
    );
    Ok(CompiledUnit {
        module,
        debug_info,
        diagnostics,
    })
}

use std::any::Any;

use tracing::trace;

use crate::{
    compiler::{compiler::Compiler, ir::ValueId},
    errors::errors::ErrorImpl,
    scope::{
        scope::{ScopeId, Scopes},
        symbol::{Symbol, SymbolId},
    },
    type_checker::type_checker::TypeChecker,
    types::types::TypeId,
    Span,
};

use super::ast::{Node, NodeType, NodeWrapper};

// LITERALS

/// Integer Literal
/// Its type is fixed when the literal is built.
#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub scope: ScopeId,
    pub value: i64,
    pub ty: TypeId,
    pub span: Span,
}

impl IntegerLiteral {
    pub fn new(scope: ScopeId, value: i64, ty: TypeId, span: Span) -> Self {
        IntegerLiteral {
            scope,
            value,
            ty,
            span,
        }
    }
}

impl Node for IntegerLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::IntegerLiteral
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_scope(&self) -> ScopeId {
        self.scope
    }
    fn get_type(&self) -> Option<TypeId> {
        Some(self.ty)
    }
    fn children(&self) -> Vec<&dyn Node> {
        vec![]
    }
    fn type_check(&mut self, _type_checker: &mut TypeChecker<'_>) {}
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let ir_type = compiler.types.get_ir_type(self.ty);
        Some(compiler.builder.const_int(&ir_type, self.value))
    }
}

/// Boolean Literal
#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub scope: ScopeId,
    pub value: bool,
    pub ty: Option<TypeId>,
    pub span: Span,
}

impl BooleanLiteral {
    pub fn new(scope: ScopeId, value: bool, span: Span) -> Self {
        BooleanLiteral {
            scope,
            value,
            ty: None,
            span,
        }
    }
}

impl Node for BooleanLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::BooleanLiteral
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_scope(&self) -> ScopeId {
        self.scope
    }
    fn get_type(&self) -> Option<TypeId> {
        self.ty
    }
    fn children(&self) -> Vec<&dyn Node> {
        vec![]
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        self.ty = Some(type_checker.types.bool_type());
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let ir_type = compiler.types.get_ir_type(compiler.types.bool_type());
        Some(compiler.builder.const_int(&ir_type, self.value as i64))
    }
}

// VARIABLES

/// Variable Expression
/// A use of a declared name. The name is resolved against the scope it was
/// written in when the expression is built, so later shadowing declarations
/// don't affect it.
#[derive(Debug, Clone)]
pub struct VariableExpr {
    pub scope: ScopeId,
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub ty: Option<TypeId>,
    pub span: Span,
}

impl VariableExpr {
    pub fn new(scopes: &Scopes, scope: ScopeId, name: &str, span: Span) -> Self {
        VariableExpr {
            scope,
            name: name.to_string(),
            symbol: scopes.resolve(scope, name),
            ty: None,
            span,
        }
    }
}

impl Node for VariableExpr {
    fn get_node_type(&self) -> NodeType {
        NodeType::Variable
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_scope(&self) -> ScopeId {
        self.scope
    }
    fn get_type(&self) -> Option<TypeId> {
        self.ty
    }
    fn children(&self) -> Vec<&dyn Node> {
        vec![]
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        let Some(symbol) = self.symbol else {
            // Reported on the first check
            if self.ty.is_some() {
                return;
            }
            type_checker.fatal_error(
                ErrorImpl::VariableNotDeclared {
                    variable: self.name.clone(),
                },
                self.span.clone(),
            );
            self.ty = Some(type_checker.types.error_type());
            return;
        };

        // A declaration that failed to infer its type has reported that already
        self.ty = Some(
            type_checker
                .scopes
                .symbol(symbol)
                .ty
                .unwrap_or_else(|| type_checker.types.error_type()),
        );
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let symbol = compiler.scopes.symbol(self.symbol?);
        Some(current_value(compiler, symbol))
    }
}

/// The value standing in for `symbol` at the current insert point.
///
/// Aggregates are always read through their storage. Scalars use the latest
/// direct value recorded before the insert point.
fn current_value(compiler: &Compiler<'_>, symbol: &Symbol) -> ValueId {
    let aggregate = symbol
        .ty
        .is_some_and(|ty| compiler.types.is_aggregate_type(ty));

    let entry = if aggregate {
        symbol.storage()
    } else {
        symbol.value_at(compiler.builder.get_insert_point())
    };

    match entry {
        Some(entry) => entry.value,
        None => panic!("`{}` has no value at this point", symbol.name),
    }
}

/// Address Of Expression
/// `&name`. The operand is expected to be a variable.
#[derive(Debug)]
pub struct AddressOfExpr {
    pub scope: ScopeId,
    pub operand: NodeWrapper,
    pub ty: Option<TypeId>,
    pub span: Span,
}

impl AddressOfExpr {
    pub fn new(scope: ScopeId, operand: NodeWrapper, span: Span) -> Self {
        AddressOfExpr {
            scope,
            operand,
            ty: None,
            span,
        }
    }
}

impl Node for AddressOfExpr {
    fn get_node_type(&self) -> NodeType {
        NodeType::AddressOf
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_scope(&self) -> ScopeId {
        self.scope
    }
    fn get_type(&self) -> Option<TypeId> {
        self.ty
    }
    fn children(&self) -> Vec<&dyn Node> {
        vec![&*self.operand]
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        self.operand.type_check(type_checker);

        let error_type = type_checker.types.error_type();
        self.ty = Some(match self.operand.get_type() {
            Some(pointee) if pointee != error_type => type_checker.types.pointer_to(pointee),
            _ => error_type,
        });
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let Some(variable) = self.operand.downcast_ref::<VariableExpr>() else {
            let value = compiler.lower_value(&*self.operand);
            return Some(compiler.builder.build_addr(value, None));
        };

        let symbol = compiler.scopes.symbol(variable.symbol?);
        let value = current_value(compiler, symbol);
        if symbol.storage().is_some() {
            return Some(value);
        }

        let debug_variable = symbol.debug_variable;
        Some(compiler.builder.build_addr(value, debug_variable))
    }
}

// CASTS

/// Cast Expression
/// Converts the value of its child into `dest_type`.
///
/// Built by [`cast`](super::cast::cast) once the conversion is known to be legal,
/// never by the parser.
#[derive(Debug)]
pub struct CastExpr {
    pub scope: ScopeId,
    pub value: NodeWrapper,
    pub dest_type: TypeId,
    pub span: Span,
}

impl CastExpr {
    pub fn new(scope: ScopeId, value: NodeWrapper, dest_type: TypeId, span: Span) -> Self {
        CastExpr {
            scope,
            value,
            dest_type,
            span,
        }
    }
}

impl Node for CastExpr {
    fn get_node_type(&self) -> NodeType {
        NodeType::Cast
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_scope(&self) -> ScopeId {
        self.scope
    }
    fn get_type(&self) -> Option<TypeId> {
        Some(self.dest_type)
    }
    fn children(&self) -> Vec<&dyn Node> {
        vec![&*self.value]
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        self.value.type_check(type_checker);
    }
    fn trivially_compatible(&self, _type_checker: &TypeChecker<'_>, dest: TypeId) -> bool {
        dest == self.dest_type
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let value = compiler.lower_value(&*self.value);
        let Some(from) = self.value.get_type() else {
            return Some(value);
        };
        if from == self.dest_type {
            return Some(value);
        }

        let op = compiler
            .types
            .conversion(from, self.dest_type)
            .unwrap_or_else(|| {
                panic!(
                    "no conversion from '{}' to '{}'",
                    compiler.types.get_name(from),
                    compiler.types.get_name(self.dest_type)
                )
            });
        trace!(
            "casting '{}' to '{}' with {}",
            compiler.types.get_name(from),
            compiler.types.get_name(self.dest_type),
            op
        );

        let ir_type = compiler.types.get_ir_type(self.dest_type);
        Some(compiler.builder.build_cast(op, value, &ir_type))
    }
}

use std::any::Any;

use tracing::trace;

use crate::{
    compiler::{compiler::Compiler, ir::ValueId},
    errors::errors::ErrorImpl,
    scope::{
        scope::{ScopeId, Scopes},
        symbol::{Symbol, SymbolId, ValueEntry},
    },
    type_checker::type_checker::TypeChecker,
    types::types::TypeId,
    Span,
};

use super::{
    ast::{Node, NodeType, NodeWrapper},
    cast::cast,
};

/// Expression Statement
/// An expression evaluated for its side effects.
#[derive(Debug)]
pub struct ExpressionStmt {
    pub expression: NodeWrapper,
    pub span: Span,
    outside_function: bool,
}

impl ExpressionStmt {
    pub fn new(expression: NodeWrapper) -> Self {
        let span = expression.get_span().clone();
        ExpressionStmt {
            expression,
            span,
            outside_function: false,
        }
    }
}

impl Node for ExpressionStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::ExpressionStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn get_scope(&self) -> ScopeId {
        self.expression.get_scope()
    }
    fn get_type(&self) -> Option<TypeId> {
        None
    }
    fn children(&self) -> Vec<&dyn Node> {
        vec![&*self.expression]
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        if self.outside_function {
            return;
        }
        let scope = self.expression.get_scope();
        let statement = String::from("expression statement");
        if !type_checker.require_function(scope, statement, &self.span) {
            self.outside_function = true;
            return;
        }
        self.expression.type_check(type_checker);
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        self.expression.lower(compiler);
        None
    }
}

/// Variable Declaration Statement
///
/// Declares its symbol in the enclosing scope when built. The type is either
/// written out or inferred from the initializer during type checking.
#[derive(Debug)]
pub struct VarDeclStmt {
    pub scope: ScopeId,
    pub name: String,
    pub ty: Option<TypeId>,
    pub initializer: Option<NodeWrapper>,
    pub symbol: SymbolId,
    pub span: Span,
    outside_function: bool,
}

impl VarDeclStmt {
    pub fn new(
        scopes: &mut Scopes,
        scope: ScopeId,
        name: &str,
        ty: Option<TypeId>,
        initializer: Option<NodeWrapper>,
        span: Span,
    ) -> Self {
        let symbol = scopes.declare(scope, Symbol::new(name.to_string(), ty));
        VarDeclStmt {
            scope,
            name: name.to_string(),
            ty,
            initializer,
            symbol,
            span,
            outside_function: false,
        }
    }
}

impl Node for VarDeclStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::VarDeclStmt
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
        self.initializer.as_deref().into_iter().collect()
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        if self.outside_function {
            return;
        }
        let statement = format!("declaration of '{}'", self.name);
        if !type_checker.require_function(self.scope, statement, &self.span) {
            self.outside_function = true;
            return;
        }

        let mut initializer_checked = false;

        if self.ty.is_none() {
            let Some(initializer) = self.initializer.as_mut() else {
                type_checker.fatal_error(
                    ErrorImpl::UnknownType {
                        object: self.name.clone(),
                    },
                    self.span.clone(),
                );
                self.ty = Some(type_checker.types.error_type());
                return;
            };

            initializer.type_check(type_checker);
            initializer_checked = true;

            let inferred = initializer
                .get_type()
                .unwrap_or_else(|| type_checker.types.error_type());
            trace!(
                "inferred '{}' for `{}`",
                type_checker.types.get_name(inferred),
                self.name
            );
            self.ty = Some(inferred);
            type_checker.scopes.symbol_mut(self.symbol).ty = Some(inferred);
        }

        let Some(var_type) = self.ty else {
            return;
        };
        let Some(initializer) = self.initializer.as_mut() else {
            return;
        };
        if !initializer_checked {
            initializer.type_check(type_checker);
        }

        let value_type = initializer
            .get_type()
            .unwrap_or_else(|| type_checker.types.error_type());
        if value_type == var_type
            || type_checker.types.is_error_type(value_type)
            || type_checker.types.is_error_type(var_type)
        {
            return;
        }

        if initializer.can_implicit_cast(type_checker, var_type) {
            if let Some(initializer) = self.initializer.take() {
                self.initializer = Some(cast(initializer, var_type, type_checker));
            }
        } else {
            type_checker.fatal_error(
                ErrorImpl::DeclarationTypeMismatch {
                    expected: type_checker.types.get_name(var_type).to_string(),
                    received: type_checker.types.get_name(value_type).to_string(),
                },
                initializer.get_span().clone(),
            );
        }
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let var_type = self
            .ty
            .unwrap_or_else(|| panic!("`{}` reached lowering without a type", self.name));
        let point = compiler.builder.get_insert_point();

        let debug_type = compiler.types.get_debug_type(var_type);
        let debug_variable = compiler.di_builder.create_local_variable(
            &self.name,
            point.function,
            &debug_type,
            self.span.start.line,
            self.span.start.col,
        );
        compiler.scopes.symbol_mut(self.symbol).debug_variable = Some(debug_variable);

        if compiler.types.is_aggregate_type(var_type) {
            let ir_type = compiler.types.get_ir_type(var_type);
            let allocation = compiler.builder.build_alloca(&ir_type);
            trace!("allocated storage %{} for `{}`", allocation.0, self.name);
            let point = compiler.builder.get_insert_point();
            compiler
                .scopes
                .symbol_mut(self.symbol)
                .push_value(ValueEntry::storage(point, allocation));

            if let Some(initializer) = &self.initializer {
                let value = compiler.lower_value(&**initializer);
                compiler.builder.build_store(allocation, value);
            }
            return None;
        }

        // Scalars without an initializer get no value until first assigned
        let Some(initializer) = &self.initializer else {
            return None;
        };

        let address_query = compiler.builder.build_query_address();
        let value = compiler.lower_value(&**initializer);
        let debug_pointer = compiler.builder.debug_variable_of(value);
        let point = compiler.builder.get_insert_point();
        trace!("`{}` is %{} from offset {}", self.name, value.0, point.offset);
        compiler.scopes.symbol_mut(self.symbol).push_value(ValueEntry::direct(
            point,
            value,
            Some(address_query),
            debug_pointer,
        ));
        None
    }
}

/// Return Statement
#[derive(Debug)]
pub struct ReturnStmt {
    pub scope: ScopeId,
    pub value: Option<NodeWrapper>,
    pub span: Span,
    outside_function: bool,
}

impl ReturnStmt {
    pub fn new(scope: ScopeId, value: Option<NodeWrapper>, span: Span) -> Self {
        ReturnStmt {
            scope,
            value,
            span,
            outside_function: false,
        }
    }
}

impl Node for ReturnStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::ReturnStmt
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
        None
    }
    fn children(&self) -> Vec<&dyn Node> {
        self.value.as_deref().into_iter().collect()
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        if self.outside_function {
            return;
        }
        let Some(return_type) = type_checker.scopes.get_current_return_type(self.scope) else {
            type_checker.fatal_error(
                ErrorImpl::OutsideFunction {
                    statement: String::from("return statement"),
                },
                self.span.clone(),
            );
            self.outside_function = true;
            return;
        };

        if let Some(value) = self.value.as_mut() {
            value.type_check(type_checker);
        }

        let error_type = type_checker.types.error_type();

        if type_checker.types.is_void_type(return_type) {
            let Some(value) = &self.value else {
                return;
            };
            let value_type = value.get_type().unwrap_or(error_type);
            if !type_checker.types.is_void_type(value_type) && value_type != error_type {
                type_checker.fatal_error(
                    ErrorImpl::VoidReturnMismatch {
                        expected: String::from("void"),
                        received: type_checker.types.get_name(value_type).to_string(),
                    },
                    value.get_span().clone(),
                );
            }
            return;
        }

        let Some(value) = self.value.as_mut() else {
            type_checker.fatal_error(
                ErrorImpl::VoidReturnMismatch {
                    expected: type_checker.types.get_name(return_type).to_string(),
                    received: String::from("void"),
                },
                self.span.clone(),
            );
            return;
        };

        let value_type = value.get_type().unwrap_or(error_type);
        if value_type == return_type || value_type == error_type || return_type == error_type {
            return;
        }

        if value.can_implicit_cast(type_checker, return_type) {
            if let Some(value) = self.value.take() {
                self.value = Some(cast(value, return_type, type_checker));
            }
        } else {
            type_checker.fatal_error(
                ErrorImpl::ReturnTypeMismatch {
                    expected: type_checker.types.get_name(return_type).to_string(),
                    received: type_checker.types.get_name(value_type).to_string(),
                },
                value.get_span().clone(),
            );
        }
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        let value = self
            .value
            .as_ref()
            .map(|value| compiler.lower_value(&**value));
        Some(compiler.builder.build_ret(value))
    }
}

/// Block Statement
/// A braced list of statements with a scope of its own.
#[derive(Debug)]
pub struct BlockStmt {
    pub scope: ScopeId,
    pub body: Vec<NodeWrapper>,
    pub span: Span,
}

impl BlockStmt {
    /// `scope` is the block's own scope, created by the caller before the body is built.
    pub fn new(scope: ScopeId, body: Vec<NodeWrapper>, span: Span) -> Self {
        BlockStmt { scope, body, span }
    }
}

impl Node for BlockStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::BlockStmt
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
        None
    }
    fn children(&self) -> Vec<&dyn Node> {
        self.body.iter().map(|stmt| &**stmt).collect()
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        for stmt in self.body.iter_mut() {
            stmt.type_check(type_checker);
        }
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        for stmt in &self.body {
            stmt.lower(compiler);
        }
        None
    }
}

/// Function Parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeId,
    pub symbol: SymbolId,
    pub span: Span,
}

/// Function Declaration Statement
///
/// Owns the function's scope. Parameters are declared in it when the
/// declaration is built, so the body can be built against [`FnDeclStmt::body_scope`].
#[derive(Debug)]
pub struct FnDeclStmt {
    pub scope: ScopeId,
    pub body_scope: ScopeId,
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeId,
    pub body: Vec<NodeWrapper>,
    pub span: Span,
}

impl FnDeclStmt {
    pub fn new(
        scopes: &mut Scopes,
        scope: ScopeId,
        name: &str,
        params: Vec<(String, TypeId, Span)>,
        return_type: TypeId,
        span: Span,
    ) -> Self {
        let body_scope = scopes.create_function_scope(scope, return_type);
        let params = params
            .into_iter()
            .map(|(name, ty, span)| {
                let symbol = scopes.declare(body_scope, Symbol::new(name.clone(), Some(ty)));
                Param {
                    name,
                    ty,
                    symbol,
                    span,
                }
            })
            .collect();

        FnDeclStmt {
            scope,
            body_scope,
            name: name.to_string(),
            params,
            return_type,
            body: vec![],
            span,
        }
    }

    pub fn push(&mut self, stmt: NodeWrapper) {
        self.body.push(stmt);
    }

    pub fn with_body(mut self, body: Vec<NodeWrapper>) -> Self {
        self.body.extend(body);
        self
    }
}

impl Node for FnDeclStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::FnDeclStmt
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
        None
    }
    fn children(&self) -> Vec<&dyn Node> {
        self.body.iter().map(|stmt| &**stmt).collect()
    }
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>) {
        for stmt in self.body.iter_mut() {
            stmt.type_check(type_checker);
        }
    }
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId> {
        trace!("lowering function `{}`", self.name);

        let return_type = compiler.types.get_ir_type(self.return_type);
        let param_types = self
            .params
            .iter()
            .map(|param| compiler.types.get_ir_type(param.ty))
            .collect::<Vec<_>>();
        let function = compiler
            .builder
            .begin_function(&self.name, &return_type, &param_types);
        compiler.di_builder.create_subprogram(
            function,
            &self.name,
            self.span.start.line,
            self.span.start.col,
        );

        for (index, param) in self.params.iter().enumerate() {
            let value = compiler.builder.get_param(function, index);
            let debug_type = compiler.types.get_debug_type(param.ty);
            let debug_variable = compiler.di_builder.create_local_variable(
                &param.name,
                function,
                &debug_type,
                param.span.start.line,
                param.span.start.col,
            );

            let point = compiler.builder.get_insert_point();
            let symbol = compiler.scopes.symbol_mut(param.symbol);
            symbol.debug_variable = Some(debug_variable);
            symbol.push_value(ValueEntry::direct(point, value, None, None));
        }

        for stmt in &self.body {
            stmt.lower(compiler);
        }

        if compiler.types.is_void_type(self.return_type) && !compiler.builder.is_terminated() {
            compiler.builder.build_ret(None);
        }
        None
    }
}

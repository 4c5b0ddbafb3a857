use tracing::debug;

use crate::{
    ast::ast::NodeWrapper,
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    scope::scope::{ScopeId, Scopes},
    types::registry::TypeRegistry,
    Span,
};

/// State shared by every node while a compilation unit is checked.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    /// Registry the unit's types are interned in
    pub types: &'a mut TypeRegistry,
    /// Scopes the unit's nodes were built against
    pub scopes: &'a mut Scopes,
    /// Everything reported so far, with the unit's fatal flag
    pub diagnostics: Diagnostics,
}

impl<'a> TypeChecker<'a> {
    pub fn new(types: &'a mut TypeRegistry, scopes: &'a mut Scopes) -> Self {
        TypeChecker {
            types,
            scopes,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Reports an error that must stop the unit from being lowered.
    pub fn fatal_error(&mut self, error: ErrorImpl, span: Span) {
        self.diagnostics.report_compiler_error(Error::new(error, span));
        self.diagnostics.set_fatal();
    }

    /// Reports `statement` as fatal unless `scope` lies inside a function.
    /// Returns whether a function encloses it.
    pub fn require_function(&mut self, scope: ScopeId, statement: String, span: &Span) -> bool {
        if self.scopes.get_current_return_type(scope).is_some() {
            return true;
        }
        self.fatal_error(ErrorImpl::OutsideFunction { statement }, span.clone());
        false
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.has_fatal()
    }

    /// Checks every top-level node in order.
    ///
    /// Checking continues past errors so one run reports as much as it can.
    pub fn check(&mut self, nodes: &mut [NodeWrapper]) {
        for node in nodes.iter_mut() {
            node.type_check(self);
        }
        debug!(
            errors = self.diagnostics.len(),
            fatal = self.diagnostics.has_fatal(),
            "checked {} top-level nodes",
            nodes.len()
        );
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

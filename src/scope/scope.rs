use crate::types::types::TypeId;

use super::symbol::{Symbol, SymbolId};

/// Non-owning handle to a scope inside [`Scopes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) u32);

#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// Set on function body scopes only.
    pub return_type: Option<TypeId>,
    /// In declaration order. Later entries shadow earlier ones of the same name.
    pub symbols: Vec<Symbol>,
}

/// Arena owning every scope of a compilation unit, and through them every symbol.
#[derive(Debug)]
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// Creates the arena with its global scope.
    pub fn new() -> Self {
        Scopes {
            scopes: vec![Scope {
                parent: None,
                return_type: None,
                symbols: vec![],
            }],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.push(Scope {
            parent: Some(parent),
            return_type: None,
            symbols: vec![],
        })
    }

    pub fn create_function_scope(&mut self, parent: ScopeId, return_type: TypeId) -> ScopeId {
        self.push(Scope {
            parent: Some(parent),
            return_type: Some(return_type),
            symbols: vec![],
        })
    }

    fn push(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    /// The declared return type of the innermost function enclosing `scope`.
    pub fn get_current_return_type(&self, scope: ScopeId) -> Option<TypeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.get(id);
            if scope.return_type.is_some() {
                return scope.return_type;
            }
            current = scope.parent;
        }
        None
    }

    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let symbols = &mut self.get_mut(scope).symbols;
        symbols.push(symbol);
        SymbolId {
            scope,
            index: symbols.len() - 1,
        }
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.get(id.scope).symbols[id.index]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.get_mut(id.scope).symbols[id.index]
    }

    /// Finds the latest declaration of `name` visible from `scope`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.get(id);
            if let Some(index) = scope.symbols.iter().rposition(|symbol| symbol.name == name) {
                return Some(SymbolId { scope: id, index });
            }
            current = scope.parent;
        }
        None
    }
}

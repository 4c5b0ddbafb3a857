use std::{
    any::Any,
    fmt::Debug,
    ops::{Deref, DerefMut},
};

use crate::{
    compiler::{compiler::Compiler, ir::ValueId},
    scope::scope::ScopeId,
    type_checker::type_checker::TypeChecker,
    types::types::TypeId,
    Span,
};

/// Node Types
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum NodeType {
    IntegerLiteral,
    BooleanLiteral,
    Variable,
    AddressOf,
    Cast,
    ExpressionStmt,
    VarDeclStmt,
    ReturnStmt,
    BlockStmt,
    FnDeclStmt,
}

/// Node Trait
///
/// The capability set every statement and expression in the tree provides.
pub trait Node: Debug {
    /// Returns the kind of the node.
    fn get_node_type(&self) -> NodeType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Returns the span of the node.
    fn get_span(&self) -> &Span;
    /// Returns the scope the node was built in.
    fn get_scope(&self) -> ScopeId;
    /// Returns the resolved type, once type checking has filled it in.
    fn get_type(&self) -> Option<TypeId>;
    /// Direct children in source order.
    fn children(&self) -> Vec<&dyn Node>;

    /// Checks the node, children first.
    ///
    /// A node may replace one of its own child slots with a cast wrapper here.
    fn type_check(&mut self, type_checker: &mut TypeChecker<'_>);

    /// Whether the node's current value already satisfies `dest` without a cast.
    fn trivially_compatible(&self, _type_checker: &TypeChecker<'_>, dest: TypeId) -> bool {
        self.get_type() == Some(dest)
    }

    /// Whether the node's value may become a `dest` through an implicit cast.
    fn can_implicit_cast(&self, type_checker: &TypeChecker<'_>, dest: TypeId) -> bool {
        self.trivially_compatible(type_checker, dest)
            || self
                .get_type()
                .is_some_and(|ty| type_checker.types.can_implicit_cast(ty, dest))
    }

    /// Emits the node into the IR. Expressions return the value they computed.
    fn lower(&self, compiler: &mut Compiler<'_>) -> Option<ValueId>;
}

/// Node Wrapper
///
/// Sole owner of a node of any kind.
#[derive(Debug)]
pub struct NodeWrapper(Box<dyn Node>);

impl NodeWrapper {
    pub fn new<T: Node + 'static>(node: T) -> Self {
        NodeWrapper(Box::new(node))
    }

    pub fn downcast_ref<T: Node + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Deref for NodeWrapper {
    type Target = dyn Node;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl DerefMut for NodeWrapper {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}

//! Canonical type descriptors.
//!
//! Every distinct type lives exactly once inside a [`TypeRegistry`](super::registry::TypeRegistry)
//! and is referred to everywhere else by its [`TypeId`]. Two types are the
//! same type if and only if their ids are equal.

use std::fmt::Display;

/// Handle to a registry entry. Comparing two ids is comparing type identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The structural shape of a type. Used as the interning key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Integer { bits: u32, signed: bool },
    Bool,
    Pointer(TypeId),
    Array { element: TypeId, length: u64 },
    /// Structs are nominal: the name alone identifies them.
    Struct { name: String, fields: Vec<(String, TypeId)> },
    Slice(TypeId),
    /// Sentinel assigned after an unrecoverable type error.
    Error,
}

impl TypeKind {
    /// Whether values of this kind always live in addressable storage.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            TypeKind::Array { .. } | TypeKind::Struct { .. } | TypeKind::Slice(_)
        )
    }
}

/// A registry entry.
#[derive(Debug, Clone)]
pub struct Type {
    pub id: TypeId,
    pub kind: TypeKind,
    pub name: String,
}

impl Type {
    pub fn is_void_type(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_integer_type(&self) -> bool {
        matches!(self.kind, TypeKind::Integer { .. })
    }

    pub fn is_pointer_type(&self) -> bool {
        matches!(self.kind, TypeKind::Pointer(_))
    }

    pub fn is_array_type(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    pub fn is_struct_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct { .. })
    }

    pub fn is_slice_type(&self) -> bool {
        matches!(self.kind, TypeKind::Slice(_))
    }

    pub fn is_error_type(&self) -> bool {
        matches!(self.kind, TypeKind::Error)
    }

    pub fn is_aggregate_type(&self) -> bool {
        self.kind.is_aggregate()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

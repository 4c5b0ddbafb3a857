use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::compiler::{
    debug::{DebugEncoding, DebugType},
    ir::{CastOp, IrType},
};

use super::types::{Type, TypeId, TypeKind};

const POINTER_BITS: u64 = 64;
const SLICE_BITS: u64 = 128;

lazy_static! {
    pub static ref BUILTIN_TYPES: HashMap<&'static str, TypeKind> = {
        let mut map = HashMap::new();
        map.insert("void", TypeKind::Void);
        map.insert("bool", TypeKind::Bool);
        map.insert("i8", TypeKind::Integer { bits: 8, signed: true });
        map.insert("i16", TypeKind::Integer { bits: 16, signed: true });
        map.insert("i32", TypeKind::Integer { bits: 32, signed: true });
        map.insert("i64", TypeKind::Integer { bits: 64, signed: true });
        map.insert("u8", TypeKind::Integer { bits: 8, signed: false });
        map.insert("u16", TypeKind::Integer { bits: 16, signed: false });
        map.insert("u32", TypeKind::Integer { bits: 32, signed: false });
        map.insert("u64", TypeKind::Integer { bits: 64, signed: false });
        map.insert("error-type", TypeKind::Error);
        map
    };
    static ref ARRAY_ANNOTATION: Regex =
        Regex::new(r"^(?P<element>.+)\[(?P<length>[0-9]+)\]$").unwrap();
    static ref SLICE_ANNOTATION: Regex = Regex::new(r"^(?P<element>.+)\[\]$").unwrap();
    static ref POINTER_ANNOTATION: Regex = Regex::new(r"^(?P<pointee>.+)\*$").unwrap();
}

/// Interner holding the one canonical instance of every type.
///
/// Builtin types are registered up front; composite types are created on
/// first request and handed back by id afterwards.
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<Type>,
    lookup: HashMap<TypeKind, TypeId>,
    structs: HashMap<String, TypeId>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            types: vec![],
            lookup: HashMap::new(),
            structs: HashMap::new(),
        };

        let mut builtins = BUILTIN_TYPES.iter().collect::<Vec<_>>();
        // HashMap order is random; keep ids stable between runs
        builtins.sort_by_key(|(name, _)| **name);
        for (name, kind) in builtins {
            registry.intern(kind.clone(), name.to_string());
        }

        registry
    }

    fn intern(&mut self, kind: TypeKind, name: String) -> TypeId {
        if let Some(id) = self.lookup.get(&kind) {
            return *id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Type {
            id,
            kind: kind.clone(),
            name,
        });
        self.lookup.insert(kind, id);
        id
    }

    fn builtin(&self, name: &str) -> TypeId {
        let kind = &BUILTIN_TYPES[name];
        self.lookup[kind]
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn void_type(&self) -> TypeId {
        self.builtin("void")
    }

    pub fn bool_type(&self) -> TypeId {
        self.builtin("bool")
    }

    pub fn error_type(&self) -> TypeId {
        self.builtin("error-type")
    }

    pub fn integer_type(&mut self, bits: u32, signed: bool) -> TypeId {
        let name = format!("{}{}", if signed { "i" } else { "u" }, bits);
        self.intern(TypeKind::Integer { bits, signed }, name)
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        let name = format!("{}*", self.get(pointee).name);
        self.intern(TypeKind::Pointer(pointee), name)
    }

    pub fn array_of(&mut self, element: TypeId, length: u64) -> TypeId {
        let name = format!("{}[{}]", self.get(element).name, length);
        self.intern(TypeKind::Array { element, length }, name)
    }

    pub fn slice_of(&mut self, element: TypeId) -> TypeId {
        let name = format!("{}[]", self.get(element).name);
        self.intern(TypeKind::Slice(element), name)
    }

    /// Registers a struct, or returns the existing struct of the same name.
    pub fn struct_type(&mut self, name: &str, fields: Vec<(String, TypeId)>) -> TypeId {
        if let Some(id) = self.structs.get(name) {
            return *id;
        }

        let id = self.intern(
            TypeKind::Struct {
                name: name.to_string(),
                fields,
            },
            name.to_string(),
        );
        self.structs.insert(name.to_string(), id);
        id
    }

    /// Resolves a type annotation such as `i32`, `u8*`, `i64[4]`, `i8[]`
    /// or a registered struct name.
    pub fn lookup(&mut self, annotation: &str) -> Option<TypeId> {
        let annotation = annotation.trim();

        if let Some(captures) = ARRAY_ANNOTATION.captures(annotation) {
            let element = self.lookup(&captures["element"])?;
            let length = captures["length"].parse::<u64>().ok()?;
            return Some(self.array_of(element, length));
        }
        if let Some(captures) = SLICE_ANNOTATION.captures(annotation) {
            let element = self.lookup(&captures["element"])?;
            return Some(self.slice_of(element));
        }
        if let Some(captures) = POINTER_ANNOTATION.captures(annotation) {
            let pointee = self.lookup(&captures["pointee"])?;
            return Some(self.pointer_to(pointee));
        }

        if let Some(kind) = BUILTIN_TYPES.get(annotation) {
            return self.lookup.get(kind).copied();
        }
        self.structs.get(annotation).copied()
    }

    pub fn get_name(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    pub fn is_void_type(&self, id: TypeId) -> bool {
        self.get(id).is_void_type()
    }

    pub fn is_array_type(&self, id: TypeId) -> bool {
        self.get(id).is_array_type()
    }

    pub fn is_struct_type(&self, id: TypeId) -> bool {
        self.get(id).is_struct_type()
    }

    pub fn is_slice_type(&self, id: TypeId) -> bool {
        self.get(id).is_slice_type()
    }

    pub fn is_error_type(&self, id: TypeId) -> bool {
        self.get(id).is_error_type()
    }

    pub fn is_aggregate_type(&self, id: TypeId) -> bool {
        self.get(id).is_aggregate_type()
    }

    pub fn size_in_bits(&self, id: TypeId) -> u64 {
        match &self.get(id).kind {
            TypeKind::Void | TypeKind::Error => 0,
            TypeKind::Integer { bits, .. } => *bits as u64,
            TypeKind::Bool => 8,
            TypeKind::Pointer(_) => POINTER_BITS,
            TypeKind::Array { element, length } => self.size_in_bits(*element) * length,
            TypeKind::Struct { fields, .. } => {
                fields.iter().map(|(_, ty)| self.size_in_bits(*ty)).sum()
            }
            TypeKind::Slice(_) => SLICE_BITS,
        }
    }

    /// The representation the IR builder lowers values of this type to.
    pub fn get_ir_type(&self, id: TypeId) -> IrType {
        match &self.get(id).kind {
            TypeKind::Void | TypeKind::Error => IrType::Void,
            TypeKind::Integer { bits, .. } => IrType::Int(*bits),
            TypeKind::Bool => IrType::Int(1),
            TypeKind::Pointer(_) => IrType::Ptr,
            TypeKind::Array { element, length } => {
                IrType::Array(Box::new(self.get_ir_type(*element)), *length)
            }
            TypeKind::Struct { fields, .. } => {
                IrType::Struct(fields.iter().map(|(_, ty)| self.get_ir_type(*ty)).collect())
            }
            TypeKind::Slice(_) => IrType::Struct(vec![IrType::Ptr, IrType::Int(64)]),
        }
    }

    /// The representation debug metadata describes values of this type with.
    pub fn get_debug_type(&self, id: TypeId) -> DebugType {
        let ty = self.get(id);
        let encoding = match &ty.kind {
            TypeKind::Integer { signed: true, .. } => DebugEncoding::Signed,
            TypeKind::Integer { signed: false, .. } => DebugEncoding::Unsigned,
            TypeKind::Bool => DebugEncoding::Boolean,
            TypeKind::Pointer(_) => DebugEncoding::Address,
            TypeKind::Array { .. } | TypeKind::Struct { .. } | TypeKind::Slice(_) => {
                DebugEncoding::Composite
            }
            TypeKind::Void | TypeKind::Error => DebugEncoding::None,
        };

        DebugType {
            name: ty.name.clone(),
            size_in_bits: self.size_in_bits(id),
            encoding,
        }
    }

    /// The conversion needed to turn a value of `from` into a value of `to`,
    /// or `None` when no implicit conversion exists.
    pub fn conversion(&self, from: TypeId, to: TypeId) -> Option<CastOp> {
        match (&self.get(from).kind, &self.get(to).kind) {
            (
                TypeKind::Integer {
                    bits: from_bits,
                    signed,
                },
                TypeKind::Integer { bits: to_bits, .. },
            ) => Some(if to_bits < from_bits {
                CastOp::Truncate
            } else if to_bits > from_bits {
                if *signed {
                    CastOp::SignExtend
                } else {
                    CastOp::ZeroExtend
                }
            } else {
                CastOp::Reinterpret
            }),
            (TypeKind::Bool, TypeKind::Integer { .. }) => Some(CastOp::ZeroExtend),
            (TypeKind::Pointer(from_pointee), TypeKind::Pointer(to_pointee))
                if self.is_void_type(*from_pointee) || self.is_void_type(*to_pointee) =>
            {
                Some(CastOp::Reinterpret)
            }
            _ => None,
        }
    }

    /// Whether a value of type `from` may implicitly become a value of type `to`.
    pub fn can_implicit_cast(&self, from: TypeId, to: TypeId) -> bool {
        from == to || self.conversion(from, to).is_some()
    }
}

//! Interfaces to the host compiler.
//!
//! The host owns the type system; this crate only holds [`TypeId`] handles
//! and asks questions through [`SemanticModel`]. Records are rendered by a
//! [`StructuralMapper`] that already knows the host's record-to-object
//! convention.
use std::collections::HashSet;

use natural_core::schema::PrimitiveKind;
use schemars::schema::Schema;

/// Opaque handle to a type owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// A record field as the host declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
}

/// Classification of a type: exactly one variant per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape<'a> {
    Primitive(PrimitiveKind),
    Record(&'a [FieldDecl]),
    Array(TypeId),
    Tuple(&'a [TypeId]),
    /// Members in declaration order.
    Union(&'a [TypeId]),
    /// A named type definition and the type it stands for.
    Reference { name: &'a str, target: TypeId },
    Json,
    Error,
    Other(&'a str),
}

pub trait SemanticModel {
    fn shape(&self, ty: TypeId) -> TypeShape<'_>;

    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool;

    /// The built-in `error` type.
    fn error_type(&self) -> TypeId;

    /// The built-in universal `json` type.
    fn json_type(&self) -> TypeId;

    /// A type definition exported by an imported module.
    fn module_type(&self, org: &str, module: &str, name: &str) -> Option<TypeId>;
}

/// OpenAPI-style mapper from a record type to a raw structural schema.
pub trait StructuralMapper {
    /// `None` when the mapper has no mapping for `record`.
    fn map_record(&self, record: TypeId) -> Option<Schema>;
}

/// Strip any number of references off `ty`.
pub fn resolve<M: SemanticModel + ?Sized>(model: &M, ty: TypeId) -> TypeId {
    let mut current = ty;
    let mut seen = HashSet::new();
    while let TypeShape::Reference { target, .. } = model.shape(current) {
        if !seen.insert(current) {
            break;
        }
        current = target;
    }
    current
}

/// Members of `ty` when it is (a reference to) a union, flattening nested
/// unions; `[ty]` otherwise.
pub fn union_members<M: SemanticModel + ?Sized>(model: &M, ty: TypeId) -> Vec<TypeId> {
    let mut members = Vec::new();
    let mut visiting = HashSet::new();
    collect_members(model, ty, &mut members, &mut visiting);
    members
}

fn collect_members<M: SemanticModel + ?Sized>(
    model: &M,
    ty: TypeId,
    members: &mut Vec<TypeId>,
    visiting: &mut HashSet<TypeId>,
) {
    let resolved = resolve(model, ty);
    let TypeShape::Union(nested) = model.shape(resolved) else {
        members.push(ty);
        return;
    };
    if !visiting.insert(resolved) {
        return;
    }
    for member in nested {
        collect_members(model, *member, members, visiting);
    }
}

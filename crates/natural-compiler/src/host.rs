//! In-memory host: a type arena answering [`SemanticModel`] queries and an
//! OpenAPI-style [`StructuralMapper`] over it.
//!
//! Embedders with a real front end implement the traits themselves; the
//! arena serves tools that build declarations programmatically and the test
//! suites.
use std::collections::{HashMap, HashSet};

use natural_core::schema::PrimitiveKind;
use schemars::schema::Schema;
use serde_json::{Map, Value, json};

use crate::oracle::{FieldDecl, SemanticModel, StructuralMapper, TypeId, TypeShape};

#[derive(Debug, Clone)]
enum TypeData {
    Primitive(PrimitiveKind),
    Record(Vec<FieldDecl>),
    Array(TypeId),
    Tuple(Vec<TypeId>),
    Union(Vec<TypeId>),
    Named { name: String, target: Option<TypeId> },
    Json,
    Error,
    Nominal { name: String, supertypes: Vec<TypeId> },
}

/// Per-module type storage. Handles are indices into the arena.
#[derive(Debug, Clone)]
pub struct TypeArena {
    types: Vec<TypeData>,
    exports: HashMap<(String, String, String), TypeId>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    const ERROR: TypeId = TypeId::new(0);
    const JSON: TypeId = TypeId::new(1);

    pub fn new() -> Self {
        Self {
            types: vec![TypeData::Error, TypeData::Json],
            exports: HashMap::new(),
        }
    }

    fn push(&mut self, data: TypeData) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(data);
        id
    }

    fn data(&self, ty: TypeId) -> &TypeData {
        &self.types[ty.index() as usize]
    }

    pub fn error(&self) -> TypeId {
        Self::ERROR
    }

    pub fn json(&self) -> TypeId {
        Self::JSON
    }

    pub fn primitive(&mut self, kind: PrimitiveKind) -> TypeId {
        self.push(TypeData::Primitive(kind))
    }

    /// Fields are `(name, type, optional)`.
    pub fn record(&mut self, fields: &[(&str, TypeId, bool)]) -> TypeId {
        let fields = fields
            .iter()
            .map(|(name, ty, optional)| FieldDecl {
                name: (*name).to_owned(),
                ty: *ty,
                optional: *optional,
            })
            .collect();
        self.push(TypeData::Record(fields))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.push(TypeData::Array(element))
    }

    pub fn tuple(&mut self, members: &[TypeId]) -> TypeId {
        self.push(TypeData::Tuple(members.to_vec()))
    }

    pub fn union(&mut self, members: &[TypeId]) -> TypeId {
        self.push(TypeData::Union(members.to_vec()))
    }

    /// Declare a named type; give it a body with [`Self::define`]. Declaring
    /// first lets a definition refer to itself.
    pub fn declare(&mut self, name: &str) -> TypeId {
        self.push(TypeData::Named {
            name: name.to_owned(),
            target: None,
        })
    }

    pub fn define(&mut self, named: TypeId, target: TypeId) {
        if let TypeData::Named { target: slot, .. } = &mut self.types[named.index() as usize] {
            *slot = Some(target);
        }
    }

    /// `declare` + `define` in one step.
    pub fn named(&mut self, name: &str, target: TypeId) -> TypeId {
        let named = self.declare(name);
        self.define(named, target);
        named
    }

    /// An object-like type that is only a subtype of itself and of the
    /// listed supertypes.
    pub fn nominal(&mut self, name: &str, supertypes: &[TypeId]) -> TypeId {
        self.push(TypeData::Nominal {
            name: name.to_owned(),
            supertypes: supertypes.to_vec(),
        })
    }

    pub fn export(&mut self, org: &str, module: &str, name: &str, ty: TypeId) {
        self.exports
            .insert((org.to_owned(), module.to_owned(), name.to_owned()), ty);
    }

    /// Pairs in `assumed` are taken to hold while they are being checked,
    /// which makes recursive definitions terminate. Refuted pairs are removed.
    fn subtype(&self, sub: TypeId, sup: TypeId, assumed: &mut HashSet<(TypeId, TypeId)>) -> bool {
        if sub == sup || !assumed.insert((sub, sup)) {
            return true;
        }
        let holds = self.check_subtype(sub, sup, assumed);
        if !holds {
            assumed.remove(&(sub, sup));
        }
        holds
    }

    fn check_subtype(
        &self,
        sub: TypeId,
        sup: TypeId,
        assumed: &mut HashSet<(TypeId, TypeId)>,
    ) -> bool {
        match (self.data(sub), self.data(sup)) {
            (TypeData::Named { target, .. }, _) => {
                target.is_some_and(|target| self.subtype(target, sup, assumed))
            }
            (_, TypeData::Named { target, .. }) => {
                target.is_some_and(|target| self.subtype(sub, target, assumed))
            }
            (TypeData::Union(members), _) => members
                .iter()
                .all(|member| self.subtype(*member, sup, assumed)),
            (_, TypeData::Union(members)) => members
                .iter()
                .any(|member| self.subtype(sub, *member, assumed)),
            (_, TypeData::Json) => self.is_json_like(sub, assumed),
            (TypeData::Primitive(a), TypeData::Primitive(b)) => {
                a == b || (*a == PrimitiveKind::Byte && *b == PrimitiveKind::Int)
            }
            (TypeData::Array(a), TypeData::Array(b)) => self.subtype(*a, *b, assumed),
            (TypeData::Tuple(members), TypeData::Array(element)) => members
                .iter()
                .all(|member| self.subtype(*member, *element, assumed)),
            (TypeData::Tuple(a), TypeData::Tuple(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| self.subtype(*x, *y, assumed))
            }
            (TypeData::Record(a), TypeData::Record(b)) => b.iter().all(|wanted| {
                a.iter().any(|have| {
                    have.name == wanted.name
                        && (wanted.optional || !have.optional)
                        && self.subtype(have.ty, wanted.ty, assumed)
                })
            }),
            (TypeData::Nominal { supertypes, .. }, _) => supertypes
                .iter()
                .any(|parent| self.subtype(*parent, sup, assumed)),
            _ => false,
        }
    }

    fn is_json_like(&self, ty: TypeId, assumed: &mut HashSet<(TypeId, TypeId)>) -> bool {
        match self.data(ty) {
            TypeData::Primitive(_) | TypeData::Json => true,
            TypeData::Array(element) => self.subtype(*element, Self::JSON, assumed),
            TypeData::Tuple(members) | TypeData::Union(members) => members
                .iter()
                .all(|member| self.subtype(*member, Self::JSON, assumed)),
            TypeData::Record(fields) => fields
                .iter()
                .all(|field| self.subtype(field.ty, Self::JSON, assumed)),
            TypeData::Named { target, .. } => {
                target.is_some_and(|target| self.subtype(target, Self::JSON, assumed))
            }
            TypeData::Error | TypeData::Nominal { .. } => false,
        }
    }
}

impl SemanticModel for TypeArena {
    fn shape(&self, ty: TypeId) -> TypeShape<'_> {
        match self.data(ty) {
            TypeData::Primitive(kind) => TypeShape::Primitive(*kind),
            TypeData::Record(fields) => TypeShape::Record(fields),
            TypeData::Array(element) => TypeShape::Array(*element),
            TypeData::Tuple(members) => TypeShape::Tuple(members),
            TypeData::Union(members) => TypeShape::Union(members),
            TypeData::Named {
                name,
                target: Some(target),
            } => TypeShape::Reference {
                name,
                target: *target,
            },
            TypeData::Named { name, target: None } => TypeShape::Other(name),
            TypeData::Json => TypeShape::Json,
            TypeData::Error => TypeShape::Error,
            TypeData::Nominal { name, .. } => TypeShape::Other(name),
        }
    }

    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        self.subtype(sub, sup, &mut HashSet::new())
    }

    fn error_type(&self) -> TypeId {
        Self::ERROR
    }

    fn json_type(&self) -> TypeId {
        Self::JSON
    }

    fn module_type(&self, org: &str, module: &str, name: &str) -> Option<TypeId> {
        self.exports
            .get(&(org.to_owned(), module.to_owned(), name.to_owned()))
            .copied()
    }
}

/// Maps arena records the way OpenAPI generators do: named types become
/// `$ref`s into `#/components/schemas`, bytes become base64 strings, and
/// numbers carry a `format`.
pub struct OpenApiMapper<'a> {
    arena: &'a TypeArena,
}

impl<'a> OpenApiMapper<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self { arena }
    }

    fn map_type(&self, ty: TypeId) -> Value {
        match self.arena.data(ty) {
            TypeData::Primitive(kind) => match kind {
                PrimitiveKind::Boolean => json!({ "type": "boolean" }),
                PrimitiveKind::Int => json!({ "type": "integer", "format": "int64" }),
                PrimitiveKind::Byte => json!({ "type": "string", "format": "byte" }),
                PrimitiveKind::Float => json!({ "type": "number", "format": "float" }),
                PrimitiveKind::Decimal => json!({ "type": "number", "format": "double" }),
                PrimitiveKind::String => json!({ "type": "string" }),
                PrimitiveKind::Nil => json!({ "type": "null" }),
            },
            TypeData::Record(fields) => self.map_fields(fields),
            TypeData::Array(element) => {
                json!({ "type": "array", "items": self.map_type(*element) })
            }
            TypeData::Tuple(members) => json!({
                "type": "array",
                "items": members.iter().map(|member| self.map_type(*member)).collect::<Vec<_>>(),
                "minItems": members.len(),
                "maxItems": members.len(),
            }),
            TypeData::Union(members) => json!({
                "oneOf": members.iter().map(|member| self.map_type(*member)).collect::<Vec<_>>(),
            }),
            TypeData::Named { name, .. } => {
                json!({ "$ref": format!("#/components/schemas/{name}") })
            }
            TypeData::Json | TypeData::Error | TypeData::Nominal { .. } => json!({}),
        }
    }

    fn map_fields(&self, fields: &[FieldDecl]) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in fields {
            properties.insert(field.name.clone(), self.map_type(field.ty));
            if !field.optional {
                required.push(Value::from(field.name.clone()));
            }
        }

        let mut object = Map::new();
        object.insert("type".into(), Value::from("object"));
        object.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            object.insert("required".into(), Value::Array(required));
        }
        object.insert("additionalProperties".into(), Value::Bool(false));
        Value::Object(object)
    }
}

impl StructuralMapper for OpenApiMapper<'_> {
    fn map_record(&self, record: TypeId) -> Option<Schema> {
        let TypeData::Record(fields) = self.arena.data(record) else {
            return None;
        };
        serde_json::from_value(self.map_fields(fields)).ok()
    }
}

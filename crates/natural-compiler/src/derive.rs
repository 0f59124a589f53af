//! Static, type-directed schema derivation.
//!
//! Walks a type through the host's [`SemanticModel`]. Records go through the
//! [`StructuralMapper`] and the normalizer; a reference to a type that
//! already carries a schema annotation reuses it verbatim. `None` means the
//! type cannot be described at compile time and the runtime derives it.
use std::collections::HashMap;

use natural_core::{
    SchemaValue,
    schema,
    schema_util::normalize,
};

use crate::oracle::{SemanticModel, StructuralMapper, TypeId, TypeShape};

/// Derive the schema of `ty`. `attached` maps type definition names to
/// schemas already present on their declarations.
pub fn derive_static<M, S>(
    model: &M,
    mapper: &S,
    attached: &HashMap<String, SchemaValue>,
    ty: TypeId,
) -> Option<SchemaValue>
where
    M: SemanticModel + ?Sized,
    S: StructuralMapper + ?Sized,
{
    StaticDeriver::new(model, mapper, attached).derive(ty)
}

pub struct StaticDeriver<'a, M: ?Sized, S: ?Sized> {
    model: &'a M,
    mapper: &'a S,
    attached: &'a HashMap<String, SchemaValue>,
    /// References being derived on the current path.
    in_progress: Vec<TypeId>,
}

impl<'a, M, S> StaticDeriver<'a, M, S>
where
    M: SemanticModel + ?Sized,
    S: StructuralMapper + ?Sized,
{
    pub fn new(model: &'a M, mapper: &'a S, attached: &'a HashMap<String, SchemaValue>) -> Self {
        Self {
            model,
            mapper,
            attached,
            in_progress: Vec::new(),
        }
    }

    pub fn derive(&mut self, ty: TypeId) -> Option<SchemaValue> {
        let model = self.model;
        match model.shape(ty) {
            TypeShape::Primitive(kind) => Some(schema::primitive(kind)),
            TypeShape::Json => Some(schema::json_any()),
            TypeShape::Array(element) => self.derive(element).map(schema::array_of),
            TypeShape::Tuple(members) => members
                .iter()
                .map(|member| self.derive(*member))
                .collect::<Option<Vec<_>>>()
                .map(schema::tuple_of),
            TypeShape::Union(members) => members
                .iter()
                .map(|member| self.derive(*member))
                .collect::<Option<Vec<_>>>()
                .map(schema::any_of),
            TypeShape::Record(_) => self.derive_record(ty),
            TypeShape::Reference { name, target } => self.derive_reference(ty, name, target),
            TypeShape::Error | TypeShape::Other(_) => None,
        }
    }

    fn derive_reference(&mut self, ty: TypeId, name: &str, target: TypeId) -> Option<SchemaValue> {
        if let Some(schema) = self.attached.get(name) {
            return Some(schema.clone());
        }
        if self.in_progress.contains(&ty) {
            #[cfg(feature = "tracing")]
            tracing::trace!(type_name = name, "cycle through reference, deferring");
            return None;
        }

        self.in_progress.push(ty);
        let derived = self.derive(target);
        self.in_progress.pop();
        derived
    }

    fn derive_record(&self, record: TypeId) -> Option<SchemaValue> {
        let raw = self.mapper.map_record(record)?;
        normalize(&raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use natural_core::schema::PrimitiveKind;
    use schemars::schema::Schema;
    use serde_json::json;

    use super::*;
    use crate::host::{OpenApiMapper, TypeArena};

    /// Mapper that renders every record with the noise real generators add.
    struct NoisyMapper;

    impl StructuralMapper for NoisyMapper {
        fn map_record(&self, _record: TypeId) -> Option<Schema> {
            serde_json::from_value(json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "title": "Pet",
                "type": "object",
                "properties": {
                    "name": { "type": "string", "minLength": 1, "maxLength": 64 },
                    "chip": { "type": "string", "format": "byte" },
                    "owner": { "$ref": "#/components/schemas/Owner" },
                    "tags": { "type": "array", "items": { "type": "string" }, "maxItems": 8 }
                },
                "required": ["name"],
                "additionalProperties": false,
                "examples": [{ "name": "Rex" }]
            }))
            .ok()
        }
    }

    fn derive(arena: &TypeArena, ty: TypeId) -> Option<String> {
        let mapper = OpenApiMapper::new(arena);
        derive_static(arena, &mapper, &HashMap::new(), ty).map(|schema| schema.canonical_text())
    }

    #[test]
    fn primitives_arrays_and_tuples() {
        let mut arena = TypeArena::new();
        let int = arena.primitive(PrimitiveKind::Int);
        let byte = arena.primitive(PrimitiveKind::Byte);
        let decimal = arena.primitive(PrimitiveKind::Decimal);
        let bytes = arena.array(byte);
        let pair = arena.tuple(&[int, decimal]);

        assert_eq!(derive(&arena, int).unwrap(), r#"{"type":"integer"}"#);
        assert_eq!(
            derive(&arena, bytes).unwrap(),
            r#"{"items":{"type":"number"},"type":"array"}"#
        );
        assert_eq!(
            derive(&arena, pair).unwrap(),
            r#"{"items":[{"type":"integer"},{"type":"number"}],"type":"array"}"#
        );
        assert_eq!(
            derive(&arena, arena.json()).unwrap(),
            r#"{"type":["object","array","string","number","boolean","null"]}"#
        );
    }

    #[test]
    fn unions_keep_declaration_order() {
        let mut arena = TypeArena::new();
        let string = arena.primitive(PrimitiveKind::String);
        let nil = arena.primitive(PrimitiveKind::Nil);
        let union = arena.union(&[string, nil]);

        assert_eq!(
            derive(&arena, union).unwrap(),
            r#"{"anyOf":[{"type":"string"},{"type":"null"}],"type":"object"}"#
        );
    }

    #[test]
    fn record_unions_follow_member_order() {
        let mut arena = TypeArena::new();
        let string = arena.primitive(PrimitiveKind::String);
        let boolean = arena.primitive(PrimitiveKind::Boolean);
        let cat_body = arena.record(&[("name", string, false)]);
        let dog_body = arena.record(&[("good", boolean, false)]);
        let cat = arena.named("Cat", cat_body);
        let dog = arena.named("Dog", dog_body);
        let cat_or_dog = arena.union(&[cat, dog]);
        let dog_or_cat = arena.union(&[dog, cat]);

        let cat_text = r#"{"properties":{"name":{"type":"string"}},"required":["name"],"type":"object"}"#;
        let dog_text = r#"{"properties":{"good":{"type":"boolean"}},"required":["good"],"type":"object"}"#;
        assert_eq!(
            derive(&arena, cat_or_dog).unwrap(),
            format!(r#"{{"anyOf":[{cat_text},{dog_text}],"type":"object"}}"#)
        );
        assert_eq!(
            derive(&arena, dog_or_cat).unwrap(),
            format!(r#"{{"anyOf":[{dog_text},{cat_text}],"type":"object"}}"#)
        );
    }

    #[test]
    fn records_are_mapped_then_normalized() {
        let mut arena = TypeArena::new();
        let string = arena.primitive(PrimitiveKind::String);
        let pet = arena.record(&[("name", string, false)]);

        let schema = derive_static(&arena, &NoisyMapper, &HashMap::new(), pet).unwrap();
        assert_eq!(
            schema.as_value(),
            &json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "chip": { "type": "number" },
                    "owner": {},
                    "tags": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn attached_schema_wins_over_derivation() {
        let mut arena = TypeArena::new();
        let string = arena.primitive(PrimitiveKind::String);
        let body = arena.record(&[("name", string, false)]);
        let cat = arena.named("Cat", body);
        let attached = HashMap::from([(
            "Cat".to_owned(),
            SchemaValue::from_value(json!({ "type": "object" })),
        )]);

        let mapper = OpenApiMapper::new(&arena);
        let schema = derive_static(&arena, &mapper, &attached, cat).unwrap();
        assert_eq!(schema.canonical_text(), r#"{"type":"object"}"#);
    }

    #[test]
    fn recursive_references_without_schema_defer() {
        let mut arena = TypeArena::new();
        let int = arena.primitive(PrimitiveKind::Int);
        let list = arena.declare("IntList");
        let elements = arena.array(list);
        let body = arena.union(&[int, elements]);
        arena.define(list, body);

        assert_eq!(derive(&arena, list), None);
    }

    #[test]
    fn error_and_unresolved_types_defer() {
        let mut arena = TypeArena::new();
        let int = arena.primitive(PrimitiveKind::Int);
        let with_error = arena.union(&[int, arena.error()]);
        let opaque = arena.nominal("Stream", &[]);

        assert_eq!(derive(&arena, arena.error()), None);
        assert_eq!(derive(&arena, with_error), None);
        assert_eq!(derive(&arena, opaque), None);
    }
}

//! Schema normalizer.
//!
//! Structural mappers (OpenAPI-style record mappers, [`schemars`] derives)
//! emit far more than a prediction service needs: titles, numeric and length
//! bounds, `$ref`s, examples, conditional keywords. [`normalize`] reduces such
//! a raw tree to the minimal structural core:
//!
//! * only `type`, `items`, `anyOf`, `allOf`, `oneOf`, `properties` and
//!   `required` survive, on every node;
//! * a node carrying a combinator loses its sibling `type`;
//! * `{"type": "string", "format": "byte"}` becomes `{"type": "number"}`.
//!
//! Normalizing an already-normalized tree returns it unchanged.

use schemars::{JsonSchema, SchemaGenerator, r#gen::SchemaSettings, schema::Schema};
use serde_json::{Map, Value};

use crate::{error::Result, schema::SchemaValue};

const COMBINATORS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

/// Normalize a raw structural schema produced by a mapper.
///
/// A `$ref` node carries none of the kept keywords, so it normalizes to
/// `{}`: a field typed by a reference to another record is left
/// unconstrained. Inline the referenced schema first where that matters.
///
/// # Errors
///
/// [`crate::NaturalError::Serialization`] if the raw tree cannot be turned
/// into JSON.
pub fn normalize(raw: &Schema) -> Result<SchemaValue> {
    let value = serde_json::to_value(raw)?;
    Ok(SchemaValue::from_value(normalize_value(&value)))
}

/// Apply the normalization rules to an arbitrary JSON tree.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Object(node) => Value::Object(normalize_node(node)),
        other => other.clone(),
    }
}

fn normalize_node(node: &Map<String, Value>) -> Map<String, Value> {
    let has_combinator = COMBINATORS.iter().any(|key| node.contains_key(*key));
    let is_byte = node.get("format").and_then(Value::as_str) == Some("byte")
        && node.get("type").and_then(Value::as_str) == Some("string");

    let mut out = Map::new();
    for (key, value) in node {
        match key.as_str() {
            "type" if has_combinator => {}
            "type" if is_byte => {
                out.insert(key.clone(), Value::from("number"));
            }
            "type" | "required" => {
                out.insert(key.clone(), value.clone());
            }
            "items" => {
                let items = match value {
                    Value::Array(positional) => {
                        Value::Array(positional.iter().map(normalize_value).collect())
                    }
                    single => normalize_value(single),
                };
                out.insert(key.clone(), items);
            }
            "allOf" | "anyOf" | "oneOf" => {
                if let Value::Array(branches) = value {
                    out.insert(
                        key.clone(),
                        Value::Array(branches.iter().map(normalize_value).collect()),
                    );
                }
            }
            "properties" => {
                if let Value::Object(properties) = value {
                    let properties = properties
                        .iter()
                        .map(|(name, schema)| (name.clone(), normalize_value(schema)))
                        .collect();
                    out.insert(key.clone(), Value::Object(properties));
                }
            }
            _ => {}
        }
    }
    out
}

/// Generate the canonical schema of a native Rust type.
///
/// Subschemas are inlined so no `$ref` survives normalization as an empty
/// node. Hosts use this to attach schemas to runtime record descriptors built
/// from Rust structs.
///
/// ```
/// use natural_core::schema_util::response_schema_for;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Foo { bar: String }
///
/// let schema = response_schema_for::<Foo>().unwrap();
/// assert_eq!(
///     schema.canonical_text(),
///     r#"{"properties":{"bar":{"type":"string"}},"required":["bar"],"type":"object"}"#
/// );
/// ```
pub fn response_schema_for<T>() -> Result<SchemaValue>
where
    T: JsonSchema + 'static,
{
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = SchemaGenerator::new(settings);
    let root = generator.into_root_schema_for::<T>();

    normalize(&Schema::Object(root.schema))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_non_structural_keywords() {
        let raw = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$id": "urn:cat",
            "title": "Cat",
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "name": { "type": "string", "minLength": 1, "maxLength": 20, "examples": ["Tom"] },
                "age": { "type": "integer", "minimum": 0, "maximum": 30, "format": "int64" },
                "tags": { "type": "array", "items": { "type": "string", "const": "x" }, "maxItems": 3 },
                "owner": { "$ref": "#/components/schemas/Owner" }
            },
            "required": ["name"],
            "if": { "properties": { "age": { "const": 1 } } },
            "then": { "required": ["tags"] }
        });

        assert_eq!(
            normalize_value(&raw),
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "integer" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "owner": {}
                },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn combinators_clear_sibling_type_recursively() {
        let raw = json!({
            "type": "object",
            "oneOf": [
                { "type": "object", "allOf": [{ "type": "string", "format": "byte" }] },
                { "type": "null" }
            ]
        });

        assert_eq!(
            normalize_value(&raw),
            json!({ "oneOf": [{ "allOf": [{ "type": "number" }] }, { "type": "null" }] })
        );
    }

    #[test]
    fn byte_override_applies_inside_items_and_properties() {
        let raw = json!({
            "type": "object",
            "properties": {
                "blob": { "type": "array", "items": { "type": "string", "format": "byte" } },
                "one": { "type": "string", "format": "byte" }
            }
        });
        let normalized = normalize_value(&raw);
        assert_eq!(normalized["properties"]["blob"]["items"], json!({ "type": "number" }));
        assert_eq!(normalized["properties"]["one"], json!({ "type": "number" }));
        assert!(!normalized.to_string().contains("byte"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "type": "object",
            "title": "Pet",
            "anyOf": [
                { "type": "string", "format": "byte", "description": "raw" },
                { "type": "array", "items": [{ "type": "integer", "minimum": 1 }] }
            ]
        });
        let once = normalize_value(&raw);
        assert_eq!(normalize_value(&once), once);
    }

    #[test]
    fn derives_and_normalizes_native_types() {
        #[allow(dead_code)]
        #[derive(JsonSchema)]
        struct Dog {
            name: String,
            age: Option<i32>,
        }

        let schema = response_schema_for::<Dog>().unwrap();
        assert_eq!(
            schema.canonical_text(),
            r#"{"properties":{"age":{"type":["integer","null"]},"name":{"type":"string"}},"required":["name"],"type":"object"}"#
        );
    }
}

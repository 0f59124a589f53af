//! Canonical JSON Schema values and the shape constructors shared by both
//! derivation engines.
//!
//! A [`SchemaValue`] is immutable once built. Its canonical text is compact
//! JSON with object keys in sorted order and arrays in declaration order, so
//! the same type always yields byte-identical text on either path.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Result;

/// Every JSON kind, in the fixed order used for the universal `json` type.
pub const JSON_KINDS: [&str; 6] = ["object", "array", "string", "number", "boolean", "null"];

/// Primitive kinds of the host type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    /// Exact integers.
    Int,
    /// Byte/blob element type. Numeric even though structural mappers tend to
    /// render it as a base64 string.
    Byte,
    Float,
    Decimal,
    String,
    Nil,
}

impl PrimitiveKind {
    /// JSON Schema `type` name of the kind.
    pub fn json_type(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "integer",
            PrimitiveKind::Byte | PrimitiveKind::Float | PrimitiveKind::Decimal => "number",
            PrimitiveKind::String => "string",
            PrimitiveKind::Nil => "null",
        }
    }
}

/// A JSON Schema fragment in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaValue(Value);

impl SchemaValue {
    /// Wrap a tree that is already canonical (engine output or a schema
    /// attached by a previous compile-time pass).
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parse schema text as found in a schema annotation payload. Any
    /// whitespace between tokens disappears on re-serialisation.
    pub fn from_canonical_text(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Compact text form embedded in annotations and compared in tests.
    pub fn canonical_text(&self) -> String {
        self.0.to_string()
    }

    /// `type` of the root node, when it is a single string.
    pub fn root_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}

impl fmt::Display for SchemaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `{"type": <json type of kind>}`.
pub fn primitive(kind: PrimitiveKind) -> SchemaValue {
    SchemaValue(json!({ "type": kind.json_type() }))
}

/// Schema accepting any JSON value.
pub fn json_any() -> SchemaValue {
    SchemaValue(json!({ "type": JSON_KINDS }))
}

/// Homogeneous array.
pub fn array_of(items: SchemaValue) -> SchemaValue {
    SchemaValue(json!({ "type": "array", "items": items.0 }))
}

/// Positional array; member order is kept.
pub fn tuple_of(items: Vec<SchemaValue>) -> SchemaValue {
    let items: Vec<Value> = items.into_iter().map(SchemaValue::into_value).collect();
    SchemaValue(json!({ "type": "array", "items": items }))
}

/// Union of `members` in declaration order.
pub fn any_of(members: Vec<SchemaValue>) -> SchemaValue {
    let mut node = Map::new();
    node.insert("type".into(), Value::from("object"));
    node.insert(
        "anyOf".into(),
        Value::Array(members.into_iter().map(SchemaValue::into_value).collect()),
    );
    SchemaValue(Value::Object(node))
}

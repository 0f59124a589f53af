//! Runtime type descriptors.
//!
//! Descriptors are cheap to clone: named definitions are shared through an
//! [`Arc`] and may refer to themselves, so recursive records are expressed
//! by declaring the definition first and defining its body afterwards.
//!
//! ```rust
//! use std::sync::Arc;
//! use natural_core::PrimitiveKind;
//! use natural_runtime::{RecordField, RuntimeType, TypeDefinition};
//!
//! let node = Arc::new(TypeDefinition::new("Node"));
//! node.define(RuntimeType::record(vec![
//!     RecordField::required("label", RuntimeType::Primitive(PrimitiveKind::String)),
//!     RecordField::required("children", RuntimeType::array(RuntimeType::reference(&node))),
//! ]))
//! .unwrap();
//! assert!(node.body().is_some());
//! ```
use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use natural_core::{
    NaturalError, PrimitiveKind, Result, SchemaValue, schema_util::response_schema_for,
};
use schemars::JsonSchema;

#[derive(Debug, Clone)]
pub enum RuntimeType {
    Primitive(PrimitiveKind),
    Record(Vec<RecordField>),
    Array(Box<RuntimeType>),
    Tuple(Vec<RuntimeType>),
    /// Members in declaration order.
    Union(Vec<RuntimeType>),
    Reference(Arc<TypeDefinition>),
    Json,
    Error,
    /// Anything without a JSON rendering (objects, streams, functions...).
    Other(String),
}

impl RuntimeType {
    pub fn record(fields: Vec<RecordField>) -> Self {
        RuntimeType::Record(fields)
    }

    pub fn array(element: RuntimeType) -> Self {
        RuntimeType::Array(Box::new(element))
    }

    pub fn tuple(members: Vec<RuntimeType>) -> Self {
        RuntimeType::Tuple(members)
    }

    pub fn union(members: Vec<RuntimeType>) -> Self {
        RuntimeType::Union(members)
    }

    pub fn reference(definition: &Arc<TypeDefinition>) -> Self {
        RuntimeType::Reference(Arc::clone(definition))
    }

    /// `T?`, i.e. `T|()`.
    pub fn optional(inner: RuntimeType) -> Self {
        RuntimeType::Union(vec![inner, RuntimeType::Primitive(PrimitiveKind::Nil)])
    }
}

#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub ty: RuntimeType,
    pub required: bool,
}

impl RecordField {
    pub fn required(name: impl Into<String>, ty: RuntimeType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, ty: RuntimeType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
        }
    }
}

/// A named type definition. The body is set once; the schema, when present,
/// is the one a compile-time pass attached to the declaration.
pub struct TypeDefinition {
    name: String,
    body: OnceLock<RuntimeType>,
    schema: Option<SchemaValue>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: OnceLock::new(),
            schema: None,
        }
    }

    /// A definition with its body already set.
    pub fn defined(name: impl Into<String>, body: RuntimeType) -> Self {
        let definition = Self::new(name);
        let _ = definition.body.set(body);
        definition
    }

    pub fn with_schema(mut self, schema: SchemaValue) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Attach the canonical schema of a native Rust type.
    ///
    /// # Errors
    ///
    /// [`NaturalError::Serialization`] if the generated schema cannot be
    /// turned into JSON.
    pub fn with_schema_of<T: JsonSchema + 'static>(self) -> Result<Self> {
        Ok(self.with_schema(response_schema_for::<T>()?))
    }

    /// # Errors
    ///
    /// [`NaturalError::Invalid`] if the body was already set.
    pub fn define(&self, body: RuntimeType) -> Result<()> {
        self.body
            .set(body)
            .map_err(|_| NaturalError::Invalid(format!("type `{}` is already defined", self.name)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> Option<&RuntimeType> {
        self.body.get()
    }

    pub fn schema(&self) -> Option<&SchemaValue> {
        self.schema.as_ref()
    }
}

// The body may point back at this definition.
impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("defined", &self.body.get().is_some())
            .field("schema", &self.schema)
            .finish()
    }
}

//! Dynamic schema derivation and the runtime fallback chain.
//!
//! [`derive_dynamic`] mirrors the compile-time engine shape for shape, so
//! both produce the same canonical text for every type they can describe.
//! Records are the exception: without a structural mapper at runtime, a
//! record is only describable through a schema attached to its definition.
use std::sync::Arc;

use natural_core::{SchemaValue, schema};

use crate::ty::{RuntimeType, TypeDefinition};

/// Schema attached to the definition `ty` names, if any.
pub fn attached_schema(ty: &RuntimeType) -> Option<&SchemaValue> {
    match ty {
        RuntimeType::Reference(definition) => definition.schema(),
        _ => None,
    }
}

/// Derive the schema of `ty`. `None` when some part of it, typically a
/// record without an attached schema, cannot be described.
pub fn derive_dynamic(ty: &RuntimeType) -> Option<SchemaValue> {
    DynamicDeriver::default().derive(ty)
}

/// The attached schema when present, the derived one otherwise.
pub fn resolve_schema(ty: &RuntimeType) -> Option<SchemaValue> {
    if let Some(schema) = attached_schema(ty) {
        #[cfg(feature = "tracing")]
        tracing::debug!("using schema attached at compile time");
        return Some(schema.clone());
    }

    let derived = derive_dynamic(ty);
    #[cfg(feature = "tracing")]
    match &derived {
        Some(schema) => tracing::debug!(%schema, "schema derived at runtime"),
        None => tracing::debug!("no schema for result type, calling without one"),
    }
    derived
}

#[derive(Default)]
struct DynamicDeriver {
    /// Definitions being derived on the current path, by identity.
    in_progress: Vec<*const TypeDefinition>,
}

impl DynamicDeriver {
    fn derive(&mut self, ty: &RuntimeType) -> Option<SchemaValue> {
        match ty {
            RuntimeType::Primitive(kind) => Some(schema::primitive(*kind)),
            RuntimeType::Json => Some(schema::json_any()),
            RuntimeType::Array(element) => self.derive(element).map(schema::array_of),
            RuntimeType::Tuple(members) => members
                .iter()
                .map(|member| self.derive(member))
                .collect::<Option<Vec<_>>>()
                .map(schema::tuple_of),
            RuntimeType::Union(members) => members
                .iter()
                .map(|member| self.derive(member))
                .collect::<Option<Vec<_>>>()
                .map(schema::any_of),
            RuntimeType::Reference(definition) => self.derive_reference(definition),
            RuntimeType::Record(_) | RuntimeType::Error | RuntimeType::Other(_) => None,
        }
    }

    fn derive_reference(&mut self, definition: &Arc<TypeDefinition>) -> Option<SchemaValue> {
        if let Some(schema) = definition.schema() {
            return Some(schema.clone());
        }

        let identity = Arc::as_ptr(definition);
        if self.in_progress.contains(&identity) {
            return None;
        }

        let body = definition.body()?;
        self.in_progress.push(identity);
        let derived = self.derive(body);
        self.in_progress.pop();
        derived
    }
}

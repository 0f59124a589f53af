//! Capability probes over runtime descriptors.
//!
//! These are the building blocks callers need when no schema is available:
//! listing a record's fields, finding an array's element type or a union's
//! members, and asking whether `()` is an acceptable result. Every walk is
//! bounded on cyclic definitions.
use std::{borrow::Cow, collections::HashSet, sync::Arc};

use natural_core::PrimitiveKind;

use crate::ty::{RuntimeType, TypeDefinition};

/// One field of a record, as the fallback hint needs it.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub required: bool,
    pub nilable: bool,
    /// The field's type with `()` removed when it is an optional union.
    pub ty: RuntimeType,
}

/// Follow references until a non-reference type (or an undefined or cyclic
/// definition) is reached.
pub fn resolve(ty: &RuntimeType) -> &RuntimeType {
    let mut current = ty;
    let mut seen: HashSet<*const TypeDefinition> = HashSet::new();
    while let RuntimeType::Reference(definition) = current {
        if !seen.insert(Arc::as_ptr(definition)) {
            break;
        }
        match definition.body() {
            Some(body) => current = body,
            None => break,
        }
    }
    current
}

/// Fields of `ty` when it is (a reference to) a record.
pub fn record_fields(ty: &RuntimeType) -> Option<Vec<FieldInfo>> {
    let RuntimeType::Record(fields) = resolve(ty) else {
        return None;
    };
    let fields = fields
        .iter()
        .map(|field| FieldInfo {
            name: field.name.clone(),
            required: field.required,
            nilable: contains_nil(&field.ty),
            ty: non_nil_member(&field.ty).clone(),
        })
        .collect();
    Some(fields)
}

/// Element type of `ty` when it is (a reference to) an array.
pub fn array_member_type(ty: &RuntimeType) -> Option<&RuntimeType> {
    match resolve(ty) {
        RuntimeType::Array(element) => Some(element),
        _ => None,
    }
}

/// Members of `ty` when it is (a reference to) a union, nested unions
/// flattened; `[ty]` otherwise. A definition already being expanded
/// contributes nothing the second time it is reached.
pub fn union_members(ty: &RuntimeType) -> Vec<&RuntimeType> {
    let mut members = Vec::new();
    collect_members(ty, &mut members, &mut HashSet::new());
    members
}

fn collect_members<'a>(
    ty: &'a RuntimeType,
    members: &mut Vec<&'a RuntimeType>,
    seen: &mut HashSet<*const TypeDefinition>,
) {
    match ty {
        RuntimeType::Union(nested) => {
            for member in nested {
                collect_members(member, members, seen);
            }
        }
        RuntimeType::Reference(definition) => match definition.body() {
            Some(body @ (RuntimeType::Union(_) | RuntimeType::Reference(_))) => {
                if seen.insert(Arc::as_ptr(definition)) {
                    collect_members(body, members, seen);
                }
            }
            _ => members.push(ty),
        },
        _ => members.push(ty),
    }
}

/// Whether `()` belongs to `ty`.
pub fn contains_nil(ty: &RuntimeType) -> bool {
    nil_reachable(ty, &mut HashSet::new())
}

fn nil_reachable(ty: &RuntimeType, seen: &mut HashSet<*const TypeDefinition>) -> bool {
    match ty {
        RuntimeType::Primitive(PrimitiveKind::Nil) | RuntimeType::Json => true,
        RuntimeType::Union(members) => members.iter().any(|member| nil_reachable(member, seen)),
        RuntimeType::Reference(definition) => {
            seen.insert(Arc::as_ptr(definition))
                && definition.body().is_some_and(|body| nil_reachable(body, seen))
        }
        _ => false,
    }
}

/// `ty` without its `error` members, when it has any. The declared result
/// type of a natural function always admits `error`, which is never part of
/// the answer the service is asked for.
pub fn without_error(ty: &RuntimeType) -> Cow<'_, RuntimeType> {
    let members = union_members(ty);
    let (errors, data): (Vec<&RuntimeType>, Vec<&RuntimeType>) = members
        .into_iter()
        .partition(|member| matches!(resolve(member), RuntimeType::Error));
    if errors.is_empty() || data.is_empty() {
        return Cow::Borrowed(ty);
    }

    match data.as_slice() {
        [single] => Cow::Owned((*single).clone()),
        _ => Cow::Owned(RuntimeType::union(data.into_iter().cloned().collect())),
    }
}

/// First member of a union that is not `()`; `ty` itself otherwise.
fn non_nil_member(ty: &RuntimeType) -> &RuntimeType {
    match resolve(ty) {
        RuntimeType::Union(members) => members
            .iter()
            .find(|member| !matches!(resolve(member), RuntimeType::Primitive(PrimitiveKind::Nil)))
            .unwrap_or(ty),
        _ => ty,
    }
}

/// Render a field listing for a result type whose schema is unknown.
pub(crate) fn field_hint(ty: &RuntimeType) -> Option<String> {
    let members = union_members(ty);
    let lines: Vec<String> = members
        .iter()
        .filter_map(|member| {
            let fields = record_fields(member)?;
            let name = match member {
                RuntimeType::Reference(definition) => definition.name().to_owned(),
                _ => "record".to_owned(),
            };
            let listing = fields
                .iter()
                .map(|field| {
                    let mut entry = field.name.clone();
                    if !field.required {
                        entry.push('?');
                    }
                    entry.push_str(": ");
                    entry.push_str(&type_label(&field.ty));
                    if field.nilable {
                        entry.push_str(" (nullable)");
                    }
                    entry
                })
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("{name} {{ {listing} }}"))
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn type_label(ty: &RuntimeType) -> String {
    match ty {
        RuntimeType::Primitive(kind) => kind.json_type().to_owned(),
        RuntimeType::Record(_) => "object".to_owned(),
        RuntimeType::Array(element) => format!("{}[]", type_label(element)),
        RuntimeType::Tuple(_) => "array".to_owned(),
        RuntimeType::Union(members) => members.iter().map(type_label).collect::<Vec<_>>().join("|"),
        RuntimeType::Reference(definition) => definition.name().to_owned(),
        RuntimeType::Json => "json".to_owned(),
        RuntimeType::Error => "error".to_owned(),
        RuntimeType::Other(name) => name.clone(),
    }
}

//! Recognising the marker module: its import, the annotations that tag a
//! natural function, and schema annotations already present on types.
use std::collections::HashMap;

use natural_core::SchemaValue;

use crate::{
    ast::{Annotation, Document, FunctionBody, FunctionDef, Module},
    config::MarkerConfig,
};

/// Which marker annotation tagged a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaturalForm {
    /// `NaturalFunction`: `prompt` and an optional `context`.
    Broad,
    /// `LlmCall`: `prompt` and an optional `model`.
    Direct,
}

impl NaturalForm {
    /// Name of the optional second parameter forwarded to the entry point.
    pub fn companion_param(self) -> &'static str {
        match self {
            NaturalForm::Broad => "context",
            NaturalForm::Direct => "model",
        }
    }
}

/// Local alias of the marker module in `document`, if it is imported.
///
/// An import without an org is accepted so module tests can import the
/// marker module of their own package.
pub fn find_marker_alias(document: &Document, config: &MarkerConfig) -> Option<String> {
    document
        .imports
        .iter()
        .find(|import| {
            import.org.as_deref().is_none_or(|org| org == config.org)
                && import.module.len() == 1
                && import.module[0] == config.module
        })
        .map(|import| import.alias().to_owned())
}

/// Marker form of `function`, looked up under the document's `alias`.
pub fn natural_form(
    function: &FunctionDef,
    alias: &str,
    config: &MarkerConfig,
) -> Option<NaturalForm> {
    let FunctionBody::External { annotations } = &function.body else {
        return None;
    };
    annotations.iter().find_map(|annotation| {
        if annotation.reference.is(alias, &config.natural_function_annotation) {
            Some(NaturalForm::Broad)
        } else if annotation.reference.is(alias, &config.llm_call_annotation) {
            Some(NaturalForm::Direct)
        } else {
            None
        }
    })
}

/// Whether `annotation` is a schema annotation of the marker module, written
/// under the document's alias or the default one.
pub fn is_schema_annotation(
    annotation: &Annotation,
    alias: Option<&str>,
    config: &MarkerConfig,
) -> bool {
    let reference = &annotation.reference;
    reference.name == config.schema_annotation
        && reference
            .prefix
            .as_deref()
            .is_some_and(|prefix| Some(prefix) == alias || prefix == config.default_alias())
}

/// Schemas already attached to type definitions anywhere in `module`,
/// keyed by type name. Payloads that do not parse are ignored.
pub fn attached_schemas(module: &Module, config: &MarkerConfig) -> HashMap<String, SchemaValue> {
    let mut attached = HashMap::new();
    for document in module.all_documents() {
        let alias = find_marker_alias(document, config);
        for definition in document.type_definitions() {
            let payload = definition
                .annotations
                .iter()
                .filter(|annotation| is_schema_annotation(annotation, alias.as_deref(), config))
                .find_map(|annotation| annotation.value.as_deref())
                .and_then(|text| SchemaValue::from_canonical_text(text).ok());
            if let Some(schema) = payload {
                attached.insert(definition.name.clone(), schema);
            }
        }
    }
    attached
}

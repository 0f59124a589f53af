//! Compile-time rewrite pipeline.
//!
//! Runs once per module, source and test documents together:
//!
//! 1. validate every tagged function; any error leaves the module untouched;
//! 2. scan imports for the marker module's alias;
//! 3. derive schemas for the named types reachable from tagged result types;
//! 4. replace tagged bodies with a call to the entry point;
//! 5. attach a schema annotation to each cached type declaration that does
//!    not carry one already;
//! 6. import the marker module where an attached annotation needs it.
//!
//! All state lives in the values created for one [`CodeModifier::modify`]
//! call, so independent modules can be processed concurrently.
use std::collections::{BTreeMap, HashMap, HashSet};

use natural_core::SchemaValue;

use crate::{
    ast::{
        Annotation, CallExpr, Document, FunctionBody, FunctionDef, ImportDecl, Member, Module,
        QualifiedName,
    },
    config::MarkerConfig,
    derive::StaticDeriver,
    diagnostic::Diagnostic,
    marker::{attached_schemas, find_marker_alias, is_schema_annotation, natural_form},
    oracle::{SemanticModel, StructuralMapper, TypeId, TypeShape},
    validator::SignatureValidator,
};

/// Schemas derived during one pipeline run, keyed by type definition name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCache {
    schemas: BTreeMap<String, SchemaValue>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: SchemaValue) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaValue> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaValue)> {
        self.schemas.iter().map(|(name, schema)| (name.as_str(), schema))
    }
}

/// Validation result of a module.
#[derive(Debug, Clone, Default)]
pub struct AnalysisData {
    pub diagnostics: Vec<Diagnostic>,
    /// Set when any diagnostic is an error; suppresses every rewrite.
    pub erred: bool,
}

impl AnalysisData {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let erred = diagnostics.iter().any(Diagnostic::is_error);
        Self { diagnostics, erred }
    }
}

/// Outcome of running the pipeline over one module.
#[derive(Debug, Clone)]
pub struct ModifyOutcome {
    pub module: Module,
    pub diagnostics: Vec<Diagnostic>,
    pub schemas: SchemaCache,
    /// Number of function bodies replaced with an entry-point call.
    pub rewritten: usize,
}

impl ModifyOutcome {
    fn unchanged(module: Module, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            module,
            diagnostics,
            schemas: SchemaCache::new(),
            rewritten: 0,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.rewritten > 0 || !self.schemas.is_empty()
    }
}

/// Collects schemas for the named types a tagged function can return.
///
/// Direct union members are visited first, then array elements, tuple
/// members and record fields, so nested named types are annotated too.
/// Types that cannot be derived statically are skipped and left to the
/// runtime. Every derivable named type is annotated, not only records:
/// an alias of a primitive or an array gets its schema as well, which the
/// runtime would otherwise derive to the same text.
pub struct SchemaExtractor<'a, M: ?Sized, S: ?Sized> {
    model: &'a M,
    deriver: StaticDeriver<'a, M, S>,
    visited: HashSet<TypeId>,
}

impl<'a, M, S> SchemaExtractor<'a, M, S>
where
    M: SemanticModel + ?Sized,
    S: StructuralMapper + ?Sized,
{
    pub fn new(model: &'a M, mapper: &'a S, attached: &'a HashMap<String, SchemaValue>) -> Self {
        Self {
            model,
            deriver: StaticDeriver::new(model, mapper, attached),
            visited: HashSet::new(),
        }
    }

    pub fn extract(&mut self, function: &FunctionDef, cache: &mut SchemaCache) {
        let Some(ty) = function.return_type.and_then(|return_type| return_type.ty) else {
            return;
        };
        self.walk(ty, cache);
    }

    fn walk(&mut self, ty: TypeId, cache: &mut SchemaCache) {
        if !self.visited.insert(ty) {
            return;
        }
        let model = self.model;
        match model.shape(ty) {
            TypeShape::Reference { name, target } => {
                match self.deriver.derive(ty) {
                    Some(schema) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(type_name = name, %schema, "schema derived at compile time");
                        cache.insert(name, schema);
                    }
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(type_name = name, "schema deferred to runtime");
                    }
                }
                self.walk(target, cache);
            }
            TypeShape::Union(members) | TypeShape::Tuple(members) => {
                for member in members {
                    self.walk(*member, cache);
                }
            }
            TypeShape::Array(element) => self.walk(element, cache),
            TypeShape::Record(fields) => {
                for field in fields {
                    self.walk(field.ty, cache);
                }
            }
            TypeShape::Primitive(_) | TypeShape::Json | TypeShape::Error | TypeShape::Other(_) => {}
        }
    }
}

/// Runs the pipeline with a host's semantic model and structural mapper.
///
/// ```rust
/// use natural_compiler::{CodeModifier, MarkerConfig, ast::Module, host::{OpenApiMapper, TypeArena}};
///
/// let arena = TypeArena::new();
/// let mapper = OpenApiMapper::new(&arena);
/// let config = MarkerConfig::default();
///
/// let outcome = CodeModifier::new(&arena, &mapper, &config).modify(Module::default());
/// assert!(!outcome.is_modified());
/// ```
pub struct CodeModifier<'a, M: ?Sized, S: ?Sized> {
    model: &'a M,
    mapper: &'a S,
    config: &'a MarkerConfig,
}

impl<'a, M, S> CodeModifier<'a, M, S>
where
    M: SemanticModel + ?Sized,
    S: StructuralMapper + ?Sized,
{
    pub fn new(model: &'a M, mapper: &'a S, config: &'a MarkerConfig) -> Self {
        Self {
            model,
            mapper,
            config,
        }
    }

    pub fn analyze(&self, module: &Module) -> AnalysisData {
        let validator = SignatureValidator::new(self.model, self.config);
        AnalysisData::from_diagnostics(validator.validate_module(module))
    }

    pub fn modify(&self, mut module: Module) -> ModifyOutcome {
        let analysis = self.analyze(&module);
        if analysis.erred {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                module = %module.name,
                errors = analysis.diagnostics.len(),
                "natural function contract violated, module left unchanged"
            );
            return ModifyOutcome::unchanged(module, analysis.diagnostics);
        }

        let tagged = self.tagged_functions(&module);
        if tagged.is_empty() {
            return ModifyOutcome::unchanged(module, analysis.diagnostics);
        }

        let attached = attached_schemas(&module, self.config);
        let mut cache = SchemaCache::new();
        let mut extractor = SchemaExtractor::new(self.model, self.mapper, &attached);
        for function in &tagged {
            extractor.extract(function, &mut cache);
        }

        let mut rewritten = 0;
        for document in module
            .documents
            .iter_mut()
            .chain(module.test_documents.iter_mut())
        {
            let mut rewriter = DocumentRewriter::new(document, self.config);
            rewritten += rewriter.rewrite_bodies();
            rewriter.attach_schemas(&cache);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            module = %module.name,
            rewritten,
            schemas = cache.len(),
            "natural functions rewritten"
        );

        ModifyOutcome {
            module,
            diagnostics: analysis.diagnostics,
            schemas: cache,
            rewritten,
        }
    }

    fn tagged_functions(&self, module: &Module) -> Vec<FunctionDef> {
        let mut tagged = Vec::new();
        for document in module.all_documents() {
            let Some(alias) = find_marker_alias(document, self.config) else {
                continue;
            };
            tagged.extend(
                document
                    .functions()
                    .filter(|function| natural_form(function, &alias, self.config).is_some())
                    .cloned(),
            );
        }
        tagged
    }
}

/// Rewrites one document. The alias is looked up per document and never
/// shared across documents.
struct DocumentRewriter<'d> {
    document: &'d mut Document,
    config: &'d MarkerConfig,
    alias: Option<String>,
}

impl<'d> DocumentRewriter<'d> {
    fn new(document: &'d mut Document, config: &'d MarkerConfig) -> Self {
        let alias = find_marker_alias(document, config);
        Self {
            document,
            config,
            alias,
        }
    }

    fn rewrite_bodies(&mut self) -> usize {
        let Some(alias) = self.alias.as_deref() else {
            return 0;
        };

        let mut rewritten = 0;
        for member in &mut self.document.members {
            let Member::Function(function) = member else {
                continue;
            };
            let Some(form) = natural_form(function, alias, self.config) else {
                continue;
            };

            let mut args = vec!["prompt".to_owned()];
            let companion = form.companion_param();
            if function.param(companion).is_some() {
                args.push(companion.to_owned());
            }
            function.body = FunctionBody::Expression(CallExpr {
                callee: QualifiedName::new(Some(alias), self.config.entry_point.as_str()),
                args,
            });
            rewritten += 1;
        }
        rewritten
    }

    fn attach_schemas(&mut self, cache: &SchemaCache) {
        if cache.is_empty() {
            return;
        }

        let alias = match &self.alias {
            Some(alias) => alias.clone(),
            None => fresh_alias(&*self.document, self.config),
        };
        let existing = self.alias.clone();

        let mut attached = 0;
        for member in &mut self.document.members {
            let Member::Type(definition) = member else {
                continue;
            };
            let Some(schema) = cache.get(&definition.name) else {
                continue;
            };
            let annotated = definition
                .annotations
                .iter()
                .any(|annotation| {
                    is_schema_annotation(annotation, existing.as_deref(), self.config)
                });
            if annotated {
                continue;
            }

            let mut annotation = Annotation::new(QualifiedName::new(
                Some(alias.as_str()),
                self.config.schema_annotation.as_str(),
            ));
            annotation.value = Some(schema.canonical_text());
            definition.annotations.push(annotation);
            attached += 1;
        }

        if attached > 0 && self.alias.is_none() {
            let prefix = (alias != self.config.default_alias()).then_some(alias.as_str());
            self.document.imports.push(ImportDecl::new(
                Some(self.config.org.as_str()),
                &[self.config.module.as_str()],
                prefix,
            ));
            self.alias = Some(alias);
        }
    }
}

/// The default alias, or `np1`, `np2`, ... when another import already
/// claims it.
fn fresh_alias(document: &Document, config: &MarkerConfig) -> String {
    let taken: HashSet<&str> = document.imports.iter().map(ImportDecl::alias).collect();
    let base = config.default_alias();
    if !taken.contains(base) {
        return base.to_owned();
    }
    (1..)
        .map(|suffix| format!("{base}{suffix}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_owned())
}

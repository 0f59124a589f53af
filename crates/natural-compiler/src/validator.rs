//! Signature validator.
//!
//! Every function tagged with a marker annotation must take a `prompt` of
//! the marker module's `Prompt` type, may take a `context` (broad form) or a
//! `model` (direct-call form) of the matching capability type, and must
//! return `error` alongside JSON-compatible success types. Each rule reports
//! independently; only a missing or untyped return clause stops the return
//! checks early.
use crate::{
    ast::{Document, FunctionDef, Module, Param},
    config::MarkerConfig,
    diagnostic::{Diagnostic, DiagnosticCode},
    marker::{NaturalForm, find_marker_alias, natural_form},
    oracle::{SemanticModel, TypeId, union_members},
};

pub struct SignatureValidator<'a, M: SemanticModel + ?Sized> {
    model: &'a M,
    config: &'a MarkerConfig,
    prompt_type: Option<TypeId>,
    context_type: Option<TypeId>,
    model_type: Option<TypeId>,
}

/// Codes reported for one companion parameter.
struct ParamRule {
    target: Option<TypeId>,
    kind_code: DiagnosticCode,
    type_code: DiagnosticCode,
}

impl<'a, M: SemanticModel + ?Sized> SignatureValidator<'a, M> {
    pub fn new(model: &'a M, config: &'a MarkerConfig) -> Self {
        let lookup = |name: &str| model.module_type(&config.org, &config.module, name);
        Self {
            model,
            config,
            prompt_type: lookup(&config.prompt_type),
            context_type: lookup(&config.context_type),
            model_type: lookup(&config.model_type),
        }
    }

    /// Validate source and test documents of `module`.
    pub fn validate_module(&self, module: &Module) -> Vec<Diagnostic> {
        module
            .all_documents()
            .flat_map(|document| self.validate_document(document))
            .collect()
    }

    /// Documents that do not import the marker module have nothing to check.
    pub fn validate_document(&self, document: &Document) -> Vec<Diagnostic> {
        let Some(alias) = find_marker_alias(document, self.config) else {
            return Vec::new();
        };

        let mut diagnostics = Vec::new();
        for function in document.functions() {
            if let Some(form) = natural_form(function, &alias, self.config) {
                self.validate_function(&document.name, function, form, &mut diagnostics);
            }
        }
        diagnostics
    }

    pub fn validate_function(
        &self,
        document: &str,
        function: &FunctionDef,
        form: NaturalForm,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let before = diagnostics.len();
        self.validate_parameters(document, function, form, diagnostics);
        self.validate_return_type(document, function, form, diagnostics);

        #[cfg(feature = "tracing")]
        for diagnostic in &diagnostics[before..] {
            tracing::debug!(function = %function.name, %diagnostic, "natural function contract violated");
        }
        #[cfg(not(feature = "tracing"))]
        let _ = before;
    }

    fn validate_parameters(
        &self,
        document: &str,
        function: &FunctionDef,
        form: NaturalForm,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let prompt_rule = ParamRule {
            target: self.prompt_type,
            kind_code: DiagnosticCode::PromptParamMustBeRequiredOrDefaultable,
            type_code: DiagnosticCode::TypeOfPromptParamMustBeASubtypeOfNpPrompt,
        };
        let companion_rule = match form {
            NaturalForm::Broad => ParamRule {
                target: self.context_type,
                kind_code: DiagnosticCode::ContextParamMustBeRequiredOrDefaultable,
                type_code: DiagnosticCode::TypeOfContextParamMustBeASubtypeOfNpContext,
            },
            NaturalForm::Direct => ParamRule {
                target: self.model_type,
                kind_code: DiagnosticCode::ModelParamMustBeRequiredOrDefaultable,
                type_code: DiagnosticCode::TypeOfModelParamMustBeASubtypeOfNpModel,
            },
        };

        let mut has_prompt = false;
        for param in &function.params {
            if param.name == "prompt" {
                has_prompt = true;
                self.validate_param(document, param, &prompt_rule, diagnostics);
            } else if param.name == form.companion_param() {
                self.validate_param(document, param, &companion_rule, diagnostics);
            }
        }

        if !has_prompt {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::PromptParamIsRequired,
                document,
                function.span,
            ));
        }
    }

    fn validate_param(
        &self,
        document: &str,
        param: &Param,
        rule: &ParamRule,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if !param.kind.is_required_or_defaultable() {
            diagnostics.push(Diagnostic::new(rule.kind_code, document, param.span));
        }

        // Untyped parameters and unknown capability types are left to the host.
        let (Some(ty), Some(target)) = (param.ty, rule.target) else {
            return;
        };
        if !self.model.is_subtype(ty, target) {
            diagnostics.push(Diagnostic::new(rule.type_code, document, param.type_span));
        }
    }

    fn validate_return_type(
        &self,
        document: &str,
        function: &FunctionDef,
        form: NaturalForm,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some(return_type) = function.return_type else {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::ReturnTypeMustContainError,
                document,
                function.span,
            ));
            return;
        };
        let span = return_type.span;
        let Some(ty) = return_type.ty else {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::ReturnTypeMustContainError,
                document,
                span,
            ));
            return;
        };

        let error = self.model.error_type();
        if !self.model.is_subtype(error, ty) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::ReturnTypeMustContainError,
                document,
                span,
            ));
        } else if form == NaturalForm::Broad && self.model.is_subtype(ty, error) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::ReturnTypeMustContainAUnionOfNonErrorAndError,
                document,
                span,
            ));
            return;
        }

        let json = self.model.json_type();
        for member in union_members(self.model, ty) {
            if self.model.is_subtype(member, error) {
                continue;
            }
            if !self.model.is_subtype(member, json) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::NonErrorReturnTypeMustBeASubtypeOfJson,
                    document,
                    span,
                ));
            }
        }
    }
}

/// Validate one document against the contract of the marker module named
/// by `config`.
pub fn validate_document<M: SemanticModel + ?Sized>(
    model: &M,
    config: &MarkerConfig,
    document: &Document,
) -> Vec<Diagnostic> {
    SignatureValidator::new(model, config).validate_document(document)
}

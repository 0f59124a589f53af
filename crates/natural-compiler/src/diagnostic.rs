//! Diagnostics emitted by the signature validator.
//!
//! Codes are stable identifiers meant for tooling and snapshot tests; the
//! message text may be reworded, the code and id never are.
use std::fmt;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// One variant per natural-function contract rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    PromptParamIsRequired,
    PromptParamMustBeRequiredOrDefaultable,
    ContextParamMustBeRequiredOrDefaultable,
    TypeOfPromptParamMustBeASubtypeOfNpPrompt,
    TypeOfContextParamMustBeASubtypeOfNpContext,
    ReturnTypeMustContainError,
    ReturnTypeMustContainAUnionOfNonErrorAndError,
    NonErrorReturnTypeMustBeASubtypeOfJson,
    ModelParamMustBeRequiredOrDefaultable,
    TypeOfModelParamMustBeASubtypeOfNpModel,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 10] = [
        DiagnosticCode::PromptParamIsRequired,
        DiagnosticCode::PromptParamMustBeRequiredOrDefaultable,
        DiagnosticCode::ContextParamMustBeRequiredOrDefaultable,
        DiagnosticCode::TypeOfPromptParamMustBeASubtypeOfNpPrompt,
        DiagnosticCode::TypeOfContextParamMustBeASubtypeOfNpContext,
        DiagnosticCode::ReturnTypeMustContainError,
        DiagnosticCode::ReturnTypeMustContainAUnionOfNonErrorAndError,
        DiagnosticCode::NonErrorReturnTypeMustBeASubtypeOfJson,
        DiagnosticCode::ModelParamMustBeRequiredOrDefaultable,
        DiagnosticCode::TypeOfModelParamMustBeASubtypeOfNpModel,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DiagnosticCode::PromptParamIsRequired => "NP_ERROR_001",
            DiagnosticCode::PromptParamMustBeRequiredOrDefaultable => "NP_ERROR_002",
            DiagnosticCode::ContextParamMustBeRequiredOrDefaultable => "NP_ERROR_003",
            DiagnosticCode::TypeOfPromptParamMustBeASubtypeOfNpPrompt => "NP_ERROR_004",
            DiagnosticCode::TypeOfContextParamMustBeASubtypeOfNpContext => "NP_ERROR_005",
            DiagnosticCode::ReturnTypeMustContainError => "NP_ERROR_006",
            DiagnosticCode::ReturnTypeMustContainAUnionOfNonErrorAndError => "NP_ERROR_007",
            DiagnosticCode::NonErrorReturnTypeMustBeASubtypeOfJson => "NP_ERROR_008",
            DiagnosticCode::ModelParamMustBeRequiredOrDefaultable => "NP_ERROR_009",
            DiagnosticCode::TypeOfModelParamMustBeASubtypeOfNpModel => "NP_ERROR_010",
        }
    }

    /// Screaming-case rule name, e.g. `PROMPT_PARAM_IS_REQUIRED`.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::PromptParamIsRequired => "PROMPT_PARAM_IS_REQUIRED",
            DiagnosticCode::PromptParamMustBeRequiredOrDefaultable => {
                "PROMPT_PARAM_MUST_BE_REQUIRED_OR_DEFAULTABLE"
            }
            DiagnosticCode::ContextParamMustBeRequiredOrDefaultable => {
                "CONTEXT_PARAM_MUST_BE_REQUIRED_OR_DEFAULTABLE"
            }
            DiagnosticCode::TypeOfPromptParamMustBeASubtypeOfNpPrompt => {
                "TYPE_OF_PROMPT_PARAM_MUST_BE_A_SUBTYPE_OF_NP_PROMPT"
            }
            DiagnosticCode::TypeOfContextParamMustBeASubtypeOfNpContext => {
                "TYPE_OF_CONTEXT_PARAM_MUST_BE_A_SUBTYPE_OF_NP_CONTEXT"
            }
            DiagnosticCode::ReturnTypeMustContainError => "RETURN_TYPE_MUST_CONTAIN_ERROR",
            DiagnosticCode::ReturnTypeMustContainAUnionOfNonErrorAndError => {
                "RETURN_TYPE_MUST_CONTAIN_A_UNION_OF_NON_ERROR_AND_ERROR"
            }
            DiagnosticCode::NonErrorReturnTypeMustBeASubtypeOfJson => {
                "NON_ERROR_RETURN_TYPE_MUST_BE_A_SUBTYPE_OF_JSON"
            }
            DiagnosticCode::ModelParamMustBeRequiredOrDefaultable => {
                "MODEL_PARAM_MUST_BE_REQUIRED_OR_DEFAULTABLE"
            }
            DiagnosticCode::TypeOfModelParamMustBeASubtypeOfNpModel => {
                "TYPE_OF_MODEL_PARAM_MUST_BE_A_SUBTYPE_OF_NP_MODEL"
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DiagnosticCode::PromptParamIsRequired => {
                "a natural function must contain the 'prompt' parameter"
            }
            DiagnosticCode::PromptParamMustBeRequiredOrDefaultable => {
                "the 'prompt' parameter must be a required or defaultable parameter"
            }
            DiagnosticCode::ContextParamMustBeRequiredOrDefaultable => {
                "the 'context' parameter must be a required or defaultable parameter"
            }
            DiagnosticCode::TypeOfPromptParamMustBeASubtypeOfNpPrompt => {
                "the type of the 'prompt' parameter must be a subtype of 'np:Prompt'"
            }
            DiagnosticCode::TypeOfContextParamMustBeASubtypeOfNpContext => {
                "the type of the 'context' parameter must be a subtype of 'np:Context'"
            }
            DiagnosticCode::ReturnTypeMustContainError => {
                "the return type of a natural function must contain 'error'"
            }
            DiagnosticCode::ReturnTypeMustContainAUnionOfNonErrorAndError => {
                "the return type of a natural function must contain both a non-'error' type and 'error'"
            }
            DiagnosticCode::NonErrorReturnTypeMustBeASubtypeOfJson => {
                "non-'error' return type of a natural function must be a subtype of 'json'"
            }
            DiagnosticCode::ModelParamMustBeRequiredOrDefaultable => {
                "the 'model' parameter must be a required or defaultable parameter"
            }
            DiagnosticCode::TypeOfModelParamMustBeASubtypeOfNpModel => {
                "the type of the 'model' parameter must be a subtype of 'np:Model'"
            }
        }
    }

    pub fn severity(self) -> Severity {
        Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub severity: Severity,
    pub document: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, document: &str, span: Span) -> Self {
        Self {
            code,
            message: code.message().to_owned(),
            severity: code.severity(),
            document: document.to_owned(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        write!(
            f,
            "{severity} [{}:({}:{})] {}: {}",
            self.document,
            self.span.start,
            self.span.end,
            self.code.code(),
            self.message
        )
    }
}

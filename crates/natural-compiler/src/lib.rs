//! # `natural-compiler`
//!
//! The compile-time half of natural functions. Given a module (its source
//! and test documents, already parsed and typed by the host), the
//! [`CodeModifier`] runs the whole pipeline:
//!
//! 1. [`validator`] – checks every function tagged with a marker annotation
//!    and emits [`Diagnostic`]s for contract violations.
//! 2. [`derive`] – the static, type-directed schema derivation engine.
//! 3. [`modifier`] – hoists schemas into `Schema` annotations on the result
//!    types, rewrites tagged bodies into entry-point calls, fixes up imports.
//!
//! The host plugs in through two traits in [`oracle`]: a [`SemanticModel`]
//! answering type queries, and a [`StructuralMapper`] rendering records to raw
//! schemas. [`host`] ships an in-memory implementation of both.
pub mod ast;
pub mod config;
pub mod derive;
pub mod diagnostic;
pub mod host;
pub mod marker;
pub mod modifier;
pub mod oracle;
pub mod validator;

pub use config::MarkerConfig;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use modifier::{CodeModifier, ModifyOutcome, SchemaCache};
pub use oracle::{SemanticModel, StructuralMapper, TypeId, TypeShape};

//! # `natural-runtime`
//!
//! The runtime half of natural functions. A rewritten natural function calls
//! [`NaturalClient::call_llm`] with its prompt, its optional context or
//! model, and a [`RuntimeType`] describing the declared result type.
//!
//! * [`ty`] – runtime type descriptors, including named type definitions
//!   that may carry a schema attached at compile time.
//! * [`derive`] – the dynamic schema derivation engine and the fallback
//!   chain (attached schema, then dynamic derivation, then no schema).
//! * [`introspect`] – capability probes over descriptors: record fields,
//!   array element types, union members, nilability.
//! * [`provider`] – the [`PredictionService`] seam and the request it gets.
//! * [`client`] – the entry point.
pub mod client;
pub mod derive;
pub mod introspect;
pub mod provider;
pub mod ty;

pub use client::NaturalClient;
pub use derive::{attached_schema, derive_dynamic, resolve_schema};
pub use provider::{ContextOrModel, PredictionRequest, PredictionService};
pub use ty::{RecordField, RuntimeType, TypeDefinition};

//! # `natural-core`
//!
//! Leaf crate shared by the compile-time and runtime halves of natural
//! functions:
//!
//! * [`schema`] – the canonical [`SchemaValue`](schema::SchemaValue) tree and
//!   the shape constructors both derivation engines build on.
//! * [`schema_util`] – the normalizer that turns a raw structural schema into
//!   the minimal, canonical form.
//! * [`error`], [`model`], [`generic`], [`template`] – the ambient types the
//!   runtime entry point and prediction services exchange.
pub mod error;
pub mod generic;
pub mod model;
pub mod schema;
pub mod schema_util;
pub mod template;

pub use error::{NaturalError, Result};
pub use schema::{PrimitiveKind, SchemaValue};

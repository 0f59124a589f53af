//! Prompt values for natural functions.
//!
//! * [`prompt`] – the `Prompt` capability value a natural function receives
//!   and the optional [`Context`](prompt::Context) of the broad form.
//! * [`builder`] – a fluent markdown builder used to render instructions
//!   (schemas, context, field hints) around the user's prompt.
pub mod builder;
pub mod prompt;

pub use prompt::{Context, Prompt};

//! # `natural` – The umbrella crate
//!
//! Natural functions are functions whose body is a call to a prediction
//! service. The declared result type is turned into a JSON Schema so the
//! service's answer can be constrained, at build time whenever the types
//! allow it and at runtime otherwise. This crate glues the building blocks
//! together:
//!
//! | Crate                   | What it provides                                                             |
//! |-------------------------|------------------------------------------------------------------------------|
//! | **`natural-core`**      | `SchemaValue`, the schema normalizer, errors, model ids, chat messages       |
//! | **`natural-prompt`**    | The `Prompt` and `Context` values and a markdown instruction builder         |
//! | **`natural-runtime`**   | Runtime type descriptors, dynamic derivation, `NaturalClient` entry point    |
//! | **`natural-compiler`**  | Signature validation, static derivation, source rewriting *(default on)*     |
//!
//! Hosts that only execute already-compiled code can drop the compiler:
//!
//! ```toml
//! [dependencies]
//! natural = { version = "0.1", default-features = false }
//! ```
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use std::{future::Future, pin::Pin};
//!
//! use natural::{
//!     Result,
//!     model::OpenAiModel,
//!     prompt::Prompt,
//!     runtime::{ContextOrModel, NaturalClient, PredictionRequest, PredictionService, RuntimeType},
//! };
//! use serde_json::Value;
//!
//! struct MyService;
//!
//! impl PredictionService for MyService {
//!     fn predict<'a>(
//!         &'a self,
//!         request: PredictionRequest,
//!     ) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>> {
//!         Box::pin(async move {
//!             let _messages = request.messages();
//!             // send the messages to a model provider here
//!             Ok(Value::Null)
//!         })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = NaturalClient::new(MyService).with_default_model(OpenAiModel::Gpt4oMini.into());
//!     let answer = client
//!         .call_llm(Prompt::text("Anything?"), ContextOrModel::None, &RuntimeType::Json)
//!         .await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/natural/latest")]

pub use natural_core::*;
pub use natural_prompt as prompt;
pub use natural_runtime as runtime;

#[cfg(feature = "compiler")]
pub use natural_compiler as compiler;

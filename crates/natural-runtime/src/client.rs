//! The entry point rewritten natural functions call.
//!
//! ```rust
//! use std::{future::Future, pin::Pin};
//!
//! use natural_core::{PrimitiveKind, Result, model::OpenAiModel};
//! use natural_prompt::Prompt;
//! use natural_runtime::{ContextOrModel, NaturalClient, PredictionRequest, PredictionService, RuntimeType};
//! use serde_json::{Value, json};
//!
//! struct AlwaysNine;
//!
//! impl PredictionService for AlwaysNine {
//!     fn predict<'a>(
//!         &'a self,
//!         _request: PredictionRequest,
//!     ) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>> {
//!         Box::pin(async { Ok(json!(9)) })
//!     }
//! }
//!
//! # async fn run() -> Result<()> {
//! let client = NaturalClient::new(AlwaysNine).with_default_model(OpenAiModel::Gpt4oMini.into());
//! let lives = client
//!     .call_llm(Prompt::text("How many lives?"), ContextOrModel::None, &RuntimeType::Primitive(PrimitiveKind::Int))
//!     .await?;
//! assert_eq!(lives, json!(9));
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use natural_core::{NaturalError, Result, model::Model};
use natural_prompt::Prompt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    derive::resolve_schema,
    introspect::{field_hint, without_error},
    provider::{ContextOrModel, PredictionRequest, PredictionService},
    ty::RuntimeType,
};

/// A client bound to a single prediction service.
///
/// Cloning is cheap; the service is shared behind an [`Arc`].
pub struct NaturalClient<S> {
    service: Arc<S>,
    default_model: Option<Model>,
}

impl<S> Clone for NaturalClient<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_model: self.default_model.clone(),
        }
    }
}

impl<S> NaturalClient<S>
where
    S: PredictionService,
{
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            default_model: None,
        }
    }

    /// Model used when a call does not name one.
    pub fn with_default_model(mut self, model: Model) -> Self {
        self.default_model = Some(model);
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Build the request for a call without sending it.
    ///
    /// # Errors
    ///
    /// [`NaturalError::UnresolvedModel`] if neither the call nor the client
    /// names a model.
    pub fn prepare(
        &self,
        prompt: Prompt,
        context_or_model: ContextOrModel,
        target: &RuntimeType,
    ) -> Result<PredictionRequest> {
        let (context, model) = match context_or_model {
            ContextOrModel::None => (None, self.default_model.clone()),
            ContextOrModel::Context(context) => (Some(context), self.default_model.clone()),
            ContextOrModel::Model(model) => (None, Some(model)),
        };
        let model = model.ok_or(NaturalError::UnresolvedModel)?;

        let answer = without_error(target);
        let schema = resolve_schema(&answer);
        let hint = if schema.is_none() { field_hint(&answer) } else { None };

        let mut request = PredictionRequest::new(prompt, model)
            .with_schema(schema)
            .with_field_hint(hint);
        if let Some(context) = context {
            request = request.with_context(context);
        }
        Ok(request)
    }

    /// Ask the service for a value of type `target`.
    ///
    /// `error` members of `target` are not part of the answer. The schema
    /// sent along is the one attached at compile time when there is one, a
    /// runtime-derived one otherwise; if neither exists the call
    /// still goes out, with a field listing instead of a schema where
    /// possible.
    ///
    /// # Errors
    ///
    /// [`NaturalError::UnresolvedModel`] without a model, and whatever the
    /// service reports.
    pub async fn call_llm(
        &self,
        prompt: Prompt,
        context_or_model: ContextOrModel,
        target: &RuntimeType,
    ) -> Result<Value> {
        let request = self.prepare(prompt, context_or_model, target)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            model = %request.model,
            has_schema = request.schema.is_some(),
            "calling prediction service"
        );

        let service = Arc::clone(&self.service);
        service.predict(request).await
    }

    /// [`Self::call_llm`] followed by deserialization into `T`.
    ///
    /// # Errors
    ///
    /// As [`Self::call_llm`], plus [`NaturalError::Serialization`] when the
    /// answer does not fit `T`.
    pub async fn call_llm_as<T: DeserializeOwned>(
        &self,
        prompt: Prompt,
        context_or_model: ContextOrModel,
        target: &RuntimeType,
    ) -> Result<T> {
        let value = self.call_llm(prompt, context_or_model, target).await?;
        Ok(serde_json::from_value(value)?)
    }
}

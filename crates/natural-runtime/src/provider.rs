use std::{future::Future, pin::Pin};

use natural_core::{
    Result, SchemaValue,
    generic::{GenericMessage, GenericRole},
    model::Model,
    template::IntoPrompt,
};
use natural_prompt::{Context, Prompt, builder::PromptBuilder};
use serde_json::Value;

/// A **prediction service** turns a rendered request into a call to some
/// model provider and returns the JSON value it answered with.
///
/// The method returns a [`Pin<Box<dyn Future>>`] so the trait stays
/// object-safe without pulling in `async_trait`. Timeouts and retries belong
/// to the implementation.
pub trait PredictionService: Send + Sync {
    fn predict<'a>(
        &'a self,
        request: PredictionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;
}

/// The optional second argument of a natural function.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ContextOrModel {
    #[default]
    None,
    /// Broad form: grounding facts rendered ahead of the prompt.
    Context(Context),
    /// Direct-call form: the model to ask.
    Model(Model),
}

impl From<Context> for ContextOrModel {
    fn from(value: Context) -> Self {
        ContextOrModel::Context(value)
    }
}

impl From<Model> for ContextOrModel {
    fn from(value: Model) -> Self {
        ContextOrModel::Model(value)
    }
}

/// Everything a prediction service needs for one call.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub prompt: Prompt,
    pub context: Option<Context>,
    pub model: Model,
    /// Schema the answer must follow, when one could be produced.
    pub schema: Option<SchemaValue>,
    /// Field listing used instead of a schema for records nothing described.
    pub field_hint: Option<String>,
}

impl PredictionRequest {
    pub fn new(prompt: Prompt, model: Model) -> Self {
        Self {
            prompt,
            context: None,
            model,
            schema: None,
            field_hint: None,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_schema(mut self, schema: Option<SchemaValue>) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_field_hint(mut self, hint: Option<String>) -> Self {
        self.field_hint = hint;
        self
    }

    /// Response format instructions, the context (if any), then the prompt
    /// as the user message.
    pub fn messages(&self) -> Vec<GenericMessage> {
        let mut messages = Vec::new();

        let instructions = match (&self.schema, &self.field_hint) {
            (Some(schema), _) => Some(
                PromptBuilder::new()
                    .add_section_h2("Response format")
                    .add_line("Respond with a single JSON value that conforms to this JSON Schema:")
                    .add_schema(schema)
                    .finalize(),
            ),
            (None, Some(hint)) => Some(
                hint.lines()
                    .fold(
                        PromptBuilder::new()
                            .add_section_h2("Response format")
                            .add_line("Respond with a single JSON value shaped like one of:"),
                        PromptBuilder::add_bullet,
                    )
                    .finalize(),
            ),
            (None, None) => None,
        };
        if let Some(instructions) = instructions {
            messages.push(GenericMessage::new(instructions, GenericRole::System));
        }

        if let Some(context) = &self.context {
            messages.extend(context.clone().into_prompt());
        }
        messages.extend(self.prompt.clone().into_prompt());
        messages
    }
}

//! The `Prompt` capability value.
//!
//! A prompt is an interpolated template: `strings` always holds one more
//! element than `insertions`, and rendering alternates between the two.
//! String insertions are spliced verbatim, every other value as compact
//! JSON.
//!
//! ```rust
//! use natural_prompt::Prompt;
//! use serde_json::json;
//!
//! let prompt = Prompt::new(
//!     vec!["Which animal is ".into(), "?".into()],
//!     vec![json!({"sound": "meow"})],
//! ).unwrap();
//! assert_eq!(prompt.render(), r#"Which animal is {"sound":"meow"}?"#);
//! ```
use natural_core::{
    error::{NaturalError, Result},
    generic::{GenericMessage, GenericRole},
    template::IntoPrompt,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::builder::PromptBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    strings: Vec<String>,
    insertions: Vec<Value>,
}

impl Prompt {
    /// # Errors
    ///
    /// [`NaturalError::Invalid`] unless `strings.len() == insertions.len() + 1`.
    pub fn new(strings: Vec<String>, insertions: Vec<Value>) -> Result<Self> {
        if strings.len() != insertions.len() + 1 {
            return Err(NaturalError::Invalid(format!(
                "prompt template has {} strings for {} insertions",
                strings.len(),
                insertions.len()
            )));
        }
        Ok(Self {
            strings,
            insertions,
        })
    }

    /// A prompt without insertions.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            strings: vec![text.into()],
            insertions: Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, part) in self.strings.iter().enumerate() {
            out.push_str(part);
            match self.insertions.get(index) {
                Some(Value::String(text)) => out.push_str(text),
                Some(other) => out.push_str(&other.to_string()),
                None => {}
            }
        }
        out
    }
}

impl IntoPrompt for Prompt {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![GenericMessage::new(self.render(), GenericRole::User)]
    }
}

/// Extra grounding facts passed alongside a broad-form natural function call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoPrompt for Context {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        if self.0.is_empty() {
            return Vec::new();
        }

        let builder = self.0.iter().fold(
            PromptBuilder::new().add_section_h2("Context"),
            |builder, (key, value)| match value {
                Value::String(text) => builder.add_key_value(key, text),
                other => builder.add_key_value(key, other),
            },
        );
        vec![GenericMessage::new(builder.finalize(), GenericRole::System)]
    }
}

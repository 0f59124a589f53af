//! Model identifiers carried by direct-call natural functions.
//!
//! A direct-call function (`LlmCall` form) may take a `model` parameter; the
//! runtime forwards it untouched to the prediction service, which maps the
//! variant onto its own naming scheme.
//!
//! ```rust
//! use natural_core::model::{Model, OpenAiModel};
//! assert_eq!(Model::from(OpenAiModel::Gpt4oMini),
//!            Model::OpenAi(OpenAiModel::Gpt4oMini));
//! ```

use serde::{Deserialize, Serialize};

/// Universal identifier for an LLM model.
///
/// * `OpenAi` – Enumerated list of well-known OpenAI models.
/// * `Custom` – Any provider / model name not covered by a dedicated enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    OpenAi(OpenAiModel),
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenAiModel {
    Gpt4o,
    Gpt4oMini,
    O3Mini,
    O4Mini,
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::OpenAi(OpenAiModel::Gpt4o) => write!(f, "gpt-4o"),
            Model::OpenAi(OpenAiModel::Gpt4oMini) => write!(f, "gpt-4o-mini"),
            Model::OpenAi(OpenAiModel::O3Mini) => write!(f, "o3-mini"),
            Model::OpenAi(OpenAiModel::O4Mini) => write!(f, "o4-mini"),
            Model::Custom(name) => write!(f, "{name}"),
        }
    }
}

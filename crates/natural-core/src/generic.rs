//! Provider-agnostic chat message types.
//!
//! The runtime renders every natural function call into a short list of
//! these messages so prediction services do not need to understand prompt
//! templates or schemas themselves.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single chat message independent of any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericMessage {
    pub content: String,
    pub role: GenericRole,
}

impl GenericMessage {
    /// Convenience constructor mirroring the field order used by common HTTP
    /// APIs.
    ///
    /// ```rust
    /// use natural_core::generic::{GenericMessage, GenericRole};
    ///
    /// let sys = GenericMessage::new("Answer in JSON.".into(), GenericRole::System);
    /// assert_eq!(sys.role.to_string(), "system");
    /// ```
    pub fn new(content: String, role: GenericRole) -> Self {
        Self { content, role }
    }
}

/// High-level chat roles recognised by most LLM providers.
#[derive(Debug, Clone, Serialize, Deserialize, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenericRole {
    System,
    Assistant,
    User,
}

impl Display for GenericRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericRole::System => write!(f, "system"),
            GenericRole::Assistant => write!(f, "assistant"),
            GenericRole::User => write!(f, "user"),
        }
    }
}

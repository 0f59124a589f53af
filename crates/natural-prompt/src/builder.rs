//! Builder-style helper for the **markdown instructions** wrapped around a
//! natural function's prompt: the response format, the schema, the context.
//!
//! ```rust
//! use natural_core::schema::{PrimitiveKind, primitive};
//! use natural_prompt::builder::PromptBuilder;
//!
//! let md = PromptBuilder::new()
//!     .add_section_h2("Response format")
//!     .add_line("Respond with JSON only.")
//!     .add_schema(&primitive(PrimitiveKind::Int))
//!     .finalize();
//!
//! assert_eq!(md, "## Response format\nRespond with JSON only.\n```json\n{\"type\":\"integer\"}\n```\n");
//! ```
//!
//! Newlines are emitted exactly as requested; writing into the internal
//! `String` cannot fail.
use std::fmt::{Display, Write as _};

use natural_core::SchemaValue;

pub struct PromptBuilder {
    buffer: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// `## {line}`
    pub fn add_section_h2(mut self, line: impl Display) -> Self {
        writeln!(self.buffer, "## {line}").expect("failed to write buffer");
        self
    }

    pub fn add_line(mut self, line: impl Display) -> Self {
        writeln!(self.buffer, "{line}").expect("failed to write buffer");
        self
    }

    /// `**Key**: Value`
    pub fn add_key_value(mut self, key: impl Display, value: impl Display) -> Self {
        writeln!(self.buffer, "**{key}**: {value}").expect("failed to write buffer");
        self
    }

    /// `- {item}`
    pub fn add_bullet(mut self, item: impl Display) -> Self {
        writeln!(self.buffer, "- {item}").expect("failed to write buffer");
        self
    }

    /// Code block fenced as `json`.
    pub fn add_text_json(self, content: impl Display) -> Self {
        self.add_line("```json").add_line(content).add_line("```")
    }

    /// The schema's canonical text in a `json` block.
    pub fn add_schema(self, schema: &SchemaValue) -> Self {
        self.add_text_json(schema.canonical_text())
    }

    pub fn add_blank_line(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    pub fn finalize(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::PromptBuilder;
    use natural_core::SchemaValue;

    #[test]
    fn renders_schema_and_bullets_under_a_heading() {
        let schema = SchemaValue::from_value(json!({ "type": "string" }));
        let md = PromptBuilder::new()
            .add_section_h2("Schema")
            .add_schema(&schema)
            .add_blank_line()
            .add_bullet("name: string")
            .add_key_value("Nilable", false)
            .finalize();

        assert_eq!(
            md,
            "## Schema\n```json\n{\"type\":\"string\"}\n```\n\n- name: string\n**Nilable**: false\n"
        );
    }
}

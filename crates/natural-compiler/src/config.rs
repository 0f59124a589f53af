//! Names the pipeline looks for: the marker module, its annotations, its
//! capability types and its entry point.
//!
//! ```rust
//! use natural_compiler::MarkerConfig;
//!
//! let config = MarkerConfig::builder().org("acme").module("ai").build();
//! assert_eq!(config.org, "acme");
//! assert_eq!(config.entry_point, "callLlm");
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerConfig {
    pub org: String,
    pub module: String,
    /// Broad form: `prompt` plus optional `context`.
    pub natural_function_annotation: String,
    /// Direct-call form: `prompt` plus optional `model`.
    pub llm_call_annotation: String,
    pub schema_annotation: String,
    pub prompt_type: String,
    pub context_type: String,
    pub model_type: String,
    pub entry_point: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            org: "natural".into(),
            module: "np".into(),
            natural_function_annotation: "NaturalFunction".into(),
            llm_call_annotation: "LlmCall".into(),
            schema_annotation: "Schema".into(),
            prompt_type: "Prompt".into(),
            context_type: "Context".into(),
            model_type: "Model".into(),
            entry_point: "callLlm".into(),
        }
    }
}

impl MarkerConfig {
    pub fn builder() -> MarkerConfigBuilder {
        MarkerConfigBuilder::default()
    }

    /// Alias used when the marker module is imported without `as`.
    pub fn default_alias(&self) -> &str {
        &self.module
    }
}

/// Fluent builder for [`MarkerConfig`]; unset names keep their defaults.
#[derive(Debug, Default)]
pub struct MarkerConfigBuilder {
    config: MarkerConfig,
}

impl MarkerConfigBuilder {
    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.config.org = org.into();
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.config.module = module.into();
        self
    }

    pub fn schema_annotation(mut self, name: impl Into<String>) -> Self {
        self.config.schema_annotation = name.into();
        self
    }

    pub fn entry_point(mut self, name: impl Into<String>) -> Self {
        self.config.entry_point = name.into();
        self
    }

    pub fn build(self) -> MarkerConfig {
        self.config
    }
}

//! Seams the builder delegates to.
//!
//! Each trait has a default implementation good enough for tests and simple
//! clients; applications plug in their own (MCP tool discovery, per-provider
//! option mapping, richer prompt templating).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Local, Utc};

use crate::error::StreamParamsError;
use crate::types::{
    Assistant, AssistantSettings, GenerationSettings, ProviderSettings, ToolDefinition,
};

/// Substitutes variables in the assistant's system prompt.
#[async_trait]
pub trait PromptResolver: Send + Sync {
    async fn resolve(
        &self,
        prompt: &str,
        assistant: &Assistant,
    ) -> Result<String, StreamParamsError>;
}

/// Produces the tool definitions offered to the model.
#[async_trait]
pub trait ToolConfigurator: Send + Sync {
    async fn tools(
        &self,
        assistant: &Assistant,
        provider: &ProviderSettings,
    ) -> Result<Option<Vec<ToolDefinition>>, StreamParamsError>;
}

/// Provider-specific request fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOptions {
    /// Extras keyed by provider id, forwarded verbatim.
    pub provider_options: serde_json::Map<String, serde_json::Value>,
    /// Sampling parameters understood by every provider.
    pub standard_params: GenerationSettings,
}

/// Maps assistant and provider settings to provider request options.
pub trait ProviderOptionsBuilder: Send + Sync {
    /// `settings` already has the builder defaults merged in.
    fn build(
        &self,
        settings: &AssistantSettings,
        assistant: &Assistant,
        provider: &ProviderSettings,
    ) -> Result<ProviderOptions, StreamParamsError>;
}

/// `{{name}}` template substitution.
///
/// Built-in variables: `date`, `time`, `datetime` (local clock),
/// `datetime_utc`, `assistant_name`, `model_name`. Unknown variables are left
/// in place.
#[derive(Debug, Clone, Default)]
pub struct TemplatePromptResolver {
    variables: HashMap<String, String>,
}

impl TemplatePromptResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    fn builtin(name: &str, assistant: &Assistant) -> Option<String> {
        let now = Local::now();
        match name {
            "date" => Some(now.format("%Y-%m-%d").to_string()),
            "time" => Some(now.format("%H:%M:%S").to_string()),
            "datetime" => Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
            "datetime_utc" => Some(Utc::now().to_rfc3339()),
            "assistant_name" => Some(assistant.name.clone()),
            "model_name" => assistant.model_id.clone(),
            _ => None,
        }
    }
}

#[async_trait]
impl PromptResolver for TemplatePromptResolver {
    async fn resolve(
        &self,
        prompt: &str,
        assistant: &Assistant,
    ) -> Result<String, StreamParamsError> {
        let mut out = String::with_capacity(prompt.len());
        let mut rest = prompt;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };
            let name = after_open[..end].trim();
            let value = self
                .variables
                .get(name)
                .cloned()
                .or_else(|| Self::builtin(name, assistant));
            match value {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after_open[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Offers no tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTools;

#[async_trait]
impl ToolConfigurator for NoTools {
    async fn tools(
        &self,
        _assistant: &Assistant,
        _provider: &ProviderSettings,
    ) -> Result<Option<Vec<ToolDefinition>>, StreamParamsError> {
        Ok(None)
    }
}

/// Offers a fixed tool list.
#[derive(Debug, Clone, Default)]
pub struct StaticTools {
    tools: Vec<ToolDefinition>,
}

impl StaticTools {
    pub fn new(tools: Vec<ToolDefinition>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl ToolConfigurator for StaticTools {
    async fn tools(
        &self,
        _assistant: &Assistant,
        _provider: &ProviderSettings,
    ) -> Result<Option<Vec<ToolDefinition>>, StreamParamsError> {
        if self.tools.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.tools.clone()))
        }
    }
}

/// Honors the assistant's enable flags for sampling parameters and places
/// custom parameters under the provider id.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProviderOptions;

impl ProviderOptionsBuilder for DefaultProviderOptions {
    fn build(
        &self,
        settings: &AssistantSettings,
        _assistant: &Assistant,
        provider: &ProviderSettings,
    ) -> Result<ProviderOptions, StreamParamsError> {
        let standard_params = GenerationSettings {
            temperature: settings
                .temperature
                .filter(|_| settings.enable_temperature.unwrap_or(false)),
            top_p: settings
                .top_p
                .filter(|_| settings.enable_top_p.unwrap_or(false)),
            max_tokens: settings
                .max_tokens
                .filter(|tokens| *tokens > 0 && settings.enable_max_tokens.unwrap_or(false)),
        };

        let mut provider_options = serde_json::Map::new();
        let custom: serde_json::Map<String, serde_json::Value> = settings
            .custom_parameters
            .iter()
            .flatten()
            .filter(|param| !param.name.trim().is_empty())
            .map(|param| (param.name.clone(), param.value.clone()))
            .collect();
        if !custom.is_empty() {
            provider_options.insert(provider.id.clone(), serde_json::Value::Object(custom));
        }

        Ok(ProviderOptions {
            provider_options,
            standard_params,
        })
    }
}

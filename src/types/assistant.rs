//! Assistant records as supplied by the settings layer.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An assistant (persona) the conversation runs under.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub name: String,
    /// System prompt, possibly containing `{{variables}}`.
    #[builder(default, into)]
    #[serde(default)]
    pub prompt: String,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub settings: AssistantSettings,
}

/// How tools are offered to the model.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolUseMode {
    /// Native function calling.
    #[default]
    Function,
    /// Tools described in the system prompt.
    Prompt,
}

/// Extra provider parameter configured on an assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomParameter {
    pub name: String,
    pub value: serde_json::Value,
}

/// Per-assistant sampling settings. Unset fields fall back to the builder
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_temperature: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_top_p: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_max_tokens: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_output: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_mode: Option<ToolUseMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_parameters: Option<Vec<CustomParameter>>,
}

impl AssistantSettings {
    /// Settings a fresh assistant starts with.
    pub fn app_defaults() -> Self {
        Self {
            temperature: Some(0.7),
            enable_temperature: Some(true),
            top_p: Some(1.0),
            enable_top_p: Some(false),
            max_tokens: Some(0),
            enable_max_tokens: Some(false),
            context_count: Some(5),
            stream_output: Some(true),
            tool_use_mode: Some(ToolUseMode::Function),
            custom_parameters: Some(Vec::new()),
        }
    }

    /// Fill every unset field from `defaults`.
    pub fn merged_with(&self, defaults: &AssistantSettings) -> AssistantSettings {
        AssistantSettings {
            temperature: self.temperature.or(defaults.temperature),
            enable_temperature: self.enable_temperature.or(defaults.enable_temperature),
            top_p: self.top_p.or(defaults.top_p),
            enable_top_p: self.enable_top_p.or(defaults.enable_top_p),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            enable_max_tokens: self.enable_max_tokens.or(defaults.enable_max_tokens),
            context_count: self.context_count.or(defaults.context_count),
            stream_output: self.stream_output.or(defaults.stream_output),
            tool_use_mode: self.tool_use_mode.or(defaults.tool_use_mode),
            custom_parameters: self
                .custom_parameters
                .clone()
                .or_else(|| defaults.custom_parameters.clone()),
        }
    }
}

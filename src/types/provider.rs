//! Provider records as supplied by the settings layer.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::value::ConfigValue;

/// A configured model provider.
///
/// The three streaming fields are stored untyped: they come from user input
/// and older settings files and are normalized at request time.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    #[serde(rename = "type")]
    pub provider_type: String,
    #[builder(default, into)]
    #[serde(default)]
    pub name: String,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    /// Per-provider tool step cap.
    #[builder(default, into)]
    #[serde(default, skip_serializing_if = "ConfigValue::is_absent")]
    pub max_tool_steps: ConfigValue,
    /// Minutes without streamed data before the request is aborted.
    #[builder(default, into)]
    #[serde(default, skip_serializing_if = "ConfigValue::is_absent")]
    pub sse_idle_timeout_minutes: ConfigValue,
    /// Overall request timeout in minutes.
    #[builder(default, into)]
    #[serde(default, skip_serializing_if = "ConfigValue::is_absent")]
    pub request_timeout_minutes: ConfigValue,
}

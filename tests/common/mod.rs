//! Shared fixtures and collaborator doubles.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use streamparams::error::StreamParamsError;
use streamparams::params::{PromptResolver, ToolConfigurator};
use streamparams::types::*;

pub fn create_assistant() -> Assistant {
    Assistant::builder()
        .id("assistant-1")
        .name("Assistant")
        .model_id("gpt-4o")
        .build()
}

pub fn create_provider() -> ProviderSettings {
    ProviderSettings::builder()
        .id("openai-response")
        .provider_type("openai-response")
        .name("OpenAI Responses")
        .api_host("https://example.com/v1")
        .build()
}

pub fn steps(count: usize) -> Vec<StepResult> {
    vec![StepResult::default(); count]
}

/// Prompt resolver that always fails.
pub struct FailingPromptResolver;

#[async_trait]
impl PromptResolver for FailingPromptResolver {
    async fn resolve(
        &self,
        _prompt: &str,
        _assistant: &Assistant,
    ) -> Result<String, StreamParamsError> {
        Err(StreamParamsError::PromptResolution(
            "variable service unavailable".to_string(),
        ))
    }
}

/// Tool configurator that counts calls and returns one tool.
#[derive(Default)]
pub struct CountingTools {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ToolConfigurator for CountingTools {
    async fn tools(
        &self,
        _assistant: &Assistant,
        _provider: &ProviderSettings,
    ) -> Result<Option<Vec<ToolDefinition>>, StreamParamsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(vec![ToolDefinition::new(
            "web_search",
            "Search the web",
            serde_json::json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        )]))
    }
}

//! Streaming request parameter assembly.
//!
//! [`StreamParamsBuilder::build`] turns prior conversation entries, an
//! assistant and a provider record into [`StreamTextParams`] for the
//! transport, plus a [`StreamingConfig`] that the transport uses to drive and
//! dispose the idle timer.
//!
//! ```no_run
//! use streamparams::params::{BuilderDefaults, StreamParamsBuilder, StreamParamsOptions};
//! use streamparams::types::{Assistant, ProviderSettings};
//!
//! # async fn example() -> streamparams::error::Result<()> {
//! let builder = StreamParamsBuilder::new(BuilderDefaults::default());
//! let assistant = Assistant::builder().id("default").name("Default").build();
//! let provider = ProviderSettings::builder()
//!     .id("openai")
//!     .provider_type("openai")
//!     .sse_idle_timeout_minutes(10)
//!     .build();
//!
//! let built = builder
//!     .build(Vec::new(), &assistant, &provider, StreamParamsOptions::default())
//!     .await?;
//! assert_eq!(built.streaming_config.idle_timeout_ms, Some(600_000));
//! # Ok(())
//! # }
//! ```

pub mod collaborators;

pub use collaborators::{
    DefaultProviderOptions, NoTools, PromptResolver, ProviderOptions, ProviderOptionsBuilder,
    StaticTools, TemplatePromptResolver, ToolConfigurator,
};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::StreamParamsError;
use crate::idle::IdleTimeoutController;
use crate::signal::{build_combined_abort_signal, AbortSignal};
use crate::stop::{StepCountIs, StopWhen};
use crate::types::{
    Assistant, AssistantSettings, GenerationSettings, ModelMessage, ProviderSettings,
    ToolDefinition,
};
use crate::util::normalize::{normalize_max_tool_steps, timeout_minutes_to_ms, StepLimits};

/// Immutable defaults shared by every request a builder assembles.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderDefaults {
    pub step_limits: StepLimits,
    pub assistant_settings: AssistantSettings,
}

impl Default for BuilderDefaults {
    fn default() -> Self {
        Self {
            step_limits: StepLimits::default(),
            assistant_settings: AssistantSettings::app_defaults(),
        }
    }
}

/// Per-call transport options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Caller cancellation, e.g. the user pressing stop.
    pub signal: Option<AbortSignal>,
    pub headers: HashMap<String, String>,
}

/// Options for one [`StreamParamsBuilder::build`] call.
#[derive(Debug, Clone, Default)]
pub struct StreamParamsOptions {
    pub request_options: RequestOptions,
}

impl StreamParamsOptions {
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.request_options.signal = Some(signal);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_options.headers.insert(name.into(), value.into());
        self
    }
}

/// Everything the transport needs to issue one streaming call.
#[derive(Clone)]
pub struct StreamTextParams {
    pub request_id: Uuid,
    pub messages: Vec<ModelMessage>,
    pub system: Option<String>,
    pub tools: Option<Vec<ToolDefinition>>,
    pub settings: GenerationSettings,
    pub provider_options: serde_json::Map<String, serde_json::Value>,
    pub headers: HashMap<String, String>,
    /// Ends the tool-calling loop. The only bound on the number of rounds.
    pub stop_when: StopWhen,
    pub max_tool_steps: u32,
    /// Caller and idle-timeout cancellation, merged.
    pub abort_signal: Option<AbortSignal>,
    /// Overall request timeout; `None` when not configured.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for StreamTextParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamTextParams")
            .field("request_id", &self.request_id)
            .field("messages", &self.messages.len())
            .field("system", &self.system.as_ref().map(|_| ".."))
            .field("tools", &self.tools.as_ref().map(Vec::len))
            .field("settings", &self.settings)
            .field("provider_options", &self.provider_options)
            .field("max_tool_steps", &self.max_tool_steps)
            .field("abort_signal", &self.abort_signal)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Idle-timeout lifecycle handles, returned next to the parameters.
#[derive(Debug, Clone, Default)]
pub struct StreamingConfig {
    pub idle_timeout_ms: Option<u64>,
    /// Present iff the idle timeout is enabled. The transport resets it on
    /// every chunk and must dispose it when the stream completes, fails or is
    /// abandoned.
    pub idle_abort_controller: Option<Arc<IdleTimeoutController>>,
    pub request_timeout_ms: Option<u64>,
}

impl StreamingConfig {
    /// Dispose the idle controller, if any. Idempotent.
    pub fn dispose(&self) {
        if let Some(controller) = &self.idle_abort_controller {
            controller.dispose();
        }
    }
}

/// Result of [`StreamParamsBuilder::build`].
#[derive(Debug, Clone)]
pub struct BuiltStreamParams {
    pub params: StreamTextParams,
    pub streaming_config: StreamingConfig,
}

/// Assembles streaming request parameters.
#[derive(Clone)]
pub struct StreamParamsBuilder {
    defaults: BuilderDefaults,
    prompt_resolver: Arc<dyn PromptResolver>,
    tool_configurator: Arc<dyn ToolConfigurator>,
    provider_options: Arc<dyn ProviderOptionsBuilder>,
}

impl fmt::Debug for StreamParamsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamParamsBuilder")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Default for StreamParamsBuilder {
    fn default() -> Self {
        Self::new(BuilderDefaults::default())
    }
}

impl StreamParamsBuilder {
    pub fn new(defaults: BuilderDefaults) -> Self {
        Self {
            defaults,
            prompt_resolver: Arc::new(TemplatePromptResolver::new()),
            tool_configurator: Arc::new(NoTools),
            provider_options: Arc::new(DefaultProviderOptions),
        }
    }

    pub fn with_prompt_resolver(mut self, resolver: Arc<dyn PromptResolver>) -> Self {
        self.prompt_resolver = resolver;
        self
    }

    pub fn with_tool_configurator(mut self, configurator: Arc<dyn ToolConfigurator>) -> Self {
        self.tool_configurator = configurator;
        self
    }

    pub fn with_provider_options(mut self, builder: Arc<dyn ProviderOptionsBuilder>) -> Self {
        self.provider_options = builder;
        self
    }

    pub fn defaults(&self) -> &BuilderDefaults {
        &self.defaults
    }

    /// Assemble parameters for one streaming request.
    ///
    /// Malformed timeout and step settings are normalized, never rejected.
    /// Collaborator errors are returned unchanged; an idle controller created
    /// before the failure is dropped, which disposes it.
    pub async fn build(
        &self,
        messages: Vec<ModelMessage>,
        assistant: &Assistant,
        provider: &ProviderSettings,
        options: StreamParamsOptions,
    ) -> Result<BuiltStreamParams, StreamParamsError> {
        let request_id = Uuid::new_v4();

        let max_tool_steps =
            normalize_max_tool_steps(provider.max_tool_steps, self.defaults.step_limits);
        let stop_when: StopWhen = Arc::new(StepCountIs::new(max_tool_steps));

        let idle_controller =
            IdleTimeoutController::from_minutes(provider.sse_idle_timeout_minutes).map(Arc::new);
        let idle_timeout_ms = idle_controller.as_ref().map(|c| c.duration_ms());
        let request_timeout_ms = timeout_minutes_to_ms(provider.request_timeout_minutes);

        let RequestOptions { signal, headers } = options.request_options;
        let abort_signal = build_combined_abort_signal([
            signal,
            idle_controller.as_ref().map(|c| c.signal()),
        ]);

        tracing::debug!(
            %request_id,
            provider = %provider.id,
            assistant = %assistant.id,
            max_tool_steps,
            idle_timeout_ms,
            request_timeout_ms,
            has_abort_signal = abort_signal.is_some(),
            "assembling stream params"
        );

        let settings = assistant
            .settings
            .merged_with(&self.defaults.assistant_settings);

        let system = if assistant.prompt.trim().is_empty() {
            None
        } else {
            let resolved = self
                .prompt_resolver
                .resolve(&assistant.prompt, assistant)
                .await?;
            Some(resolved).filter(|prompt| !prompt.trim().is_empty())
        };

        let tools = self.tool_configurator.tools(assistant, provider).await?;
        let ProviderOptions {
            provider_options,
            standard_params,
        } = self.provider_options.build(&settings, assistant, provider)?;

        let params = StreamTextParams {
            request_id,
            messages,
            system,
            tools,
            settings: standard_params,
            provider_options,
            headers,
            stop_when,
            max_tool_steps,
            abort_signal,
            timeout: request_timeout_ms.map(Duration::from_millis),
        };

        Ok(BuiltStreamParams {
            params,
            streaming_config: StreamingConfig {
                idle_timeout_ms,
                idle_abort_controller: idle_controller,
                request_timeout_ms,
            },
        })
    }
}

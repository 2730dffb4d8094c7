//! Convenience re-exports for common use.

pub use crate::config::StreamingSettings;
pub use crate::error::{Result, StreamParamsError};
pub use crate::idle::{guard_stream, IdleTimeoutController};
pub use crate::params::{
    BuilderDefaults, BuiltStreamParams, RequestOptions, StreamParamsBuilder, StreamParamsOptions,
    StreamTextParams, StreamingConfig,
};
pub use crate::signal::{build_combined_abort_signal, AbortController, AbortSignal};
pub use crate::stop::{StepCountIs, StopCondition, StopWhen};
pub use crate::types::{
    Assistant, AssistantSettings, ConfigValue, ModelMessage, ProviderSettings, StepResult,
    ToolDefinition,
};
pub use crate::util::normalize::{
    normalize_max_tool_steps, normalize_timeout_minutes, timeout_minutes_to_ms, StepLimits,
    DEFAULT_MAX_TOOL_STEPS, MAX_MAX_TOOL_STEPS,
};

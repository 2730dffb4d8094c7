//! Error types for streamparams.

use thiserror::Error;

/// Primary error type for parameter assembly and the transport helpers.
#[derive(Error, Debug)]
pub enum StreamParamsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt variable substitution failed: {0}")]
    PromptResolution(String),

    #[error("Tool setup failed: {0}")]
    ToolSetup(String),

    #[error("Provider options error: {provider} — {message}")]
    ProviderOptions { provider: String, message: String },

    #[error("Request aborted")]
    Aborted,

    #[error("Stream idle for {0}ms")]
    IdleTimeout(u64),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid settings file: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Collaborator,
    Cancellation,
    Timeout,
    Io,
    Serialization,
}

impl StreamParamsError {
    /// Create a provider options error.
    pub fn provider_options(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderOptions {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::TomlParse(_) => ErrorCategory::Configuration,
            Self::PromptResolution(_) | Self::ToolSetup(_) | Self::ProviderOptions { .. } => {
                ErrorCategory::Collaborator
            }
            Self::Aborted => ErrorCategory::Cancellation,
            Self::IdleTimeout(_) | Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Io(_) => ErrorCategory::Io,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }

    /// Whether the request ended because a cancellation source fired.
    ///
    /// Idle expiry counts: it is delivered through the same abort signal as a
    /// user stop.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Aborted | Self::IdleTimeout(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StreamParamsError>;

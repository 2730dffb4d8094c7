//! Streaming settings (layered: code > env > settings file).
//!
//! [`StreamingSettings`] is the user-editable surface for one provider:
//! request timeout, SSE idle timeout and tool step cap. Values loaded from
//! files or the environment go through the same normalization as request
//! building, so a bad value degrades to a default instead of failing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StreamParamsError;
use crate::types::{ConfigValue, ProviderSettings};
use crate::util::normalize::{
    normalize_max_tool_steps, normalize_timeout_minutes, StepLimits, DEFAULT_MAX_TOOL_STEPS,
    MAX_MAX_TOOL_STEPS, MAX_TIMEOUT_MINUTES,
};

pub const SETTINGS_FILE_NAME: &str = "streaming.toml";

const REQUEST_TIMEOUT_ENV: &str = "STREAMPARAMS_REQUEST_TIMEOUT_MINUTES";
const SSE_IDLE_TIMEOUT_ENV: &str = "STREAMPARAMS_SSE_IDLE_TIMEOUT_MINUTES";
const MAX_TOOL_STEPS_ENV: &str = "STREAMPARAMS_MAX_TOOL_STEPS";

/// Per-provider streaming settings as shown in the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingSettings {
    /// 0 disables the request timeout.
    pub request_timeout_minutes: u64,
    /// 0 disables the idle timeout.
    pub sse_idle_timeout_minutes: u64,
    pub max_tool_steps: u32,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            request_timeout_minutes: 0,
            sse_idle_timeout_minutes: 0,
            max_tool_steps: DEFAULT_MAX_TOOL_STEPS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawStreamingSettings {
    #[serde(default)]
    request_timeout_minutes: ConfigValue,
    #[serde(default)]
    sse_idle_timeout_minutes: ConfigValue,
    #[serde(default)]
    max_tool_steps: ConfigValue,
}

impl StreamingSettings {
    /// Restore the defaults (no timeouts, 20 tool steps).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Read the streaming fields of a provider record, normalized.
    pub fn from_provider(provider: &ProviderSettings) -> Self {
        Self::from_values(
            provider.request_timeout_minutes,
            provider.sse_idle_timeout_minutes,
            provider.max_tool_steps,
        )
    }

    fn from_values(request: ConfigValue, idle: ConfigValue, steps: ConfigValue) -> Self {
        Self {
            request_timeout_minutes: clamp_minutes(request),
            sse_idle_timeout_minutes: clamp_minutes(idle),
            max_tool_steps: normalize_max_tool_steps(steps, StepLimits::default()),
        }
    }

    /// Reject values outside the ranges the settings form offers.
    pub fn validate(&self) -> Result<(), StreamParamsError> {
        for (name, minutes) in [
            ("request_timeout_minutes", self.request_timeout_minutes),
            ("sse_idle_timeout_minutes", self.sse_idle_timeout_minutes),
        ] {
            if minutes > MAX_TIMEOUT_MINUTES {
                return Err(StreamParamsError::Configuration(format!(
                    "{name} must be between 0 and {MAX_TIMEOUT_MINUTES}, got {minutes}"
                )));
            }
        }
        if !(1..=MAX_MAX_TOOL_STEPS).contains(&self.max_tool_steps) {
            return Err(StreamParamsError::Configuration(format!(
                "max_tool_steps must be between 1 and {MAX_MAX_TOOL_STEPS}, got {}",
                self.max_tool_steps
            )));
        }
        Ok(())
    }

    /// Write these settings onto a provider record.
    pub fn apply_to(&self, provider: &mut ProviderSettings) {
        provider.request_timeout_minutes = ConfigValue::Number(self.request_timeout_minutes as f64);
        provider.sse_idle_timeout_minutes =
            ConfigValue::Number(self.sse_idle_timeout_minutes as f64);
        provider.max_tool_steps = ConfigValue::from(self.max_tool_steps);
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load_file(path: &Path) -> Result<Self, StreamParamsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no streaming settings file");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let raw: RawStreamingSettings = toml::from_str(&contents)?;
        Ok(Self::from_values(
            raw.request_timeout_minutes,
            raw.sse_idle_timeout_minutes,
            raw.max_tool_steps,
        ))
    }

    /// Persist as TOML, creating parent directories.
    pub fn save_file(&self, path: &Path) -> Result<(), StreamParamsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(self)
            .map_err(|err| StreamParamsError::Configuration(err.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override fields from `STREAMPARAMS_*` environment variables.
    ///
    /// Loads `.env` if present. Unset variables leave fields unchanged; set
    /// but unusable values fall back to the defaults.
    pub fn with_env_overrides(self) -> Self {
        let _ = dotenvy::dotenv();
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            self.request_timeout_minutes = clamp_minutes(ConfigValue::parse(&raw));
        }
        if let Some(raw) = lookup(SSE_IDLE_TIMEOUT_ENV) {
            self.sse_idle_timeout_minutes = clamp_minutes(ConfigValue::parse(&raw));
        }
        if let Some(raw) = lookup(MAX_TOOL_STEPS_ENV) {
            self.max_tool_steps =
                normalize_max_tool_steps(ConfigValue::parse(&raw), StepLimits::default());
        }
        self
    }

    /// Default settings file location (platform config dir).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "streamparams")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    /// Settings file (explicit path or platform default), then env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, StreamParamsError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let from_file = match path {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };
        Ok(from_file.with_env_overrides())
    }
}

fn clamp_minutes(value: ConfigValue) -> u64 {
    normalize_timeout_minutes(value)
        .unwrap_or(0)
        .min(MAX_TIMEOUT_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reset_restores_defaults() {
        let mut settings = StreamingSettings {
            request_timeout_minutes: 5,
            sse_idle_timeout_minutes: 10,
            max_tool_steps: 99,
        };
        settings.reset();
        assert_eq!(settings, StreamingSettings::default());
        assert_eq!(settings.max_tool_steps, 20);
    }

    #[test]
    fn validate_bounds() {
        assert!(StreamingSettings::default().validate().is_ok());
        let too_long = StreamingSettings {
            sse_idle_timeout_minutes: 721,
            ..Default::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(StreamParamsError::Configuration(_))
        ));
        let no_steps = StreamingSettings {
            max_tool_steps: 0,
            ..Default::default()
        };
        assert!(no_steps.validate().is_err());
    }

    #[test]
    fn overrides_are_normalized() {
        let env: HashMap<&str, &str> = HashMap::from([
            (REQUEST_TIMEOUT_ENV, "2.7"),
            (SSE_IDLE_TIMEOUT_ENV, "10000"),
            (MAX_TOOL_STEPS_ENV, "lots"),
        ]);
        let settings = StreamingSettings {
            max_tool_steps: 42,
            ..Default::default()
        }
        .with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.request_timeout_minutes, 2);
        assert_eq!(settings.sse_idle_timeout_minutes, MAX_TIMEOUT_MINUTES);
        assert_eq!(settings.max_tool_steps, DEFAULT_MAX_TOOL_STEPS);
    }

    #[test]
    fn provider_round_trip() {
        let mut provider = ProviderSettings::builder()
            .id("openai")
            .provider_type("openai")
            .max_tool_steps(-4)
            .build();
        assert_eq!(StreamingSettings::from_provider(&provider).max_tool_steps, 20);

        let settings = StreamingSettings {
            request_timeout_minutes: 1,
            sse_idle_timeout_minutes: 2,
            max_tool_steps: 3,
        };
        settings.apply_to(&mut provider);
        assert_eq!(StreamingSettings::from_provider(&provider), settings);
    }
}

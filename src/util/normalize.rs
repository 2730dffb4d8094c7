//! Normalization of user-editable timing and step-limit settings.
//!
//! Every function here is total: any input, including `NaN`, strings and
//! negative numbers, resolves to a usable value or to "not configured".

use crate::types::ConfigValue;

/// Tool steps used when a provider does not configure its own limit.
pub const DEFAULT_MAX_TOOL_STEPS: u32 = 20;

/// Hard ceiling for tool steps. Larger values are clamped, never rejected.
pub const MAX_MAX_TOOL_STEPS: u32 = 500;

/// Upper bound offered by the settings surface for both timeouts.
pub const MAX_TIMEOUT_MINUTES: u64 = 720;

const MS_PER_MINUTE: u64 = 60 * 1000;

/// Bounds applied by [`normalize_max_tool_steps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLimits {
    pub default_steps: u32,
    pub max_steps: u32,
}

impl Default for StepLimits {
    fn default() -> Self {
        Self {
            default_steps: DEFAULT_MAX_TOOL_STEPS,
            max_steps: MAX_MAX_TOOL_STEPS,
        }
    }
}

/// Floor a timeout to whole non-negative minutes.
///
/// Returns `None` when the value is absent or not a finite number.
pub fn normalize_timeout_minutes(value: impl Into<ConfigValue>) -> Option<u64> {
    let minutes = value.into().as_finite()?;
    Some(minutes.floor().max(0.0) as u64)
}

/// Convert a timeout in minutes to milliseconds.
///
/// Zero and unusable values mean "no timeout" and return `None`.
pub fn timeout_minutes_to_ms(value: impl Into<ConfigValue>) -> Option<u64> {
    match normalize_timeout_minutes(value) {
        Some(minutes) if minutes > 0 => Some(minutes.saturating_mul(MS_PER_MINUTE)),
        _ => None,
    }
}

/// Resolve the tool step cap for one request.
pub fn normalize_max_tool_steps(value: impl Into<ConfigValue>, limits: StepLimits) -> u32 {
    let Some(steps) = value.into().as_finite() else {
        return limits.default_steps;
    };
    let floored = steps.floor();
    if floored <= 0.0 {
        return limits.default_steps;
    }
    floored.min(f64::from(limits.max_steps)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(default_steps: u32, max_steps: u32) -> StepLimits {
        StepLimits {
            default_steps,
            max_steps,
        }
    }

    #[test]
    fn timeout_minutes_rejects_non_numbers() {
        assert_eq!(normalize_timeout_minutes(ConfigValue::Absent), None);
        assert_eq!(normalize_timeout_minutes(ConfigValue::Invalid), None);
        assert_eq!(normalize_timeout_minutes(f64::NAN), None);
        assert_eq!(normalize_timeout_minutes(f64::NEG_INFINITY), None);
    }

    #[test]
    fn timeout_minutes_floors_and_clamps_at_zero() {
        assert_eq!(normalize_timeout_minutes(-1), Some(0));
        assert_eq!(normalize_timeout_minutes(0), Some(0));
        assert_eq!(normalize_timeout_minutes(1.9), Some(1));
        assert_eq!(normalize_timeout_minutes(-0.5), Some(0));
    }

    #[test]
    fn minutes_to_ms() {
        assert_eq!(timeout_minutes_to_ms(ConfigValue::Absent), None);
        assert_eq!(timeout_minutes_to_ms(0), None);
        assert_eq!(timeout_minutes_to_ms(0.9), None);
        assert_eq!(timeout_minutes_to_ms(2), Some(120_000));
        assert_eq!(timeout_minutes_to_ms(10), Some(600_000));
    }

    #[test]
    fn huge_timeouts_saturate() {
        assert_eq!(timeout_minutes_to_ms(1e300), Some(u64::MAX));
    }

    #[test]
    fn max_tool_steps_defaults_and_clamps() {
        assert_eq!(normalize_max_tool_steps(ConfigValue::Absent, limits(20, 50)), 20);
        assert_eq!(normalize_max_tool_steps(ConfigValue::Invalid, limits(20, 50)), 20);
        assert_eq!(normalize_max_tool_steps(-1, limits(20, 50)), 20);
        assert_eq!(normalize_max_tool_steps(0.5, limits(20, 50)), 20);
        assert_eq!(normalize_max_tool_steps(10.2, limits(20, 50)), 10);
        assert_eq!(normalize_max_tool_steps(50, limits(20, 50)), 50);
        assert_eq!(normalize_max_tool_steps(999, limits(20, 50)), 50);
    }

    #[test]
    fn max_tool_steps_uses_global_limits_by_default() {
        assert_eq!(
            normalize_max_tool_steps(ConfigValue::Absent, StepLimits::default()),
            DEFAULT_MAX_TOOL_STEPS
        );
        assert_eq!(
            normalize_max_tool_steps(10_000, StepLimits::default()),
            MAX_MAX_TOOL_STEPS
        );
        assert_eq!(normalize_max_tool_steps(f64::INFINITY, StepLimits::default()), 20);
    }
}

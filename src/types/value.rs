//! Untyped configuration values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A configuration value read from a dynamically-typed boundary (stored
/// settings, JSON from the UI, env vars).
///
/// Normalization functions match on this instead of trusting the shape of
/// the input. Anything that is not a number is [`ConfigValue::Invalid`];
/// missing keys and `null` are [`ConfigValue::Absent`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Absent,
    Invalid,
    Number(f64),
}

impl ConfigValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The numeric payload, if finite.
    pub fn as_finite(&self) -> Option<f64> {
        match *self {
            Self::Number(n) if n.is_finite() => Some(n),
            _ => None,
        }
    }

    /// Parse a raw string (env var, form input).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Absent;
        }
        trimmed
            .parse::<f64>()
            .map(Self::Number)
            .unwrap_or(Self::Invalid)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Absent)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Absent,
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Invalid),
            _ => Self::Invalid,
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(n),
            Self::Absent | Self::Invalid => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_shapes_map_to_variants() {
        assert_eq!(ConfigValue::from(json!(null)), ConfigValue::Absent);
        assert_eq!(ConfigValue::from(json!(10)), ConfigValue::Number(10.0));
        assert_eq!(ConfigValue::from(json!(1.5)), ConfigValue::Number(1.5));
        assert_eq!(ConfigValue::from(json!("10")), ConfigValue::Invalid);
        assert_eq!(ConfigValue::from(json!(true)), ConfigValue::Invalid);
        assert_eq!(ConfigValue::from(json!([1])), ConfigValue::Invalid);
    }

    #[test]
    fn deserializes_missing_field_as_absent() {
        #[derive(Deserialize)]
        struct Record {
            #[serde(default)]
            steps: ConfigValue,
        }

        let record: Record = serde_json::from_str("{}").unwrap();
        assert_eq!(record.steps, ConfigValue::Absent);

        let record: Record = serde_json::from_str(r#"{"steps": "many"}"#).unwrap();
        assert_eq!(record.steps, ConfigValue::Invalid);
    }

    #[test]
    fn parse_raw_strings() {
        assert_eq!(ConfigValue::parse(" 42 "), ConfigValue::Number(42.0));
        assert_eq!(ConfigValue::parse(""), ConfigValue::Absent);
        assert_eq!(ConfigValue::parse("ten"), ConfigValue::Invalid);
    }

    #[test]
    fn serializes_integers_without_fraction() {
        assert_eq!(serde_json::to_string(&ConfigValue::from(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&ConfigValue::Invalid).unwrap(), "null");
    }

    #[test]
    fn non_finite_numbers_are_not_finite() {
        assert_eq!(ConfigValue::Number(f64::NAN).as_finite(), None);
        assert_eq!(ConfigValue::Number(f64::INFINITY).as_finite(), None);
        assert_eq!(ConfigValue::Number(3.0).as_finite(), Some(3.0));
    }
}

//! Typed configuration values

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value as stored in the backing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl ConfigValue {
    /// Convert a scalar YAML node; mappings and sequences are not config values.
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        use serde_yaml::Value;

        match value {
            Value::Null => Some(ConfigValue::String(String::new())),
            Value::Number(n) if n.as_i64().is_none() => Some(ConfigValue::String(n.to_string())),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                serde_yaml::from_value(value.clone()).ok()
            }
            _ => None,
        }
    }

    pub fn to_yaml(&self) -> Result<serde_yaml::Value> {
        Ok(serde_yaml::to_value(self)?)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_value() {
        assert_eq!(ConfigValue::Bool(true).to_string(), "true");
        assert_eq!(ConfigValue::Int(8084).to_string(), "8084");
        assert_eq!(ConfigValue::from("/usr/bin/gcloud").to_string(), "/usr/bin/gcloud");
    }

    #[test]
    fn test_from_yaml_scalars() {
        let doc: serde_yaml::Value = serde_yaml::from_str("a: true\nb: 8084\nc: text\nd: ~\ne: [1]").unwrap();
        let map = doc.as_mapping().unwrap();
        let get = |k: &str| map.get(k).and_then(ConfigValue::from_yaml);

        assert_eq!(get("a"), Some(ConfigValue::Bool(true)));
        assert_eq!(get("b"), Some(ConfigValue::Int(8084)));
        assert_eq!(get("c"), Some(ConfigValue::from("text")));
        assert_eq!(get("d"), Some(ConfigValue::from("")));
        assert_eq!(get("e"), None);
    }

    #[test]
    fn test_numeric_looking_strings_stay_strings() {
        let value = serde_yaml::Value::String("8084".to_string());
        assert_eq!(ConfigValue::from_yaml(&value), Some(ConfigValue::from("8084")));

        let value = serde_yaml::Value::String("true".to_string());
        assert_eq!(ConfigValue::from_yaml(&value), Some(ConfigValue::from("true")));

        let float: serde_yaml::Value = serde_yaml::from_str("1.5").unwrap();
        assert_eq!(ConfigValue::from_yaml(&float), Some(ConfigValue::from("1.5")));
    }

    #[test]
    fn test_to_yaml_keeps_scalar_type() {
        assert_eq!(
            ConfigValue::Bool(false).to_yaml().unwrap(),
            serde_yaml::Value::Bool(false)
        );
        assert_eq!(
            ConfigValue::Int(8084).to_yaml().unwrap(),
            serde_yaml::Value::Number(8084.into())
        );
        assert_eq!(
            ConfigValue::from("8084").to_yaml().unwrap(),
            serde_yaml::Value::String("8084".to_string())
        );
    }
}

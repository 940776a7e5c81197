//! On-disk configuration store
//!
//! Values are held as a flat map of dotted keys (`logging.level`) and written
//! back to the backing file as nested YAML mappings.

use crate::config::keys;
use crate::config::value::ConfigValue;
use crate::error::{EiamError, Result};
use crate::logging::{LogFormat, LogLevel};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key/value configuration backed by a single YAML file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    path: PathBuf,
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigStore {
    /// A store holding only default values for a backing file at `path`
    pub fn with_defaults<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            values: default_values(&config_dir),
            path,
        }
    }

    /// Load the backing file, creating it with defaults on first use
    pub async fn load_or_init<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load(path).await;
        }

        info!("No configuration found at {}, writing defaults", path.display());
        let store = Self::with_defaults(path);
        store
            .persist()
            .await
            .map_err(|e| EiamError::persistence("Failed to write default configuration", e))?;
        Ok(store)
    }

    /// Load the backing file, overlaying its values onto the defaults
    pub async fn load<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| EiamError::io("Failed to read configuration file", e))?;
        Self::from_yaml_str(path, &contents)
    }

    /// Parse YAML `contents` as the content of the backing file at `path`
    pub fn from_yaml_str<P: Into<PathBuf>>(path: P, contents: &str) -> Result<Self> {
        let mut store = Self::with_defaults(path);
        let document: Value = serde_yaml::from_str(contents)?;

        match document {
            Value::Null => {}
            Value::Mapping(mapping) => {
                let mut loaded = BTreeMap::new();
                flatten("", &mapping, &mut loaded);
                debug!("Loaded {} configuration values", loaded.len());
                store.values.extend(loaded);
                if let Some((parent, child)) = find_nesting_conflict(&store.values) {
                    return Err(EiamError::serialization(format!(
                        "configuration key {parent} holds a value but {child} is also defined under it"
                    )));
                }
            }
            _ => {
                return Err(EiamError::serialization(
                    "configuration file must contain a mapping at the top level",
                ))
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Replace the value for `key`, returning the previous one
    pub fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) -> Option<ConfigValue> {
        self.values.insert(key.to_lowercase(), value.into())
    }

    /// Configured console level; invalid values fall back to info
    pub fn logging_level(&self) -> LogLevel {
        match self.get(keys::LOGGING_LEVEL) {
            Some(value) => value.to_string().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid logging level {value:?} in configuration");
                LogLevel::Info
            }),
            None => LogLevel::Info,
        }
    }

    pub fn logging_format(&self) -> LogFormat {
        self.get(keys::LOGGING_FORMAT)
            .map(|value| LogFormat::from_config_value(&value.to_string()))
            .unwrap_or(LogFormat::Text)
    }

    /// Render the whole store as nested YAML
    pub fn to_yaml_string(&self) -> Result<String> {
        let mut root = Mapping::new();
        for (key, value) in &self.values {
            let segments: Vec<&str> = key.split('.').collect();
            insert_nested(&mut root, &segments, value.to_yaml()?, key)?;
        }
        Ok(serde_yaml::to_string(&Value::Mapping(root))?)
    }

    /// Persist the entire store to its backing file
    pub async fn write(&self) -> Result<()> {
        self.persist()
            .await
            .map_err(|e| EiamError::persistence("Failed to write updated configuration", e))
    }

    async fn persist(&self) -> Result<()> {
        let contents = self.to_yaml_string()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| EiamError::io("Failed to create configuration directory", e))?;
            }
        }

        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| EiamError::io("Failed to write configuration file", e))?;
        debug!("Wrote configuration to {}", self.path.display());
        Ok(())
    }

    /// Raw bytes of the backing file
    pub async fn read_raw(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| EiamError::io("Failed to read configuration file", e))
    }
}

/// Default values for every recognized key
pub fn default_values(config_dir: &Path) -> BTreeMap<String, ConfigValue> {
    let path_value = |p: PathBuf| ConfigValue::String(p.display().to_string());
    let binary_path = |name: &str| {
        which::which(name)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };

    let defaults = [
        (keys::AUTHPROXY_CERTFILE, path_value(config_dir.join("server.pem"))),
        (keys::AUTHPROXY_KEYFILE, path_value(config_dir.join("server.key"))),
        (keys::AUTHPROXY_LOGDIR, path_value(config_dir.join("log"))),
        (keys::AUTHPROXY_PROXYADDRESS, ConfigValue::from("127.0.0.1")),
        (keys::AUTHPROXY_PROXYPORT, ConfigValue::from("8084")),
        (keys::AUTHPROXY_VERBOSE, ConfigValue::Bool(false)),
        (keys::BINARYPATHS_GCLOUD, ConfigValue::from(binary_path("gcloud"))),
        (keys::BINARYPATHS_KUBECTL, ConfigValue::from(binary_path("kubectl"))),
        (keys::LOGGING_FORMAT, ConfigValue::from("text")),
        (keys::LOGGING_LEVEL, ConfigValue::from("info")),
        (keys::LOGGING_DISABLELEVELTRUNCATION, ConfigValue::Bool(true)),
        (keys::LOGGING_PADLEVELTEXT, ConfigValue::Bool(true)),
    ];

    defaults
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn flatten(prefix: &str, mapping: &Mapping, out: &mut BTreeMap<String, ConfigValue>) {
    for (key, value) in mapping {
        let Some(segment) = key.as_str() else {
            warn!("Skipping non-string configuration key {key:?}");
            continue;
        };
        let segment = segment.to_lowercase();
        let full_key = if prefix.is_empty() {
            segment
        } else {
            format!("{prefix}.{segment}")
        };

        match value {
            Value::Mapping(child) => flatten(&full_key, child, out),
            other => match ConfigValue::from_yaml(other) {
                Some(config_value) => {
                    out.insert(full_key, config_value);
                }
                None => warn!("Skipping unsupported value for configuration key {full_key}"),
            },
        }
    }
}

/// First pair of keys where one holds a value and the other nests beneath it
fn find_nesting_conflict(values: &BTreeMap<String, ConfigValue>) -> Option<(String, String)> {
    values.keys().find_map(|key| {
        let prefix = format!("{key}.");
        values
            .range(prefix.clone()..)
            .next()
            .filter(|(child, _)| child.starts_with(&prefix))
            .map(|(child, _)| (key.clone(), child.clone()))
    })
}

/// Fails when a segment is already occupied by a value of the other shape
fn insert_nested(mapping: &mut Mapping, segments: &[&str], value: Value, key: &str) -> Result<()> {
    let conflict = || {
        EiamError::serialization(format!(
            "configuration key {key} conflicts with another key sharing its prefix"
        ))
    };

    match segments {
        [] => Ok(()),
        [last] => {
            let segment = Value::String(last.to_string());
            if mapping.get(&segment).is_some_and(Value::is_mapping) {
                return Err(conflict());
            }
            mapping.insert(segment, value);
            Ok(())
        }
        [first, rest @ ..] => {
            let entry = mapping
                .entry(Value::String(first.to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            match entry {
                Value::Mapping(child) => insert_nested(child, rest, value, key),
                _ => Err(conflict()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_cover_registry() {
        let store = ConfigStore::with_defaults("/etc/eiam/config.yaml");
        for key in keys::key_names() {
            assert!(store.get(key).is_some(), "missing default for {key}");
        }
        assert_eq!(
            store.get(keys::AUTHPROXY_CERTFILE),
            Some(&ConfigValue::from("/etc/eiam/server.pem"))
        );
        assert_eq!(store.logging_level(), LogLevel::Info);
        assert_eq!(store.logging_format(), LogFormat::Text);
    }

    #[test]
    fn test_nested_yaml_is_flattened() {
        let yaml = "Logging:\n  Level: debug\n  format: json\nauthproxy:\n  proxyport: 9000\n  verbose: true\nextra:\n  nested:\n    key: value\n";
        let store = ConfigStore::from_yaml_str("/tmp/config.yaml", yaml).unwrap();

        assert_eq!(store.get("logging.level"), Some(&ConfigValue::from("debug")));
        assert_eq!(store.get("authproxy.proxyport"), Some(&ConfigValue::Int(9000)));
        assert_eq!(store.get("authproxy.verbose"), Some(&ConfigValue::Bool(true)));
        assert_eq!(store.get("extra.nested.key"), Some(&ConfigValue::from("value")));
        assert_eq!(store.logging_level(), LogLevel::Debug);
        assert_eq!(store.logging_format(), LogFormat::Json);
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        assert!(ConfigStore::from_yaml_str("/tmp/config.yaml", "- a\n- b\n").is_err());
        assert!(ConfigStore::from_yaml_str("/tmp/config.yaml", "").is_ok());
    }

    #[test]
    fn test_yaml_output_is_nested() {
        let mut store = ConfigStore::from_yaml_str("/tmp/config.yaml", "").unwrap();
        store.set("logging.level", "warn");

        let yaml = store.to_yaml_string().unwrap();
        let document: Value = serde_yaml::from_str(&yaml).unwrap();
        let level = document
            .get("logging")
            .and_then(|logging| logging.get("level"))
            .and_then(Value::as_str);
        assert_eq!(level, Some("warn"));
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let store = tokio_test::block_on(ConfigStore::load_or_init(&path)).unwrap();
        assert!(path.exists());

        let reloaded = tokio_test::block_on(ConfigStore::load(&path)).unwrap();
        assert_eq!(store, reloaded);
    }

    #[test]
    fn test_scalar_parent_of_registry_key_is_rejected() {
        let err = ConfigStore::from_yaml_str("/tmp/config.yaml", "authproxy: legacy\n").unwrap_err();
        assert!(matches!(err, EiamError::SerializationError(ref msg)
            if msg.contains("authproxy") && msg.contains("authproxy.")));
    }

    #[test]
    fn test_conflicting_keys_are_not_written() {
        let mut store = ConfigStore::with_defaults("/tmp/config.yaml");
        store.set("logging", "flat");
        assert!(matches!(
            store.to_yaml_string(),
            Err(EiamError::SerializationError(_))
        ));
        assert_eq!(
            find_nesting_conflict(&store.values),
            Some(("logging".to_string(), "logging.disableleveltruncation".to_string()))
        );
    }

    #[test]
    fn test_sibling_prefixes_do_not_conflict() {
        let yaml = "authproxy-old: kept\nauthproxyx:\n  port: 1\n";
        let store = ConfigStore::from_yaml_str("/tmp/config.yaml", yaml).unwrap();
        assert_eq!(store.get("authproxy-old"), Some(&ConfigValue::from("kept")));
        assert!(store.to_yaml_string().is_ok());
    }
}

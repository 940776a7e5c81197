//! Validated operations behind `eiam config`
//!
//! `set` runs in two phases: every argument check happens in
//! [`validate_set_args`] before the store or logger is touched, then the
//! value is applied, the logger updated, and the store persisted. A failed
//! write leaves the in-memory change in place.

use crate::config::keys::{self, ConfigKey, CONFIG_KEYS};
use crate::config::store::ConfigStore;
use crate::config::value::ConfigValue;
use crate::error::{EiamError, Result};
use crate::logging::LoggerHandle;
use std::fmt;
use tabled::Tabled;

/// Result of a `set` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// The requested value matched the current one; nothing was written
    Unchanged { key: String },
    Updated {
        key: String,
        old: Option<ConfigValue>,
        new: ConfigValue,
    },
}

impl SetOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, SetOutcome::Unchanged { .. })
    }
}

impl fmt::Display for SetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOutcome::Unchanged { .. } => f.write_str("New value is the same as the current one"),
            SetOutcome::Updated { key, old, new } => {
                let old = old.as_ref().map(ToString::to_string).unwrap_or_default();
                write!(f, "Updated {key} from {old} to {new}")
            }
        }
    }
}

/// Row of the `config info` table
#[derive(Debug, Clone, Tabled)]
pub struct KeyInfo {
    #[tabled(rename = "Key")]
    pub key: &'static str,
    #[tabled(rename = "Description")]
    pub description: &'static str,
}

/// Raw contents of the backing file
pub async fn print_config(store: &ConfigStore) -> Result<Vec<u8>> {
    store.read_raw().await
}

/// Description of every recognized key
pub fn config_info() -> Vec<KeyInfo> {
    CONFIG_KEYS
        .iter()
        .map(|key| KeyInfo {
            key: key.name,
            description: key.description,
        })
        .collect()
}

/// Current value of a recognized key
pub fn view(store: &ConfigStore, key: &str) -> Result<Option<ConfigValue>> {
    let key = keys::require(key)?;
    Ok(store.get(key.name).cloned())
}

/// Pre-flight checks for `set`; never mutates anything
pub fn validate_set_args(args: &[String]) -> Result<(&'static ConfigKey, &str)> {
    let [key, value] = args else {
        return Err(EiamError::invalid_arguments(
            "requires both a config key and a new value",
        ));
    };

    let config_key = keys::require(key)?;
    config_key.validate(value)?;
    Ok((config_key, value.as_str()))
}

/// Validate, apply and persist a new value for a configuration key
pub async fn set(
    store: &mut ConfigStore,
    logger: &mut LoggerHandle,
    args: &[String],
) -> Result<SetOutcome> {
    let (config_key, value) = validate_set_args(args)?;
    let key = config_key.name;

    let old = store.get(key).cloned();
    if old.as_ref().map(ToString::to_string).as_deref() == Some(value) {
        return Ok(SetOutcome::Unchanged {
            key: key.to_string(),
        });
    }

    let new = config_key.kind.coerce(value);
    store.set(key, new.clone());
    config_key.apply_side_effect(value, logger)?;
    store.write().await?;

    Ok(SetOutcome::Updated {
        key: key.to_string(),
        old,
        new,
    })
}

//! Registry of recognized configuration keys
//!
//! Every key `eiam config` can view or set is listed here together with the
//! rule its values must satisfy and the logger change a new value triggers.

use crate::config::value::ConfigValue;
use crate::error::{EiamError, Result};
use crate::logging::{LogFormat, LogLevel, LoggerHandle};
use crate::utils::helpers::parse_bool_literal;

/// Value class of a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Any string is accepted unchecked
    Text,
    /// Must parse as a boolean literal; stored as a bool
    Bool,
    /// One of the `LogLevel` names
    LogLevel,
    /// One of the `LogFormat` names
    LogFormat,
}

impl KeyKind {
    /// Reject `value` for `key` before anything is mutated
    pub fn validate(&self, key: &str, value: &str) -> Result<()> {
        match self {
            KeyKind::Text => Ok(()),
            KeyKind::Bool => parse_bool_literal(value).map(|_| ()).ok_or_else(|| {
                EiamError::invalid_arguments(format!(
                    "the {key} value must be either true or false"
                ))
            }),
            KeyKind::LogLevel => {
                if LogLevel::NAMES.contains(&value) {
                    Ok(())
                } else {
                    Err(EiamError::invalid_arguments(format!(
                        "logging level must be one of {:?}",
                        LogLevel::NAMES
                    )))
                }
            }
            KeyKind::LogFormat => {
                if LogFormat::NAMES.contains(&value) {
                    Ok(())
                } else {
                    Err(EiamError::invalid_arguments(format!(
                        "logging format must be one of {:?}",
                        LogFormat::NAMES
                    )))
                }
            }
        }
    }

    /// Convert a validated literal into the value that gets stored
    pub fn coerce(&self, value: &str) -> ConfigValue {
        match self {
            KeyKind::Bool => match parse_bool_literal(value) {
                Some(b) => ConfigValue::Bool(b),
                None => ConfigValue::from(value),
            },
            _ => ConfigValue::from(value),
        }
    }
}

/// A recognized configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: KeyKind,
}

impl ConfigKey {
    const fn new(name: &'static str, kind: KeyKind, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind,
        }
    }

    pub fn validate(&self, value: &str) -> Result<()> {
        self.kind.validate(self.name, value)
    }

    /// Push a newly set value into the logger when this key controls it
    pub fn apply_side_effect(&self, value: &str, logger: &mut LoggerHandle) -> Result<()> {
        match self.kind {
            KeyKind::LogLevel => {
                let level: LogLevel = value.parse()?;
                logger.set_level(level)
            }
            KeyKind::LogFormat => logger.set_format(LogFormat::from_config_value(value)),
            KeyKind::Text | KeyKind::Bool => Ok(()),
        }
    }
}

pub const AUTHPROXY_CERTFILE: &str = "authproxy.certfile";
pub const AUTHPROXY_KEYFILE: &str = "authproxy.keyfile";
pub const AUTHPROXY_LOGDIR: &str = "authproxy.logdir";
pub const AUTHPROXY_PROXYADDRESS: &str = "authproxy.proxyaddress";
pub const AUTHPROXY_PROXYPORT: &str = "authproxy.proxyport";
pub const AUTHPROXY_VERBOSE: &str = "authproxy.verbose";
pub const BINARYPATHS_GCLOUD: &str = "binarypaths.gcloud";
pub const BINARYPATHS_KUBECTL: &str = "binarypaths.kubectl";
pub const LOGGING_FORMAT: &str = "logging.format";
pub const LOGGING_LEVEL: &str = "logging.level";
pub const LOGGING_DISABLELEVELTRUNCATION: &str = "logging.disableleveltruncation";
pub const LOGGING_PADLEVELTEXT: &str = "logging.padleveltext";

pub static CONFIG_KEYS: &[ConfigKey] = &[
    ConfigKey::new(
        AUTHPROXY_CERTFILE,
        KeyKind::Text,
        "The path to the auth proxy's TLS certificate",
    ),
    ConfigKey::new(
        AUTHPROXY_KEYFILE,
        KeyKind::Text,
        "The path to the auth proxy's x509 key",
    ),
    ConfigKey::new(
        AUTHPROXY_LOGDIR,
        KeyKind::Text,
        "The directory that auth proxy logs will be written to",
    ),
    ConfigKey::new(
        AUTHPROXY_PROXYADDRESS,
        KeyKind::Text,
        "The address that the auth proxy is hosted on",
    ),
    ConfigKey::new(
        AUTHPROXY_PROXYPORT,
        KeyKind::Text,
        "The port that the auth proxy runs on",
    ),
    ConfigKey::new(
        AUTHPROXY_VERBOSE,
        KeyKind::Bool,
        "When set to 'true', verbose output for proxy logs will be enabled",
    ),
    ConfigKey::new(
        BINARYPATHS_GCLOUD,
        KeyKind::Text,
        "The path to the gcloud binary on your filesystem",
    ),
    ConfigKey::new(
        BINARYPATHS_KUBECTL,
        KeyKind::Text,
        "The path to the kubectl binary on your filesystem",
    ),
    ConfigKey::new(
        LOGGING_FORMAT,
        KeyKind::LogFormat,
        "The format for which to write console logs. Can be 'json', 'text', or 'debug'",
    ),
    ConfigKey::new(
        LOGGING_LEVEL,
        KeyKind::LogLevel,
        "The logging level to write to the console. Can be one of 'trace', 'debug', 'info', 'warn', 'error', 'fatal', or 'panic'",
    ),
    ConfigKey::new(
        LOGGING_DISABLELEVELTRUNCATION,
        KeyKind::Bool,
        "When set to 'true', the level indicator for logs will not be truncated",
    ),
    ConfigKey::new(
        LOGGING_PADLEVELTEXT,
        KeyKind::Bool,
        "When set to 'true', output logs will align evenly with their output level indicator",
    ),
];

pub fn lookup(name: &str) -> Option<&'static ConfigKey> {
    CONFIG_KEYS.iter().find(|key| key.name == name)
}

pub fn key_names() -> Vec<&'static str> {
    CONFIG_KEYS.iter().map(|key| key.name).collect()
}

/// Look up `name`, failing with `InvalidArguments` for unknown keys
pub fn require(name: &str) -> Result<&'static ConfigKey> {
    lookup(name).ok_or_else(|| EiamError::invalid_arguments(format!("invalid config key {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_complete() {
        assert_eq!(CONFIG_KEYS.len(), 12);
        let names = key_names();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_key_kinds() {
        let bools: Vec<_> = CONFIG_KEYS
            .iter()
            .filter(|k| k.kind == KeyKind::Bool)
            .map(|k| k.name)
            .collect();
        assert_eq!(
            bools,
            vec![AUTHPROXY_VERBOSE, LOGGING_DISABLELEVELTRUNCATION, LOGGING_PADLEVELTEXT]
        );
        assert_eq!(lookup(LOGGING_LEVEL).unwrap().kind, KeyKind::LogLevel);
        assert_eq!(lookup(LOGGING_FORMAT).unwrap().kind, KeyKind::LogFormat);
        assert_eq!(lookup(AUTHPROXY_PROXYPORT).unwrap().kind, KeyKind::Text);
    }

    #[test]
    fn test_require_rejects_unknown_keys() {
        assert!(require("nonexistent.key").unwrap_err().is_invalid_arguments());
        assert!(require("Logging.Level").is_err());
        assert!(require(LOGGING_LEVEL).is_ok());
    }

    #[test]
    fn test_validate_enumerated_keys() {
        let level = lookup(LOGGING_LEVEL).unwrap();
        for name in LogLevel::NAMES {
            assert!(level.validate(name).is_ok());
        }
        assert!(level.validate("verbose").is_err());
        assert!(level.validate("INFO").is_err());

        let format = lookup(LOGGING_FORMAT).unwrap();
        for name in LogFormat::NAMES {
            assert!(format.validate(name).is_ok());
        }
        assert!(format.validate("yaml").is_err());
    }

    #[test]
    fn test_bool_coercion() {
        let verbose = lookup(AUTHPROXY_VERBOSE).unwrap();
        assert!(verbose.validate("T").is_ok());
        assert!(verbose.validate("notabool").is_err());
        assert_eq!(verbose.kind.coerce("TRUE"), ConfigValue::Bool(true));
        assert_eq!(verbose.kind.coerce("0"), ConfigValue::Bool(false));

        let certfile = lookup(AUTHPROXY_CERTFILE).unwrap();
        assert!(certfile.validate("anything at all").is_ok());
        assert_eq!(certfile.kind.coerce("true"), ConfigValue::from("true"));
    }

    #[test]
    fn test_side_effects_reach_logger() {
        let mut logger = LoggerHandle::default();

        lookup(LOGGING_LEVEL)
            .unwrap()
            .apply_side_effect("trace", &mut logger)
            .unwrap();
        assert_eq!(logger.level(), LogLevel::Trace);

        lookup(LOGGING_FORMAT)
            .unwrap()
            .apply_side_effect("debug", &mut logger)
            .unwrap();
        assert_eq!(logger.format(), LogFormat::Runtime);

        lookup(AUTHPROXY_VERBOSE)
            .unwrap()
            .apply_side_effect("true", &mut logger)
            .unwrap();
        assert_eq!(logger.level(), LogLevel::Trace);
        assert_eq!(logger.format(), LogFormat::Runtime);
    }
}

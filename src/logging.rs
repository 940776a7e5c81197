//! Logger handle
//!
//! The active logging level and output format are owned by a `LoggerHandle`
//! that is passed to the commands which can change them. When the handle was
//! created with `LoggerHandle::init` it also holds reload handles into the
//! global `tracing` subscriber, so level and format changes take effect for
//! every subsequent event in the process.

use crate::error::{EiamError, Result};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{
    filter::LevelFilter, layer::Layered, layer::SubscriberExt, reload, util::SubscriberInitExt,
    Layer, Registry,
};

type FilteredRegistry = Layered<reload::Layer<LevelFilter, Registry>, Registry>;
type FormatLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Logging levels accepted by `logging.level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    pub const NAMES: [&'static str; 7] = ["trace", "debug", "info", "warn", "error", "fatal", "panic"];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Panic => "panic",
        }
    }

    /// `tracing` has no levels above ERROR, so fatal and panic share it.
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = EiamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "panic" => Ok(LogLevel::Panic),
            _ => Err(EiamError::invalid_arguments(format!(
                "not a valid logging level: {s:?}"
            ))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain single-line output
    Text,
    /// One JSON object per event
    Json,
    /// Verbose output carrying source location, target and thread ids
    Runtime,
}

impl LogFormat {
    pub const NAMES: [&'static str; 3] = ["text", "json", "debug"];

    /// Select a format from a `logging.format` value; unrecognized values fall back to text.
    pub fn from_config_value(value: &str) -> Self {
        match value {
            "debug" => LogFormat::Runtime,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    pub fn as_config_value(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Runtime => "debug",
        }
    }

    fn build_layer(&self) -> FormatLayer {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        match self {
            LogFormat::Text => layer.with_target(false).boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Runtime => layer
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(true)
                .boxed(),
        }
    }
}

/// Shared handle to the active logger configuration
pub struct LoggerHandle {
    level: LogLevel,
    format: LogFormat,
    level_reload: Option<reload::Handle<LevelFilter, Registry>>,
    format_reload: Option<reload::Handle<FormatLayer, FilteredRegistry>>,
}

impl LoggerHandle {
    /// Install the global subscriber and return a handle that controls it
    pub fn init(level: LogLevel, format: LogFormat) -> Result<Self> {
        let (filter_layer, level_reload) = reload::Layer::new(level.as_filter());
        let (format_layer, format_reload) = reload::Layer::new(format.build_layer());

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(format_layer)
            .try_init()
            .map_err(|e| EiamError::logging(format!("Failed to install subscriber: {e}")))?;

        Ok(Self {
            level,
            format,
            level_reload: Some(level_reload),
            format_reload: Some(format_reload),
        })
    }

    /// A handle that tracks level and format without any subscriber attached
    pub fn detached(level: LogLevel, format: LogFormat) -> Self {
        Self {
            level,
            format,
            level_reload: None,
            format_reload: None,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn is_attached(&self) -> bool {
        self.level_reload.is_some()
    }

    pub fn set_level(&mut self, level: LogLevel) -> Result<()> {
        if let Some(handle) = &self.level_reload {
            handle
                .reload(level.as_filter())
                .map_err(|e| EiamError::logging(format!("Failed to update logging level: {e}")))?;
        }
        self.level = level;
        Ok(())
    }

    pub fn set_format(&mut self, format: LogFormat) -> Result<()> {
        if let Some(handle) = &self.format_reload {
            handle
                .reload(format.build_layer())
                .map_err(|e| EiamError::logging(format!("Failed to update logging format: {e}")))?;
        }
        self.format = format;
        Ok(())
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self::detached(LogLevel::Info, LogFormat::Text)
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("level", &self.level)
            .field("format", &self.format)
            .field("attached", &self.is_attached())
            .finish()
    }
}

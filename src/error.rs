use thiserror::Error;

/// Main error type for eiam operations
#[derive(Debug, Error)]
pub enum EiamError {
    #[error("Invalid command arguments: {0}")]
    InvalidArguments(String),

    #[error("{message}: {source}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}: {source}")]
    PersistenceError {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl EiamError {
    pub fn invalid_arguments<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArguments(msg.into())
    }

    pub fn io<S: Into<String>>(msg: S, source: std::io::Error) -> Self {
        Self::IoError {
            message: msg.into(),
            source,
        }
    }

    pub fn persistence<S, E>(msg: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::PersistenceError {
            message: msg.into(),
            source: source.into(),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn logging<S: Into<String>>(msg: S) -> Self {
        Self::LoggingError(msg.into())
    }

    /// True for failures raised by argument validation, before any mutation
    pub fn is_invalid_arguments(&self) -> bool {
        matches!(self, Self::InvalidArguments(_))
    }
}

/// Result type alias for eiam operations
pub type Result<T> = std::result::Result<T, EiamError>;

impl From<serde_yaml::Error> for EiamError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::SerializationError(error.to_string())
    }
}

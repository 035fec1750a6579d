use thiserror::Error;

/// Top-level error type for the Spotter system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types where richer context is needed and implement
/// `From<SubsystemError> for SpotterError` so that the `?` operator works
/// across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpotterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SpotterError {
    fn from(err: toml::de::Error) -> Self {
        SpotterError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SpotterError {
    fn from(err: toml::ser::Error) -> Self {
        SpotterError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SpotterError {
    fn from(err: serde_json::Error) -> Self {
        SpotterError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Spotter operations.
pub type Result<T> = std::result::Result<T, SpotterError>;

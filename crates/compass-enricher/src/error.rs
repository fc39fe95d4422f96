//! Error types for enrichment runs

use thiserror::Error;

/// Errors that end a run
///
/// Lookup and mapping failures never show up here; they are logged and
/// absorbed per company or per branch record.
#[derive(Error, Debug)]
pub enum EnricherError {
    /// The record source could not deliver seeds
    #[error("Source error: {0}")]
    Source(String),

    /// A record could not be persisted
    #[error("Sink error at index {index}: {message}")]
    Sink {
        /// Run index of the record being written
        index: usize,
        /// Underlying failure
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors loading or validating an [`EnricherConfig`](crate::EnricherConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A field is present but unusable
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

//! Error types for the command-line entry point.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] compass_enricher::ConfigError),

    /// Source setup error
    #[error("Source error: {0}")]
    Source(#[from] compass_source::SourceError),

    /// Lookup client setup error
    #[error("Lookup error: {0}")]
    Lookup(#[from] compass_lookup::LookupError),

    /// Run error
    #[error(transparent)]
    Enricher(#[from] compass_enricher::EnricherError),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

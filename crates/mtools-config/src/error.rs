//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("missing config value '{field}': {hint}")]
    MissingField { field: String, hint: String },

    #[error("invalid config value '{field}': {hint}")]
    InvalidValue { field: String, hint: String },

    /// Merging or extracting the layered sources failed.
    #[error("failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Extract(Box::new(error))
    }
}

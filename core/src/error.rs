//! Error type for loading and saving table files.

use thiserror::Error;

use crate::table::ConfigError;

/// Errors that can occur while reading, writing or building a table file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A custom handler cannot be written to a file.
    #[error("option {0} has a custom handler and cannot be saved")]
    CustomHandler(String),

    /// The loaded options do not form a valid table.
    #[error("invalid option table: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;

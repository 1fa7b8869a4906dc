//! Error types for obs-core

use thiserror::Error;

/// Result type alias using obs-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for obs
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration content
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Vault not declared in the configuration or missing on disk
    #[error("Vault not found: {name}")]
    VaultNotFound { name: String },

    /// Source file for cp/mv does not exist
    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    /// Target file already present in the vault
    #[error("File already exists in destination: {path}")]
    DestinationExists { path: String },

    /// Neither an explicit nor a configured default destination
    #[error("No destination specified and no default path configured for '{command}'")]
    NoDestination { command: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a vault not found error
    pub fn vault_not_found(name: impl Into<String>) -> Self {
        Self::VaultNotFound { name: name.into() }
    }

    /// Create a source not found error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a destination exists error
    pub fn destination_exists(path: impl Into<String>) -> Self {
        Self::DestinationExists { path: path.into() }
    }

    /// Create a no destination error
    pub fn no_destination(command: impl Into<String>) -> Self {
        Self::NoDestination {
            command: command.into(),
        }
    }
}

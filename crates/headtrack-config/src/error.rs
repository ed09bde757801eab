//! Error types for settings loading and validation.

use std::path::PathBuf;

/// Errors raised while reading, writing or validating [`crate::Settings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown {kind} label: {label}")]
    UnknownLabel { kind: &'static str, label: String },

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

//! # Errors
//!
//! Error types for galaxy generation and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the galaxy generator and parameter parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalaxyError {
    #[error("Invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid color `{0}`: expected #rrggbb")]
    InvalidColor(String),
}

impl GalaxyError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        GalaxyError::InvalidParameter {
            field,
            value: value.into(),
            reason,
        }
    }
}

/// Errors raised while loading `starbulb.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Galaxy(#[from] GalaxyError),
}

/// Result type for galaxy operations.
pub type GalaxyResult<T> = Result<T, GalaxyError>;

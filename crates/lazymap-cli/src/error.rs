//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from lazymap-core library
    #[error("{0}")]
    Core(#[from] lazymap_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} format", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(lazymap_core::Error::Validation { .. }) => 2,
            Self::Core(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::InvalidFormat { .. } => 5,
            Self::Config(_) => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_for_validation() {
        let validation = Error::Core(lazymap_core::Error::Validation {
            field: "age".to_string(),
            declared: "int".to_string(),
            actual: "string".to_string(),
            mismatches: Vec::new(),
        });
        let cast = Error::Core(lazymap_core::Error::Cast {
            actual: "string".to_string(),
            candidates: vec!["int".to_string()],
            value: "\"x\"".to_string(),
        });
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(cast.exit_code(), 3);
    }

    #[test]
    fn test_format_error_without_color() {
        let err = Error::config("bad value");
        assert_eq!(format_error(&err, false), "Error: Configuration error: bad value");
    }
}

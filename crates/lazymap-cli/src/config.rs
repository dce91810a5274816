//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use lazymap_core::MapperConfig;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field matching behavior
    pub mapper: MapperConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!("{} must be a boolean, got '{}'", name, value))),
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match extension(path) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Runs before logging is initialized, so load failures go to stderr.
    pub fn load() -> Result<Self> {
        Ok(Self::load_first(&Self::default_config_paths(), &mut io::stderr()))
    }

    /// First of `paths` that exists and parses; failures are reported on `warnings`
    fn load_first<W: Write>(paths: &[PathBuf], warnings: &mut W) -> Self {
        for path in paths {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return config,
                    Err(e) => {
                        let _ = writeln!(
                            warnings,
                            "Warning: Failed to load config from {}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            }
        }

        // Return default config if no config file found
        Self::default()
    }

    /// Load configuration from a specific file or default locations,
    /// then apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        ["lazymap.yaml", "lazymap.yml", "lazymap.json", "lazymap.toml"]
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }

    /// Apply `LAZYMAP_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup("LAZYMAP_OUTPUT_FORMAT") {
            self.output.format = format;
        }
        if let Some(value) = lookup("LAZYMAP_CAMEL_CASE") {
            self.mapper.match_camel_case = parse_flag("LAZYMAP_CAMEL_CASE", &value)?;
        }
        if let Some(value) = lookup("LAZYMAP_SNAKE_CASE") {
            self.mapper.match_snake_case = parse_flag("LAZYMAP_SNAKE_CASE", &value)?;
        }
        Ok(())
    }

    /// Output format to use when none is given on the command line
    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_name(&self.output.format).ok_or_else(|| {
            Error::config(format!("unknown output format '{}'", self.output.format))
        })
    }
}

//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Lazymap CLI - Type-directed mapping of documents onto declared shapes
///
/// Copies JSON or YAML documents into records described by a shape file,
/// coercing every value to its declared type, and validates existing records.
#[derive(Parser, Debug)]
#[command(
    name = "lazymap",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LAZYMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (overrides the configured default)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map an input document onto a shape
    Map(MapArgs),

    /// Check a record's values against its shape without casting
    Validate(ValidateArgs),

    /// Show the resolved type of every field in a shape
    Inspect(InspectArgs),
}

/// Arguments for the map command
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Path to the shape file (JSON or YAML)
    #[arg(value_name = "SHAPE")]
    pub shape: PathBuf,

    /// Path to the input document (JSON or YAML)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Explicit field mapping, `destination=source` (repeatable)
    #[arg(short = 'm', long = "map", value_name = "DEST=SRC", value_parser = parse_mapping)]
    pub mappings: Vec<(String, String)>,

    /// Validate the populated record before printing it
    #[arg(long)]
    pub validate: bool,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to")]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the shape file (JSON or YAML)
    #[arg(value_name = "SHAPE")]
    pub shape: PathBuf,

    /// Path to the record to check (JSON or YAML)
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to the shape file (JSON or YAML)
    #[arg(value_name = "SHAPE")]
    pub shape: PathBuf,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse a format name as written in config files or the environment
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Parse a `destination=source` mapping argument
fn parse_mapping(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((dest, src)) if !dest.trim().is_empty() && !src.trim().is_empty() => {
            Ok((dest.trim().to_string(), src.trim().to_string()))
        }
        _ => Err(format!("expected DEST=SRC, got '{}'", arg)),
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_map_arguments() {
        let cli = Cli::parse_from([
            "lazymap", "map", "shape.yaml", "input.json", "-m", "x=b", "--map", "userId = uid",
        ]);
        match cli.command {
            Commands::Map(args) => {
                assert_eq!(args.shape, PathBuf::from("shape.yaml"));
                assert_eq!(
                    args.mappings,
                    vec![
                        ("x".to_string(), "b".to_string()),
                        ("userId".to_string(), "uid".to_string()),
                    ]
                );
                assert!(!args.validate);
            }
            other => panic!("expected map command, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_mapping_is_rejected() {
        let result = Cli::try_parse_from(["lazymap", "map", "s.json", "i.json", "-m", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["lazymap", "-vv", "inspect", "shape.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["lazymap", "--quiet", "inspect", "shape.json"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::from_name("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_name("YAML"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}

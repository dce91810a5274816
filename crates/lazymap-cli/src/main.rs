//! Lazymap CLI - Command-line interface for type-directed document mapping
//!
//! This is the main entry point for the Lazymap CLI application, providing
//! commands for mapping documents onto declared shapes, validating records
//! and inspecting shape declarations.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Handle the result
    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
fn run(cli: Cli) -> Result<()> {
    // Configuration is loaded first so its logging section can take effect
    let config = Config::load_with_file(cli.config.as_deref())?;

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    execute(cli, config)
}

#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn execute(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = match cli.output {
        Some(format) => format,
        None => config.output_format()?,
    };
    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Map(args) => handlers::handle_map(args, &config, &mut output),
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output),
        Commands::Inspect(args) => handlers::handle_inspect(args, &config, &mut output),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // Explicit -v flags win over the config file
    if cli.verbosity_level() == 0 {
        logging_config.merge_with_config(&config.logging);
    }

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        // Test verbose flag
        let cli = Cli::parse_from(["lazymap", "-vv", "inspect", "shape.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        // Test quiet flag
        let cli = Cli::parse_from(["lazymap", "--quiet", "validate", "shape.json", "record.json"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from([
            "lazymap",
            "--config",
            "/definitely/missing/lazymap.yaml",
            "inspect",
            "shape.json",
        ]);
        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}

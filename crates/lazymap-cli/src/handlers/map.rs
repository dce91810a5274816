//! Map command handler

use super::utils::{is_yaml, load_document, load_shape, read_file};
use crate::cli::{MapArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use lazymap_core::{FieldMappings, Mapper, Record, SourceRecord};
use serde_json::Value;
use std::fs;
use tracing::{debug, info, instrument};

/// Handle the map command
#[instrument(skip(config, output), fields(shape = %args.shape.display(), input = %args.input.display()))]
pub fn handle_map(args: MapArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("map_command", &format!("input: {}", args.input.display()));
    output.info(&format!(
        "Mapping {} onto {}",
        args.input.display(),
        args.shape.display()
    ))?;

    let shape = load_shape(&args.shape)?;
    let mut record = Record::new(&shape);
    let mappings: FieldMappings = args.mappings.iter().cloned().collect();
    let mapper = Mapper::new(config.mapper.clone());
    debug!(mappings = mappings.len(), config = ?mapper.config(), "Prepared mapper");

    if is_yaml(&args.input) {
        let document: Value = load_document(&args.input)?;
        let source = SourceRecord::from_value(document)?;
        mapper.transform(&source, &mut record, &mappings)?;
    } else {
        let text = read_file(&args.input)?;
        mapper.copy_from_json(&text, &mut record, &mappings)?;
    }
    info!(populated = record.values().len(), "Mapping complete");

    if args.validate {
        if let Err(err) = lazymap_core::validate(&record) {
            output.error("✗ Mapped record does not match its shape")?;
            output.mismatches(err.mismatches())?;
            return Err(err.into());
        }
        output.success("✓ Mapped record matches its shape")?;
    }

    match args.output_file {
        Some(path) => {
            let format = match output.format() {
                OutputFormat::Human => OutputFormat::JsonPretty,
                other => other,
            };
            fs::write(&path, format.format(&record)?)?;
            output.success(&format!("✓ Output saved to {}", path.display()))?;
        }
        None => {
            output.section("Record")?;
            output.data(&record)?;
        }
    }

    Ok(())
}

//! Validate command handler

use super::utils::{load_shape, load_values};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use lazymap_core::{validate, Destination, Record};
use tracing::{info, instrument, warn};

/// Handle the validate command
///
/// Values are stored as written, without casting, so the check reflects
/// what the record file actually holds.
#[instrument(skip(_config, output), fields(shape = %args.shape.display(), record = %args.record.display()))]
pub fn handle_validate(
    args: ValidateArgs,
    _config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("record: {}", args.record.display()));
    output.info(&format!(
        "Validating {} against {}",
        args.record.display(),
        args.shape.display()
    ))?;

    let shape = load_shape(&args.shape)?;
    let mut record = Record::new(&shape);
    for (field, value) in load_values(&args.record)? {
        if !shape.fields.iter().any(|f| f.name == field) {
            warn!(field = %field, "Ignoring field not present in shape");
            continue;
        }
        record.set(&field, value)?;
    }

    match validate(&record) {
        Ok(_) => {
            info!("Record is valid");
            output.success("✓ Record matches its shape")?;
            Ok(())
        }
        Err(err) => {
            let found = err.mismatches();
            info!(mismatches = found.len(), "Record is invalid");
            output.error(&format!("✗ {} field(s) do not match their declared type", found.len()))?;
            output.mismatches(found)?;
            Err(err.into())
        }
    }
}

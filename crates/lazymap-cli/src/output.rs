//! Output formatting and display utilities
//!
//! Handles rendering records, field listings and mismatch reports in the
//! human, JSON and YAML formats.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use lazymap_core::FieldMismatch;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::trace;

impl OutputFormat {
    /// Render a serializable value in this format
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(format_human(&serde_json::to_value(value)?)),
        }
    }
}

/// Output writer that handles formatting and display
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer targeting stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom sink
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Writing formatted data");
        self.writeln(formatted.trim_end())
    }

    /// Write a list of mismatched fields
    pub fn mismatches(&mut self, mismatches: &[FieldMismatch]) -> Result<()> {
        if !self.is_human() {
            return self.data(&mismatches);
        }
        for mismatch in mismatches {
            let line = format!("  • {}", mismatch);
            if self.use_color {
                self.writeln(&line.red().to_string())?;
            } else {
                self.writeln(&line)?;
            }
        }
        Ok(())
    }

    /// Write an aligned two-column listing
    pub fn table(&mut self, rows: &[(String, String)]) -> Result<()> {
        let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in rows {
            let key = format!("{:width$}", key, width = width);
            if self.use_color {
                self.writeln(&format!("  {}  {}", key.bold(), value.cyan()))?;
            } else {
                self.writeln(&format!("  {}  {}", key, value))?;
            }
        }
        Ok(())
    }
}

/// Human rendering: objects as `key: value` lines, everything else compact
fn format_human(value: &Value) -> String {
    match value {
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, format_value_compact(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format_value_compact(other),
    }
}

fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

/// In-memory sink shared between a writer under test and its assertions
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Sink(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl Sink {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub(crate) fn writer(&self, format: OutputFormat) -> OutputWriter {
        OutputWriter::with_writer(format, false, false, Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_human_format_lists_fields() {
        let value = json!({"name": "Ada", "age": 36});
        assert_eq!(
            OutputFormat::Human.format(&value).unwrap(),
            "name: \"Ada\"\nage: 36"
        );
    }

    #[test]
    fn test_machine_formats() {
        let value = json!({"age": 36});
        assert_eq!(OutputFormat::Json.format(&value).unwrap(), r#"{"age":36}"#);
        assert_eq!(OutputFormat::Yaml.format(&value).unwrap(), "age: 36\n");
    }

    #[test]
    fn test_quiet_suppresses_info() {
        let sink = Sink::default();
        let mut output =
            OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(sink.clone()));
        output.info("hidden").unwrap();
        output.success("hidden").unwrap();
        output.data(&json!({"shown": true})).unwrap();
        assert_eq!(sink.contents(), "shown: true\n");
    }

    #[test]
    fn test_mismatches_as_json() {
        let sink = Sink::default();
        let mut output = sink.writer(OutputFormat::Json);
        output
            .mismatches(&[FieldMismatch {
                field: "age".to_string(),
                declared: "int".to_string(),
                actual: "string".to_string(),
            }])
            .unwrap();
        let parsed: Value = serde_json::from_str(sink.contents().trim()).unwrap();
        assert_eq!(parsed[0]["field"], "age");
        assert_eq!(parsed[0]["declared"], "int");
    }
}

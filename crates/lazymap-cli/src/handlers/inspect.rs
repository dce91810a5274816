//! Inspect command handler

use super::utils::load_shape;
use crate::cli::InspectArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use lazymap_core::{resolve_type, Destination, Record};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize)]
struct FieldReport {
    name: String,
    #[serde(rename = "type")]
    declared: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShapeReport {
    fields: Vec<FieldReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<String>>,
}

/// Handle the inspect command
#[instrument(skip(_config, output), fields(shape = %args.shape.display()))]
pub fn handle_inspect(args: InspectArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    let shape = load_shape(&args.shape)?;
    let record = Record::new(&shape);

    let report = ShapeReport {
        fields: record
            .fields()
            .into_iter()
            .map(|descriptor| FieldReport {
                declared: resolve_type(&record, &descriptor.name).map(|spec| spec.to_string()),
                name: descriptor.name,
            })
            .collect(),
        columns: record.columns(),
    };

    if output.format() != crate::cli::OutputFormat::Human {
        return output.data(&report);
    }

    output.section(&format!("Fields of {}", args.shape.display()))?;
    let rows: Vec<(String, String)> = report
        .fields
        .iter()
        .map(|field| {
            let declared = field.declared.clone().unwrap_or_else(|| "untyped".to_string());
            (field.name.clone(), declared)
        })
        .collect();
    output.table(&rows)?;

    if let Some(columns) = &report.columns {
        output.section("Columns")?;
        output.writeln(&format!("  {}", columns.join(", ")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::Sink;
    use std::fs;

    fn inspect(shape: &str, format: OutputFormat) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.json");
        fs::write(&path, shape).unwrap();

        let sink = Sink::default();
        let mut output = sink.writer(format);
        handle_inspect(InspectArgs { shape: path }, &Config::default(), &mut output).unwrap();
        sink.contents()
    }

    const SHAPE: &str = r#"{
        "fields": [
            {"name": "id", "type": "integer"},
            {"name": "label", "type": "?str"},
            {"name": "payload"},
            {"name": "owner", "type": "Account|null"}
        ],
        "columns": ["id", "label"]
    }"#;

    #[test]
    fn test_human_listing_normalizes_types() {
        let out = inspect(SHAPE, OutputFormat::Human);
        assert!(out.contains("id       int"));
        assert!(out.contains("label    ?string"));
        assert!(out.contains("payload  untyped"));
        assert!(out.contains("owner    Account|null"));
        assert!(out.contains("id, label"));
    }

    #[test]
    fn test_json_report() {
        let out = inspect(SHAPE, OutputFormat::Json);
        let report: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(report["fields"][0]["type"], "int");
        assert_eq!(report["fields"][2]["type"], serde_json::Value::Null);
        assert_eq!(report["columns"], serde_json::json!(["id", "label"]));
    }
}

//! Transform orchestration: copying a source into a destination
//!
//! The [`Mapper`] walks the destination's fields (or its explicit column
//! list), finds each one in the source by exact, camelCase or snake_case name,
//! casts the value to the field's declared type and assigns it. Explicit
//! field mappings run last and always win.
//!
//! # Example
//!
//! ```
//! use lazymap_core::{copy_from_json, Destination, FieldMappings, Record, Shape};
//!
//! let shape = Shape::new()
//!     .field("age", Some("int"))
//!     .field("userId", Some("int"));
//! let mut record = Record::new(&shape);
//!
//! copy_from_json(r#"{"age": "17", "user_id": 5}"#, &mut record, &FieldMappings::new()).unwrap();
//!
//! assert_eq!(record.get("age"), Some(serde_json::json!(17)));
//! assert_eq!(record.get("userId"), Some(serde_json::json!(5)));
//! ```
//!
//! A failing call is not atomic: fields assigned before the failure keep
//! their new values.
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::cast::cast;
use crate::destination::Destination;
use crate::inspector::FieldIndex;
use crate::source::SourceRecord;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Knobs controlling how fields are matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Look up the camelCase form of a field name
    pub match_camel_case: bool,
    /// Look up the snake_case form of a field name
    pub match_snake_case: bool,
    /// Iterate a destination's column list when it provides one
    pub respect_columns: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            match_camel_case: true,
            match_snake_case: true,
            respect_columns: true,
        }
    }
}

/// Explicit `destination field -> source field` overrides, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMappings {
    pairs: Vec<(String, String)>,
}

impl FieldMappings {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `destination` from `source`, replacing an earlier entry for the same field
    pub fn insert(&mut self, destination: impl Into<String>, source: impl Into<String>) {
        let destination = destination.into();
        let source = source.into();
        match self.pairs.iter_mut().find(|(dest, _)| *dest == destination) {
            Some(pair) => pair.1 = source,
            None => self.pairs.push((destination, source)),
        }
    }

    /// Source field for a destination field
    pub fn get(&self, destination: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(dest, _)| dest == destination)
            .map(|(_, src)| src.as_str())
    }

    /// Iterate `(destination, source)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(d, s)| (d.as_str(), s.as_str()))
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no mappings were given
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<D: Into<String>, S: Into<String>> FromIterator<(D, S)> for FieldMappings {
    fn from_iter<I: IntoIterator<Item = (D, S)>>(iter: I) -> Self {
        let mut mappings = FieldMappings::new();
        for (destination, source) in iter {
            mappings.insert(destination, source);
        }
        mappings
    }
}

/// Type-directed copier
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
}

impl Mapper {
    /// Create a mapper with the given configuration
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Copy `source` into `destination`, casting each value to its field's type
    ///
    /// Fields absent from the source are left untouched.
    pub fn transform<'d, D: Destination + ?Sized>(
        &self,
        source: &SourceRecord,
        destination: &'d mut D,
        mappings: &FieldMappings,
    ) -> Result<&'d mut D> {
        let index = FieldIndex::of(destination);
        let targets: Vec<String> = match destination.columns() {
            Some(columns) if self.config.respect_columns => columns,
            _ => index.names().map(str::to_string).collect(),
        };

        for field in &targets {
            let Some((kind, value)) = source.resolve(field, &self.config) else {
                log::trace!("no source value for '{}'", field);
                continue;
            };
            log::trace!("resolved '{}' by {} match", field, kind);

            let value = cast(index.declared_type(field), value.clone())?;
            destination.set(field, value)?;
        }

        for (field, source_field) in mappings.iter() {
            if !index.contains(field) {
                log::debug!("skipping mapping for unknown destination field '{}'", field);
                continue;
            }
            let Some(value) = source.get(source_field) else {
                log::debug!(
                    "skipping mapping '{}' <- '{}': source field missing",
                    field,
                    source_field
                );
                continue;
            };

            let value = cast(index.declared_type(field), value.clone())?;
            destination.set(field, value)?;
        }

        Ok(destination)
    }

    /// Copy a plain key/value map
    pub fn copy_from_array<'d, D: Destination + ?Sized>(
        &self,
        source: Map<String, Value>,
        destination: &'d mut D,
        mappings: &FieldMappings,
    ) -> Result<&'d mut D> {
        self.transform(&SourceRecord::from_map(source), destination, mappings)
    }

    /// Parse JSON text and copy it
    ///
    /// The destination is untouched when the text is not valid JSON.
    pub fn copy_from_json<'d, D: Destination + ?Sized>(
        &self,
        json: &str,
        destination: &'d mut D,
        mappings: &FieldMappings,
    ) -> Result<&'d mut D> {
        let source = SourceRecord::from_json(json)?;
        self.transform(&source, destination, mappings)
    }

    /// Copy the fields of another destination
    pub fn copy_from_object<'d, S, D>(
        &self,
        source: &S,
        destination: &'d mut D,
        mappings: &FieldMappings,
    ) -> Result<&'d mut D>
    where
        S: Destination + ?Sized,
        D: Destination + ?Sized,
    {
        self.transform(&SourceRecord::from_destination(source), destination, mappings)
    }

    /// Copy any serializable value that serializes to an object or array
    pub fn copy_from_serialize<'d, T, D>(
        &self,
        source: &T,
        destination: &'d mut D,
        mappings: &FieldMappings,
    ) -> Result<&'d mut D>
    where
        T: Serialize + ?Sized,
        D: Destination + ?Sized,
    {
        let source = SourceRecord::from_serialize(source)?;
        self.transform(&source, destination, mappings)
    }
}

/// [`Mapper::transform`] with the default configuration
pub fn transform<'d, D: Destination + ?Sized>(
    source: &SourceRecord,
    destination: &'d mut D,
    mappings: &FieldMappings,
) -> Result<&'d mut D> {
    Mapper::default().transform(source, destination, mappings)
}

/// [`Mapper::copy_from_array`] with the default configuration
pub fn copy_from_array<'d, D: Destination + ?Sized>(
    source: Map<String, Value>,
    destination: &'d mut D,
    mappings: &FieldMappings,
) -> Result<&'d mut D> {
    Mapper::default().copy_from_array(source, destination, mappings)
}

/// [`Mapper::copy_from_json`] with the default configuration
pub fn copy_from_json<'d, D: Destination + ?Sized>(
    json: &str,
    destination: &'d mut D,
    mappings: &FieldMappings,
) -> Result<&'d mut D> {
    Mapper::default().copy_from_json(json, destination, mappings)
}

/// [`Mapper::copy_from_object`] with the default configuration
pub fn copy_from_object<'d, S, D>(
    source: &S,
    destination: &'d mut D,
    mappings: &FieldMappings,
) -> Result<&'d mut D>
where
    S: Destination + ?Sized,
    D: Destination + ?Sized,
{
    Mapper::default().copy_from_object(source, destination, mappings)
}

/// [`Mapper::copy_from_serialize`] with the default configuration
pub fn copy_from_serialize<'d, T, D>(
    source: &T,
    destination: &'d mut D,
    mappings: &FieldMappings,
) -> Result<&'d mut D>
where
    T: Serialize + ?Sized,
    D: Destination + ?Sized,
{
    Mapper::default().copy_from_serialize(source, destination, mappings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{Record, Shape};
    use crate::Error;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_transform_casts_by_declared_type() {
        let mut record = Record::new(
            &Shape::new()
                .field("age", Some("int"))
                .field("score", Some("float"))
                .field("active", Some("bool"))
                .field("label", Some("string"))
                .field("raw", None),
        );
        let source = object(json!({
            "age": "17",
            "score": 3,
            "active": 1,
            "label": 42,
            "raw": [1, "x"],
        }));

        copy_from_array(source, &mut record, &FieldMappings::new()).unwrap();

        assert_eq!(record.get("age"), Some(json!(17)));
        assert_eq!(record.get("score"), Some(json!(3.0)));
        assert_eq!(record.get("active"), Some(json!(true)));
        assert_eq!(record.get("label"), Some(json!("42")));
        assert_eq!(record.get("raw"), Some(json!([1, "x"])));
    }

    #[test]
    fn test_missing_fields_are_left_unchanged() {
        let shape: Shape = serde_json::from_value(json!({
            "fields": [
                {"name": "kept", "type": "int", "default": 9},
                {"name": "set", "type": "int"}
            ]
        }))
        .unwrap();
        let mut record = Record::new(&shape);

        copy_from_json(r#"{"set": 1}"#, &mut record, &FieldMappings::new()).unwrap();

        assert_eq!(record.get("kept"), Some(json!(9)));
        assert_eq!(record.get("set"), Some(json!(1)));
    }

    #[test]
    fn test_columns_restrict_and_order_fields() {
        let mut record = Record::new(
            &Shape::new()
                .field("a", Some("int"))
                .field("b", Some("int"))
                .with_columns(["b"]),
        );

        copy_from_json(r#"{"a": 1, "b": 2}"#, &mut record, &FieldMappings::new()).unwrap();

        assert_eq!(record.get("a"), None);
        assert_eq!(record.get("b"), Some(json!(2)));
    }

    #[test]
    fn test_columns_can_be_ignored_by_config() {
        let mapper = Mapper::new(MapperConfig {
            respect_columns: false,
            ..MapperConfig::default()
        });
        let mut record = Record::new(
            &Shape::new()
                .field("a", Some("int"))
                .field("b", Some("int"))
                .with_columns(["b"]),
        );

        mapper
            .copy_from_json(r#"{"a": 1, "b": 2}"#, &mut record, &FieldMappings::new())
            .unwrap();

        assert_eq!(record.get("a"), Some(json!(1)));
    }

    #[test]
    fn test_mapping_overrides_automatic_match() {
        let mut record = Record::new(&Shape::new().field("x", Some("int")));
        let mappings: FieldMappings = [("x", "b")].into_iter().collect();

        copy_from_json(r#"{"x": 1, "a": 1, "b": "2"}"#, &mut record, &mappings).unwrap();

        assert_eq!(record.get("x"), Some(json!(2)));
    }

    #[test]
    fn test_mapping_with_missing_side_is_skipped() {
        let mut record = Record::new(&Shape::new().field("x", Some("int")));
        let mappings: FieldMappings = [("x", "nope"), ("y", "x")].into_iter().collect();

        copy_from_json(r#"{"x": 1}"#, &mut record, &mappings).unwrap();

        assert_eq!(record.get("x"), Some(json!(1)));
        assert_eq!(record.get("y"), None);
    }

    #[test]
    fn test_malformed_json_leaves_destination_untouched() {
        let mut record = Record::new(&Shape::new().field("age", Some("int")));
        let err = copy_from_json("{age: 17", &mut record, &FieldMappings::new()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(record.get("age"), None);
    }

    #[test]
    fn test_union_failure_propagates_after_partial_writes() {
        let mut record = Record::new(
            &Shape::new()
                .field("first", Some("int"))
                .field("second", Some("int|bool")),
        );

        let err = copy_from_json(
            r#"{"first": "3", "second": "nope"}"#,
            &mut record,
            &FieldMappings::new(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Cast { .. }));
        assert_eq!(record.get("first"), Some(json!(3)));
        assert_eq!(record.get("second"), None);
    }

    #[test]
    fn test_copy_from_object() {
        let mut source = Record::new(&Shape::new().field("user_id", None));
        source.set("user_id", json!("8")).unwrap();
        let mut target = Record::new(&Shape::new().field("userId", Some("int")));

        copy_from_object(&source, &mut target, &FieldMappings::new()).unwrap();

        assert_eq!(target.get("userId"), Some(json!(8)));
    }

    #[test]
    fn test_field_mappings_insert_replaces() {
        let mut mappings = FieldMappings::new();
        assert!(mappings.is_empty());
        mappings.insert("x", "a");
        mappings.insert("x", "b");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings.get("x"), Some("b"));
        assert!(!mappings.is_empty());
    }
}

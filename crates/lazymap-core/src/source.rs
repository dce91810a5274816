//! Normalized mapping sources
//!
//! Every input shape (plain map, JSON text, another destination, or any
//! serializable value) is normalized into a [`SourceRecord`] before a
//! transform runs.
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::compat::runtime_type;
use crate::destination::Destination;
use crate::mapper::MapperConfig;
use crate::{Error, Result};
use convert_case::{Boundary, Case, Casing};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Digits stay attached to the word before them (`line2Text` -> `line2_text`)
const DIGIT_JOINS: [Boundary; 3] = [
    Boundary::LowerDigit,
    Boundary::UpperDigit,
    Boundary::DigitLower,
];

fn case_variant(field: &str, case: Case<'_>) -> String {
    field.remove_boundaries(&DIGIT_JOINS).to_case(case)
}

/// How a destination field was found in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Same name
    Exact,
    /// camelCase form of the field name
    CamelCase,
    /// snake_case form of the field name
    SnakeCase,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::CamelCase => write!(f, "camelCase"),
            MatchKind::SnakeCase => write!(f, "snake_case"),
        }
    }
}

/// Key/value view of a mapping input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecord {
    values: Map<String, Value>,
}

impl SourceRecord {
    /// Wrap a plain key/value map
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Normalize a structured value
    ///
    /// Objects are used as-is; arrays are keyed by index.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Array(items) => Ok(Self {
                values: items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
            }),
            other => Err(Error::UnsupportedSource {
                actual: runtime_type(&other).to_string(),
            }),
        }
    }

    /// Parse JSON text into a source
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Read every field of another destination
    ///
    /// Unset fields are left out.
    pub fn from_destination<D: Destination + ?Sized>(object: &D) -> Self {
        let values = object
            .fields()
            .into_iter()
            .filter_map(|descriptor| {
                object
                    .get(&descriptor.name)
                    .map(|value| (descriptor.name, value))
            })
            .collect();
        Self { values }
    }

    /// Serialize a value and normalize the result
    pub fn from_serialize<T: Serialize + ?Sized>(object: &T) -> Result<Self> {
        let value = serde_json::to_value(object).map_err(Error::serialization)?;
        Self::from_value(value)
    }

    /// Value stored under exactly `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Find the value for a destination field
    ///
    /// Tries the exact name, then its camelCase and snake_case forms when
    /// enabled in `config`.
    pub fn resolve(&self, field: &str, config: &MapperConfig) -> Option<(MatchKind, &Value)> {
        if let Some(value) = self.values.get(field) {
            return Some((MatchKind::Exact, value));
        }
        if config.match_camel_case {
            if let Some(value) = self.values.get(&case_variant(field, Case::Camel)) {
                return Some((MatchKind::CamelCase, value));
            }
        }
        if config.match_snake_case {
            if let Some(value) = self.values.get(&case_variant(field, Case::Snake)) {
                return Some((MatchKind::SnakeCase, value));
            }
        }
        None
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the source has no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for SourceRecord {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}

//! Error types for the Lazymap core library
//!
//! This module defines the error taxonomy for mapping operations, using
//! thiserror for ergonomic error definitions. Soft failures (unparseable type
//! declarations, missing source fields) never surface here; they degrade to
//! passthrough inside the mapper.
//!
//! A failing call may leave its destination partially mutated: fields
//! processed before the failing one keep their new values.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Main error type for Lazymap operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed JSON handed to a JSON entry point
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized into a mapping source
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A structured input that is neither an object nor an array
    #[error("Unsupported source: expected an object or array, got {actual}")]
    UnsupportedSource { actual: String },

    /// A value matched none of the members of a union type
    #[error(
        "Cast error: cannot cast {actual} value {value} to any of [{}]",
        candidates.join(", ")
    )]
    Cast {
        actual: String,
        candidates: Vec<String>,
        value: String,
    },

    /// A field's current value does not fit its declared type
    #[error(
        "Validation error: field '{field}' declared as {declared} holds {actual}{}",
        more_mismatches(mismatches)
    )]
    Validation {
        field: String,
        declared: String,
        actual: String,
        mismatches: Vec<FieldMismatch>,
    },

    /// A destination rejected an assignment
    #[error("Assignment to field '{field}' failed: {message}")]
    Assignment {
        field: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Strict parsing of a type declaration failed
    #[error("Invalid type declaration '{declaration}': {message}")]
    Type {
        declaration: String,
        message: String,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// One field whose value is incompatible with its declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    /// Field name
    pub field: String,
    /// Declared type, rendered in declaration syntax
    pub declared: String,
    /// Runtime type of the current value
    pub actual: String,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.field, self.declared, self.actual
        )
    }
}

fn more_mismatches(mismatches: &[FieldMismatch]) -> String {
    match mismatches.len() {
        0 | 1 => String::new(),
        n => format!(" (and {} more mismatched field(s))", n - 1),
    }
}

impl Error {
    /// Build an assignment error without an underlying cause
    pub fn assignment(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Assignment {
            field: field.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a failure to serialize a source value
    pub fn serialization(source: serde_json::Error) -> Self {
        Error::Serialization {
            message: source.to_string(),
            source,
        }
    }

    /// Every mismatch carried by a validation error, empty for other kinds
    pub fn mismatches(&self) -> &[FieldMismatch] {
        match self {
            Error::Validation { mismatches, .. } => mismatches,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse {
            message: err.to_string(),
            source: err,
        }
    }
}

//! Checking a destination's current values against its declared types
//!
//! Validation collects every mismatched field; the returned error is headed
//! by the first mismatch in field order and carries the full list.
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::compat::{runtime_type, value_fits};
use crate::destination::Destination;
use crate::error::FieldMismatch;
use crate::inspector::FieldIndex;
use crate::{Error, Result};
use serde_json::Value;

/// Every field whose current value does not fit its declared type
///
/// Untyped fields are skipped; unset fields are checked as `null`.
pub fn mismatches<D: Destination + ?Sized>(object: &D) -> Vec<FieldMismatch> {
    let index = FieldIndex::of(object);

    index
        .iter()
        .filter_map(|descriptor| {
            let declared = descriptor.declared_type.as_ref()?;
            let value = object.get(&descriptor.name).unwrap_or(Value::Null);
            if value_fits(&value, declared) {
                None
            } else {
                Some(FieldMismatch {
                    field: descriptor.name.clone(),
                    declared: declared.to_string(),
                    actual: runtime_type(&value).to_string(),
                })
            }
        })
        .collect()
}

/// Validate every field of `object`
///
/// Returns `Ok(true)` when every typed field holds a compatible value.
pub fn validate<D: Destination + ?Sized>(object: &D) -> Result<bool> {
    let found = mismatches(object);
    let Some(first) = found.first().cloned() else {
        return Ok(true);
    };

    log::debug!("validation found {} mismatched field(s)", found.len());
    Err(Error::Validation {
        field: first.field,
        declared: first.declared,
        actual: first.actual,
        mismatches: found,
    })
}

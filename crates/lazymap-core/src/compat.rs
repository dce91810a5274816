//! Compatibility rules between runtime values and declared types
//!
//! These checks are pure and shared by the caster (to pick a union member) and
//! the validator (to check values already stored on a destination).
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::types::{is_builtin, normalize_type_name, TypeSpec};
use serde_json::Value;

/// Runtime type name of a value
pub fn runtime_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decide whether a value of `source_type` can be coerced into `target_type`
///
/// Rules, first match wins:
/// 1. same name after synonym normalization
/// 2. `int` widens to `float`
/// 3. `float` narrows to `int` only when the value has no fractional part
/// 4. `null` fits a target literally named `null` (or `mixed`)
/// 5. `object` fits `object` and any class-like (non-builtin) name
/// 6. anything fits `mixed`
pub fn is_compatible(source_type: &str, target_type: &str, value: &Value) -> bool {
    let source = normalize_type_name(source_type);
    let target = normalize_type_name(target_type);

    if source == target || target == "mixed" {
        return true;
    }

    match (source.as_str(), target.as_str()) {
        ("int", "float") => true,
        ("float", "int") => value
            .as_f64()
            .is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        ("array" | "object", "iterable") => true,
        ("object", class) => !is_builtin(class),
        _ => false,
    }
}

/// Whether a value fits a declared type
///
/// Nullable types and unions containing `null` accept a null value; a union
/// accepts a value when any of its members does.
pub fn value_fits(value: &Value, target: &TypeSpec) -> bool {
    match target {
        TypeSpec::Unit(name) => is_compatible(runtime_type(value), name, value),
        TypeSpec::Nullable(inner) => value.is_null() || value_fits(value, inner),
        TypeSpec::Union(members) => members.iter().any(|member| value_fits(value, member)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_runtime_type() {
        assert_eq!(runtime_type(&json!(null)), "null");
        assert_eq!(runtime_type(&json!(true)), "bool");
        assert_eq!(runtime_type(&json!(3)), "int");
        assert_eq!(runtime_type(&json!(u64::MAX)), "int");
        assert_eq!(runtime_type(&json!(3.0)), "float");
        assert_eq!(runtime_type(&json!("3")), "string");
        assert_eq!(runtime_type(&json!([3])), "array");
        assert_eq!(runtime_type(&json!({"a": 3})), "object");
    }

    #[test]
    fn test_exact_match_uses_synonyms() {
        assert!(is_compatible("integer", "int", &json!(1)));
        assert!(is_compatible("double", "float", &json!(1.5)));
        assert!(is_compatible("boolean", "bool", &json!(true)));
    }

    #[test]
    fn test_numeric_widening_and_narrowing() {
        assert!(is_compatible("int", "float", &json!(4)));
        assert!(is_compatible("float", "int", &json!(4.0)));
        assert!(!is_compatible("float", "int", &json!(4.5)));
    }

    #[test]
    fn test_null_and_mixed() {
        assert!(is_compatible("null", "null", &json!(null)));
        assert!(is_compatible("null", "mixed", &json!(null)));
        assert!(is_compatible("string", "any", &json!("x")));
        assert!(!is_compatible("null", "int", &json!(null)));
    }

    #[test]
    fn test_objects() {
        let value = json!({"street": "Main"});
        assert!(is_compatible("object", "object", &value));
        assert!(is_compatible("object", "Address", &value));
        assert!(is_compatible("object", "iterable", &value));
        assert!(!is_compatible("object", "string", &value));
        assert!(!is_compatible("array", "Address", &json!([])));
    }

    #[test]
    fn test_incompatible_by_default() {
        assert!(!is_compatible("string", "int", &json!("17")));
        assert!(!is_compatible("bool", "int", &json!(true)));
        assert!(!is_compatible("int", "string", &json!(17)));
    }

    #[test]
    fn test_value_fits_type_specs() {
        let nullable = TypeSpec::parse("?int").unwrap();
        assert!(value_fits(&json!(null), &nullable));
        assert!(value_fits(&json!(2), &nullable));
        assert!(!value_fits(&json!("2"), &nullable));

        let union = TypeSpec::parse("int|null").unwrap();
        assert!(value_fits(&json!(null), &union));
        assert!(!value_fits(&json!([]), &union));
    }
}

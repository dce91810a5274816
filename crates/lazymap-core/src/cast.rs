//! Value coercion driven by declared types
//!
//! Primitive targets always coerce, unknown targets pass values through, and
//! only an exhausted union is an error.
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::compat::{runtime_type, value_fits};
use crate::types::{is_builtin, TypeSpec};
use crate::{Error, Result};
use serde_json::{Map, Number, Value};

/// Cast a value into a declared type
///
/// An untyped target (`None`) returns the value unchanged.
pub fn cast(target: Option<&TypeSpec>, value: Value) -> Result<Value> {
    match target {
        None => Ok(value),
        Some(spec) => cast_spec(spec, value),
    }
}

fn cast_spec(target: &TypeSpec, value: Value) -> Result<Value> {
    match target {
        TypeSpec::Unit(name) => Ok(cast_unit(name, value)),
        TypeSpec::Nullable(inner) => {
            if value.is_null() {
                Ok(Value::Null)
            } else {
                cast_spec(inner, value)
            }
        }
        TypeSpec::Union(members) => {
            // First compatible member wins, in declaration order
            match members.iter().find(|member| value_fits(&value, member)) {
                Some(member) => cast_spec(member, value),
                None => Err(Error::Cast {
                    actual: runtime_type(&value).to_string(),
                    candidates: members.iter().map(ToString::to_string).collect(),
                    value: value.to_string(),
                }),
            }
        }
    }
}

/// Coerce a value into a single named type
pub fn cast_unit(name: &str, value: Value) -> Value {
    match name {
        "int" => to_int(value),
        "float" => to_float(&value),
        "bool" => Value::Bool(truthy(&value)),
        "string" => Value::String(to_text(value)),
        "array" => to_array(value),
        "iterable" => match value {
            Value::Array(_) | Value::Object(_) => value,
            other => to_array(other),
        },
        "object" => to_object(value),
        "null" => Value::Null,
        "mixed" => value,
        other => {
            if !is_builtin(other) {
                log::debug!("passing {} value through for type '{}'", runtime_type(&value), other);
            }
            value
        }
    }
}

/// Longest numeric prefix of a string, ignoring leading whitespace
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac > end + 1 || has_digits {
            has_digits = has_digits || frac > end + 1;
            end = frac;
        }
    }
    if !has_digits {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }

    &s[..end]
}

fn parse_float(s: &str) -> f64 {
    numeric_prefix(s).parse::<f64>().unwrap_or(0.0)
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or_else(|| Value::from(0.0))
}

fn truncate(f: f64) -> Value {
    if f.is_finite() {
        // `as` saturates at the i64 bounds
        Value::from(f.trunc() as i64)
    } else {
        Value::from(0)
    }
}

fn to_int(value: Value) -> Value {
    match value {
        Value::Null => Value::from(0),
        Value::Bool(b) => Value::from(i64::from(b)),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Value::Number(n)
            } else {
                truncate(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => {
            let prefix = numeric_prefix(&s);
            match prefix.parse::<i64>() {
                Ok(i) => Value::from(i),
                Err(_) => truncate(parse_float(prefix)),
            }
        }
        Value::Array(items) => Value::from(i64::from(!items.is_empty())),
        Value::Object(map) => Value::from(i64::from(!map.is_empty())),
    }
}

fn to_float(value: &Value) -> Value {
    let f = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float(s),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(map) => f64::from(u8::from(!map.is_empty())),
    };
    float_value(f)
}

/// Truthiness used by `bool` coercion
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn to_array(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Object(map) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
        Value::Null => Value::Array(Vec::new()),
        scalar => Value::Array(vec![scalar]),
    }
}

fn to_object(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        Value::Array(items) => Value::Object(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        ),
        Value::Null => Value::Object(Map::new()),
        scalar => {
            let mut map = Map::new();
            map.insert("scalar".to_string(), scalar);
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(declaration: &str) -> TypeSpec {
        TypeSpec::parse(declaration).unwrap()
    }

    #[test]
    fn test_untyped_is_identity() {
        let value = json!({"nested": [1, "two"]});
        assert_eq!(cast(None, value.clone()).unwrap(), value);
    }

    #[test]
    fn test_int_coercion() {
        let int = spec("int");
        assert_eq!(cast(Some(&int), json!("17")).unwrap(), json!(17));
        assert_eq!(cast(Some(&int), json!(" 42abc")).unwrap(), json!(42));
        assert_eq!(cast(Some(&int), json!("abc")).unwrap(), json!(0));
        assert_eq!(cast(Some(&int), json!(7.9)).unwrap(), json!(7));
        assert_eq!(cast(Some(&int), json!(-7.9)).unwrap(), json!(-7));
        assert_eq!(cast(Some(&int), json!(true)).unwrap(), json!(1));
        assert_eq!(cast(Some(&int), json!(null)).unwrap(), json!(0));
        assert_eq!(cast(Some(&int), json!("1e3")).unwrap(), json!(1000));
    }

    #[test]
    fn test_float_coercion() {
        let float = spec("double");
        assert_eq!(cast(Some(&float), json!(2)).unwrap(), json!(2.0));
        assert_eq!(cast(Some(&float), json!("2.5kg")).unwrap(), json!(2.5));
        assert_eq!(cast(Some(&float), json!(".5")).unwrap(), json!(0.5));
    }

    #[test]
    fn test_bool_coercion() {
        let boolean = spec("bool");
        for falsy in [json!(0), json!(""), json!("0"), json!([]), json!(null), json!(0.0)] {
            assert_eq!(cast(Some(&boolean), falsy).unwrap(), json!(false));
        }
        for truthy in [json!(1), json!("false"), json!([0]), json!(-0.5)] {
            assert_eq!(cast(Some(&boolean), truthy).unwrap(), json!(true));
        }
    }

    #[test]
    fn test_string_coercion() {
        let string = spec("string");
        assert_eq!(cast(Some(&string), json!(42)).unwrap(), json!("42"));
        assert_eq!(cast(Some(&string), json!(true)).unwrap(), json!("true"));
        assert_eq!(cast(Some(&string), json!(1.5)).unwrap(), json!("1.5"));
        assert_eq!(cast(Some(&string), json!(null)).unwrap(), json!(""));
        assert_eq!(cast(Some(&string), json!([1, 2])).unwrap(), json!("[1,2]"));
    }

    #[test]
    fn test_container_coercion() {
        assert_eq!(cast(Some(&spec("array")), json!(5)).unwrap(), json!([5]));
        assert_eq!(cast(Some(&spec("array")), json!({"a": 1, "b": 2})).unwrap(), json!([1, 2]));
        assert_eq!(cast(Some(&spec("object")), json!(["x"])).unwrap(), json!({"0": "x"}));
        assert_eq!(cast(Some(&spec("object")), json!(5)).unwrap(), json!({"scalar": 5}));
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let value = json!({"street": "Main"});
        assert_eq!(cast(Some(&spec("Address")), value.clone()).unwrap(), value);
        assert_eq!(cast(Some(&spec("mixed")), json!(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_nullable_keeps_null() {
        assert_eq!(cast(Some(&spec("?int")), json!(null)).unwrap(), json!(null));
        assert_eq!(cast(Some(&spec("?int")), json!("5")).unwrap(), json!(5));
    }

    #[test]
    fn test_union_first_compatible_member_wins() {
        // 1.5 is not integral, so `int` is skipped
        assert_eq!(cast(Some(&spec("int|float")), json!(1.5)).unwrap(), json!(1.5));
        assert_eq!(cast(Some(&spec("int|float")), json!(2.0)).unwrap(), json!(2));
        assert_eq!(cast(Some(&spec("float|int")), json!(2)).unwrap(), json!(2.0));
        assert_eq!(cast(Some(&spec("int|null")), json!(null)).unwrap(), json!(null));
    }

    #[test]
    fn test_union_exhaustion_is_cast_error() {
        let err = cast(Some(&spec("int|bool")), json!("yes")).unwrap_err();
        match err {
            Error::Cast { actual, candidates, .. } => {
                assert_eq!(actual, "string");
                assert_eq!(candidates, vec!["int".to_string(), "bool".to_string()]);
            }
            other => panic!("expected cast error, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_float_does_not_fit_int_or_string() {
        let err = cast(Some(&spec("int|string")), json!(1.5)).unwrap_err();
        match err {
            Error::Cast { actual, candidates, value } => {
                assert_eq!(actual, "float");
                assert_eq!(candidates, vec!["int".to_string(), "string".to_string()]);
                assert_eq!(value, "1.5");
            }
            other => panic!("expected cast error, got {other:?}"),
        }
    }
}

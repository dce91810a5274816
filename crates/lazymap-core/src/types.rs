//! Declared type model for destination fields
//!
//! A [`TypeSpec`] is the parsed form of a field's type declaration. Declarations
//! use a compact syntax: `int`, `?string` (nullable) and `int|string|null`
//! (union, tried in declaration order).
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Builtin type names every other component understands
pub const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "bool", "string", "array", "object", "iterable", "mixed", "null",
];

/// A declared field type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum TypeSpec {
    /// A single named type
    Unit(String),
    /// A type that also accepts absence of a value
    Nullable(Box<TypeSpec>),
    /// Two or more member types, in declaration order
    Union(Vec<TypeSpec>),
}

/// Metadata describing one settable field of a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as exposed by the destination
    pub name: String,
    /// Declared type, `None` for untyped fields
    pub declared_type: Option<TypeSpec>,
}

impl FieldDescriptor {
    /// Describe a field from its raw declaration
    ///
    /// Unparseable declarations produce an untyped descriptor.
    pub fn new(name: impl Into<String>, declaration: Option<&str>) -> Self {
        Self {
            name: name.into(),
            declared_type: declaration.and_then(TypeSpec::parse),
        }
    }

    /// Describe a field that accepts any value
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
        }
    }
}

/// Map runtime and declaration synonyms onto their canonical name
///
/// Names that are not builtin (class-like names) keep their original case.
pub fn normalize_type_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let canonical = match lower.as_str() {
        "integer" | "long" => "int",
        "double" | "real" | "number" => "float",
        "boolean" => "bool",
        "str" => "string",
        "list" => "array",
        "any" => "mixed",
        other => other,
    };

    if BUILTIN_TYPES.contains(&canonical) {
        canonical.to_string()
    } else {
        name.to_string()
    }
}

/// Whether a canonical name is one of the builtin types
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn parse_unit(part: &str) -> Option<TypeSpec> {
    let part = part.trim();
    is_type_name(part).then(|| TypeSpec::Unit(normalize_type_name(part)))
}

impl TypeSpec {
    /// Parse a declaration, returning `None` when it cannot be understood
    ///
    /// Parsing never fails loudly: callers treat `None` as "accept any value".
    pub fn parse(declaration: &str) -> Option<TypeSpec> {
        let declaration = declaration.trim();

        let spec = if declaration.contains('|') {
            let members = declaration
                .split('|')
                .map(parse_unit)
                .collect::<Option<Vec<_>>>();
            match members {
                Some(members) if members.len() >= 2 => Some(TypeSpec::Union(members)),
                _ => None,
            }
        } else if let Some(inner) = declaration.strip_prefix('?') {
            parse_unit(inner).map(|unit| TypeSpec::Nullable(Box::new(unit)))
        } else {
            parse_unit(declaration)
        };

        if spec.is_none() {
            log::debug!("ignoring unparseable type declaration '{}'", declaration);
        }
        spec
    }

    /// Shorthand for a unit type with a normalized name
    pub fn unit(name: &str) -> Self {
        TypeSpec::Unit(normalize_type_name(name))
    }

    /// Whether this type admits a null value
    pub fn accepts_null(&self) -> bool {
        match self {
            TypeSpec::Unit(name) => name == "null" || name == "mixed",
            TypeSpec::Nullable(_) => true,
            TypeSpec::Union(members) => members.iter().any(TypeSpec::accepts_null),
        }
    }

    /// Members in try order; a non-union type is its own single member
    pub fn members(&self) -> &[TypeSpec] {
        match self {
            TypeSpec::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Unit(name) => write!(f, "{}", name),
            TypeSpec::Nullable(inner) => write!(f, "?{}", inner),
            TypeSpec::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for TypeSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TypeSpec::parse(s).ok_or_else(|| Error::Type {
            declaration: s.to_string(),
            message: "expected `name`, `?name` or `name|name[|...]`".to_string(),
        })
    }
}

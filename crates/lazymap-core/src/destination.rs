//! Destinations: objects the mapper can populate by field name
//!
//! Instead of runtime reflection, every destination exposes a descriptor
//! table: the ordered list of its settable fields with their declared types,
//! plus by-name accessors. Static Rust structs get one through
//! [`destination!`](crate::destination!), which builds a [`FieldTable`] once
//! per type; shapes only known at runtime use [`Record`].
//!
//! Copyright (c) 2025 Lazymap Team
//! Licensed under the Apache-2.0 license

use crate::types::{FieldDescriptor, TypeSpec};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// An object whose fields can be read and assigned by name
pub trait Destination {
    /// Publicly settable fields, in declaration order
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Current value of a field, `None` when unknown or unset
    fn get(&self, field: &str) -> Option<Value>;

    /// Assign a value to a field
    fn set(&mut self, field: &str, value: Value) -> Result<()>;

    /// Explicit ordered subset of fields to populate
    ///
    /// When present this replaces iteration over [`Destination::fields`].
    fn columns(&self) -> Option<Vec<String>> {
        None
    }

    /// Declared type of a single field
    fn declared_type(&self, field: &str) -> Option<TypeSpec> {
        self.fields()
            .into_iter()
            .find(|descriptor| descriptor.name == field)
            .and_then(|descriptor| descriptor.declared_type)
    }
}

/// Reads a field off a destination
pub type Getter<T> = fn(&T) -> Value;

/// Writes a cast value into a destination field
pub type Setter<T> = fn(&mut T, Value) -> Result<()>;

struct FieldEntry<T> {
    descriptor: FieldDescriptor,
    get: Getter<T>,
    set: Setter<T>,
}

/// Descriptor table for a static destination type
///
/// Declarations are parsed once when the table is built.
pub struct FieldTable<T> {
    entries: Vec<FieldEntry<T>>,
    columns: Option<Vec<String>>,
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            columns: None,
        }
    }

    /// Register a field with its declaration and accessors
    pub fn field(
        mut self,
        name: &str,
        declaration: Option<&str>,
        get: Getter<T>,
        set: Setter<T>,
    ) -> Self {
        self.entries.push(FieldEntry {
            descriptor: FieldDescriptor::new(name, declaration),
            get,
            set,
        });
        self
    }

    /// Declare an explicit column list for every instance of the type
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Descriptors of every registered field
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.entries.iter().map(|entry| entry.descriptor.clone()).collect()
    }

    /// Column list, if one was declared
    pub fn column_list(&self) -> Option<Vec<String>> {
        self.columns.clone()
    }

    fn entry(&self, name: &str) -> Option<&FieldEntry<T>> {
        self.entries.iter().find(|entry| entry.descriptor.name == name)
    }

    /// Read a field from `target`
    pub fn get(&self, target: &T, name: &str) -> Option<Value> {
        self.entry(name).map(|entry| (entry.get)(target))
    }

    /// Assign a field on `target`
    pub fn set(&self, target: &mut T, name: &str, value: Value) -> Result<()> {
        match self.entry(name) {
            Some(entry) => (entry.set)(target, value),
            None => Err(Error::assignment(name, "unknown field")),
        }
    }
}

/// Types that carry a build-once [`FieldTable`]
pub trait Described: Sized + 'static {
    /// The shared table for this type
    fn field_table() -> &'static FieldTable<Self>;
}

/// Serialize a struct field into a runtime value
pub fn read<V: Serialize>(slot: &V) -> Value {
    serde_json::to_value(slot).unwrap_or(Value::Null)
}

/// Deserialize a runtime value into a struct field
pub fn assign<V: DeserializeOwned>(field: &str, slot: &mut V, value: Value) -> Result<()> {
    *slot = serde_json::from_value(value).map_err(|e| Error::Assignment {
        field: field.to_string(),
        message: e.to_string(),
        source: Some(e.into()),
    })?;
    Ok(())
}

/// Implement [`Destination`] for a struct through a [`FieldTable`]
///
/// ```
/// use lazymap_core::{destination, Destination};
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     user_id: Option<i64>,
///     notes: serde_json::Value,
/// }
///
/// destination! {
///     User {
///         "id" => id: "int",
///         "userId" => user_id: "?int",
///         "notes" => notes,
///     }
/// }
///
/// let user = User::default();
/// assert_eq!(user.fields().len(), 3);
/// ```
#[macro_export]
macro_rules! destination {
    (
        $ty:ty {
            $( $name:literal => $field:ident $( : $decl:literal )? ),* $(,)?
        }
        $( columns: [ $( $column:literal ),* $(,)? ] )?
    ) => {
        impl $crate::Described for $ty {
            fn field_table() -> &'static $crate::FieldTable<Self> {
                static TABLE: ::std::sync::OnceLock<$crate::FieldTable<$ty>> =
                    ::std::sync::OnceLock::new();
                TABLE.get_or_init(|| {
                    $crate::FieldTable::new()
                        $(
                            .field(
                                $name,
                                ::std::option::Option::<&str>::None $( .or(Some($decl)) )?,
                                |target: &$ty| $crate::destination::read(&target.$field),
                                |target: &mut $ty, value| {
                                    $crate::destination::assign($name, &mut target.$field, value)
                                },
                            )
                        )*
                        $( .with_columns([ $( $column ),* ]) )?
                })
            }
        }

        impl $crate::Destination for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::FieldDescriptor> {
                <Self as $crate::Described>::field_table().descriptors()
            }

            fn get(&self, field: &str) -> ::std::option::Option<$crate::Value> {
                <Self as $crate::Described>::field_table().get(self, field)
            }

            fn set(&mut self, field: &str, value: $crate::Value) -> $crate::Result<()> {
                <Self as $crate::Described>::field_table().set(self, field, value)
            }

            fn columns(&self) -> ::std::option::Option<::std::vec::Vec<::std::string::String>> {
                <Self as $crate::Described>::field_table().column_list()
            }
        }
    };
}

/// One field of a runtime shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeField {
    /// Field name
    pub name: String,
    /// Raw type declaration, absent for untyped fields
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,
    /// Initial value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Field layout for a [`Record`], usually loaded from JSON or YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Fields in declaration order
    pub fields: Vec<ShapeField>,
    /// Optional column list overriding full-field iteration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl Shape {
    /// Start an empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn field(mut self, name: impl Into<String>, declaration: Option<&str>) -> Self {
        self.fields.push(ShapeField {
            name: name.into(),
            declaration: declaration.map(str::to_string),
            default: None,
        });
        self
    }

    /// Restrict population to an explicit ordered column list
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// A destination whose fields are described at runtime
///
/// Unset fields are absent and serialize to nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    descriptors: Vec<FieldDescriptor>,
    columns: Option<Vec<String>>,
    values: Map<String, Value>,
}

impl Record {
    /// Build an empty record from a shape
    pub fn new(shape: &Shape) -> Self {
        let descriptors = shape
            .fields
            .iter()
            .map(|field| FieldDescriptor::new(field.name.clone(), field.declaration.as_deref()))
            .collect();
        let values = shape
            .fields
            .iter()
            .filter_map(|field| field.default.clone().map(|value| (field.name.clone(), value)))
            .collect();

        Self {
            descriptors,
            columns: shape.columns.clone(),
            values,
        }
    }

    /// Current values of the populated fields
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume the record, returning its values
    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }

    fn has_field(&self, field: &str) -> bool {
        self.descriptors.iter().any(|descriptor| descriptor.name == field)
    }
}

impl Destination for Record {
    fn fields(&self) -> Vec<FieldDescriptor> {
        self.descriptors.clone()
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.values.get(field).cloned()
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        if !self.has_field(field) {
            return Err(Error::assignment(field, "unknown field"));
        }
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    fn columns(&self) -> Option<Vec<String>> {
        self.columns.clone()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

//! Lazymap Core - Type-directed object mapping
//!
//! This crate copies values from a loosely structured source (a key/value map,
//! JSON text, or another object) into a destination whose fields carry
//! declared types, coercing each value on the way in.
//!
//! # Main Components
//!
//! - **Type model**: [`TypeSpec`] declarations (`int`, `?string`, `int|string`)
//! - **Compatibility**: [`is_compatible`], the single rule set shared by
//!   casting and validation
//! - **Casting**: [`cast`], primitive coercion and ordered union resolution
//! - **Mapping**: [`Mapper`] and the `copy_from_*` entry points
//! - **Validation**: [`validate`], checking stored values against declarations
//!
//! # Example
//!
//! ```
//! use lazymap_core::{destination, copy_from_json, validate, FieldMappings};
//!
//! #[derive(Debug, Default)]
//! struct Profile {
//!     age: i64,
//!     user_id: i64,
//!     nickname: Option<String>,
//! }
//!
//! destination! {
//!     Profile {
//!         "age" => age: "int",
//!         "userId" => user_id: "int",
//!         "nickname" => nickname: "?string",
//!     }
//! }
//!
//! # fn example() -> lazymap_core::Result<()> {
//! let mut profile = Profile::default();
//! copy_from_json(r#"{"age": "17", "user_id": 5}"#, &mut profile, &FieldMappings::new())?;
//!
//! assert_eq!(profile.age, 17);
//! assert_eq!(profile.user_id, 5);
//! assert!(validate(&profile)?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod cast;
pub mod compat;
pub mod destination;
pub mod error;
pub mod inspector;
pub mod mapper;
pub mod source;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use cast::cast;
pub use compat::{is_compatible, runtime_type, value_fits};
pub use destination::{Described, Destination, FieldTable, Record, Shape, ShapeField};
pub use error::{Error, FieldMismatch, Result};
pub use inspector::resolve_type;
pub use mapper::{
    copy_from_array, copy_from_json, copy_from_object, copy_from_serialize, transform,
    FieldMappings, Mapper, MapperConfig,
};
pub use source::{MatchKind, SourceRecord};
pub use types::{FieldDescriptor, TypeSpec};
pub use validator::validate;

pub use serde_json::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

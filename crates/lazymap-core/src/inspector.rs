//! Type inspection over destination descriptor tables

use crate::destination::Destination;
use crate::types::{FieldDescriptor, TypeSpec};

/// Declared type of `field` on `target`
///
/// Returns `None` for unknown fields, untyped fields and declarations that
/// could not be parsed; callers accept any value in that case.
pub fn resolve_type<D: Destination + ?Sized>(target: &D, field: &str) -> Option<TypeSpec> {
    target.declared_type(field)
}

/// Snapshot of a destination's descriptors, indexed by field name
pub(crate) struct FieldIndex {
    descriptors: Vec<FieldDescriptor>,
}

impl FieldIndex {
    pub(crate) fn of<D: Destination + ?Sized>(target: &D) -> Self {
        Self {
            descriptors: target.fields(),
        }
    }

    pub(crate) fn contains(&self, field: &str) -> bool {
        self.descriptors.iter().any(|d| d.name == field)
    }

    pub(crate) fn declared_type(&self, field: &str) -> Option<&TypeSpec> {
        self.descriptors
            .iter()
            .find(|d| d.name == field)
            .and_then(|d| d.declared_type.as_ref())
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{Record, Shape};

    #[test]
    fn test_resolve_type() {
        let record = Record::new(
            &Shape::new()
                .field("id", Some("int"))
                .field("name", Some("?string"))
                .field("blob", None)
                .field("broken", Some("int||")),
        );

        assert_eq!(resolve_type(&record, "id"), Some(TypeSpec::unit("int")));
        assert_eq!(resolve_type(&record, "name"), TypeSpec::parse("?string"));
        assert_eq!(resolve_type(&record, "blob"), None);
        assert_eq!(resolve_type(&record, "broken"), None);
        assert_eq!(resolve_type(&record, "missing"), None);
    }

    #[test]
    fn test_field_index() {
        let record = Record::new(&Shape::new().field("a", Some("int")).field("b", None));
        let index = FieldIndex::of(&record);
        assert!(index.contains("a"));
        assert!(!index.contains("c"));
        assert_eq!(index.declared_type("a"), Some(&TypeSpec::unit("int")));
        assert_eq!(index.declared_type("b"), None);
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}

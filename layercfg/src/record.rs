//! Schema description for populatable records.
//!
//! A record exposes a `'static` table of [`Field`]s plus two walks over its
//! direct fields: a read-only one yielding [`Node`]s and a mutable one
//! yielding [`Slot`]s. Nested records show up as `Node::Record` /
//! `Slot::Record`, which is how the scanner and writer recurse without any
//! runtime type inspection. `#[derive(Record)]` generates all of this.

/// One field of a record schema: its name and its annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    annotations: &'static [(&'static str, &'static str)],
}

impl Field {
    /// Create a field description (used by macro-generated code).
    pub const fn new(
        name: &'static str,
        annotations: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { name, annotations }
    }

    /// Field name as declared in the struct.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Value of annotation `key`, if the field carries a non-empty one.
    pub fn annotation(&self, key: &str) -> Option<&'static str> {
        self.annotations
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
    }

    /// All annotations in declaration order.
    pub fn annotations(&self) -> &'static [(&'static str, &'static str)] {
        self.annotations
    }
}

/// Read-only view of a field value.
pub enum Node<'a> {
    /// A scalar field.
    Leaf,
    /// A nested record.
    Record(&'a dyn Record),
}

/// Mutable view of a field value, one variant per supported type.
pub enum Slot<'a> {
    String(&'a mut String),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Bool(&'a mut bool),
    Record(&'a mut dyn Record),
}

/// A struct whose fields can be populated from configuration sources.
///
/// Implement with `#[derive(Record)]`.
pub trait Record {
    /// The field table, in declaration order.
    fn fields(&self) -> &'static [Field];

    /// Calls `visitor` once per field, in declaration order.
    fn visit(&self, visitor: &mut dyn FnMut(&'static Field, Node<'_>));

    /// Calls `visitor` once per field with mutable access, in declaration order.
    fn visit_mut(&mut self, visitor: &mut dyn FnMut(&'static Field, Slot<'_>));
}

/// A type that may appear as a field of a [`Record`].
///
/// Implemented here for strings, integers, floats and `bool`; the derive
/// macro implements it for every record so records nest.
pub trait FieldValue {
    fn node(&self) -> Node<'_>;
    fn slot(&mut self) -> Slot<'_>;
}

macro_rules! impl_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn node(&self) -> Node<'_> {
                    Node::Leaf
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }
            }
        )*
    };
}

impl_field_value! {
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[derive(Debug, Default, Record)]
    struct Inner {
        #[conf(env = "INNER")]
        value: u8,
    }

    #[derive(Debug, Default, Record)]
    struct Outer {
        #[conf(env = "NAME", flag = "")]
        name: String,
        inner: Inner,
        #[conf(skip)]
        #[allow(dead_code)]
        ignored: Vec<String>,
        r#type: bool,
    }

    #[test]
    fn test_field_table() {
        let outer = Outer::default();
        let names: Vec<_> = outer.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["name", "inner", "type"]);
    }

    #[test]
    fn test_empty_annotation_is_absent() {
        let outer = Outer::default();
        let name = &outer.fields()[0];
        assert_eq!(name.annotation("env"), Some("NAME"));
        assert_eq!(name.annotation("flag"), None);
        assert_eq!(name.annotation("json"), None);
        assert_eq!(name.annotations().len(), 2);
    }

    #[test]
    fn test_visit_marks_nested_records() {
        let outer = Outer::default();
        let mut seen = Vec::new();
        outer.visit(&mut |field, node| {
            seen.push((field.name(), matches!(node, Node::Record(_))));
        });
        assert_eq!(seen, [("name", false), ("inner", true), ("type", false)]);
    }

    #[test]
    fn test_visit_mut_reaches_nested_fields() {
        let mut outer = Outer::default();
        outer.visit_mut(&mut |_, slot| {
            if let Slot::Record(inner) = slot {
                inner.visit_mut(&mut |_, slot| {
                    if let Slot::U8(value) = slot {
                        *value = 7;
                    }
                });
            }
        });
        assert_eq!(outer.inner.value, 7);
    }
}

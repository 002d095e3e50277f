//! Annotation scanning over nested records.

use std::collections::BTreeMap;

use crate::record::{Node, Record};

/// One annotation found on a leaf field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Dot-joined path from the root record to the field.
    pub path: String,
    /// Annotation name that matched.
    pub name: String,
    /// Annotation value.
    pub value: String,
}

/// Leaf field path → annotation, built fresh by [`scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationIndex {
    entries: BTreeMap<String, Annotation>,
}

impl AnnotationIndex {
    pub fn get(&self, path: &str) -> Option<&Annotation> {
        self.entries.get(path)
    }

    /// Annotation value for `path`, or `""` when the field has none.
    pub fn value(&self, path: &str) -> &str {
        self.get(path).map_or("", |a| a.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by field path.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.values()
    }
}

/// Collect the annotations named in `names` from every leaf of `record`.
///
/// Nested records are walked depth-first with their field name plus `.` as
/// path prefix; they never appear in the index themselves. When a leaf
/// carries several of the requested names, the one requested last wins.
pub fn scan(record: &dyn Record, names: &[&str]) -> AnnotationIndex {
    let mut index = AnnotationIndex::default();
    scan_into(record, names, "", &mut index);
    index
}

fn scan_into(record: &dyn Record, names: &[&str], prefix: &str, index: &mut AnnotationIndex) {
    record.visit(&mut |field, node| {
        let path = format!("{prefix}{}", field.name());
        match node {
            Node::Record(nested) => scan_into(nested, names, &format!("{path}."), index),
            Node::Leaf => {
                for name in names {
                    if let Some(value) = field.annotation(name) {
                        index.entries.insert(
                            path.clone(),
                            Annotation {
                                path: path.clone(),
                                name: (*name).to_string(),
                                value: value.to_string(),
                            },
                        );
                    }
                }
            }
        }
    });
}

//! Ordered tag sets shared by elements and relationships.

use std::fmt;

use indexmap::IndexSet;
use serde::{Serialize, Serializer};

/// Base tag carried by every element.
pub const ELEMENT_TAG: &str = "Element";

/// Base tag carried by every relationship.
pub const RELATIONSHIP_TAG: &str = "Relationship";

/// An insertion-ordered set of tags.
///
/// Base tags are inserted first when the owner is created and can never be
/// removed, so the set always contains them. Serializes as a comma-joined
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags(IndexSet<String>);

impl Tags {
    /// Creates a tag set seeded with the given base tags.
    pub(crate) fn with_base<'a>(base: impl IntoIterator<Item = &'a str>) -> Self {
        Self(base.into_iter().map(str::to_string).collect())
    }

    /// Adds tags, ignoring those already present.
    pub(crate) fn extend<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(tags.into_iter().map(Into::into));
    }

    /// Returns `true` if the tag is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Iterates the tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of tags, base tags included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for tag sets owned by the model.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, tag) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            f.write_str(tag)?;
        }
        Ok(())
    }
}

impl Serialize for Tags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

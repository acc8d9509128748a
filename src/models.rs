//! Core data structures for ZINC metadata.
//!
//! Defines the tag value union, the ordered per-column metadata map and the
//! ordered header map used throughout the library.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to another Haystack entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefValue {
    /// Identifier including the leading `@`
    pub id: String,
    /// Human readable name; empty when the ref was written without one
    pub dis: String,
}

impl RefValue {
    pub fn new(id: impl Into<String>, dis: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dis: dis.into(),
        }
    }
}

impl fmt::Display for RefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dis.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} \"{}\"", self.id, self.dis)
        }
    }
}

/// A normalized tag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    /// Tag present without a value
    Marker,
    Str(String),
    Number(f64),
    Ref(RefValue),
}

impl TagValue {
    pub fn is_marker(&self) -> bool {
        matches!(self, TagValue::Marker)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            TagValue::Marker | TagValue::Number(_) | TagValue::Ref(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) => Some(*n),
            TagValue::Marker | TagValue::Str(_) | TagValue::Ref(_) => None,
        }
    }

    pub fn as_ref_value(&self) -> Option<&RefValue> {
        match self {
            TagValue::Ref(r) => Some(r),
            TagValue::Marker | TagValue::Str(_) | TagValue::Number(_) => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Marker => write!(f, "M"),
            TagValue::Str(s) => write!(f, "{}", s),
            TagValue::Number(n) => write!(f, "{}", n),
            TagValue::Ref(r) => write!(f, "{}", r),
        }
    }
}

/// Tags attached to one column, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    tags: Vec<(String, TagValue)>,
}

/// Tags on the version line of a grid
pub type GridInfo = ColumnMetadata;

impl ColumnMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, replacing the value in place if the tag already exists
    pub fn insert(&mut self, tag: impl Into<String>, value: TagValue) {
        let tag = tag.into();
        match self.tags.iter_mut().find(|(name, _)| *name == tag) {
            Some((_, existing)) => *existing = value,
            None => self.tags.push((tag, value)),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&TagValue> {
        self.tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value)
    }

    /// Value of a tag when it holds a string
    pub fn get_str(&self, tag: &str) -> Option<&str> {
        self.get(tag).and_then(TagValue::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn get_mut(&mut self, tag: &str) -> Option<&mut TagValue> {
        self.tags
            .iter_mut()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value)
    }
}

impl FromIterator<(String, TagValue)> for ColumnMetadata {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (tag, value) in iter {
            metadata.insert(tag, value);
        }
        metadata
    }
}

/// Column name to column metadata, in header order.
///
/// Entry 0 is the timestamp column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderInfo {
    columns: Vec<(String, ColumnMetadata)>,
}

impl HeaderInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Returns false if the name is already present.
    pub fn push(&mut self, name: impl Into<String>, metadata: ColumnMetadata) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.columns.push((name, metadata));
        true
    }

    pub fn get(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, metadata)| metadata)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &ColumnMetadata)> {
        self.columns
            .get(index)
            .map(|(name, metadata)| (name.as_str(), metadata))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(col, _)| col == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnMetadata)> {
        self.columns
            .iter()
            .map(|(name, metadata)| (name.as_str(), metadata))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

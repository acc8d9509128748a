//! Serialization of metadata back into ZINC header grammar

use crate::constants::UNIT_TAG;
use crate::models::{ColumnMetadata, HeaderInfo, TagValue};

/// Render tags as space separated `tag` / `tag:value` items
pub fn write_tags(metadata: &ColumnMetadata) -> String {
    let unit = metadata.get_str(UNIT_TAG);
    metadata
        .iter()
        .map(|(tag, value)| write_tag(tag, value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one column definition: the name followed by its tags
pub fn write_column(name: &str, metadata: &ColumnMetadata) -> String {
    if metadata.is_empty() {
        return name.to_string();
    }
    format!("{} {}", name, write_tags(metadata))
}

/// Render a full header line
pub fn write_header(header: &HeaderInfo) -> String {
    header
        .iter()
        .map(|(name, metadata)| write_column(name, metadata))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_tag(tag: &str, value: &TagValue, unit: Option<&str>) -> String {
    match value {
        TagValue::Marker => tag.to_string(),
        TagValue::Str(text) => format!("{}:\"{}\"", tag, escape_quotes(text)),
        TagValue::Number(number) => format!("{}:{}{}", tag, number, unit.unwrap_or("")),
        TagValue::Ref(reference) => format!("{}:{}", tag, reference),
    }
}

/// Escape double quotes that are not already escaped.
///
/// Parsed `Str` values keep their header escapes, so those are written back
/// unchanged.
fn escape_quotes(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped.push(c);
                // A trailing backslash would escape the closing quote
                escaped.push(chars.next().unwrap_or('\\'));
            }
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

//! ZINC header parsing
//!
//! Turns the version line and the column header line of a ZINC grid into
//! ordered, typed metadata maps.
//!
//! ## Architecture
//!
//! - [`splitter`] - quote-aware split of the header line into column definitions
//! - [`tokenizer`] - state machine producing raw `(tag, value)` pairs per column
//! - [`normalizer`] - raw values to [`TagValue`](crate::models::TagValue), unit handling
//! - [`writer`] - metadata back to header grammar
//!
//! ## Usage
//!
//! ```rust
//! use zinc_frame::header::parse_header_line;
//! use zinc_frame::models::TagValue;
//!
//! let header = parse_header_line(r#"ts tz:"Los_Angeles",v0 kind:"Number" unit:"%" his"#)?;
//! let v0 = header.get("v0").unwrap();
//! assert_eq!(v0.get_str("unit"), Some("%"));
//! assert_eq!(v0.get("his"), Some(&TagValue::Marker));
//! # Ok::<(), zinc_frame::ZincError>(())
//! ```

pub mod normalizer;
pub mod splitter;
pub mod tokenizer;
pub mod writer;

#[cfg(test)]
pub mod tests;

use crate::error::{Result, ZincError};
use crate::models::{ColumnMetadata, GridInfo, HeaderInfo};
use tracing::debug;

pub use normalizer::{normalize_tags, normalize_value};
pub use splitter::split_columns;
pub use tokenizer::{RawValue, tokenize_column};
pub use writer::{write_column, write_header, write_tags};

/// Parse one column definition into its name and metadata
pub fn parse_column_definition(definition: &str) -> Result<(String, ColumnMetadata)> {
    let mut pairs = tokenize_column(definition).into_iter();

    let name = match pairs.next() {
        Some((name, RawValue::Marker)) => name,
        Some((tag, RawValue::Text(_))) => {
            return Err(ZincError::malformed(format!(
                "column definition starts with tag '{}' instead of a column name",
                tag
            )));
        }
        None => return Err(ZincError::malformed("empty column definition")),
    };

    let metadata = normalize_tags(&name, pairs)?;
    Ok((name, metadata))
}

/// Parse a complete header line into [`HeaderInfo`]
pub fn parse_header_line(line: &str) -> Result<HeaderInfo> {
    let mut header = HeaderInfo::new();

    for (index, definition) in split_columns(line).into_iter().enumerate() {
        let (name, metadata) = parse_column_definition(definition).map_err(|e| match e {
            ZincError::MalformedInput { reason } => {
                ZincError::malformed(format!("column {}: {}", index, reason))
            }
            other => other,
        })?;

        debug!("Column {} '{}' has {} tags", index, name, metadata.len());
        if !header.push(name.clone(), metadata) {
            return Err(ZincError::malformed(format!(
                "duplicate column name '{}'",
                name
            )));
        }
    }

    Ok(header)
}

/// Parse the version line (`ver:"3.0" view:"chart" ...`) into [`GridInfo`]
pub fn parse_grid_info(line: &str) -> Result<GridInfo> {
    normalize_tags("<grid>", tokenize_column(line))
}

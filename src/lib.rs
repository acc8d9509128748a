//! zinc_frame
//!
//! Parse Project Haystack ZINC grids into typed, timestamp-indexed tables.
//!
//! This library provides tools for:
//! - Parsing the version line and the tag/value header line of a grid,
//!   including refs with display names, markers and escaped strings
//! - Coercing data columns by their `kind`, `unit` and `enum` tags, with
//!   unit-suffix inference for columns that carry no metadata
//! - Building a `ts` index from column 0 with timezone names stripped
//! - Exporting tables to polars `DataFrame`s and writing them back as ZINC
//!
//! ```rust
//! use zinc_frame::{ParseOptions, parse_zinc};
//!
//! let text = "ver:\"3.0\"\nts,val\n2020-04-01T00:00:00-07:00 Los_Angeles,66.092°F\n";
//! let table = parse_zinc(text, &ParseOptions::default())?;
//! assert_eq!(table.row_count(), 1);
//! assert_eq!(table.column("val").unwrap().values.as_f64(), Some(&[Some(66.092)][..]));
//! # Ok::<(), zinc_frame::ZincError>(())
//! ```

pub mod coercion;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;
pub mod table;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use coercion::{TypedColumn, coerce_column};
pub use config::ParseOptions;
pub use error::{Result, ZincError};
pub use models::{ColumnMetadata, GridInfo, HeaderInfo, RefValue, TagValue};
pub use processor::{parse_series, parse_zinc, read_path};
pub use table::{Series, Table, TableColumn, TimestampIndex};

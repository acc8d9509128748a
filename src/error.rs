//! Error handling for ZINC parsing operations.
//!
//! Every stage of the pipeline fails fast with one of these variants so
//! callers can tell malformed payloads, bad column metadata and unparseable
//! cells apart without inspecting messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZincError {
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Unrecognized kind '{kind}' on column '{column}'")]
    UnrecognizedKind { column: String, kind: String },

    #[error("Column '{column}' has metadata but no kind or enum tag")]
    MissingKind { column: String },

    #[error("Could not strip unit '{unit}' from {tag} value '{value}' on column '{column}'")]
    UnitStripFailure {
        column: String,
        tag: String,
        value: String,
        unit: String,
    },

    #[error("Timestamp parsing failed at row {row}: '{value}'")]
    TimestampParseFailure {
        row: usize,
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("Server returned an error grid ({err_type}): {dis}")]
    ErrorGrid { err_type: String, dis: String },

    #[error("Row {row} has {found} fields but the header declares {expected} columns")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ZincError {
    /// Create a malformed input error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Create an unrecognized kind error
    pub fn unrecognized_kind(column: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnrecognizedKind {
            column: column.into(),
            kind: kind.into(),
        }
    }

    /// Create a unit strip error
    pub fn unit_strip(
        column: impl Into<String>,
        tag: impl Into<String>,
        value: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self::UnitStripFailure {
            column: column.into(),
            tag: tag.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZincError>;

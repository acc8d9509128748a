//! Metadata-driven type coercion of raw cell columns.
//!
//! Each data column arrives as raw strings (with nulls already mapped by the
//! row reader) and leaves as a [`TypedColumn`]. The column's tags decide the
//! type: `kind`, `unit` and `enum` are consulted in that order, and columns
//! without any tags fall back to unit-suffix inference on their first cell.

use crate::config::ParseOptions;
use crate::constants::{ENUM_TAG, KIND_TAG, NUMBER_KIND, STRING_KIND, UNIT_TAG};
use crate::error::{Result, ZincError};
use crate::header::normalizer::parse_with_unit;
use crate::models::{ColumnMetadata, TagValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A column of typed cells; `None` is a missing value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedColumn {
    /// Numbers parsed from cells written with `unit` as a suffix
    Float64 {
        unit: String,
        values: Vec<Option<f64>>,
    },
    Utf8(Vec<Option<String>>),
    /// Cells are indexes into `categories`, which keeps the declared order
    Categorical {
        categories: Vec<String>,
        codes: Vec<Option<u32>>,
    },
}

impl TypedColumn {
    pub fn len(&self) -> usize {
        match self {
            TypedColumn::Float64 { values, .. } => values.len(),
            TypedColumn::Utf8(values) => values.len(),
            TypedColumn::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            TypedColumn::Float64 { values, .. } => values.iter().filter(|v| v.is_none()).count(),
            TypedColumn::Utf8(values) => values.iter().filter(|v| v.is_none()).count(),
            TypedColumn::Categorical { codes, .. } => codes.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Short type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedColumn::Float64 { .. } => "f64",
            TypedColumn::Utf8(_) => "str",
            TypedColumn::Categorical { .. } => "categorical",
        }
    }

    pub fn as_f64(&self) -> Option<&[Option<f64>]> {
        match self {
            TypedColumn::Float64 { values, .. } => Some(values),
            TypedColumn::Utf8(_) | TypedColumn::Categorical { .. } => None,
        }
    }

    /// Unit suffix of a numeric column
    pub fn unit(&self) -> Option<&str> {
        match self {
            TypedColumn::Float64 { unit, .. } => Some(unit),
            TypedColumn::Utf8(_) | TypedColumn::Categorical { .. } => None,
        }
    }

    pub fn as_utf8(&self) -> Option<&[Option<String>]> {
        match self {
            TypedColumn::Utf8(values) => Some(values),
            TypedColumn::Float64 { .. } | TypedColumn::Categorical { .. } => None,
        }
    }

    /// Category of a row in a categorical column
    pub fn category(&self, row: usize) -> Option<&str> {
        match self {
            TypedColumn::Categorical { categories, codes } => codes
                .get(row)
                .copied()
                .flatten()
                .and_then(|code| categories.get(code as usize))
                .map(String::as_str),
            TypedColumn::Float64 { .. } | TypedColumn::Utf8(_) => None,
        }
    }
}

/// Coerce the raw cells of one data column according to its metadata
pub fn coerce_column(
    name: &str,
    metadata: &ColumnMetadata,
    cells: Vec<Option<String>>,
    options: &ParseOptions,
) -> Result<TypedColumn> {
    if metadata.is_empty() {
        return infer_column(name, cells, options);
    }

    let kind = metadata.get(KIND_TAG);

    if matches!(kind, Some(TagValue::Str(k)) if k == NUMBER_KIND) {
        return match metadata.get_str(UNIT_TAG) {
            Some(unit) => {
                debug!("Column '{}': numeric with unit '{}'", name, unit);
                numeric_column(name, &cells, unit)
            }
            None => {
                // Number without a unit is left as raw text
                debug!("Column '{}': numeric without unit, kept as text", name);
                Ok(TypedColumn::Utf8(cells))
            }
        };
    }

    if let Some(declared) = metadata.get_str(ENUM_TAG) {
        debug!("Column '{}': categorical over [{}]", name, declared);
        return Ok(categorize(declared, &cells));
    }

    match kind {
        Some(TagValue::Str(k)) if k == STRING_KIND => Ok(TypedColumn::Utf8(cells)),
        Some(other) => Err(ZincError::unrecognized_kind(name, other.to_string())),
        None => Err(ZincError::MissingKind {
            column: name.to_string(),
        }),
    }
}

/// Type a column that has no metadata by looking at its first cell only.
///
/// If that cell is null or carries no known unit suffix, the column stays
/// text.
fn infer_column(
    name: &str,
    cells: Vec<Option<String>>,
    options: &ParseOptions,
) -> Result<TypedColumn> {
    debug!("No metadata for column '{}', heuristically inferring type", name);

    let suffix = cells
        .first()
        .and_then(|cell| cell.as_deref())
        .and_then(|first| {
            options
                .unit_suffixes
                .iter()
                .find(|suffix| first.ends_with(suffix.as_str()))
        })
        .cloned();

    match suffix {
        Some(unit) => {
            debug!("Column '{}': inferred unit '{}'", name, unit);
            numeric_column(name, &cells, &unit)
        }
        None => Ok(TypedColumn::Utf8(cells)),
    }
}

fn numeric_column(name: &str, cells: &[Option<String>], unit: &str) -> Result<TypedColumn> {
    let values = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(text) => parse_with_unit(text, unit).map(Some).ok_or_else(|| {
                ZincError::unit_strip(name, format!("cell at row {}", row), text.as_str(), unit)
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TypedColumn::Float64 {
        unit: unit.to_string(),
        values,
    })
}

fn categorize(declared: &str, cells: &[Option<String>]) -> TypedColumn {
    let categories: Vec<String> = declared.split(',').map(str::to_string).collect();
    let codes = cells
        .iter()
        .map(|cell| {
            cell.as_deref().and_then(|value| {
                categories
                    .iter()
                    .position(|category| category == value)
                    .map(|index| index as u32)
            })
        })
        .collect();

    TypedColumn::Categorical { categories, codes }
}

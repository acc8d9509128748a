//! Conversion of raw header tokens into typed tag values
//!
//! Raw values keep their quotes and ref syntax; normalization strips one
//! layer of quotes, splits ref literals into identifier and display name, and
//! parses the numeric tags of a column once its `unit` is known.

use super::tokenizer::RawValue;
use crate::constants::{NUMERIC_TAGS, UNIT_TAG};
use crate::error::{Result, ZincError};
use crate::models::{ColumnMetadata, RefValue, TagValue};

/// Normalize a single raw value
pub fn normalize_value(raw: RawValue) -> TagValue {
    let text = match raw {
        RawValue::Marker => return TagValue::Marker,
        RawValue::Text(text) => text,
    };

    let unquoted = strip_quotes(&text);
    if unquoted.starts_with('@') {
        let reference = match unquoted.split_once(' ') {
            Some((id, rest)) => RefValue::new(id, strip_quotes(rest)),
            None => RefValue::new(unquoted, ""),
        };
        return TagValue::Ref(reference);
    }

    TagValue::Str(unquoted.to_string())
}

/// Normalize the tag pairs of one column (the column-name pair excluded).
///
/// When the column has a `unit` tag, the numeric tags (`curVal`,
/// `precision`, `writeLevel`, `writeVal`) are parsed to numbers with the unit
/// suffix removed.
pub fn normalize_tags<I>(column: &str, pairs: I) -> Result<ColumnMetadata>
where
    I: IntoIterator<Item = (String, RawValue)>,
{
    let mut metadata: ColumnMetadata = pairs
        .into_iter()
        .map(|(tag, raw)| (tag, normalize_value(raw)))
        .collect();

    apply_unit(column, &mut metadata)?;
    Ok(metadata)
}

fn apply_unit(column: &str, metadata: &mut ColumnMetadata) -> Result<()> {
    let Some(unit) = metadata.get_str(UNIT_TAG).map(str::to_owned) else {
        return Ok(());
    };

    for &tag in NUMERIC_TAGS {
        let Some(value) = metadata.get_mut(tag) else {
            continue;
        };
        let parsed = match value {
            TagValue::Str(text) => Some(
                parse_with_unit(text, &unit)
                    .ok_or_else(|| ZincError::unit_strip(column, tag, text.as_str(), &unit))?,
            ),
            TagValue::Marker | TagValue::Number(_) | TagValue::Ref(_) => None,
        };
        if let Some(number) = parsed {
            *value = TagValue::Number(number);
        }
    }

    Ok(())
}

/// Remove `unit` from the end of `text` (if present) and parse the rest
pub fn parse_with_unit(text: &str, unit: &str) -> Option<f64> {
    text.strip_suffix(unit)
        .unwrap_or(text)
        .trim()
        .parse::<f64>()
        .ok()
}

/// Remove one layer of enclosing double quotes
pub fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

//! ZINC payload to [`Table`] assembly.
//!
//! The payload is split into its version line, header line and CSV body.
//! The two metadata lines go through the header parser, the body is read
//! with the `csv` crate into raw column vectors, and each column is then
//! coerced by its metadata. Column 0 becomes the `ts` index.

use crate::coercion::coerce_column;
use crate::config::ParseOptions;
use crate::constants::{DIS_TAG, ERR_TAG, ERR_TYPE_TAG, ID_TAG, TS_COLUMN, TZ_TAG, VERSION_TAG};
use crate::error::{Result, ZincError};
use crate::header::{parse_grid_info, parse_header_line};
use crate::models::{ColumnMetadata, GridInfo, HeaderInfo, TagValue};
use crate::table::{Series, Table, TableColumn, TimestampIndex};
use chrono::DateTime;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("line break pattern is valid"));

/// Parse a ZINC payload into a [`Table`]
pub fn parse_zinc(text: &str, options: &ParseOptions) -> Result<Table> {
    let segments: Vec<&str> = LINE_BREAK.splitn(text, 3).collect();
    if segments.len() < 2 {
        return Err(ZincError::malformed(format!(
            "expected a version line and a header line, found {} line",
            segments.len()
        )));
    }

    // Version line
    let grid_info = parse_grid_info(segments[0])?;
    check_error_grid(&grid_info)?;
    if !grid_info.contains(VERSION_TAG) {
        warn!("Grid info has no '{}' tag", VERSION_TAG);
    }

    // Column header line
    let header = parse_header_line(segments[1])?;
    debug!("Header declares {} columns", header.len());

    let body = segments.get(2).copied().unwrap_or("");
    if body.trim().is_empty() {
        info!(
            "Parsed metadata-only grid with {} columns",
            header.len().saturating_sub(1)
        );
        return Ok(Table::metadata_only(grid_info, header));
    }

    let mut raw_columns = read_body(body, header.len(), options)?.into_iter();
    let ts_cells = raw_columns.next().unwrap_or_default();

    // Coerce data columns; `ts` is reserved for the index
    let mut used_names: HashSet<String> = HashSet::from([TS_COLUMN.to_string()]);
    let mut columns = Vec::with_capacity(header.len().saturating_sub(1));
    for (position, ((zinc_name, metadata), cells)) in
        header.iter().skip(1).zip(raw_columns).enumerate()
    {
        let values = coerce_column(zinc_name, metadata, cells, options)?;
        let name = unique_name(
            display_name(zinc_name, metadata),
            zinc_name,
            position + 1,
            &mut used_names,
        );
        columns.push(TableColumn {
            name,
            zinc_name: zinc_name.to_string(),
            values,
        });
    }

    // Column 0 becomes the index
    let index = build_index(&header, ts_cells, options)?;

    info!(
        "Parsed grid with {} rows and {} data columns",
        index.len(),
        columns.len()
    );
    Ok(Table::new(grid_info, header, Some(index), columns))
}

/// Parse a payload and return its first data column
pub fn parse_series(text: &str, options: &ParseOptions) -> Result<Series> {
    parse_zinc(text, options)?
        .series()
        .ok_or_else(|| ZincError::malformed("grid has no data columns"))
}

/// Read and parse a `.zinc` file
pub fn read_path<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Table> {
    let path = path.as_ref();
    info!("Reading ZINC grid from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_zinc(&text, options)
}

fn check_error_grid(grid_info: &GridInfo) -> Result<()> {
    if !grid_info.contains(ERR_TAG) {
        return Ok(());
    }
    Err(ZincError::ErrorGrid {
        err_type: grid_info
            .get_str(ERR_TYPE_TAG)
            .unwrap_or("unknown")
            .to_string(),
        dis: grid_info.get_str(DIS_TAG).unwrap_or_default().to_string(),
    })
}

/// Read the CSV body into one cell vector per header column
fn read_body(body: &str, width: usize, options: &ParseOptions) -> Result<Vec<Vec<Option<String>>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > width {
            return Err(ZincError::RowShape {
                row,
                expected: width,
                found: record.len(),
            });
        }
        for (index, column) in columns.iter_mut().enumerate() {
            let cell = record
                .get(index)
                .filter(|cell| !options.is_null(cell))
                .map(str::to_string);
            column.push(cell);
        }
    }

    Ok(columns)
}

/// The `dis` of the column's `id` ref when it has one, else the ZINC name
fn display_name(zinc_name: &str, metadata: &ColumnMetadata) -> String {
    match metadata.get(ID_TAG) {
        // An empty `dis` counts as no display name
        Some(TagValue::Ref(reference)) if !reference.dis.is_empty() => reference.dis.clone(),
        _ => zinc_name.to_string(),
    }
}

/// Keep column names distinct: a taken display name falls back to the ZINC
/// name, and a taken ZINC name gets the column position appended.
fn unique_name(
    dis: String,
    zinc_name: &str,
    position: usize,
    used: &mut HashSet<String>,
) -> String {
    let name = if !used.contains(&dis) {
        dis
    } else if !used.contains(zinc_name) {
        debug!("Display name '{}' is taken, using '{}'", dis, zinc_name);
        zinc_name.to_string()
    } else {
        let suffixed = format!("{}_{}", zinc_name, position);
        debug!("Display name '{}' is taken, using '{}'", dis, suffixed);
        suffixed
    };
    used.insert(name.clone());
    name
}

fn build_index(
    header: &HeaderInfo,
    cells: Vec<Option<String>>,
    options: &ParseOptions,
) -> Result<TimestampIndex> {
    let tz = header
        .get_index(0)
        .and_then(|(_, metadata)| metadata.get_str(TZ_TAG))
        .unwrap_or(options.default_tz.as_str())
        .to_string();
    debug!("Parsing timestamps with timezone '{}'", tz);

    let values = cells
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            let Some(text) = cell else {
                return Err(ZincError::TimestampParseFailure {
                    row,
                    value: options.null_sentinel.clone(),
                    source: None,
                });
            };
            let stripped = text.strip_suffix(tz.as_str()).unwrap_or(&text).trim_end();
            DateTime::parse_from_rfc3339(stripped).map_err(|e| ZincError::TimestampParseFailure {
                row,
                value: text.clone(),
                source: Some(e),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TimestampIndex {
        name: TS_COLUMN.to_string(),
        tz,
        values,
    })
}

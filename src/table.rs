//! Parsed ZINC grids as timestamp-indexed tables.
//!
//! A [`Table`] owns everything a payload carried: grid info, the full header
//! metadata, the `ts` index and the typed data columns under their display
//! names. It can be exported to a polars `DataFrame` or written back to ZINC
//! text.

use crate::coercion::TypedColumn;
use crate::constants::{NULL_SENTINEL, TZ_TAG, VERSION_TAG};
use crate::error::{Result, ZincError};
use crate::header::{write_header, write_tags};
use crate::models::{ColumnMetadata, GridInfo, HeaderInfo};
use chrono::{DateTime, FixedOffset};
use polars::prelude::{Column, DataFrame, DataType, TimeUnit};
use serde::{Deserialize, Serialize};

/// One data column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Display name (the `dis` of the column's `id` ref, else the ZINC name)
    pub name: String,
    /// Name as declared in the header line
    pub zinc_name: String,
    pub values: TypedColumn,
}

/// The time index built from column 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampIndex {
    pub name: String,
    /// Timezone name stripped from every cell
    pub tz: String,
    pub values: Vec<DateTime<FixedOffset>>,
}

impl TimestampIndex {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn to_column(&self) -> Result<Column> {
        let millis: Vec<i64> = self.values.iter().map(DateTime::timestamp_millis).collect();
        let column = Column::new(self.name.as_str().into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        Ok(column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    grid_info: GridInfo,
    header: HeaderInfo,
    index: Option<TimestampIndex>,
    columns: Vec<TableColumn>,
}

impl Table {
    pub(crate) fn new(
        grid_info: GridInfo,
        header: HeaderInfo,
        index: Option<TimestampIndex>,
        columns: Vec<TableColumn>,
    ) -> Self {
        Self {
            grid_info,
            header,
            index,
            columns,
        }
    }

    /// Table for a payload that carried no data rows
    pub(crate) fn metadata_only(grid_info: GridInfo, header: HeaderInfo) -> Self {
        Self::new(grid_info, header, None, Vec::new())
    }

    pub fn grid_info(&self) -> &GridInfo {
        &self.grid_info
    }

    /// Metadata for every column, keyed by ZINC name, `ts` included
    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    pub fn index(&self) -> Option<&TimestampIndex> {
        self.index.as_ref()
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Look up a data column by display name, falling back to its ZINC name
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .or_else(|| self.columns.iter().find(|column| column.zinc_name == name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.index.as_ref().map_or(0, TimestampIndex::len)
    }

    pub fn is_metadata_only(&self) -> bool {
        self.index.is_none() && self.columns.is_empty()
    }

    /// The first data column as a series
    pub fn series(&self) -> Option<Series> {
        self.columns.first().map(|column| self.series_of(column))
    }

    pub fn series_named(&self, name: &str) -> Option<Series> {
        self.column(name).map(|column| self.series_of(column))
    }

    fn series_of(&self, column: &TableColumn) -> Series {
        Series {
            name: column.name.clone(),
            ts_metadata: self
                .header
                .get_index(0)
                .map(|(_, metadata)| metadata.clone())
                .unwrap_or_default(),
            metadata: self
                .header
                .get(&column.zinc_name)
                .cloned()
                .unwrap_or_default(),
            index: self.index.clone(),
            values: column.values.clone(),
        }
    }

    /// Export as a polars `DataFrame`: `ts` first, then the data columns.
    ///
    /// Timestamps become UTC millisecond datetimes and categorical columns
    /// are exported as their category strings.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        if let Some(index) = &self.index {
            columns.push(index.to_column()?);
        }
        for column in &self.columns {
            columns.push(typed_to_column(&column.name, &column.values));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Serialize the table back to ZINC text
    pub fn to_zinc(&self) -> Result<String> {
        let mut output = String::new();

        // Version line, then the header line
        if self.grid_info.is_empty() {
            output.push_str(&format!("{}:\"3.0\"", VERSION_TAG));
        } else {
            output.push_str(&write_tags(&self.grid_info));
        }
        output.push('\n');
        output.push_str(&write_header(&self.header));
        output.push('\n');

        let Some(index) = &self.index else {
            return Ok(output);
        };

        // Timestamps get the tz name back only when column 0 declares one
        let ts_tz = self
            .header
            .get_index(0)
            .and_then(|(_, metadata)| metadata.get_str(TZ_TAG));

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for (row, timestamp) in index.values.iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(match ts_tz {
                Some(tz) => format!("{} {}", timestamp.to_rfc3339(), tz),
                None => timestamp.to_rfc3339(),
            });
            for column in &self.columns {
                record.push(cell_text(&column.values, row));
            }
            writer.write_record(&record)?;
        }

        // Flush the row writer
        let bytes = writer
            .into_inner()
            .map_err(|e| ZincError::Io(e.into_error()))?;
        output.push_str(&String::from_utf8_lossy(&bytes));
        Ok(output)
    }
}

/// One data column together with the time index and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    metadata: ColumnMetadata,
    ts_metadata: ColumnMetadata,
    index: Option<TimestampIndex>,
    values: TypedColumn,
}

impl Series {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &ColumnMetadata {
        &self.metadata
    }

    /// Metadata of the timestamp column
    pub fn ts_metadata(&self) -> &ColumnMetadata {
        &self.ts_metadata
    }

    pub fn index(&self) -> Option<&TimestampIndex> {
        self.index.as_ref()
    }

    pub fn values(&self) -> &TypedColumn {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Export as a two-column `DataFrame` (`ts` and the values)
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(2);
        if let Some(index) = &self.index {
            columns.push(index.to_column()?);
        }
        columns.push(typed_to_column(&self.name, &self.values));
        Ok(DataFrame::new(columns)?)
    }
}

fn typed_to_column(name: &str, values: &TypedColumn) -> Column {
    match values {
        TypedColumn::Float64 { values, .. } => Column::new(name.into(), values.as_slice()),
        TypedColumn::Utf8(values) => {
            let values: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
            Column::new(name.into(), values)
        }
        TypedColumn::Categorical { .. } => {
            let values: Vec<Option<&str>> = (0..values.len()).map(|row| values.category(row)).collect();
            Column::new(name.into(), values)
        }
    }
}

fn cell_text(values: &TypedColumn, row: usize) -> String {
    let text = match values {
        TypedColumn::Float64 { unit, values } => values
            .get(row)
            .copied()
            .flatten()
            .map(|number| format!("{}{}", number, unit)),
        TypedColumn::Utf8(values) => values.get(row).cloned().flatten(),
        TypedColumn::Categorical { .. } => values.category(row).map(str::to_string),
    };
    text.unwrap_or_else(|| NULL_SENTINEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RefValue, TagValue};
    use chrono::TimeZone;

    fn sample_table() -> Table {
        let mut ts_meta = ColumnMetadata::new();
        ts_meta.insert("tz", TagValue::Str("Los_Angeles".to_string()));

        let mut temp_meta = ColumnMetadata::new();
        temp_meta.insert("id", TagValue::Ref(RefValue::new("@p:a", "Zone Temp")));
        temp_meta.insert("kind", TagValue::Str("Number".to_string()));
        temp_meta.insert("unit", TagValue::Str("°F".to_string()));

        let mut header = HeaderInfo::new();
        header.push("ts", ts_meta);
        header.push("v0", temp_meta);
        header.push("v1", ColumnMetadata::new());

        let offset = FixedOffset::west_opt(7 * 3600).unwrap();
        let index = TimestampIndex {
            name: "ts".to_string(),
            tz: "Los_Angeles".to_string(),
            values: vec![
                offset.with_ymd_and_hms(2020, 5, 18, 0, 0, 0).unwrap(),
                offset.with_ymd_and_hms(2020, 5, 18, 0, 5, 0).unwrap(),
            ],
        };

        let columns = vec![
            TableColumn {
                name: "Zone Temp".to_string(),
                zinc_name: "v0".to_string(),
                values: TypedColumn::Float64 {
                    unit: "°F".to_string(),
                    values: vec![Some(68.5), None],
                },
            },
            TableColumn {
                name: "v1".to_string(),
                zinc_name: "v1".to_string(),
                values: TypedColumn::Categorical {
                    categories: vec!["off".to_string(), "on".to_string()],
                    codes: vec![Some(1), None],
                },
            },
        ];

        let mut grid_info = GridInfo::new();
        grid_info.insert("ver", TagValue::Str("3.0".to_string()));

        Table::new(grid_info, header, Some(index), columns)
    }

    #[test]
    fn test_column_lookup() {
        let table = sample_table();

        assert_eq!(table.row_count(), 2);
        assert!(!table.is_metadata_only());
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["Zone Temp", "v1"]
        );
        assert_eq!(table.column("Zone Temp").map(|c| c.zinc_name.as_str()), Some("v0"));
        assert_eq!(table.column("v0").map(|c| c.name.as_str()), Some("Zone Temp"));
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_series_views() {
        let table = sample_table();

        let series = table.series().unwrap();
        assert_eq!(series.name(), "Zone Temp");
        assert_eq!(series.len(), 2);
        assert_eq!(series.metadata().get_str("unit"), Some("°F"));
        assert_eq!(series.index().map(TimestampIndex::len), Some(2));
        assert_eq!(series.ts_metadata().get_str("tz"), Some("Los_Angeles"));

        let series = table.series_named("v1").unwrap();
        assert_eq!(series.values().category(0), Some("on"));
    }

    #[test]
    fn test_metadata_only_table() {
        let table = Table::metadata_only(GridInfo::new(), HeaderInfo::new());

        assert!(table.is_metadata_only());
        assert_eq!(table.row_count(), 0);
        assert!(table.series().is_none());
        assert_eq!(table.to_dataframe().unwrap().width(), 0);
    }

    #[test]
    fn test_to_dataframe() {
        let df = sample_table().to_dataframe().unwrap();

        assert_eq!(df.shape(), (2, 3));
        let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["ts", "Zone Temp", "v1"]);
        assert_eq!(
            df.column("ts").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(df.column("Zone Temp").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("v1").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Zone Temp").unwrap().null_count(), 1);
    }

    #[test]
    fn test_to_zinc_rows() {
        let text = sample_table().to_zinc().unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], r#"ver:"3.0""#);
        assert!(lines[1].starts_with(r#"ts tz:"Los_Angeles",v0 id:@p:a "Zone Temp""#));
        assert_eq!(lines[2], "2020-05-18T00:00:00-07:00 Los_Angeles,68.5°F,on");
        assert_eq!(lines[3], "2020-05-18T00:05:00-07:00 Los_Angeles,N,N");
        assert_eq!(lines.len(), 4);
    }
}

//! Integration tests for ZINC grid parsing
//!
//! These tests run complete payloads captured from a Haystack server through
//! the public API: parsing, file reads, DataFrame export and ZINC output.

use polars::prelude::{DataType, TimeUnit};
use std::io::Write;
use tempfile::NamedTempFile;
use zinc_frame::{
    ParseOptions, RefValue, TagValue, TypedColumn, ZincError, parse_series, parse_zinc, read_path,
};

const FULL_GRID: &str = include_str!("fixtures/full_grid.zinc");
const HIS_READ: &str = include_str!("fixtures/hisread_series.zinc");

/// Parse a multi-column chart grid with refs, enums and several units
///
/// Purpose: Validate end-to-end parsing of a realistic payload
/// Benefit: Covers display-name renaming, every coercion path and the ts index together
#[test]
fn test_parse_full_grid() {
    let table = parse_zinc(FULL_GRID, &ParseOptions::default()).expect("full grid parses");

    assert_eq!(table.row_count(), 5);
    let names: Vec<&str> = table.column_names().collect();
    assert_eq!(
        names,
        vec![
            "Building One VAV1-01 Eff Heat SP",
            "Building One VAV1-01 Eff Occupancy",
            "Building One VAV1-01 Damper Pos",
            "Building One VAV1-01 Occ Heat SP Offset",
            "Building One VAV1-01 Air Flow",
        ]
    );

    let heat_sp = table.column("v0").unwrap();
    assert_eq!(heat_sp.values.unit(), Some("°F"));
    assert_eq!(
        heat_sp.values.as_f64(),
        Some(&[None, Some(68.553), Some(68.554), Some(69.723), None][..])
    );

    let occupancy = table.column("v1").unwrap();
    match &occupancy.values {
        TypedColumn::Categorical { categories, codes } => {
            assert_eq!(categories.len(), 5);
            assert_eq!(codes, &vec![Some(1), None, None, None, Some(2)]);
        }
        other => panic!("expected a categorical column, got {other:?}"),
    }
    assert_eq!(occupancy.values.category(4), Some("Unoccupied"));

    assert_eq!(
        table.column("v2").unwrap().values.as_f64(),
        Some(&[None, Some(3.0), Some(7.0), Some(18.0), None][..])
    );
    assert_eq!(
        table.column("v3").unwrap().values.as_f64(),
        Some(&[None, Some(-1.984), Some(-2.203), Some(5.471), None][..])
    );
    assert_eq!(
        table.column("v4").unwrap().values.as_f64(),
        Some(&[None, Some(118.65), Some(62.0), None, None][..])
    );

    let index = table.index().unwrap();
    assert_eq!(index.tz, "Los_Angeles");
    assert_eq!(index.values[0].to_rfc3339(), "2020-05-17T23:47:08-07:00");
    assert_eq!(index.values[4].to_rfc3339(), "2020-05-18T01:13:09-07:00");

    // Metadata stays keyed by the header names
    let v2 = table.header().get("v2").unwrap();
    assert_eq!(v2.get("precision"), Some(&TagValue::Number(1.0)));
    assert_eq!(v2.get("curVal"), Some(&TagValue::Number(41.5)));
    assert_eq!(table.grid_info().get_str("view"), Some("chart"));
}

#[test]
fn test_parse_his_read_series() {
    let series = parse_series(HIS_READ, &ParseOptions::default()).unwrap();

    assert_eq!(series.name(), "val");
    assert!(series.metadata().is_empty());
    assert_eq!(series.values().unit(), Some("°F"));
    assert_eq!(
        series.values().as_f64(),
        Some(&[Some(66.092), Some(66.002), Some(65.93)][..])
    );
    assert_eq!(series.index().map(|index| index.len()), Some(3));
}

#[test]
fn test_his_read_grid_info() {
    let table = parse_zinc(HIS_READ, &ParseOptions::default()).unwrap();
    let grid_info = table.grid_info();

    assert_eq!(
        grid_info.get("id"),
        Some(&TagValue::Ref(RefValue::new(
            "@p:q01b001:r:20aad139-beff4e8c",
            "Building One VAV1-01 DA Temp"
        )))
    );
    assert_eq!(
        grid_info.get_str("hisEnd"),
        Some("2020-04-02T00:00:00-07:00 Los_Angeles")
    );
}

#[test]
fn test_full_grid_to_dataframe() {
    let table = parse_zinc(FULL_GRID, &ParseOptions::default()).unwrap();
    let df = table.to_dataframe().unwrap();

    assert_eq!(df.shape(), (5, 6));
    assert_eq!(
        df.column("ts").unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Milliseconds, None)
    );
    assert_eq!(
        df.column("Building One VAV1-01 Air Flow").unwrap().dtype(),
        &DataType::Float64
    );
    assert_eq!(
        df.column("Building One VAV1-01 Eff Occupancy").unwrap().dtype(),
        &DataType::String
    );

    let series_df = table.series().unwrap().to_dataframe().unwrap();
    assert_eq!(series_df.shape(), (5, 2));
}

/// Write a parsed grid back to ZINC and parse it again
///
/// Purpose: Validate that ZINC output carries everything the parser reads
/// Benefit: Catches drift between the header writer, the row writer and the parser
#[test]
fn test_to_zinc_round_trip() {
    for payload in [FULL_GRID, HIS_READ] {
        let table = parse_zinc(payload, &ParseOptions::default()).unwrap();
        let written = table.to_zinc().unwrap();
        let reparsed = parse_zinc(&written, &ParseOptions::default()).unwrap();

        assert_eq!(reparsed, table);
    }
}

#[test]
fn test_read_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FULL_GRID.as_bytes()).unwrap();

    let table = read_path(file.path(), &ParseOptions::default()).unwrap();
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.columns().len(), 5);
}

#[test]
fn test_read_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let error = read_path(dir.path().join("absent.zinc"), &ParseOptions::default()).unwrap_err();
    assert!(matches!(error, ZincError::Io(_)));
}

#[test]
fn test_malformed_payloads() {
    let options = ParseOptions::default();

    assert!(matches!(
        parse_zinc("", &options),
        Err(ZincError::MalformedInput { .. })
    ));
    assert!(matches!(
        parse_zinc("ver:\"3.0\" view:\"chart\"", &options),
        Err(ZincError::MalformedInput { .. })
    ));
    assert!(matches!(
        parse_zinc("ver:\"3.0\"\nts,val,val\n", &options),
        Err(ZincError::MalformedInput { .. })
    ));
}

#[test]
fn test_error_grid_is_reported() {
    let text = "ver:\"3.0\" err dis:\"sys::AuthErr: not logged in\" errTrace:\"...\"\nempty\n";
    let error = parse_zinc(text, &ParseOptions::default()).unwrap_err();

    assert!(matches!(error, ZincError::ErrorGrid { .. }));
    assert!(error.to_string().contains("not logged in"));
}

#[test]
fn test_column_errors_abort_the_parse() {
    let options = ParseOptions::default();

    let unknown_kind = "ver:\"3.0\"\nts,v0 kind:\"Bool\"\n2020-04-01T00:00:00-07:00 Los_Angeles,T\n";
    assert!(matches!(
        parse_zinc(unknown_kind, &options),
        Err(ZincError::UnrecognizedKind { .. })
    ));

    let bad_cell = "ver:\"3.0\"\nts,v0 kind:\"Number\" unit:\"%\"\n2020-04-01T00:00:00-07:00 Los_Angeles,open\n";
    assert!(matches!(
        parse_zinc(bad_cell, &options),
        Err(ZincError::UnitStripFailure { .. })
    ));
}

#[test]
fn test_metadata_only_grid() {
    let header_only: String = FULL_GRID.lines().take(2).collect::<Vec<_>>().join("\n");
    let table = parse_zinc(&header_only, &ParseOptions::default()).unwrap();

    assert!(table.is_metadata_only());
    assert_eq!(table.header().len(), 6);
    assert_eq!(table.row_count(), 0);
}

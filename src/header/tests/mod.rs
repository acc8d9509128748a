//! Test utilities for ZINC header parsing
//!
//! Fixtures shared by the splitter, tokenizer, normalizer and writer tests.


/// A full chart grid with five data columns
pub const FULL_GRID: &str = include_str!("../../../tests/fixtures/full_grid.zinc");

/// The version line of [`FULL_GRID`]
pub fn full_grid_version_line() -> &'static str {
    FULL_GRID.lines().next().unwrap()
}

/// The header line of [`FULL_GRID`]
pub fn full_grid_header_line() -> &'static str {
    FULL_GRID.lines().nth(1).unwrap()
}

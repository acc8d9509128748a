//! Application constants for the ZINC parser
//!
//! Tag names, kind values and defaults shared by the header normalizer,
//! the coercion engine and the table assembler.

// =============================================================================
// Grid Layout
// =============================================================================

/// Name given to the timestamp index built from column 0
pub const TS_COLUMN: &str = "ts";

/// Timezone name assumed when the `ts` column carries no `tz` tag
pub const DEFAULT_TZ: &str = "Los_Angeles";

/// Literal cell token for a null value in the data rows
pub const NULL_SENTINEL: &str = "N";

// =============================================================================
// Tag Names
// =============================================================================

pub const ID_TAG: &str = "id";
pub const UNIT_TAG: &str = "unit";
pub const KIND_TAG: &str = "kind";
pub const ENUM_TAG: &str = "enum";
pub const TZ_TAG: &str = "tz";

/// Grid-info tags
pub const VERSION_TAG: &str = "ver";
pub const ERR_TAG: &str = "err";
pub const ERR_TYPE_TAG: &str = "errType";
pub const DIS_TAG: &str = "dis";

/// Tags whose value is a number carrying the column unit as a suffix
pub const NUMERIC_TAGS: &[&str] = &["curVal", "precision", "writeLevel", "writeVal"];

// =============================================================================
// Column Kinds
// =============================================================================

pub const NUMBER_KIND: &str = "Number";
pub const STRING_KIND: &str = "Str";

/// Unit suffixes used to recognise numeric columns that have no metadata.
/// Checked in order; the first match wins.
pub const NUMERIC_UNIT_SUFFIXES: &[&str] = &["°F", "°C", "%", "cfm", "kW"];

// =============================================================================
// Environment
// =============================================================================

pub const ENV_DEFAULT_TZ: &str = "ZINC_DEFAULT_TZ";
pub const ENV_NULL_SENTINEL: &str = "ZINC_NULL_SENTINEL";

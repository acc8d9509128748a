//! Configuration for ZINC parsing.
//!
//! Defaults come from [`crate::constants`]; environment variables are layered
//! on top by [`ParseOptions::from_env`] and the CLI applies its own overrides
//! after that.

use crate::constants::{
    DEFAULT_TZ, ENV_DEFAULT_TZ, ENV_NULL_SENTINEL, NULL_SENTINEL, NUMERIC_UNIT_SUFFIXES,
};
use crate::error::{Result, ZincError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options controlling how a ZINC payload is turned into a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Timezone name stripped from `ts` cells when column 0 has no `tz` tag
    pub default_tz: String,

    /// Cell token read as null
    pub null_sentinel: String,

    /// Treat empty cells as null as well
    pub empty_as_null: bool,

    /// Unit suffixes tried when a column has no metadata
    pub unit_suffixes: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_tz: DEFAULT_TZ.to_string(),
            null_sentinel: NULL_SENTINEL.to_string(),
            empty_as_null: true,
            unit_suffixes: NUMERIC_UNIT_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ParseOptions {
    /// Defaults overridden by `ZINC_DEFAULT_TZ` and `ZINC_NULL_SENTINEL`
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(tz) = std::env::var(ENV_DEFAULT_TZ) {
            debug!("Default timezone overridden from environment: {}", tz);
            options.default_tz = tz;
        }
        if let Ok(sentinel) = std::env::var(ENV_NULL_SENTINEL) {
            debug!("Null sentinel overridden from environment: {}", sentinel);
            options.null_sentinel = sentinel;
        }

        options.validate()?;
        Ok(options)
    }

    /// Set the fallback timezone name
    pub fn with_default_tz(mut self, tz: impl Into<String>) -> Self {
        self.default_tz = tz.into();
        self
    }

    /// Set the null cell token
    pub fn with_null_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.null_sentinel = sentinel.into();
        self
    }

    /// Keep empty cells as empty strings instead of nulls
    pub fn keep_empty_cells(mut self) -> Self {
        self.empty_as_null = false;
        self
    }

    /// Replace the unit suffixes used for heuristic inference
    pub fn with_unit_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_tz.trim().is_empty() {
            return Err(ZincError::configuration("default timezone must not be empty"));
        }
        if self.null_sentinel.is_empty() {
            return Err(ZincError::configuration("null sentinel must not be empty"));
        }
        if self.unit_suffixes.iter().any(|s| s.is_empty()) {
            return Err(ZincError::configuration(
                "unit suffixes must not contain an empty string",
            ));
        }
        Ok(())
    }

    /// Whether a raw cell should be read as null
    pub fn is_null(&self, cell: &str) -> bool {
        cell == self.null_sentinel || (self.empty_as_null && cell.is_empty())
    }
}

//! Command-line argument definitions for zinc_frame
//!
//! Built with the clap derive API. Parse options given on the command line
//! are applied on top of the environment-derived [`ParseOptions`].

use crate::Result;
use crate::config::ParseOptions;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the ZINC grid tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "zinc_frame",
    version,
    about = "Inspect and rewrite Project Haystack ZINC grids",
    long_about = "Parses ZINC history grids into typed, timestamp-indexed tables. \
                  Shows grid info, per-column tag metadata and the first rows, or \
                  writes the parsed grid back out as ZINC."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show grid info, column metadata, column types and the first rows
    Inspect(InspectArgs),
    /// Parse a grid and write it back to stdout as ZINC
    Dump(DumpArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// ZINC file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of rows to preview
    #[arg(short = 'n', long = "rows", value_name = "N", default_value_t = 10)]
    pub rows: usize,

    #[command(flatten)]
    pub parse: ParseArgs,
}

#[derive(Debug, Clone, Parser)]
pub struct DumpArgs {
    /// ZINC file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub parse: ParseArgs,
}

/// Options shared by every command that parses a grid
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct ParseArgs {
    /// Timezone name stripped from timestamps when the ts column has no tz tag
    #[arg(long = "tz", value_name = "NAME")]
    pub tz: Option<String>,

    /// Keep empty cells as empty strings instead of nulls
    #[arg(long = "keep-empty")]
    pub keep_empty: bool,

    /// Cell token read as null
    #[arg(long = "null", value_name = "TOKEN")]
    pub null_sentinel: Option<String>,
}

impl ParseArgs {
    /// Environment defaults with the command line overrides applied
    pub fn to_options(&self) -> Result<ParseOptions> {
        let mut options = ParseOptions::from_env()?;
        if let Some(tz) = &self.tz {
            options = options.with_default_tz(tz.as_str());
        }
        if let Some(sentinel) = &self.null_sentinel {
            options = options.with_null_sentinel(sentinel.as_str());
        }
        if self.keep_empty {
            options = options.keep_empty_cells();
        }
        options.validate()?;
        Ok(options)
    }
}

impl Args {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

//! Command implementations for the zinc_frame CLI
//!
//! Each command reads one grid from disk, reports to stdout and leaves
//! diagnostics to the tracing subscriber on stderr.

use crate::cli::args::{Args, Commands, DumpArgs, InspectArgs, ParseArgs};
use crate::coercion::TypedColumn;
use crate::models::{ColumnMetadata, TagValue};
use crate::processor::read_path;
use crate::table::Table;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tracing::debug;

/// Run the command selected on the command line
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;

    match &args.command {
        Commands::Inspect(inspect) => run_inspect(inspect),
        Commands::Dump(dump) => run_dump(dump),
    }
}

/// Set up logging to stderr based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zinc_frame={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn load_table(file: &Path, parse: &ParseArgs) -> Result<Table> {
    let options = parse.to_options().context("Invalid parse options")?;
    read_path(file, &options).with_context(|| format!("Failed to parse {}", file.display()))
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let table = load_table(&args.file, &args.parse)?;

    println!("{}", "Grid".bright_green().bold());
    if table.grid_info().is_empty() {
        println!("  (no grid info)");
    }
    print_tags(table.grid_info(), "  ");

    println!("\n{}", "Columns".bright_green().bold());
    for (position, (zinc_name, metadata)) in table.header().iter().enumerate() {
        let description = if position == 0 {
            "index".to_string()
        } else {
            match table.column(zinc_name) {
                Some(column) => describe_column(&column.name, &column.values),
                None => "no data".to_string(),
            }
        };
        println!(
            "  {} {}",
            zinc_name.bright_white().bold(),
            format!("({})", description).cyan()
        );
        print_tags(metadata, "      ");
    }

    println!(
        "\n{} {}",
        "Rows:".bright_green().bold(),
        table.row_count().to_string().bright_white().bold()
    );

    if table.is_metadata_only() {
        return Ok(());
    }

    let df = table.to_dataframe().context("Failed to build DataFrame")?;
    println!("{}", df.head(Some(args.rows)));
    Ok(())
}

fn run_dump(args: &DumpArgs) -> Result<()> {
    let table = load_table(&args.file, &args.parse)?;
    let text = table.to_zinc().context("Failed to write ZINC")?;
    print!("{}", text);
    Ok(())
}

fn describe_column(display_name: &str, values: &TypedColumn) -> String {
    let nulls = values.null_count();
    let mut description = match values {
        TypedColumn::Float64 { unit, .. } => format!("{} [{}]", values.type_name(), unit),
        TypedColumn::Categorical { categories, .. } => {
            format!("{} of {}", values.type_name(), categories.len())
        }
        TypedColumn::Utf8(_) => values.type_name().to_string(),
    };
    description.push_str(&format!(", {} null", nulls));
    format!("{}: {}", display_name, description)
}

fn print_tags(metadata: &ColumnMetadata, indent: &str) {
    for (tag, value) in metadata.iter() {
        match value {
            TagValue::Marker => println!("{}{}", indent, tag.yellow()),
            _ => println!("{}{} = {}", indent, tag.yellow(), value),
        }
    }
}

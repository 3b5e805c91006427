//! Tables command - dump the sections found in a report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::json;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::output::tables::write_table_file;
use crate::parsing::report::{parse_report_file, DEFAULT_MIN_ROW_LENGTH};
use crate::utils::validation::validate_min_row_length;

/// Arguments for the tables command
#[derive(Args)]
pub struct TablesArgs {
    /// miRDeep2 report (result_<date>.csv). Use '-' for stdin; .gz is decompressed
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Directory for novel_predictions.tsv and known_predictions.tsv
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Lines shorter than this end a table in the report
    #[arg(long, default_value_t = DEFAULT_MIN_ROW_LENGTH)]
    pub min_row_length: usize,
}

/// Execute the tables command
///
/// # Errors
///
/// Returns an error if the report cannot be read or parsed, or a table file
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: TablesArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    validate_min_row_length(args.min_row_length)?;

    let report = parse_report_file(&args.input, args.min_row_length)
        .with_context(|| format!("Failed to read report {}", args.input.display()))?;
    if report.is_empty() {
        warn!("No prediction tables found in {}", args.input.display());
    }

    let mut written = Vec::new();
    for table in report.tables() {
        let path = write_table_file(&args.out_dir, table).with_context(|| {
            format!(
                "Failed to write {} table to {}",
                table.section,
                args.out_dir.display()
            )
        })?;
        written.push((table.section, table.len(), path));
    }

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                println!("No prediction tables found");
            }
            for (section, rows, path) in &written {
                println!("{section}: {rows} rows -> {}", path.display());
            }
        }
        OutputFormat::Json => {
            let tables: Vec<_> = written
                .iter()
                .map(|(section, rows, path)| {
                    json!({
                        "section": section.to_string(),
                        "rows": rows,
                        "path": path.display().to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "tables": tables }))?);
        }
        OutputFormat::Tsv => {
            println!("section\trows\tpath");
            for (section, rows, path) in &written {
                println!("{section}\t{rows}\t{}", path.display());
            }
        }
    }

    Ok(())
}

//! Convert command - the full report to GFF3/FASTA pipeline.
//!
//! Parse the report, filter each table, annotate the retained rows and write
//! them out. Arms of removed rows go to a separate FASTA file when FASTA
//! output is requested.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::annotate::{annotate_table, AnnotatedPrecursor};
use crate::cli::OutputFormat;
use crate::filter::{FilterReport, FilterThresholds, FilteredTable, QualityFilter};
use crate::output::fasta::{create_fasta_file, removed_fasta_path, ChunkedFastaWriter};
use crate::output::gff::create_gff_file;
use crate::output::tables::write_table_file;
use crate::parsing::report::{parse_report_file, DEFAULT_MIN_ROW_LENGTH};
use crate::parsing::seed::{parse_seed_file, SeedTable};
use crate::utils::validation::{validate_min_row_length, validate_thresholds};

/// Arguments for the convert command
#[derive(Args)]
pub struct ConvertArgs {
    /// miRDeep2 report (result_<date>.csv). Use '-' for stdin; .gz is decompressed
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// GFF3 output path
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Drop predictions with a miRDeep2 score below this value
    #[arg(long)]
    pub score_threshold: Option<f64>,

    /// Drop predictions whose true-positive estimate (0-100) is below this value
    #[arg(long)]
    pub true_positive_threshold: Option<f64>,

    /// Keep predictions with at least this many reads regardless of score
    #[arg(long)]
    pub exclude_count: Option<u64>,

    /// Tab-separated seed table with 'seed' and 'miRBase_name' columns.
    /// Arm identifiers get the seed family name appended.
    #[arg(long)]
    pub seed_table: Option<PathBuf>,

    /// Also write arm sequences to this FASTA file. Arms of filtered-out
    /// predictions go to removed_<name> in the same directory.
    #[arg(long)]
    pub fasta: Option<PathBuf>,

    /// Also write each parsed table as TSV next to the GFF3 output
    #[arg(long)]
    pub save_tables: bool,

    /// Lines shorter than this end a table in the report
    #[arg(long, default_value_t = DEFAULT_MIN_ROW_LENGTH)]
    pub min_row_length: usize,
}

/// Counts for one table of the report
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    #[serde(flatten)]
    pub filter: FilterReport,
    pub precursors_written: usize,
    pub arms_written: usize,
    pub arms_skipped: usize,
    pub removed_arms_written: usize,
}

/// What a conversion wrote
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub gff: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fasta: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_fasta: Option<PathBuf>,
    pub features_written: usize,
    pub tables: Vec<TableSummary>,
}

/// Execute the convert command
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be read
/// or parsed, or an output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ConvertArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let thresholds = FilterThresholds {
        score: args.score_threshold,
        true_positive: args.true_positive_threshold,
        exclude_count: args.exclude_count,
    };
    validate_thresholds(&thresholds)?;
    validate_min_row_length(args.min_row_length)?;
    if thresholds.exclude_count.is_some() && thresholds.score.is_none() {
        warn!("--exclude-count only applies together with --score-threshold");
    }

    let seeds = args
        .seed_table
        .as_deref()
        .map(|path| {
            parse_seed_file(path)
                .with_context(|| format!("Failed to read seed table {}", path.display()))
        })
        .transpose()?;

    let report = parse_report_file(&args.input, args.min_row_length)
        .with_context(|| format!("Failed to read report {}", args.input.display()))?;
    if report.is_empty() {
        warn!(
            "No prediction tables found in {}, writing an empty GFF3",
            args.input.display()
        );
    }

    if args.save_tables {
        let dir = output_dir(&args.output);
        for table in report.tables() {
            let path = write_table_file(dir, table).with_context(|| {
                format!(
                    "Failed to write {} table to {}",
                    table.section,
                    dir.display()
                )
            })?;
            info!("Wrote {} table to {}", table.section, path.display());
        }
    }

    let tables = report.into_tables();
    let filtered = QualityFilter::new(thresholds).filter(&tables);
    let summary = emit(
        &filtered,
        seeds.as_ref(),
        &args.output,
        args.fasta.as_deref(),
    )?;

    if verbose {
        info!(
            "Wrote {} features to {}",
            summary.features_written,
            summary.gff.display()
        );
    }

    match format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

/// Directory that holds `output`
fn output_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// A FASTA writer that names its file in every error
struct FastaOutput<'a> {
    path: &'a Path,
    writer: ChunkedFastaWriter<File>,
}

impl<'a> FastaOutput<'a> {
    fn create(path: &'a Path) -> anyhow::Result<Self> {
        let writer = create_fasta_file(path).with_context(|| Self::failure(path))?;
        Ok(Self { path, writer })
    }

    fn write_precursor(&mut self, precursor: &AnnotatedPrecursor) -> anyhow::Result<()> {
        let path = self.path;
        self.writer
            .write_precursor(precursor)
            .with_context(|| Self::failure(path))
    }

    fn finish(self) -> anyhow::Result<()> {
        let path = self.path;
        self.writer.finish().with_context(|| Self::failure(path))?;
        Ok(())
    }

    fn failure(path: &Path) -> String {
        format!("Failed to write FASTA output {}", path.display())
    }
}

/// Write GFF3 (and FASTA when `fasta` is given) for filtered tables.
///
/// Output order: table order, row order, precursor before arms, 5' before 3'.
/// All outputs are truncated first.
///
/// # Errors
///
/// Returns an error naming the path of any output that cannot be written.
pub fn emit(
    filtered: &[FilteredTable],
    seeds: Option<&SeedTable>,
    gff_path: &Path,
    fasta_path: Option<&Path>,
) -> anyhow::Result<ConversionSummary> {
    let gff_context = || format!("Failed to write GFF3 output {}", gff_path.display());
    let mut gff = create_gff_file(gff_path).with_context(gff_context)?;

    let removed_path = fasta_path.map(removed_fasta_path);
    let mut fasta = fasta_path.map(FastaOutput::create).transpose()?;
    let mut removed_fasta = removed_path
        .as_deref()
        .map(FastaOutput::create)
        .transpose()?;

    let mut tables = Vec::with_capacity(filtered.len());

    for table in filtered {
        let mut summary = TableSummary {
            filter: table.report.clone(),
            precursors_written: 0,
            arms_written: 0,
            arms_skipped: 0,
            removed_arms_written: 0,
        };

        for precursor in annotate_table(&table.retained, seeds) {
            gff.write_precursor(&precursor).with_context(gff_context)?;
            if let Some(output) = fasta.as_mut() {
                output.write_precursor(&precursor)?;
            }
            summary.precursors_written += 1;
            summary.arms_written += precursor.arms.len();
            summary.arms_skipped += precursor.issues.len();
        }

        if let Some(output) = removed_fasta.as_mut() {
            for precursor in annotate_table(&table.removed, seeds) {
                output.write_precursor(&precursor)?;
                summary.removed_arms_written += precursor.arms.len();
            }
        }

        tables.push(summary);
    }

    let features_written = gff.features_written();
    gff.finish().with_context(gff_context)?;
    if let Some(output) = fasta {
        output.finish()?;
    }
    if let Some(output) = removed_fasta {
        output.finish()?;
    }

    Ok(ConversionSummary {
        gff: gff_path.to_path_buf(),
        fasta: fasta_path.map(Path::to_path_buf),
        removed_fasta: removed_path,
        features_written,
        tables,
    })
}

fn print_text_summary(summary: &ConversionSummary) {
    println!(
        "\nWrote {} features to {}",
        summary.features_written,
        summary.gff.display()
    );
    if let Some(fasta) = &summary.fasta {
        println!("   Arm sequences: {}", fasta.display());
    }
    if let Some(removed) = &summary.removed_fasta {
        println!("   Removed arm sequences: {}", removed.display());
    }

    for table in &summary.tables {
        let report = &table.filter;
        println!(
            "\n   {} table: {} rows → {} removed by score ({:.1}%), {} removed by true-positive ({:.1}%), {} retained",
            report.section,
            report.input,
            report.removed_by_score,
            report.percent_of_input(report.removed_by_score),
            report.removed_by_true_positive,
            report.percent_of_input(report.removed_by_true_positive),
            report.retained,
        );
        println!(
            "   Features: {} precursors, {} arms ({} arms skipped)",
            table.precursors_written, table.arms_written, table.arms_skipped
        );
    }

    if summary.tables.is_empty() {
        println!("   No prediction tables found");
    }
}

fn print_tsv_summary(summary: &ConversionSummary) {
    println!(
        "section\tinput\tremoved_by_score\tremoved_by_true_positive\tretained\tprecursors\tarms\tarms_skipped\tremoved_arms"
    );
    for table in &summary.tables {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            table.filter.section,
            table.filter.input,
            table.filter.removed_by_score,
            table.filter.removed_by_true_positive,
            table.filter.retained,
            table.precursors_written,
            table.arms_written,
            table.arms_skipped,
            table.removed_arms_written,
        );
    }
}

//! Command-line interface for mirdeep2gff.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **convert**: Convert a miRDeep2 report to GFF3, optionally with FASTA
//! - **tables**: Dump the prediction tables embedded in a report
//!
//! ## Usage
//!
//! ```text
//! # Convert every prediction
//! mirdeep2gff convert -i result_08_10_2021.csv -o mirnas.gff3
//!
//! # Keep confident predictions, protect highly expressed ones, write arm FASTA
//! mirdeep2gff convert -i result.csv -o mirnas.gff3 \
//!     --score-threshold 4 --true-positive-threshold 60 --exclude-count 1000 \
//!     --fasta arms.fa
//!
//! # JSON summary for scripting
//! mirdeep2gff --format json convert -i result.csv -o mirnas.gff3
//!
//! # Look at the parsed tables
//! mirdeep2gff tables -i result.csv --out-dir tables/
//! ```

use clap::{Parser, Subcommand};

pub mod convert;
pub mod tables;

#[derive(Parser)]
#[command(name = "mirdeep2gff")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Convert miRDeep2 prediction reports to GFF3")]
#[command(
    long_about = "mirdeep2gff converts the novel and known miRNA tables of a miRDeep2 report into GFF3.\n\nEach prediction yields a pre_miRNA feature and up to two miRNA arm features, with:\n- Optional filtering by miRDeep2 score and true-positive estimate\n- Arm identifiers carrying sequence frequencies and optional seed families\n- Optional FASTA output of arm sequences, including arms of filtered-out rows"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a miRDeep2 report to GFF3 (and optionally FASTA)
    Convert(convert::ConvertArgs),

    /// Write the prediction tables found in a report as TSV files
    Tables(tables::TablesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

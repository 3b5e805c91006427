//! # mirdeep2gff
//!
//! A library for converting miRDeep2 prediction reports into GFF3 annotations.
//!
//! miRDeep2 writes its results as a single text report holding a table of
//! novel miRNA predictions and a table of known (miRBase) miRNAs detected in
//! the data. Each row describes a hairpin precursor with its genomic locus,
//! its sequence and the sequences of its mature and star arms, but not where
//! the arms sit on the genome.
//!
//! `mirdeep2gff` extracts both tables, optionally filters them, locates each
//! arm inside its hairpin and writes one `pre_miRNA` feature and up to two
//! `miRNA` features per prediction.
//!
//! ## Features
//!
//! - **Report scanning**: Finds both tables in the free-form report, plain or gzipped
//! - **Quality filtering**: Score and true-positive thresholds, with a read-count rescue
//! - **Arm placement**: Strand-aware 5'/3' arm coordinates from hairpin offsets
//! - **Informative identifiers**: Arm IDs carry arm, source, sequence frequency and seed family
//! - **FASTA output**: Arm sequences, with filtered-out arms kept in a separate file
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use mirdeep2gff::annotate::annotate_table;
//! use mirdeep2gff::filter::{FilterThresholds, QualityFilter};
//! use mirdeep2gff::output::gff::create_gff_file;
//! use mirdeep2gff::parsing::report::{parse_report_file, DEFAULT_MIN_ROW_LENGTH};
//!
//! let report = parse_report_file(Path::new("result.csv"), DEFAULT_MIN_ROW_LENGTH).unwrap();
//! let filter = QualityFilter::new(FilterThresholds {
//!     score: Some(4.0),
//!     ..Default::default()
//! });
//!
//! let mut gff = create_gff_file(Path::new("mirnas.gff3")).unwrap();
//! for table in filter.filter(&report.into_tables()) {
//!     for precursor in annotate_table(&table.retained, None) {
//!         gff.write_precursor(&precursor).unwrap();
//!     }
//! }
//! gff.finish().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for prediction rows, loci and features
//! - [`parsing`]: Report scanner, table decoder and seed table reader
//! - [`filter`]: Score and true-positive filtering
//! - [`annotate`]: Arm placement and identifier assignment
//! - [`output`]: GFF3, FASTA and table writers
//! - [`cli`]: Command-line interface implementation

pub mod annotate;
pub mod cli;
pub mod core;
pub mod filter;
pub mod output;
pub mod parsing;
pub mod utils;

pub use annotate::{annotate_table, AnnotatedPrecursor};
pub use core::feature::{Feature, FeatureType};
pub use core::record::{PredictionRecord, PredictionTable, SectionKind};
pub use filter::{FilterThresholds, QualityFilter};
pub use parsing::report::{parse_report_file, ParseError, ParsedReport};

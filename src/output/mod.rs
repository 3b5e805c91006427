//! Writers for converted predictions.
//!
//! - [`gff`]: GFF3 with a `##gff-version 3` header line
//! - [`fasta`]: Arm sequences, buffered and flushed in bounded chunks
//! - [`tables`]: Tab-separated dumps of the report sections as parsed

pub mod fasta;
pub mod gff;
pub mod tables;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table write error: {0}")]
    Csv(#[from] csv::Error),
}

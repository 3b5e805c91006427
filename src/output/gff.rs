use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::annotate::AnnotatedPrecursor;
use crate::core::feature::Feature;
use crate::output::OutputError;

pub const GFF_VERSION_HEADER: &str = "##gff-version 3";

/// GFF3 writer. The version header is written on construction, so a file is
/// never left without it.
#[derive(Debug)]
pub struct GffWriter<W: Write> {
    inner: W,
    features: usize,
}

impl<W: Write> GffWriter<W> {
    /// Wrap `inner` and write the version header
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if the header cannot be written.
    pub fn new(mut inner: W) -> Result<Self, OutputError> {
        writeln!(inner, "{GFF_VERSION_HEADER}")?;
        Ok(Self { inner, features: 0 })
    }

    /// # Errors
    ///
    /// Returns `OutputError::Io` on write failure.
    pub fn write_feature(&mut self, feature: &Feature) -> Result<(), OutputError> {
        writeln!(self.inner, "{}", feature.to_gff_line())?;
        self.features += 1;
        Ok(())
    }

    /// Write the precursor, then its 5' and 3' arms
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` on write failure.
    pub fn write_precursor(&mut self, precursor: &AnnotatedPrecursor) -> Result<(), OutputError> {
        for feature in precursor.features() {
            self.write_feature(feature)?;
        }
        Ok(())
    }

    /// Number of feature lines written so far
    pub fn features_written(&self) -> usize {
        self.features
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if flushing fails.
    pub fn finish(mut self) -> Result<W, OutputError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Create (or truncate) a GFF3 file and write its header
///
/// # Errors
///
/// Returns `OutputError::Io` if the file cannot be created.
pub fn create_gff_file(path: &Path) -> Result<GffWriter<BufWriter<File>>, OutputError> {
    let file = File::create(path)?;
    GffWriter::new(BufWriter::new(file))
}

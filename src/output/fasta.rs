//! FASTA output for arm sequences.
//!
//! Records accumulate in an in-memory chunk that is written out once it
//! grows past the flush threshold, which bounds memory on very large reports.
//! One header line and one unwrapped sequence line per arm.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::annotate::AnnotatedPrecursor;
use crate::output::OutputError;

/// Chunk size, in characters, that triggers a write
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100_000;

/// Prefix of the companion file holding arms of filtered-out rows
pub const REMOVED_PREFIX: &str = "removed_";

/// Path of the removed-rows FASTA: same directory, file name prefixed
#[must_use]
pub fn removed_fasta_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{REMOVED_PREFIX}{name}"))
}

#[derive(Debug)]
pub struct ChunkedFastaWriter<W: Write> {
    inner: Option<W>,
    chunk: String,
    threshold: usize,
    records: usize,
}

impl<W: Write> ChunkedFastaWriter<W> {
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self::with_threshold(inner, DEFAULT_FLUSH_THRESHOLD)
    }

    #[must_use]
    pub fn with_threshold(inner: W, threshold: usize) -> Self {
        Self {
            inner: Some(inner),
            chunk: String::new(),
            threshold,
            records: 0,
        }
    }

    /// Append one record, writing the chunk out if it passed the threshold
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if a chunk cannot be written.
    pub fn write_record(&mut self, id: &str, sequence: &str) -> Result<(), OutputError> {
        self.chunk.push('>');
        self.chunk.push_str(id);
        self.chunk.push('\n');
        self.chunk.push_str(sequence);
        self.chunk.push('\n');
        self.records += 1;

        if self.chunk.len() > self.threshold {
            self.flush_chunk()?;
        }
        Ok(())
    }

    /// Append every placed arm of a precursor, 5' first
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if a chunk cannot be written.
    pub fn write_precursor(&mut self, precursor: &AnnotatedPrecursor) -> Result<(), OutputError> {
        for arm in &precursor.arms {
            self.write_record(&arm.feature.id, &arm.sequence)?;
        }
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Bytes waiting in the current chunk
    pub fn pending(&self) -> usize {
        self.chunk.len()
    }

    fn flush_chunk(&mut self) -> Result<(), OutputError> {
        if let Some(inner) = self.inner.as_mut() {
            inner.write_all(self.chunk.as_bytes())?;
            self.chunk.clear();
        }
        Ok(())
    }

    /// Write the last chunk, flush and return the underlying writer
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if the final chunk cannot be written.
    pub fn finish(mut self) -> Result<W, OutputError> {
        self.flush_chunk()?;
        let mut inner = self
            .inner
            .take()
            .ok_or_else(|| std::io::Error::other("FASTA writer already finished"))?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Drop for ChunkedFastaWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && !self.chunk.is_empty() {
            if let Err(e) = self.flush_chunk() {
                warn!("Failed to write final FASTA chunk: {e}");
            }
        }
    }
}

/// Create (or truncate) a FASTA file
///
/// # Errors
///
/// Returns `OutputError::Io` if the file cannot be created.
pub fn create_fasta_file(path: &Path) -> Result<ChunkedFastaWriter<File>, OutputError> {
    Ok(ChunkedFastaWriter::new(File::create(path)?))
}

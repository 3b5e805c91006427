use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::core::record::{PredictionTable, SectionKind};
use crate::output::OutputError;

/// File name used when dumping a section into `dir`
#[must_use]
pub fn table_dump_path(dir: &Path, section: SectionKind) -> PathBuf {
    dir.join(format!("{section}_predictions.tsv"))
}

/// Write a section as tab-separated text: its header, then each row as read
///
/// # Errors
///
/// Returns `OutputError::Csv` on write failure.
pub fn write_table<W: Write>(writer: W, table: &PredictionTable) -> Result<(), OutputError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .from_writer(writer);

    writer.write_record(&table.header)?;
    for record in &table.records {
        writer.write_record(&record.raw)?;
    }
    writer.flush()?;
    Ok(())
}

/// Dump a section to `table_dump_path(dir, section)`, returning the path
///
/// # Errors
///
/// Returns `OutputError::Io` if the file cannot be created, or
/// `OutputError::Csv` on write failure.
pub fn write_table_file(dir: &Path, table: &PredictionTable) -> Result<PathBuf, OutputError> {
    let path = table_dump_path(dir, table.section);
    let file = std::fs::File::create(&path)?;
    write_table(std::io::BufWriter::new(file), table)?;
    Ok(path)
}

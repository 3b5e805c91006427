//! Parser for miRDeep2 `result_<date>.csv` reports.
//!
//! A report is free text with up to two embedded tab-separated tables. Each
//! table starts on the line after its marker phrase and runs until the first
//! line shorter than the row-length tolerance, or a line carrying the other
//! section's marker. Short lines end a table because every real data row is
//! long (it carries the full hairpin sequence and several URLs).

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::record::{
    columns, Locus, PredictionRecord, PredictionTable, RecordKind, SectionKind,
};

/// Lines shorter than this (terminator included) close an open section
pub const DEFAULT_MIN_ROW_LENGTH: usize = 100;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {0} table: {1}")]
    InvalidFormat(SectionKind, String),

    #[error("Malformed {section} table: no '{column}' column")]
    MissingColumn {
        section: SectionKind,
        column: String,
    },

    #[error("Malformed {section} table, row {row}: invalid '{column}' value '{value}'")]
    InvalidField {
        section: SectionKind,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Invalid seed table: {0}")]
    InvalidSeedTable(String),
}

/// Scanner position within a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    InsideNovel,
    InsideKnown,
}

impl ScanState {
    /// State entered after reading `line` while idle
    fn enter(line: &str) -> Self {
        if line.contains(SectionKind::Novel.marker()) {
            Self::InsideNovel
        } else if line.contains(SectionKind::Known.marker()) {
            Self::InsideKnown
        } else {
            Self::Idle
        }
    }
}

/// Raw text of both sections, exactly as accumulated from the report
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScannedSections {
    pub novel: String,
    pub known: String,
}

/// Splits a report into its novel and known section buffers
#[derive(Debug, Clone, Copy)]
pub struct SectionScanner {
    min_row_length: usize,
}

impl Default for SectionScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ROW_LENGTH)
    }
}

impl SectionScanner {
    #[must_use]
    pub fn new(min_row_length: usize) -> Self {
        Self { min_row_length }
    }

    /// Single pass over the report. The two sections are mutually exclusive:
    /// a line is only tested for a marker while no section is open.
    #[must_use]
    pub fn scan(&self, text: &str) -> ScannedSections {
        let mut sections = ScannedSections::default();
        let mut state = ScanState::Idle;

        for line in text.split_inclusive('\n') {
            state = match state {
                ScanState::Idle => ScanState::enter(line),
                ScanState::InsideNovel | ScanState::InsideKnown => {
                    let (buffer, other) = if state == ScanState::InsideNovel {
                        (&mut sections.novel, SectionKind::Known)
                    } else {
                        (&mut sections.known, SectionKind::Novel)
                    };

                    if line_length(line) < self.min_row_length
                        || line.contains(other.marker())
                    {
                        ScanState::enter(line)
                    } else {
                        buffer.push_str(line);
                        state
                    }
                }
            };
        }

        sections
    }
}

/// Length of a line in characters, counting any line ending as one
fn line_length(line: &str) -> usize {
    let content = line.trim_end_matches(['\r', '\n']);
    content.chars().count() + usize::from(content.len() != line.len())
}

/// Tables found in a report. Either slot may be empty.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedReport {
    pub novel: Option<PredictionTable>,
    pub known: Option<PredictionTable>,
}

impl ParsedReport {
    /// Tables in emission order: novel first, then known
    pub fn tables(&self) -> impl Iterator<Item = &PredictionTable> {
        self.novel.iter().chain(self.known.iter())
    }

    pub fn into_tables(self) -> Vec<PredictionTable> {
        self.novel.into_iter().chain(self.known).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.novel.is_none() && self.known.is_none()
    }
}

/// Read report text from a file, a `.gz` file, or stdin when the path is `-`
///
/// # Errors
///
/// Returns `ParseError::Io` if the input cannot be read or is not valid UTF-8.
pub fn read_report_text(path: &Path) -> Result<String, ParseError> {
    let mut text = String::new();

    if path.as_os_str() == "-" {
        std::io::stdin().read_to_string(&mut text)?;
    } else if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    {
        let file = std::fs::File::open(path)?;
        GzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)?;
    }

    Ok(text)
}

/// Parse a report file into its tables
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the errors of
/// [`parse_report_text`].
pub fn parse_report_file(path: &Path, min_row_length: usize) -> Result<ParsedReport, ParseError> {
    let text = read_report_text(path)?;
    parse_report_text(&text, min_row_length)
}

/// Parse report text into its tables.
///
/// A section that is missing or not tabular is left empty. A tabular section
/// that lacks a required column, or has a row with an unreadable coordinate,
/// score or read count, is an error.
///
/// # Errors
///
/// Returns `ParseError::MissingColumn` or `ParseError::InvalidField`.
pub fn parse_report_text(text: &str, min_row_length: usize) -> Result<ParsedReport, ParseError> {
    let sections = SectionScanner::new(min_row_length).scan(text);

    Ok(ParsedReport {
        novel: parse_section(SectionKind::Novel, &sections.novel)?,
        known: parse_section(SectionKind::Known, &sections.known)?,
    })
}

/// Decode one section buffer (header row + data rows) into a table
///
/// # Errors
///
/// Returns `ParseError::MissingColumn` or `ParseError::InvalidField`.
pub fn parse_section(
    section: SectionKind,
    buffer: &str,
) -> Result<Option<PredictionTable>, ParseError> {
    if buffer.trim().is_empty() {
        debug!("No {section} section in report");
        return Ok(None);
    }

    match decode_section(section, buffer) {
        Ok(table) => {
            debug!("Parsed {} {section} predictions", table.len());
            Ok(Some(table))
        }
        Err(ParseError::InvalidFormat(_, reason)) => {
            warn!("Skipping {section} section: {reason}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn decode_section(section: SectionKind, buffer: &str) -> Result<PredictionTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(buffer.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| ParseError::InvalidFormat(section, e.to_string()))?
        .clone();
    if header.len() < 2 {
        return Err(ParseError::InvalidFormat(
            section,
            "header is not tab-separated".to_string(),
        ));
    }

    let index = ColumnIndex::from_header(section, &header)?;
    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = result.map_err(|e| ParseError::InvalidFormat(section, e.to_string()))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(index.decode(section, i + 1, &row)?);
    }

    Ok(PredictionTable::new(
        section,
        header.iter().map(str::to_string).collect(),
        records,
    ))
}

/// Identity columns; which set is present decides the record kind
#[derive(Debug, Clone, Copy)]
enum KindColumns {
    Novel { provisional_id: usize },
    Known { mirbase_name: usize, tag_id: Option<usize> },
}

/// Positions of the required columns within a section header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    kind: KindColumns,
    coordinate: usize,
    star: usize,
    mature: usize,
    precursor: usize,
    total_read_count: usize,
    score: usize,
    true_positive: usize,
}

impl ColumnIndex {
    fn from_header(section: SectionKind, header: &StringRecord) -> Result<Self, ParseError> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| ParseError::MissingColumn {
                section,
                column: name.to_string(),
            })
        };

        let kind = if let Some(provisional_id) = find(columns::PROVISIONAL_ID) {
            KindColumns::Novel { provisional_id }
        } else if let Some(mirbase_name) = find(columns::MIRBASE_MIRNA) {
            KindColumns::Known {
                mirbase_name,
                tag_id: find(columns::TAG_ID),
            }
        } else {
            return Err(ParseError::MissingColumn {
                section,
                column: format!("{}' or '{}", columns::PROVISIONAL_ID, columns::MIRBASE_MIRNA),
            });
        };

        let true_positive = find(columns::NOVEL_TRUE_POSITIVE)
            .or_else(|| find(columns::KNOWN_TRUE_POSITIVE))
            .ok_or_else(|| ParseError::MissingColumn {
                section,
                column: columns::NOVEL_TRUE_POSITIVE.to_string(),
            })?;

        Ok(Self {
            kind,
            coordinate: require(columns::PRECURSOR_COORDINATE)?,
            star: require(columns::STAR_SEQUENCE)?,
            mature: require(columns::MATURE_SEQUENCE)?,
            precursor: require(columns::PRECURSOR_SEQUENCE)?,
            total_read_count: require(columns::TOTAL_READ_COUNT)?,
            score: require(columns::SCORE)?,
            true_positive,
        })
    }

    fn decode(
        &self,
        section: SectionKind,
        row: usize,
        record: &StringRecord,
    ) -> Result<PredictionRecord, ParseError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();
        let invalid = |column: &'static str, value: &str| ParseError::InvalidField {
            section,
            row,
            column,
            value: value.to_string(),
        };

        let coordinate = cell(self.coordinate);
        let locus = Locus::parse(coordinate)
            .ok_or_else(|| invalid(columns::PRECURSOR_COORDINATE, coordinate))?;

        let score_cell = cell(self.score);
        let score: f64 = score_cell
            .parse()
            .map_err(|_| invalid(columns::SCORE, score_cell))?;

        let count_cell = cell(self.total_read_count);
        let total_read_count =
            parse_count(count_cell).ok_or_else(|| invalid(columns::TOTAL_READ_COUNT, count_cell))?;

        let kind = match self.kind {
            KindColumns::Novel { provisional_id } => RecordKind::Novel {
                provisional_id: cell(provisional_id).to_string(),
            },
            KindColumns::Known {
                mirbase_name,
                tag_id,
            } => RecordKind::Known {
                mirbase_name: cell(mirbase_name).to_string(),
                tag_id: tag_id
                    .map(|idx| cell(idx).to_string())
                    .filter(|s| !s.is_empty()),
            },
        };

        Ok(PredictionRecord {
            kind,
            locus,
            precursor_sequence: cell(self.precursor).to_string(),
            mature_sequence: cell(self.mature).to_string(),
            star_sequence: cell(self.star).to_string(),
            score,
            total_read_count,
            true_positive: cell(self.true_positive).to_string(),
            row,
            raw: record.iter().map(str::to_string).collect(),
        })
    }
}

/// Read counts are integers, but accept an integral float such as `50.0`
fn parse_count(s: &str) -> Option<u64> {
    if let Ok(count) = s.parse::<u64>() {
        return Some(count);
    }
    let value: f64 = s.parse().ok()?;
    if value < 0.0 || value.fract() != 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value as u64;
    Some(count)
}

use serde::{Deserialize, Serialize};

use crate::core::types::{ArmSource, Strand};

/// Column names of the miRDeep2 result tables
pub mod columns {
    pub const PRECURSOR_COORDINATE: &str = "precursor coordinate";
    pub const STAR_SEQUENCE: &str = "consensus star sequence";
    pub const MATURE_SEQUENCE: &str = "consensus mature sequence";
    pub const PRECURSOR_SEQUENCE: &str = "consensus precursor sequence";
    pub const TOTAL_READ_COUNT: &str = "total read count";
    pub const SCORE: &str = "miRDeep2 score";
    pub const PROVISIONAL_ID: &str = "provisional id";
    pub const MIRBASE_MIRNA: &str = "mature miRBase miRNA";
    pub const TAG_ID: &str = "tag id";
    pub const NOVEL_TRUE_POSITIVE: &str =
        "estimated probability that the miRNA candidate is a true positive";
    pub const KNOWN_TRUE_POSITIVE: &str = "estimated probability that the miRNA is a true positive";
}

/// Which report section a table was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Novel,
    Known,
}

impl SectionKind {
    /// Phrase that marks the start of this section in a report
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Novel => "novel miRNAs predicted by",
            Self::Known => "mature miRBase miRNAs detected by",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Novel => write!(f, "novel"),
            Self::Known => write!(f, "known"),
        }
    }
}

/// Identity of a prediction, which differs between novel and known rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Novel {
        provisional_id: String,
    },
    Known {
        mirbase_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag_id: Option<String>,
    },
}

/// Precursor placement parsed from `name:start..end:strand`
///
/// `start0` is 0-based, `end` is exclusive in 0-based terms, which makes it
/// the inclusive 1-based end unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locus {
    pub seqid: String,
    pub start0: u64,
    pub end: u64,
    pub strand: Strand,
}

impl Locus {
    /// Parse a miRDeep2 precursor coordinate descriptor.
    ///
    /// The sequence name may itself contain `:`, so the range and strand are
    /// taken from the right.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let mut parts = descriptor.trim().rsplitn(3, ':');
        let strand = Strand::parse(parts.next()?)?;
        let range = parts.next()?;
        let seqid = parts.next()?;
        if seqid.is_empty() {
            return None;
        }

        let (start, end) = range.split_once("..")?;
        let start0: u64 = start.trim().parse().ok()?;
        let end: u64 = end.trim().parse().ok()?;
        if end <= start0 {
            return None;
        }

        Some(Self {
            seqid: seqid.to_string(),
            start0,
            end,
            strand,
        })
    }

    /// 1-based inclusive start
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start0 + 1
    }
}

/// One typed row of a report section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub kind: RecordKind,
    pub locus: Locus,
    pub precursor_sequence: String,
    pub mature_sequence: String,
    pub star_sequence: String,
    pub score: f64,
    pub total_read_count: u64,
    /// Raw true-positive cell, e.g. `91 +/- 2%`
    pub true_positive: String,
    /// 1-based data row within its section
    pub row: usize,
    /// Cells as they appeared in the report, in header order
    #[serde(skip)]
    pub raw: Vec<String>,
}

impl PredictionRecord {
    /// Identifier shared by the precursor and both of its arms
    #[must_use]
    pub fn precursor_id(&self) -> String {
        match &self.kind {
            RecordKind::Novel { provisional_id } => provisional_id.clone(),
            RecordKind::Known { mirbase_name, .. } => {
                mirbase_name.replace("-3p", "").replace("-5p", "")
            }
        }
    }

    #[must_use]
    pub fn sequence(&self, source: ArmSource) -> &str {
        match source {
            ArmSource::Mature => &self.mature_sequence,
            ArmSource::Star => &self.star_sequence,
        }
    }

    /// Leading number of the true-positive cell, if it has one
    #[must_use]
    pub fn true_positive_probability(&self) -> Option<f64> {
        parse_leading_number(&self.true_positive)
    }
}

/// All records of one report section
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    pub section: SectionKind,
    /// Header cells as they appeared in the report
    pub header: Vec<String>,
    pub records: Vec<PredictionRecord>,
}

impl PredictionTable {
    #[must_use]
    pub fn new(section: SectionKind, header: Vec<String>, records: Vec<PredictionRecord>) -> Self {
        Self {
            section,
            header,
            records,
        }
    }

    /// Same section and header with a different set of rows
    #[must_use]
    pub fn with_records(&self, records: Vec<PredictionRecord>) -> Self {
        Self {
            section: self.section,
            header: self.header.clone(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse the leading numeric token of a cell such as `91 +/- 2%`.
#[must_use]
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

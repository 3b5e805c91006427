//! Arm resolution: place the star and mature sequences on the genome.
//!
//! Which arm is 5' and which is 3' is decided purely by position: the
//! sequence found earlier in the hairpin is the 5' arm, whichever column
//! supplied it. On the minus strand the hairpin reads from the precursor's
//! end, so arm coordinates are measured back from `end`.

use serde::Serialize;
use thiserror::Error;

use crate::core::record::PredictionRecord;
use crate::core::types::{is_absent, ArmSide, ArmSource, Strand};

/// Row-level problems that drop a single arm but keep the precursor
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResolveError {
    #[error("{arm:?} sequence '{sequence}' not found in hairpin")]
    SequenceNotFound { arm: ArmSource, sequence: String },

    #[error("{arm:?} arm at hairpin offset {offset} would start before position 1")]
    CoordinateUnderflow { arm: ArmSource, offset: usize },
}

/// An arm placed on the genome. Coordinates are 1-based inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArm {
    pub side: ArmSide,
    pub source: ArmSource,
    pub sequence: String,
    /// 0-based offset of the sequence within the hairpin
    pub offset: usize,
    pub start: u64,
    pub end: u64,
}

/// A precursor with whichever arms could be placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrecursor {
    pub seqid: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub arm5p: Option<ResolvedArm>,
    pub arm3p: Option<ResolvedArm>,
    /// Arms that were present in the report but could not be placed
    pub issues: Vec<ResolveError>,
}

impl ResolvedPrecursor {
    /// Placed arms, 5' first
    pub fn arms(&self) -> impl Iterator<Item = &ResolvedArm> {
        self.arm5p.iter().chain(self.arm3p.iter())
    }
}

/// Locate the arms of a record within its hairpin and on the genome.
#[must_use]
pub fn resolve(record: &PredictionRecord) -> ResolvedPrecursor {
    let locus = &record.locus;
    let hairpin = record.precursor_sequence.as_str();
    let mut issues = Vec::new();

    // Star first so that it takes the 5' side when both sit at the same offset
    let mut found: Vec<(ArmSource, usize)> = Vec::with_capacity(2);
    for source in [ArmSource::Star, ArmSource::Mature] {
        let sequence = record.sequence(source);
        if is_absent(sequence) {
            continue;
        }
        match hairpin.find(sequence) {
            Some(offset) => found.push((source, offset)),
            None => issues.push(ResolveError::SequenceNotFound {
                arm: source,
                sequence: sequence.to_string(),
            }),
        }
    }
    found.sort_by_key(|&(_, offset)| offset);

    let sides: Vec<(ArmSide, ArmSource, usize)> = match found.as_slice() {
        [] => Vec::new(),
        [(source, offset)] => {
            let len = record.sequence(*source).len();
            vec![(lone_arm_side(*offset, len, hairpin.len()), *source, *offset)]
        }
        [(first, first_offset), (second, second_offset), ..] => vec![
            (ArmSide::FivePrime, *first, *first_offset),
            (ArmSide::ThreePrime, *second, *second_offset),
        ],
    };

    let mut resolved = ResolvedPrecursor {
        seqid: locus.seqid.clone(),
        start: locus.start(),
        end: locus.end,
        strand: locus.strand,
        arm5p: None,
        arm3p: None,
        issues: Vec::new(),
    };

    for (side, source, offset) in sides {
        let sequence = record.sequence(source);
        match place_arm(&resolved, offset, sequence.len()) {
            Some((start, end)) => {
                let arm = ResolvedArm {
                    side,
                    source,
                    sequence: sequence.to_string(),
                    offset,
                    start,
                    end,
                };
                match side {
                    ArmSide::FivePrime => resolved.arm5p = Some(arm),
                    ArmSide::ThreePrime => resolved.arm3p = Some(arm),
                }
            }
            None => issues.push(ResolveError::CoordinateUnderflow { arm: source, offset }),
        }
    }

    resolved.issues = issues;
    resolved
}

/// A single arm is 5' when its midpoint falls in the first half of the hairpin
fn lone_arm_side(offset: usize, len: usize, hairpin_len: usize) -> ArmSide {
    if 2 * offset + len <= hairpin_len {
        ArmSide::FivePrime
    } else {
        ArmSide::ThreePrime
    }
}

/// Genomic span of an arm of `len` bases at hairpin `offset`
fn place_arm(precursor: &ResolvedPrecursor, offset: usize, len: usize) -> Option<(u64, u64)> {
    let offset = offset as u64;
    let len = len as u64;

    match precursor.strand {
        Strand::Forward => {
            let start = precursor.start + offset;
            Some((start, start + len - 1))
        }
        Strand::Reverse => {
            let end = precursor.end.checked_sub(offset)?;
            let start = end.checked_sub(len - 1)?;
            (start >= 1).then_some((start, end))
        }
    }
}

//! Feature identifiers for precursors and arms.
//!
//! Arm identifiers have the form `{precursor}-{5p|3p}-{m|s}-{frequency}`,
//! optionally followed by `-{seed family}`:
//!
//! - `m`/`s` records whether the mature or the star column supplied the arm
//! - `frequency` is how many rows of the same table carry exactly this
//!   sequence in that same column
//! - the seed suffix is the family name looked up from the arm's 7-mer seed
//!   (bases 2-8), or the seed itself when the lookup misses

use std::collections::HashMap;

use crate::annotate::arms::{ResolvedArm, ResolvedPrecursor};
use crate::core::record::{PredictionRecord, PredictionTable};
use crate::core::types::ArmSource;
use crate::parsing::seed::SeedTable;

/// Seed starts at the second base of the arm
pub const SEED_OFFSET: usize = 1;
pub const SEED_LENGTH: usize = 7;

/// Uppercase 7-mer seed of an arm sequence, if it is long enough
#[must_use]
pub fn seed_of(sequence: &str) -> Option<String> {
    sequence
        .get(SEED_OFFSET..SEED_OFFSET + SEED_LENGTH)
        .map(str::to_ascii_uppercase)
}

/// Occurrence counts of each exact sequence, per column, over one table
#[derive(Debug, Default, Clone)]
pub struct SequenceFrequencies {
    mature: HashMap<String, usize>,
    star: HashMap<String, usize>,
}

impl SequenceFrequencies {
    #[must_use]
    pub fn from_table(table: &PredictionTable) -> Self {
        let mut frequencies = Self::default();
        for record in &table.records {
            *frequencies
                .mature
                .entry(record.mature_sequence.clone())
                .or_default() += 1;
            *frequencies
                .star
                .entry(record.star_sequence.clone())
                .or_default() += 1;
        }
        frequencies
    }

    #[must_use]
    pub fn count(&self, source: ArmSource, sequence: &str) -> usize {
        let counts = match source {
            ArmSource::Mature => &self.mature,
            ArmSource::Star => &self.star,
        };
        counts.get(sequence).copied().unwrap_or(0)
    }
}

/// Identifiers for one precursor and its placed arms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedIds {
    pub precursor: String,
    pub arm5p: Option<String>,
    pub arm3p: Option<String>,
}

/// Builds identifiers for the rows of a single table
#[derive(Debug)]
pub struct IdentifierAssigner<'a> {
    frequencies: SequenceFrequencies,
    seeds: Option<&'a SeedTable>,
}

impl<'a> IdentifierAssigner<'a> {
    /// Frequencies are a snapshot of `table` taken here
    #[must_use]
    pub fn new(table: &PredictionTable, seeds: Option<&'a SeedTable>) -> Self {
        Self {
            frequencies: SequenceFrequencies::from_table(table),
            seeds,
        }
    }

    #[must_use]
    pub fn arm_id(&self, precursor_id: &str, arm: &ResolvedArm) -> String {
        let frequency = self.frequencies.count(arm.source, &arm.sequence);
        let mut id = format!(
            "{precursor_id}-{}-{}-{frequency}",
            arm.side,
            arm.source.tag()
        );

        if let Some(seeds) = self.seeds {
            if let Some(seed) = seed_of(&arm.sequence) {
                id.push('-');
                id.push_str(seeds.lookup(&seed).unwrap_or(seed.as_str()));
            }
        }

        id
    }

    #[must_use]
    pub fn assign(&self, record: &PredictionRecord, resolved: &ResolvedPrecursor) -> AssignedIds {
        let precursor = record.precursor_id();
        AssignedIds {
            arm5p: resolved.arm5p.as_ref().map(|arm| self.arm_id(&precursor, arm)),
            arm3p: resolved.arm3p.as_ref().map(|arm| self.arm_id(&precursor, arm)),
            precursor,
        }
    }
}

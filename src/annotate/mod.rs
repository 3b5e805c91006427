//! Turn prediction rows into GFF3 features.
//!
//! For every row this module:
//!
//! 1. Resolves the star and mature sequences to 5'/3' arms with genomic
//!    coordinates ([`arms::resolve`])
//! 2. Assigns identifiers from the row's identity column, per-table sequence
//!    frequencies and an optional seed table ([`ids::IdentifierAssigner`])
//! 3. Builds one `pre_miRNA` feature and up to two `miRNA` features
//!
//! Arms that cannot be placed are reported as warnings and skipped. The
//! precursor feature is always produced.

pub mod arms;
pub mod ids;

use tracing::warn;

use crate::core::feature::{Feature, FeatureType};
use crate::core::record::{PredictionRecord, PredictionTable, RecordKind};
use crate::parsing::seed::SeedTable;

use self::arms::{resolve, ResolveError};
use self::ids::IdentifierAssigner;

/// A placed arm with its feature and the sequence for FASTA output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedArm {
    pub feature: Feature,
    pub sequence: String,
}

/// All features derived from one prediction row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedPrecursor {
    pub precursor: Feature,
    /// Placed arms, 5' first
    pub arms: Vec<AnnotatedArm>,
    pub issues: Vec<ResolveError>,
}

impl AnnotatedPrecursor {
    /// Features in output order: precursor, 5' arm, 3' arm
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        std::iter::once(&self.precursor).chain(self.arms.iter().map(|arm| &arm.feature))
    }
}

/// Row description for log messages. Known rows also carry miRDeep2's tag id.
fn row_label(record: &PredictionRecord, precursor_id: &str) -> String {
    match &record.kind {
        RecordKind::Known {
            tag_id: Some(tag), ..
        } => format!("{precursor_id}, tag {tag}"),
        _ => precursor_id.to_string(),
    }
}

/// Annotate every row of a table, preserving row order.
///
/// Sequence frequencies are taken over `table` itself.
#[must_use]
pub fn annotate_table(
    table: &PredictionTable,
    seeds: Option<&SeedTable>,
) -> Vec<AnnotatedPrecursor> {
    let assigner = IdentifierAssigner::new(table, seeds);

    table
        .records
        .iter()
        .map(|record| {
            let resolved = resolve(record);
            let ids = assigner.assign(record, &resolved);

            if !resolved.issues.is_empty() {
                let label = row_label(record, &ids.precursor);
                for issue in &resolved.issues {
                    warn!(
                        "{} table, row {} ({label}): {issue}; skipping arm",
                        table.section, record.row
                    );
                }
            }

            let precursor = Feature::new(
                resolved.seqid.clone(),
                FeatureType::PreMirna,
                resolved.start,
                resolved.end,
                resolved.strand,
                ids.precursor.clone(),
            );

            let arm_ids = [ids.arm5p.as_ref(), ids.arm3p.as_ref()];
            let arms = [resolved.arm5p.as_ref(), resolved.arm3p.as_ref()]
                .into_iter()
                .zip(arm_ids)
                .filter_map(|(arm, id)| Some((arm?, id?)))
                .map(|(arm, id)| AnnotatedArm {
                    feature: Feature::new(
                        resolved.seqid.clone(),
                        FeatureType::Mirna,
                        arm.start,
                        arm.end,
                        resolved.strand,
                        id.clone(),
                    ),
                    sequence: arm.sequence.clone(),
                })
                .collect();

            AnnotatedPrecursor {
                precursor,
                arms,
                issues: resolved.issues.clone(),
            }
        })
        .collect()
}

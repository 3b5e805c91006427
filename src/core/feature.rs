use serde::{Deserialize, Serialize};

use crate::core::types::Strand;

/// GFF3 feature type emitted for a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[serde(rename = "pre_miRNA")]
    PreMirna,
    #[serde(rename = "miRNA")]
    Mirna,
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreMirna => write!(f, "pre_miRNA"),
            Self::Mirna => write!(f, "miRNA"),
        }
    }
}

/// One GFF3 line. Coordinates are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub seqid: String,
    pub feature_type: FeatureType,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub id: String,
}

impl Feature {
    #[must_use]
    pub fn new(
        seqid: impl Into<String>,
        feature_type: FeatureType,
        start: u64,
        end: u64,
        strand: Strand,
        id: impl Into<String>,
    ) -> Self {
        debug_assert!(start <= end, "feature start {start} after end {end}");
        Self {
            seqid: seqid.into(),
            feature_type,
            start,
            end,
            strand,
            id: id.into(),
        }
    }

    /// Nine tab-separated GFF3 columns, without the line terminator.
    /// Source, score and phase are always `.`.
    #[must_use]
    pub fn to_gff_line(&self) -> String {
        format!(
            "{}\t.\t{}\t{}\t{}\t.\t{}\t.\tID={}",
            self.seqid, self.feature_type, self.start, self.end, self.strand, self.id
        )
    }
}

use serde::{Deserialize, Serialize};

/// Sentinel miRDeep2 writes in a sequence column when that arm was not observed
pub const ABSENT_SEQUENCE: &str = "-";

/// Genomic strand of a precursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// Parse a strand from its single-character GFF3 form
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

/// Position of an arm on the hairpin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmSide {
    FivePrime,
    ThreePrime,
}

impl std::fmt::Display for ArmSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FivePrime => write!(f, "5p"),
            Self::ThreePrime => write!(f, "3p"),
        }
    }
}

/// Which report column supplied an arm sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmSource {
    Mature,
    Star,
}

impl ArmSource {
    /// Single-letter tag used inside arm identifiers
    #[must_use]
    pub fn tag(self) -> char {
        match self {
            Self::Mature => 'm',
            Self::Star => 's',
        }
    }
}

/// Returns true when a sequence cell marks the arm as absent
#[must_use]
pub fn is_absent(sequence: &str) -> bool {
    let trimmed = sequence.trim();
    trimmed.is_empty() || trimmed == ABSENT_SEQUENCE
}

//! Core data types for miRDeep2 report conversion.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`PredictionRecord`]: One typed row of a report section
//! - [`PredictionTable`]: All rows of one section, plus the raw header for dumping
//! - [`RecordKind`]: Novel vs known predictions, decided from the section header
//! - [`Feature`]: One emittable GFF3 line
//! - [`Strand`], [`ArmSide`], [`ArmSource`]: Small classification types
//!
//! ## Coordinates
//!
//! miRDeep2 writes precursor coordinates as `name:start..end:strand` with a
//! 0-based start and an exclusive end. Everything downstream of
//! [`Locus`] works in 1-based inclusive GFF3 coordinates.
//!
//! [`PredictionRecord`]: record::PredictionRecord
//! [`PredictionTable`]: record::PredictionTable
//! [`RecordKind`]: record::RecordKind
//! [`Locus`]: record::Locus
//! [`Feature`]: feature::Feature
//! [`Strand`]: types::Strand
//! [`ArmSide`]: types::ArmSide
//! [`ArmSource`]: types::ArmSource

pub mod feature;
pub mod record;
pub mod types;

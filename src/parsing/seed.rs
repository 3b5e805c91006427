//! Parser for seed lookup tables.
//!
//! Format: a tab-separated file with a header naming at least the `seed` and
//! `miRBase_name` columns. Seeds are 7-mers matched case-insensitively.

use std::collections::HashMap;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::parsing::report::ParseError;

pub const SEED_COLUMN: &str = "seed";
pub const NAME_COLUMN: &str = "miRBase_name";

/// Seed 7-mer (uppercase) to family name
#[derive(Debug, Default, Clone)]
pub struct SeedTable {
    names: HashMap<String, String>,
}

impl SeedTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a seed. The first name registered for a seed wins.
    pub fn insert(&mut self, seed: &str, name: impl Into<String>) {
        let key = seed.trim().to_ascii_uppercase();
        if let Some(existing) = self.names.get(&key) {
            debug!("Seed {key} already named {existing}, keeping it");
            return;
        }
        self.names.insert(key, name.into());
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, seed: &str) -> Option<&str> {
        self.names
            .get(&seed.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parse a seed table file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidSeedTable` if it lacks the expected columns.
pub fn parse_seed_file(path: &Path) -> Result<SeedTable, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_seed_text(&content)
}

/// Parse seed table text
///
/// # Errors
///
/// Returns `ParseError::InvalidSeedTable` if the header lacks the `seed` or
/// `miRBase_name` column, or a row cannot be read.
pub fn parse_seed_text(text: &str) -> Result<SeedTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ParseError::InvalidSeedTable(e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| ParseError::InvalidSeedTable(format!("no '{name}' column")))
    };
    let seed_idx = column(SEED_COLUMN)?;
    let name_idx = column(NAME_COLUMN)?;

    let mut table = SeedTable::new();
    for result in reader.records() {
        let record = result.map_err(|e| ParseError::InvalidSeedTable(e.to_string()))?;
        let (Some(seed), Some(name)) = (record.get(seed_idx), record.get(name_idx)) else {
            continue;
        };
        if seed.trim().is_empty() {
            continue;
        }
        table.insert(seed, name.trim());
    }

    debug!("Loaded {} seeds", table.len());
    Ok(table)
}

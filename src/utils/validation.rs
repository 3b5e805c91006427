//! Centralized validation of run configuration.

use crate::filter::FilterThresholds;

/// True-positive estimates are percentages
pub const MAX_TRUE_POSITIVE: f64 = 100.0;

/// Configuration errors, fatal before any processing starts
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Score threshold must be a finite number, got {0}")]
    InvalidScoreThreshold(f64),
    #[error("True-positive threshold must be between 0 and {MAX_TRUE_POSITIVE}, got {0}")]
    InvalidTruePositiveThreshold(f64),
    #[error("Minimum row length must be at least 1")]
    InvalidRowLength,
}

/// Check filter thresholds before they are used.
///
/// # Examples
///
/// ```
/// use mirdeep2gff::filter::FilterThresholds;
/// use mirdeep2gff::utils::validation::validate_thresholds;
///
/// let ok = FilterThresholds { score: Some(4.0), true_positive: Some(60.0), exclude_count: Some(100) };
/// assert!(validate_thresholds(&ok).is_ok());
///
/// let bad = FilterThresholds { true_positive: Some(150.0), ..Default::default() };
/// assert!(validate_thresholds(&bad).is_err());
/// ```
///
/// # Errors
///
/// Returns `ConfigError::InvalidScoreThreshold` for a NaN or infinite score,
/// or `ConfigError::InvalidTruePositiveThreshold` for a value outside 0-100.
pub fn validate_thresholds(thresholds: &FilterThresholds) -> Result<(), ConfigError> {
    if let Some(score) = thresholds.score {
        if !score.is_finite() {
            return Err(ConfigError::InvalidScoreThreshold(score));
        }
    }

    if let Some(probability) = thresholds.true_positive {
        if !(0.0..=MAX_TRUE_POSITIVE).contains(&probability) {
            return Err(ConfigError::InvalidTruePositiveThreshold(probability));
        }
    }

    Ok(())
}

/// # Errors
///
/// Returns `ConfigError::InvalidRowLength` when `min_row_length` is zero.
pub fn validate_min_row_length(min_row_length: usize) -> Result<(), ConfigError> {
    if min_row_length == 0 {
        return Err(ConfigError::InvalidRowLength);
    }
    Ok(())
}

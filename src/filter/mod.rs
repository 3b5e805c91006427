//! Quality filtering of prediction tables.
//!
//! Two independent filters compose by logical AND:
//!
//! 1. **Score filter**: keeps a row when its miRDeep2 score reaches the score
//!    threshold, or when its total read count reaches the exclude count. The
//!    exclude count protects highly expressed candidates from a low score.
//! 2. **True-positive filter**: keeps a row when the leading number of its
//!    true-positive estimate (`91 +/- 2%` reads as 91) reaches the threshold.
//!    Only rows surviving the score filter are tested.
//!
//! Removed rows are kept in a table of their own so they can be exported for
//! auditing.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::record::{PredictionRecord, PredictionTable, SectionKind};

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Thresholds for the quality filter. `None` disables that check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FilterThresholds {
    /// Minimum miRDeep2 score
    pub score: Option<f64>,
    /// Minimum true-positive estimate, 0-100
    pub true_positive: Option<f64>,
    /// Rows with at least this many reads skip the score check
    pub exclude_count: Option<u64>,
}

impl FilterThresholds {
    /// True when no filter would run
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.true_positive.is_none()
    }
}

/// Filter stage that removed a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    Score,
    TruePositive,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score => write!(f, "score"),
            Self::TruePositive => write!(f, "true-positive"),
        }
    }
}

/// Verdict for a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Retained,
    Removed(RemovalReason),
}

/// Per-table filter statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub section: SectionKind,
    pub input: usize,
    pub removed_by_score: usize,
    pub removed_by_true_positive: usize,
    pub retained: usize,
}

impl FilterReport {
    fn new(section: SectionKind, input: usize) -> Self {
        Self {
            section,
            input,
            removed_by_score: 0,
            removed_by_true_positive: 0,
            retained: 0,
        }
    }

    /// Share of input rows, 0-100
    #[must_use]
    pub fn percent_of_input(&self, count: usize) -> f64 {
        if self.input == 0 {
            0.0
        } else {
            count_to_f64(count) / count_to_f64(self.input) * 100.0
        }
    }

    fn record(&mut self, outcome: FilterOutcome) {
        match outcome {
            FilterOutcome::Retained => self.retained += 1,
            FilterOutcome::Removed(RemovalReason::Score) => self.removed_by_score += 1,
            FilterOutcome::Removed(RemovalReason::TruePositive) => {
                self.removed_by_true_positive += 1;
            }
        }
    }
}

/// One table split by the filter
#[derive(Debug, Clone)]
pub struct FilteredTable {
    pub retained: PredictionTable,
    pub removed: PredictionTable,
    pub report: FilterReport,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QualityFilter {
    thresholds: FilterThresholds,
}

impl QualityFilter {
    #[must_use]
    pub fn new(thresholds: FilterThresholds) -> Self {
        Self { thresholds }
    }

    /// Score filter verdict; the exclude count overrides a low score
    #[must_use]
    pub fn passes_score(&self, record: &PredictionRecord) -> bool {
        let Some(min_score) = self.thresholds.score else {
            return true;
        };
        let protected = self
            .thresholds
            .exclude_count
            .is_some_and(|count| record.total_read_count >= count);

        protected || record.score >= min_score
    }

    /// True-positive filter verdict. A cell without a leading number fails.
    #[must_use]
    pub fn passes_true_positive(&self, record: &PredictionRecord) -> bool {
        let Some(min_probability) = self.thresholds.true_positive else {
            return true;
        };
        match record.true_positive_probability() {
            Some(probability) => probability >= min_probability,
            None => {
                debug!(
                    "Row {}: no probability in '{}'",
                    record.row, record.true_positive
                );
                false
            }
        }
    }

    #[must_use]
    pub fn evaluate(&self, record: &PredictionRecord) -> FilterOutcome {
        if !self.passes_score(record) {
            FilterOutcome::Removed(RemovalReason::Score)
        } else if !self.passes_true_positive(record) {
            FilterOutcome::Removed(RemovalReason::TruePositive)
        } else {
            FilterOutcome::Retained
        }
    }

    /// Split one table into retained and removed rows, preserving row order
    #[must_use]
    pub fn filter_table(&self, table: &PredictionTable) -> FilteredTable {
        let mut report = FilterReport::new(table.section, table.len());
        let mut retained = Vec::new();
        let mut removed = Vec::new();

        for record in &table.records {
            let outcome = self.evaluate(record);
            report.record(outcome);
            match outcome {
                FilterOutcome::Retained => retained.push(record.clone()),
                FilterOutcome::Removed(reason) => {
                    debug!(
                        "{} table, row {} ({}): removed by {reason} filter",
                        table.section,
                        record.row,
                        record.precursor_id()
                    );
                    removed.push(record.clone());
                }
            }
        }

        log_report(&report, &self.thresholds);

        FilteredTable {
            retained: table.with_records(retained),
            removed: table.with_records(removed),
            report,
        }
    }

    /// Filter every table, keeping input order
    #[must_use]
    pub fn filter(&self, tables: &[PredictionTable]) -> Vec<FilteredTable> {
        tables.iter().map(|t| self.filter_table(t)).collect()
    }
}

fn log_report(report: &FilterReport, thresholds: &FilterThresholds) {
    if thresholds.is_empty() {
        info!(
            "{} table: {} rows, no filters applied",
            report.section, report.input
        );
        return;
    }

    info!("{} table: {} rows before filtering", report.section, report.input);
    if let Some(score) = thresholds.score {
        info!(
            "{} table: {} rows ({:.1}%) removed by score < {score}",
            report.section,
            report.removed_by_score,
            report.percent_of_input(report.removed_by_score),
        );
    }
    if let Some(probability) = thresholds.true_positive {
        info!(
            "{} table: {} rows ({:.1}%) removed by true-positive estimate < {probability}",
            report.section,
            report.removed_by_true_positive,
            report.percent_of_input(report.removed_by_true_positive),
        );
    }
    info!(
        "{} table: {} rows retained",
        report.section, report.retained
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{Locus, RecordKind};

    fn record(row: usize, score: f64, reads: u64, true_positive: &str) -> PredictionRecord {
        PredictionRecord {
            kind: RecordKind::Novel {
                provisional_id: format!("chr1_{row}"),
            },
            locus: Locus::parse("chr1:100..150:+").unwrap(),
            precursor_sequence: "aaaa".to_string(),
            mature_sequence: "aa".to_string(),
            star_sequence: "-".to_string(),
            score,
            total_read_count: reads,
            true_positive: true_positive.to_string(),
            row,
            raw: Vec::new(),
        }
    }

    fn table(records: Vec<PredictionRecord>) -> PredictionTable {
        PredictionTable::new(SectionKind::Novel, Vec::new(), records)
    }

    #[test]
    fn test_no_thresholds_keeps_everything() {
        let filter = QualityFilter::default();
        let result = filter.filter_table(&table(vec![
            record(1, -10.0, 0, "0 +/- 0%"),
            record(2, 1.0, 5, "garbage"),
        ]));

        assert_eq!(result.retained.len(), 2);
        assert!(result.removed.is_empty());
        assert_eq!(result.report.retained, 2);
    }

    #[test]
    fn test_exclude_count_override() {
        let mut thresholds = FilterThresholds {
            score: Some(4.0),
            exclude_count: Some(40),
            ..Default::default()
        };
        let rec = record(1, 3.5, 50, "50 +/- 5%");

        assert!(QualityFilter::new(thresholds).passes_score(&rec));

        thresholds.exclude_count = Some(60);
        assert_eq!(
            QualityFilter::new(thresholds).evaluate(&rec),
            FilterOutcome::Removed(RemovalReason::Score)
        );

        thresholds.exclude_count = None;
        assert!(!QualityFilter::new(thresholds).passes_score(&rec));
    }

    #[test]
    fn test_score_at_threshold_is_kept() {
        let filter = QualityFilter::new(FilterThresholds {
            score: Some(4.0),
            ..Default::default()
        });
        assert!(filter.passes_score(&record(1, 4.0, 0, "")));
        assert!(!filter.passes_score(&record(1, 3.99, 0, "")));
    }

    #[test]
    fn test_true_positive_leading_number() {
        let filter = QualityFilter::new(FilterThresholds {
            true_positive: Some(60.0),
            ..Default::default()
        });
        assert!(filter.passes_true_positive(&record(1, 0.0, 0, "91 +/- 2%")));
        assert!(filter.passes_true_positive(&record(1, 0.0, 0, "60 +/- 3%")));
        assert!(!filter.passes_true_positive(&record(1, 0.0, 0, "28 +/- 4%")));
        assert!(!filter.passes_true_positive(&record(1, 0.0, 0, "-")));
    }

    #[test]
    fn test_filters_compose_in_order() {
        let filter = QualityFilter::new(FilterThresholds {
            score: Some(1.0),
            true_positive: Some(50.0),
            exclude_count: None,
        });
        let result = filter.filter_table(&table(vec![
            record(1, 5.0, 10, "90 +/- 1%"),
            record(2, 0.5, 10, "10 +/- 1%"),
            record(3, 2.0, 10, "10 +/- 1%"),
            record(4, 3.0, 10, "75 +/- 1%"),
        ]));

        let kept: Vec<usize> = result.retained.records.iter().map(|r| r.row).collect();
        let dropped: Vec<usize> = result.removed.records.iter().map(|r| r.row).collect();
        assert_eq!(kept, vec![1, 4]);
        assert_eq!(dropped, vec![2, 3]);
        assert_eq!(
            filter.evaluate(&result.removed.records[0]),
            FilterOutcome::Removed(RemovalReason::Score)
        );
        assert_eq!(
            filter.evaluate(&result.removed.records[1]),
            FilterOutcome::Removed(RemovalReason::TruePositive)
        );

        // Row 2 fails both but is only charged to the score stage
        assert_eq!(result.report.removed_by_score, 1);
        assert_eq!(result.report.removed_by_true_positive, 1);
        assert_eq!(result.report.retained, 2);
        assert!((result.report.percent_of_input(1) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_filter_keeps_table_order_and_section() {
        let filter = QualityFilter::new(FilterThresholds {
            score: Some(0.0),
            ..Default::default()
        });
        let mut known = table(vec![record(1, 1.0, 1, "")]);
        known.section = SectionKind::Known;
        let results = filter.filter(&[table(vec![record(1, 1.0, 1, "")]), known]);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].retained.section, SectionKind::Novel);
        assert_eq!(results[1].retained.section, SectionKind::Known);
        assert_eq!(results[1].removed.section, SectionKind::Known);
    }

    #[test]
    fn test_empty_table_report() {
        let result = QualityFilter::default().filter_table(&table(Vec::new()));
        assert_eq!(result.report.input, 0);
        assert!(result.report.percent_of_input(0).abs() < f64::EPSILON);
    }
}

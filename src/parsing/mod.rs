//! Parsers for miRDeep2 reports and seed lookup tables.
//!
//! This module provides parsers for:
//!
//! - **miRDeep2 reports**: Extract the novel and known prediction tables
//!   embedded in a `result_<date>.csv` report
//! - **Seed tables**: Tab-separated `seed` / `miRBase_name` lookups used to
//!   name arms by seed family
//!
//! ## Example
//!
//! ```rust,no_run
//! use mirdeep2gff::parsing::report::{parse_report_file, DEFAULT_MIN_ROW_LENGTH};
//! use std::path::Path;
//!
//! let report = parse_report_file(Path::new("result_08_10_2021.csv"), DEFAULT_MIN_ROW_LENGTH).unwrap();
//! for table in report.tables() {
//!     println!("{}: {} predictions", table.section, table.len());
//! }
//! ```
//!
//! ## Required Columns
//!
//! | Column | Novel | Known |
//! |--------|-------|-------|
//! | precursor coordinate | Yes | Yes |
//! | consensus star / mature / precursor sequence | Yes | Yes |
//! | total read count | Yes | Yes |
//! | miRDeep2 score | Yes | Yes |
//! | provisional id | Yes | No |
//! | mature miRBase miRNA | No | Yes |
//! | estimated probability ... true positive | Yes | Yes |

pub mod report;
pub mod seed;

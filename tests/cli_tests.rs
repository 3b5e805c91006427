//! End-to-end tests for the `mirdeep2gff` binary.

use std::fs;
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use tempfile::TempDir;

const NOVEL_HEADER: &str = "provisional id\tmiRDeep2 score\testimated probability that the miRNA candidate is a true positive\trfam alert\ttotal read count\tmature read count\tloop read count\tstar read count\tsignificant randfold p-value\tmiRBase miRNA\texample miRBase miRNA with the same seed\tUCSC browser\tNCBI blastn\tconsensus mature sequence\tconsensus star sequence\tconsensus precursor sequence\tprecursor coordinate";
const KNOWN_HEADER: &str = "tag id\tmiRDeep2 score\testimated probability that the miRNA is a true positive\trfam alert\ttotal read count\tmature read count\tloop read count\tstar read count\tsignificant randfold p-value\tmature miRBase miRNA\texample miRBase miRNA with the same seed\tUCSC browser\tNCBI blastn\tconsensus mature sequence\tconsensus star sequence\tconsensus precursor sequence\tprecursor coordinate";

const STAR: &str = "ugagguaguagguuguauag";
const MATURE: &str = "cuauacaaucuacugucuuucc";

fn hairpin() -> String {
    format!("aaaaa{STAR}ccccc{MATURE}gggggggg")
}

struct Row<'a> {
    id: &'a str,
    mirbase: &'a str,
    score: &'a str,
    probability: &'a str,
    reads: &'a str,
    mature: &'a str,
    coordinate: &'a str,
}

impl Default for Row<'_> {
    fn default() -> Self {
        Self {
            id: "chr1_1",
            mirbase: "-",
            score: "5.2",
            probability: "91 +/- 2%",
            reads: "50",
            mature: MATURE,
            coordinate: "chr1:100..160:+",
        }
    }
}

impl Row<'_> {
    fn line(&self) -> String {
        format!(
            "{}\t{}\t{}\t-\t{}\t40\t0\t10\tyes\t{}\t-\t-\t-\t{}\t{STAR}\t{}\t{}",
            self.id,
            self.score,
            self.probability,
            self.reads,
            self.mirbase,
            self.mature,
            hairpin(),
            self.coordinate
        )
    }
}

fn report(novel: &[Row], known: &[Row]) -> String {
    let mut text = String::from("#miRBase miRNAs in species\tmature\n\n");
    if !novel.is_empty() {
        text.push_str("novel miRNAs predicted by miRDeep2\n");
        text.push_str(NOVEL_HEADER);
        text.push('\n');
        for row in novel {
            text.push_str(&row.line());
            text.push('\n');
        }
        text.push('\n');
    }
    if !known.is_empty() {
        text.push_str("mature miRBase miRNAs detected by miRDeep2\n");
        text.push_str(KNOWN_HEADER);
        text.push('\n');
        for row in known {
            text.push_str(&row.line());
            text.push('\n');
        }
        text.push('\n');
    }
    text.push_str("#miRBase miRNAs not detected by miRDeep2\n");
    text
}

fn write_report(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("result_08_10_2021.csv");
    fs::write(&path, text).unwrap();
    path
}

fn mirdeep2gff() -> Command {
    Command::cargo_bin("mirdeep2gff").unwrap()
}

fn gff_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_convert_plus_strand() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), &report(&[Row::default()], &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 features"));

    assert_eq!(
        gff_lines(&output),
        vec![
            "##gff-version 3",
            "chr1\t.\tpre_miRNA\t101\t160\t.\t+\t.\tID=chr1_1",
            "chr1\t.\tmiRNA\t106\t125\t.\t+\t.\tID=chr1_1-5p-s-1",
            "chr1\t.\tmiRNA\t131\t152\t.\t+\t.\tID=chr1_1-3p-m-1",
        ]
    );
}

#[test]
fn test_convert_minus_strand() {
    let dir = TempDir::new().unwrap();
    let row = Row {
        coordinate: "chr1:100..160:-",
        ..Default::default()
    };
    let input = write_report(dir.path(), &report(&[row], &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        gff_lines(&output),
        vec![
            "##gff-version 3",
            "chr1\t.\tpre_miRNA\t101\t160\t.\t-\t.\tID=chr1_1",
            "chr1\t.\tmiRNA\t136\t155\t.\t-\t.\tID=chr1_1-5p-s-1",
            "chr1\t.\tmiRNA\t109\t130\t.\t-\t.\tID=chr1_1-3p-m-1",
        ]
    );
}

#[test]
fn test_convert_absent_mature() {
    let dir = TempDir::new().unwrap();
    let row = Row {
        mature: "-",
        ..Default::default()
    };
    let input = write_report(dir.path(), &report(&[row], &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let lines = gff_lines(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with("ID=chr1_1-5p-s-1"));
}

#[test]
fn test_convert_score_filter_with_read_count_rescue() {
    let dir = TempDir::new().unwrap();
    let rows = [
        Row {
            id: "chr1_1",
            score: "0.5",
            reads: "5000",
            ..Default::default()
        },
        Row {
            id: "chr1_2",
            score: "0.5",
            reads: "20",
            ..Default::default()
        },
        Row {
            id: "chr1_3",
            score: "6",
            reads: "20",
            ..Default::default()
        },
    ];
    let input = write_report(dir.path(), &report(&rows, &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["--format", "tsv", "convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--score-threshold", "1", "--exclude-count", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("novel\t3\t1\t0\t2\t2\t4\t0\t0"));

    let ids: Vec<String> = gff_lines(&output)
        .iter()
        .filter(|line| line.contains("pre_miRNA"))
        .map(|line| line.rsplit("ID=").next().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["chr1_1", "chr1_3"]);
}

#[test]
fn test_convert_true_positive_filter() {
    let dir = TempDir::new().unwrap();
    let rows = [
        Row::default(),
        Row {
            id: "chr1_2",
            probability: "28 +/- 14%",
            ..Default::default()
        },
    ];
    let input = write_report(dir.path(), &report(&rows, &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["--format", "json", "convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--true-positive-threshold", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed_by_true_positive\": 1"));

    assert!(!fs::read_to_string(&output).unwrap().contains("chr1_2"));
}

#[test]
fn test_convert_known_table_ids() {
    let dir = TempDir::new().unwrap();
    let known = [Row {
        id: "chr5_77",
        mirbase: "hsa-let-7a-5p",
        ..Default::default()
    }];
    let input = write_report(dir.path(), &report(&[Row::default()], &known));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("ID=chr1_1\n"));
    assert!(text.contains("ID=hsa-let-7a\n"));
    assert!(text.contains("ID=hsa-let-7a-5p-s-1\n"));
    assert!(text.contains("ID=hsa-let-7a-3p-m-1\n"));
}

#[test]
fn test_convert_frequency_counts_shared_sequences() {
    let dir = TempDir::new().unwrap();
    let rows = [
        Row::default(),
        Row {
            id: "chr2_9",
            coordinate: "chr2:500..560:+",
            ..Default::default()
        },
    ];
    let input = write_report(dir.path(), &report(&rows, &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("ID=chr1_1-5p-s-2\n"));
    assert!(text.contains("ID=chr2_9-3p-m-2\n"));
}

#[test]
fn test_convert_seed_table_suffix() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), &report(&[Row::default()], &[]));
    let seeds = dir.path().join("seeds.tsv");
    // Seed of the star arm: nucleotides 2-8
    fs::write(&seeds, "seed\tmiRBase_name\nGAGGUAG\tlet-7\n").unwrap();
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--seed-table")
        .arg(&seeds)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("ID=chr1_1-5p-s-1-let-7\n"));
    assert!(text.contains("ID=chr1_1-3p-m-1-UAUACAA\n"));
}

#[test]
fn test_convert_fasta_and_removed_fasta() {
    let dir = TempDir::new().unwrap();
    let rows = [
        Row::default(),
        Row {
            id: "chr1_2",
            score: "-3.1",
            ..Default::default()
        },
    ];
    let input = write_report(dir.path(), &report(&rows, &[]));
    let output = dir.path().join("out.gff3");
    let fasta = dir.path().join("arms.fa");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--fasta")
        .arg(&fasta)
        .args(["--score-threshold", "0"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&fasta).unwrap(),
        format!(">chr1_1-5p-s-1\n{STAR}\n>chr1_1-3p-m-1\n{MATURE}\n")
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("removed_arms.fa")).unwrap(),
        format!(">chr1_2-5p-s-1\n{STAR}\n>chr1_2-3p-m-1\n{MATURE}\n")
    );
}

#[test]
fn test_convert_gzipped_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.csv.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&input).unwrap(), Compression::default());
    encoder
        .write_all(report(&[Row::default()], &[]).as_bytes())
        .unwrap();
    encoder.finish().unwrap();
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(gff_lines(&output).len(), 4);
}

#[test]
fn test_convert_from_stdin() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i", "-", "-o"])
        .arg(&output)
        .write_stdin(report(&[Row::default()], &[]))
        .assert()
        .success();

    assert_eq!(gff_lines(&output).len(), 4);
}

#[test]
fn test_convert_save_tables() {
    let dir = TempDir::new().unwrap();
    let known = [Row {
        mirbase: "hsa-let-7a-5p",
        ..Default::default()
    }];
    let input = write_report(dir.path(), &report(&[Row::default()], &known));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--save-tables")
        .assert()
        .success();

    let novel = fs::read_to_string(dir.path().join("novel_predictions.tsv")).unwrap();
    assert!(novel.starts_with("provisional id\t"));
    assert_eq!(novel.lines().count(), 2);
    assert!(dir.path().join("known_predictions.tsv").exists());
}

#[test]
fn test_convert_report_without_tables() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), "#miRBase miRNAs in species\n\nnothing here\n");
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("No prediction tables found"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "##gff-version 3\n");
}

#[test]
fn test_convert_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let text = report(&[Row::default()], &[]).replace("precursor coordinate", "coordinates");
    let input = write_report(dir.path(), &text);
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("precursor coordinate"));
}

#[test]
fn test_convert_invalid_threshold() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), &report(&[Row::default()], &[]));
    let output = dir.path().join("out.gff3");

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--true-positive-threshold", "150"])
        .assert()
        .failure();

    assert!(!output.exists());
}

#[test]
fn test_convert_missing_input() {
    let dir = TempDir::new().unwrap();

    mirdeep2gff()
        .args(["convert", "-i"])
        .arg(dir.path().join("missing.csv"))
        .arg("-o")
        .arg(dir.path().join("out.gff3"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn test_tables_command() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), &report(&[Row::default()], &[]));
    let out_dir = dir.path().join("tables");
    fs::create_dir(&out_dir).unwrap();

    mirdeep2gff()
        .args(["tables", "-i"])
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("novel: 1 rows"));

    assert!(out_dir.join("novel_predictions.tsv").exists());
    assert!(!out_dir.join("known_predictions.tsv").exists());
}

//! Integration tests for the loyalty engine CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given seed and transactions files and return stdout
fn run_engine(transactions_file: &str) -> String {
    let mut cmd = Command::cargo_bin("loyalty-engine").unwrap();
    let assert = cmd
        .arg(test_data_path("seed.json"))
        .arg(transactions_file)
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Normalize CSV for comparison (trim whitespace, drop blank lines)
fn normalize_csv(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[test]
fn test_sample_a_earning_redeeming_and_tier_moves() {
    let output = run_engine(&test_data_path("sample_a.csv"));
    let expected = fs::read_to_string(test_data_path("expected_a.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_sample_b_invalid_rows_are_skipped() {
    let output = run_engine(&test_data_path("sample_b_invalid_rows.csv"));
    let expected = fs::read_to_string(test_data_path("expected_b.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_output_has_correct_header() {
    let output = run_engine(&test_data_path("sample_a.csv"));
    assert!(output.starts_with("customer,earned,redeemed,available,tier"));
}

#[test]
fn test_output_sorted_by_customer_id() {
    let output = run_engine(&test_data_path("sample_a.csv"));
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[1].starts_with("1,"));
    assert!(lines[2].starts_with("2,"));
    assert!(lines[3].starts_with("3,"));
}

#[test]
fn test_missing_transactions_file_error() {
    let mut cmd = Command::cargo_bin("loyalty-engine").unwrap();
    cmd.arg(test_data_path("seed.json"))
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_arguments_error() {
    let mut cmd = Command::cargo_bin("loyalty-engine").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing arguments"));
}

#[test]
fn test_malformed_seed_file_error() {
    let mut seed = tempfile::NamedTempFile::new().unwrap();
    write!(seed, "{{ not json").unwrap();

    let mut cmd = Command::cargo_bin("loyalty-engine").unwrap();
    cmd.arg(seed.path())
        .arg(test_data_path("sample_a.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("seed parsing error"));
}

//! Integration tests for the popbench binary.
//!
//! Run with: cargo test --test cli_tests

use std::process::{Command, Output};

fn popbench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_popbench"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run popbench")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const PORTABLE: &str = "popcount_naive,popcount_8,popcount_keane,popcount_2,popcount_tabular_16,popcount_builtin";

#[test]
fn test_single_iteration_text() {
    let output = popbench(&["1", "--preheat", "0", "--only", PORTABLE]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7, "{}", text);
    assert!(!text.contains("failed case"));
    assert!(lines[0].starts_with("popcount_naive: 1000 iters in "));
    assert!(lines[2].starts_with("popcount_keane: 1000 iters in "));
    assert!(lines[6].starts_with("checksum: "));
}

#[test]
fn test_checksum_stable_across_runs() {
    let args = ["3", "--preheat", "16", "--only", PORTABLE];
    let first = stdout(&popbench(&args));
    let second = stdout(&popbench(&args));
    let checksum = |s: &str| s.lines().last().map(str::to_string);
    assert_eq!(checksum(&first), checksum(&second));
}

#[test]
fn test_missing_iterations_fails() {
    let output = popbench(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ITERATIONS"));
}

#[test]
fn test_unknown_algorithm_fails() {
    let output = popbench(&["1", "--only", "popcount_bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("popcount_bogus"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_unknown_family_fails() {
    let output = popbench(&["1", "--family", "quantum"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("quantum"));
}

#[test]
fn test_zero_block_size_fails() {
    let output = popbench(&["1", "--block-size", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("block size"));
}

#[test]
fn test_list() {
    let output = popbench(&["--list"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Name"));
    for name in ["popcount_naive", "popcount_anderson", "popcount_tabular_8", "popcount_x86"] {
        assert!(text.contains(name), "missing {}", name);
    }
    assert!(text.contains("Total: 16 algorithms"));
}

#[test]
fn test_list_by_family_json() {
    let output = popbench(&["--list", "--family", "table", "--format", "json"]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["popcount_tabular_8", "popcount_tabular_16"]);
}

#[test]
fn test_json_report() {
    let output = popbench(&[
        "2",
        "--preheat",
        "0",
        "--block-size",
        "64",
        "--only",
        "popcount_keane,popcount_builtin",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let record: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(record["config"]["iterations"], 2);
    assert_eq!(record["config"]["block_size"], 64);
    assert!(record["system"]["cpu_cores"].as_u64().unwrap() > 0);

    let timings = record["report"]["timings"].as_array().unwrap();
    assert_eq!(timings.len(), 2);
    assert_eq!(timings[0]["algorithm"], "popcount_keane");
    assert_eq!(timings[0]["calls"], 128);
    assert_eq!(timings[0]["checksum"], timings[1]["checksum"]);
    assert!(record["report"]["mismatches"].as_array().unwrap().is_empty());
}

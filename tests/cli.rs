//! Tests for the `cfn-metrics` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn cmd() -> Command {
    Command::cargo_bin("cfn-metrics").expect("binary built")
}

#[test]
fn test_analyze_prints_json() {
    cmd()
        .arg("analyze")
        .arg(fixture("serverless-stack.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_resources\": 6"))
        .stdout(predicate::str::contains("[REDACTED]"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_analyze_writes_html_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.html");

    cmd()
        .arg("analyze")
        .arg(fixture("serverless-stack.yaml"))
        .args(["--format", "html", "--no-unsupported"])
        .arg("--output")
        .arg(&report)
        .assert()
        .success()
        .stderr(predicate::str::contains("Report written to"));

    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("OrdersFunction"));
    assert!(!html.contains("Unsupported resources"));
}

#[test]
fn test_missing_template_fails() {
    cmd()
        .args(["analyze", "does-not-exist.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: File error"));
}

#[test]
fn test_generators_lists_catalog() {
    cmd()
        .arg("generators")
        .assert()
        .success()
        .stdout(predicate::str::contains("AWS::RDS::DBCluster"))
        .stdout(predicate::str::contains("AWS::ElasticLoadBalancingV2::LoadBalancer"));
}

//! End-to-end tests for the rowpush binary
//!
//! These tests cover:
//! - Saving and reading settings
//! - Failing fast on missing configuration
//! - Sending export files to a mock sink
//! - Exit status for incomplete runs

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// `rowpush` isolated from the user's settings and environment
fn rowpush(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rowpush").unwrap();
    cmd.env("ROWPUSH_CONFIG_DIR", config_dir)
        .env_remove("ROWPUSH_SINK_URL")
        .env_remove("ROWPUSH_SERVER")
        .env_remove("ROWPUSH_SERVER_URL")
        .env_remove("ROWPUSH_CHUNK_SIZE")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .write_stdin("");
    cmd
}

fn export_file(dir: &Path, name: &str, rows: usize) -> String {
    let rows: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "msisdn": format!("+62 812-{:06}", i),
                "temp": 36.5,
                "active": i % 2 == 0,
                "nama": "dropped"
            })
        })
        .collect();
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    rowpush(dir.path())
        .args(["config", "set", "url", "https://sink.example.com/exec"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved url"));

    rowpush(dir.path())
        .args(["config", "get", "url"])
        .assert()
        .success()
        .stdout("https://sink.example.com/exec\n");

    assert_eq!(
        std::fs::read_to_string(dir.path().join("url")).unwrap(),
        "https://sink.example.com/exec"
    );
}

#[test]
fn test_config_server_is_normalized() {
    let dir = TempDir::new().unwrap();

    rowpush(dir.path())
        .args(["config", "set", "server", "SQLEXPRESS"])
        .assert()
        .success();

    rowpush(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("express"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();

    rowpush(dir.path())
        .args(["config", "set", "server", "cluster"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown server variant"));

    rowpush(dir.path())
        .args(["config", "set", "url", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

// ============================================================================
// Missing configuration
// ============================================================================

#[test]
fn test_send_without_sink_url_fails_fast() {
    let dir = TempDir::new().unwrap();
    let file = export_file(dir.path(), "rows.json", 3);

    rowpush(dir.path())
        .args(["send", &file])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration missing: sink URL is not set"));
}

#[test]
fn test_push_without_server_fails_fast() {
    let dir = TempDir::new().unwrap();

    rowpush(dir.path())
        .args(["push", "--database", "ED-02", "--url", "http://127.0.0.1:9/exec"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server variant is not set"));
}

#[test]
fn test_invalid_chunk_size_rejected() {
    let dir = TempDir::new().unwrap();
    let file = export_file(dir.path(), "rows.json", 3);

    rowpush(dir.path())
        .args(["send", &file, "--url", "http://127.0.0.1:9/exec", "--chunk-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunk_size must be >= 1"));
}

// ============================================================================
// Delivery
// ============================================================================

#[tokio::test]
async fn test_send_2500_rows_in_three_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/exec"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = export_file(dir.path(), "rows.json", 2500);

    let output = rowpush(dir.path())
        .args(["send", &file, "--output", "json"])
        .env("ROWPUSH_SINK_URL", format!("{}/exec", server.uri()))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "delivered");
    assert_eq!(report["records_delivered"], 2500);
    assert_eq!(report["chunks_attempted"], 3);

    let requests = server.received_requests().await.unwrap();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| serde_json::from_slice::<Vec<Value>>(&r.body).unwrap().len())
        .collect();
    assert_eq!(sizes, vec![1000, 1000, 500]);

    let first: Vec<Value> = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first[0]["DB"], file.as_str());
    assert_eq!(first[0]["msisdn"], "812000000");
    assert!(first[0].get("nama").is_none());
}

#[tokio::test]
async fn test_missing_file_makes_run_partial() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = export_file(dir.path(), "rows.json", 5);

    rowpush(dir.path())
        .args(["send", "/no/such/export.json", &file])
        .args(["--url", &server.uri()])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Error processing /no/such/export.json"))
        .stdout(predicate::str::contains("5 / 5"))
        .stderr(predicate::str::contains("Delivery partial"));
}

#[tokio::test]
async fn test_failing_sink_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database locked"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = export_file(dir.path(), "rows.json", 4);

    rowpush(dir.path())
        .args(["send", &file, "--url", &server.uri()])
        .args(["--max-retries", "1", "--base-delay", "0.01"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed chunks:"))
        .stdout(predicate::str::contains("database locked"))
        .stderr(predicate::str::contains("Delivery failed"));
}

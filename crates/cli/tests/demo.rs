use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn logscope() -> Command {
    let mut cmd = Command::cargo_bin("logscope").expect("binary");
    cmd.env_remove("LOGSCOPE_EMBED_DIMENSION");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let output = logscope()
        .arg("--json")
        .args(args)
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn default_question_finds_the_authentication_failure() {
    let body = run_json(&[]);
    assert_eq!(body["query"], "Were there any auth errors?");
    assert_eq!(body["total_documents"], 5);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0]["content"]
        .as_str()
        .unwrap()
        .contains("Authentication failed"));
    assert_eq!(results[0]["metadata"]["level"], "ERROR");
    assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());
}

#[test]
fn level_filter_only_returns_matching_lines() {
    let body = run_json(&["-k", "5", "--level", "error", "database connection"]);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for hit in results {
        assert_eq!(hit["metadata"]["level"], "ERROR");
    }
}

#[test]
fn k_larger_than_store_returns_every_line() {
    let body = run_json(&["-k", "50", "cpu"]);
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
    assert_eq!(body["results"][0]["metadata"]["level"], "WARN");
}

#[test]
fn input_file_is_indexed_line_by_line() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    fs::write(
        &path,
        "2025-01-01T00:00:00Z INFO: cache warmed\n\n2025-01-01T00:00:01Z ERROR: disk quota exceeded on volume data\n",
    )
    .unwrap();

    let body = run_json(&["--input", path.to_str().unwrap(), "-k", "1", "disk quota"]);
    assert_eq!(body["total_documents"], 2);
    assert_eq!(body["results"][0]["metadata"]["line"], 3);
    assert!(body["results"][0]["content"]
        .as_str()
        .unwrap()
        .contains("disk quota exceeded"));
}

#[test]
fn text_output_mirrors_the_demo_report() {
    logscope()
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Top 2 most relevant logs for the question: 'Were there any auth errors?'",
        ))
        .stdout(predicate::str::contains("Authentication failed for user 'admin'"));
}

#[test]
fn missing_input_file_fails() {
    let temp = tempdir().unwrap();
    logscope()
        .arg("--input")
        .arg(temp.path().join("nope.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read log file"));
}

#[test]
fn empty_input_file_fails() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("empty.log");
    fs::write(&path, "\n\n").unwrap();
    logscope()
        .arg("--input")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No log lines to index"));
}

#[test]
fn invalid_dimension_env_is_reported() {
    logscope()
        .env("LOGSCOPE_EMBED_DIMENSION", "zero")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOGSCOPE_EMBED_DIMENSION"));
}

//! Integration tests for slq CLI.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

fn slq_cmd(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_slq"));
    cmd.env("SLEUTH_CONFIG", config_dir.join("config.toml"));
    cmd.env_remove("SLQ_LOG");
    cmd
}

fn run(config_dir: &std::path::Path, args: &[&str]) -> Output {
    slq_cmd(config_dir)
        .args(args)
        .output()
        .expect("failed to run slq")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_build_single_filter() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["build", "filePath=/etc/passwd"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        stdout_json(&output),
        json!({
            "groupClause": "AND",
            "groups": [{
                "filterClause": "AND",
                "filters": [{"operator": "EQUALS", "term": "filePath", "value": "/etc/passwd"}]
            }],
            "pageSize": 10000,
            "srtKey": "eventId",
            "srtDirection": "asc"
        })
    );
}

#[test]
fn test_build_any_with_paging_and_sort() {
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &[
            "build",
            "--any",
            "-n",
            "50",
            "-p",
            "2",
            "-s",
            "eventTimestamp",
            "-d",
            "DESC",
            "fileName~=secret",
            "md5Checksum:exists",
        ],
    );

    assert!(output.status.success(), "{:?}", output);
    let value = stdout_json(&output);
    assert_eq!(value["groupClause"], "OR");
    assert_eq!(value["groups"].as_array().unwrap().len(), 2);
    assert_eq!(value["groups"][1]["filters"][0]["value"], Value::Null);
    assert_eq!(value["pageSize"], 50);
    assert_eq!(value["pageNumber"], 2);
    assert_eq!(value["srtKey"], "eventTimestamp");
    assert_eq!(value["srtDirection"], "desc");
}

#[test]
fn test_build_v1_dialect() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["build", "--dialect", "v1", "-p", "1", "severity=[HIGH,LOW]"]);

    assert!(output.status.success(), "{:?}", output);
    let value = stdout_json(&output);
    assert_eq!(value["pgSize"], 10000);
    assert_eq!(value["pgNum"], 1);
    assert_eq!(value["srtDir"], "asc");
    assert!(value.get("pageSize").is_none());
    assert_eq!(value["groups"][0]["filters"][0]["value"], json!(["HIGH", "LOW"]));
}

#[test]
fn test_build_uses_config_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "dialect = \"v1\"\npage_size = 250\n").unwrap();

    let output = run(tmp.path(), &["build", "trusted=false"]);
    assert!(output.status.success(), "{:?}", output);
    let value = stdout_json(&output);
    assert_eq!(value["pgSize"], 250);
    assert_eq!(value["groups"][0]["filters"][0]["value"], false);
}

#[test]
fn test_build_rejects_bad_expression() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["build", "noSuchField=1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Validation error"));
    assert!(output.stdout.is_empty());

    let output = run(tmp.path(), &["build", "-n", "0", "fileName=a"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_decode_from_stdin() {
    let tmp = TempDir::new().unwrap();
    let payload = r#"{"groupClause":"AND","groups":[{"filterClause":"OR","filters":[{"operator":"ON_OR_AFTER","term":"eventTimestamp","value":"2024-03-01T00:00:00.000Z"}]}],"pgSize":100,"srtKey":"eventId","srtDir":"DESC"}"#;

    let mut child = slq_cmd(tmp.path())
        .args(["decode", "--to", "v2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn slq");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(payload.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{:?}", output);
    let value = stdout_json(&output);
    assert_eq!(value["pageSize"], 100);
    assert_eq!(value["srtDirection"], "desc");
    assert_eq!(value["groups"][0]["filterClause"], "OR");
}

#[test]
fn test_decode_file_round_trips() {
    let tmp = TempDir::new().unwrap();
    let built = run(tmp.path(), &["build", "eventTimestamp:last=P7D", "fileSize>1024"]);
    assert!(built.status.success(), "{:?}", built);

    let path = tmp.path().join("query.json");
    std::fs::write(&path, &built.stdout).unwrap();

    let decoded = run(tmp.path(), &["decode", path.to_str().unwrap()]);
    assert!(decoded.status.success(), "{:?}", decoded);
    assert_eq!(stdout_json(&decoded), stdout_json(&built));
}

#[test]
fn test_decode_rejects_malformed_query() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    std::fs::write(&path, r#"{"groupClause":"XOR","groups":[],"pageSize":1,"srtKey":"k","srtDirection":"asc"}"#).unwrap();

    let output = run(tmp.path(), &["decode", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed payload"));
}

#[test]
fn test_fields_listing() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["fields", "--kind", "alert"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l.starts_with("createdAt") && l.ends_with("timestamp")));
    assert!(!stdout.contains("filePath"));

    let output = run(tmp.path(), &["fields"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# file-event"));
    assert!(stdout.contains("# alert"));

    let output = run(tmp.path(), &["fields", "--kind", "users"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_shows_defaults_and_file() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["config"]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("verify_ssl = true"));
    assert!(stdout.contains("dialect = \"v2\""));

    let other = tmp.path().join("other.toml");
    std::fs::write(&other, "base_url = \"https://console.example.com\"\nverify_ssl = false\n").unwrap();
    let output = run(tmp.path(), &["config", "--path", other.to_str().unwrap()]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("base_url = \"https://console.example.com\""));
    assert!(stdout.contains("verify_ssl = false"));
}

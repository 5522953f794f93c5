use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_payload(dir: &Path) -> PathBuf {
    let p = dir.join("chart.json");
    let payload = json!({
        "data": {
            "data": [
                {"date": "2000-01", "value": 950, "group": "A"},
                {"date": "2020-06", "value": 1800000, "group": "B"},
                {"date": "2040-01", "value": 2600000, "group": "C"}
            ],
            "columns": [
                {"name": "date", "role": "x"},
                {"name": "value", "role": "y"},
                {"name": "group", "role": "group"}
            ]
        },
        "variables": {"width": 300}
    });
    fs::write(&p, serde_json::to_string(&payload).unwrap()).unwrap();
    p
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("chartkit").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("chartkit"));
}

#[test]
fn axis_prints_decade_labels() {
    let dir = tempdir().unwrap();
    let input = write_payload(dir.path());
    let mut cmd = Command::cargo_bin("chartkit").unwrap();
    cmd.arg("axis").arg("--input").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Decade"))
        .stdout(predicate::str::contains("2030"));
}

#[test]
fn format_uses_range_unit() {
    let dir = tempdir().unwrap();
    let input = write_payload(dir.path());
    let mut cmd = Command::cargo_bin("chartkit").unwrap();
    cmd.arg("format").arg("--input").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("min=0.00M"))
        .stdout(predicate::str::contains("max=2.60M"));
}

#[test]
fn validate_reports_missing_roles() {
    let dir = tempdir().unwrap();
    let input = write_payload(dir.path());

    let mut ok = Command::cargo_bin("chartkit").unwrap();
    ok.args(["validate", "--roles", "x,y,group", "--input"]).arg(&input);
    ok.assert().success().stdout(predicate::str::contains("ok: 3 records"));

    let mut bad = Command::cargo_bin("chartkit").unwrap();
    bad.args(["validate", "--roles", "x;size", "--input"]).arg(&input);
    bad.assert()
        .failure()
        .stderr(predicate::str::contains("no column with role `size`"));
}

#[test]
fn legend_and_inspect_write_files() {
    let dir = tempdir().unwrap();
    let input = write_payload(dir.path());
    let svg = dir.path().join("legend.svg");
    let report = dir.path().join("layout.json");

    let mut cmd = Command::cargo_bin("chartkit").unwrap();
    cmd.args(["legend", "--align", "center", "--shape", "line", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(&svg);
    cmd.assert().success();
    assert!(fs::metadata(&svg).unwrap().len() > 0);

    let mut cmd = Command::cargo_bin("chartkit").unwrap();
    cmd.args(["inspect", "--input"]).arg(&input).arg("--out").arg(&report);
    cmd.assert().success();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(v["records"], json!(3));
    assert_eq!(v["label_indices"], json!([0, 1, 2]));
    assert_eq!(v["y"]["unit"], json!("Millions"));
    assert_eq!(v["x"]["axis"]["interval"], json!("Decade"));
    assert_eq!(v["legend"]["rows"][0]["entries"][0]["label"], json!("A"));
}

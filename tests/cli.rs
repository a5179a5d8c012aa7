use std::fs::{self, File};
use std::io::Write;

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use predicates::prelude::*;
use tempfile::TempDir;

fn datashaper() -> Command {
    Command::cargo_bin("datashaper").unwrap()
}

#[test]
fn flatten_writes_csv() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    datashaper()
        .args(["flatten", "tests/fixtures/nordic.json"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 9 rows"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("region,year,value\nNorway,2020,100\n"));
}

#[test]
fn stats_prints_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("d.csv.gz");
    let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    enc.write_all(b"x,label\n1,a\n3,b\n").unwrap();
    enc.finish().unwrap();

    datashaper()
        .args(["stats", "--json"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"row_count\": 2"))
        .stdout(predicate::str::contains("\"is_numeric\": false"));
}

#[test]
fn missing_stats_input_fails_with_path() {
    datashaper()
        .args(["stats", "no/such/file.csv.gz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no/such/file.csv.gz"));
}

#[test]
fn organize_dry_run_moves_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.md"), "# hi").unwrap();

    datashaper()
        .args(["organize", "--dry-run"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("would move 1 file(s)"));

    assert!(dir.path().join("notes.md").exists());
    assert!(!dir.path().join("md").exists());
}

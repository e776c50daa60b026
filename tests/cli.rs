use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const USAGE: &str =
    "Program arguments must not be empty. Please set csv file path as the first argument.";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("csv-unique-id").unwrap();
    cmd.env("RUST_LOG", "info")
        .env_remove("CSV_ENCODING")
        .env_remove("OUTPUT_FILE_SUFFIX")
        .env_remove("CHUNK_SIZE");
    cmd
}

#[test]
fn test_no_arguments() {
    cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains(USAGE));
}

#[test]
fn test_blank_argument() {
    cmd()
        .arg("   ")
        .assert()
        .success()
        .stdout(predicate::str::contains(USAGE));
}

#[test]
fn test_converts_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "a,b\n1,2\n3,4\n").unwrap();

    cmd()
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Processing file"))
        .stderr(predicate::str::contains("has been successfully processed"));

    let output = fs::read_to_string(dir.path().join("input-out.csv")).unwrap();
    let id = "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";
    let expected = format!("^a,b,unique-id\r\n1,2,{id}\r\n3,4,{id}\r\n$");
    assert!(
        predicate::str::is_match(expected).unwrap().eval(&output),
        "unexpected output:\n{output}"
    );
}

#[test]
fn test_environment_configuration() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("orders.csv");
    let mut content = String::from("order\n");
    for n in 0..25 {
        content.push_str(&format!("{}\n", n));
    }
    fs::write(&input, &content).unwrap();

    cmd()
        .env("OUTPUT_FILE_SUFFIX", "_ids")
        .env("CHUNK_SIZE", "7")
        .arg(&input)
        .assert()
        .success();

    let output = fs::read_to_string(dir.path().join("orders_ids.csv")).unwrap();
    assert_eq!(output.lines().count(), content.lines().count());
    assert!(output.len() > content.len());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.csv");

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("doesn't exist"));

    assert!(!dir.path().join("missing-out.csv").exists());
}

#[test]
fn test_directory() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("doesn't refer to a valid file"));
}

#[test]
fn test_invalid_chunk_size() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "a\n1\n").unwrap();

    cmd().env("CHUNK_SIZE", "0").arg(&input).assert().failure();

    assert!(!dir.path().join("input-out.csv").exists());
}

#[test]
fn test_unknown_encoding() {
    cmd()
        .env("CSV_ENCODING", "no-such-encoding")
        .arg("input.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown text encoding"));
}

//! Integration tests for the repunct CLI
//!
//! The pipeline tests run every subcommand in sequence against a small
//! annotated corpus in `tests/fixtures`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn repunct() -> Command {
    Command::cargo_bin("repunct").unwrap()
}

struct Artifacts {
    vocabulary: PathBuf,
    punctuations: PathBuf,
    data: PathBuf,
    model: PathBuf,
}

/// Run vocab, prepare and train-baseline into `dir`
fn train(dir: &Path) -> Artifacts {
    let artifacts = Artifacts {
        vocabulary: dir.join("vocabulary"),
        punctuations: dir.join("punctuations"),
        data: dir.join("train.jsonl"),
        model: dir.join("baseline.json"),
    };

    repunct()
        .arg("vocab")
        .arg("-i")
        .arg(fixture_path("*.train.txt"))
        .arg("-o")
        .arg(&artifacts.vocabulary)
        .arg("--punctuations")
        .arg(&artifacts.punctuations)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 7 words"));

    repunct()
        .arg("prepare")
        .arg("-i")
        .arg(fixture_path("corpus.train.txt"))
        .arg("--vocab")
        .arg(&artifacts.vocabulary)
        .arg("--punctuations")
        .arg(&artifacts.punctuations)
        .arg("-o")
        .arg(&artifacts.data)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 1 examples"));

    repunct()
        .arg("train-baseline")
        .arg("--data")
        .arg(&artifacts.data)
        .arg("--punctuations")
        .arg(&artifacts.punctuations)
        .arg("-o")
        .arg(&artifacts.model)
        .assert()
        .success();

    artifacts
}

fn restore_command(artifacts: &Artifacts) -> Command {
    let mut cmd = repunct();
    cmd.arg("restore")
        .arg("-i")
        .arg(fixture_path("plain.txt"))
        .arg("--vocab")
        .arg(&artifacts.vocabulary)
        .arg("--punctuations")
        .arg(&artifacts.punctuations)
        .arg("--model")
        .arg(&artifacts.model);
    cmd
}

#[test]
fn test_training_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let artifacts = train(temp_dir.path());

    let vocabulary = fs::read_to_string(&artifacts.vocabulary).unwrap();
    assert!(vocabulary.lines().any(|line| line == "hello"));
    assert!(vocabulary.ends_with("</S>\n<UNK>"));

    let mirror = fs::read_to_string(temp_dir.path().join("train.jsonl.txt")).unwrap();
    assert!(mirror.starts_with("hello ,COMMA world .PERIOD how are you ?QUESTIONMARK hello"));
    assert!(artifacts.model.is_file());
}

#[test]
fn test_restore_text_output() {
    let temp_dir = TempDir::new().unwrap();
    let artifacts = train(temp_dir.path());

    restore_command(&artifacts)
        .assert()
        .success()
        .stdout("Hello, world. How are you?\nHow are you?\n");
}

#[test]
fn test_restore_json_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let artifacts = train(temp_dir.path());
    let output = temp_dir.path().join("restored.json");

    restore_command(&artifacts)
        .arg("-f")
        .arg("json")
        .arg("-o")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success();

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"text\": \"Hello, world. How are you?\""));
    assert!(json.contains("\"line\": 2"));
}

#[test]
fn test_restore_then_evaluate() {
    let temp_dir = TempDir::new().unwrap();
    let artifacts = train(temp_dir.path());
    let predicted = temp_dir.path().join("restored.txt");

    restore_command(&artifacts)
        .arg("-o")
        .arg(&predicted)
        .assert()
        .success();

    repunct()
        .arg("evaluate")
        .arg("--target")
        .arg(fixture_path("target.txt"))
        .arg("--predicted")
        .arg(&predicted)
        .assert()
        .success()
        .stdout(predicate::str::contains("PRECISION"))
        .stdout(predicate::str::contains("SER: 0.0%"));
}

#[test]
fn test_evaluate_json_report() {
    repunct()
        .arg("evaluate")
        .arg("--target")
        .arg(fixture_path("target.txt"))
        .arg("--predicted")
        .arg(fixture_path("predicted-missing-comma.txt"))
        .arg("-f")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deletions\": 1"))
        .stdout(predicate::str::contains("\"slot_error_rate\""));
}

#[test]
fn test_evaluate_line_count_mismatch() {
    repunct()
        .arg("evaluate")
        .arg("--target")
        .arg(fixture_path("target.txt"))
        .arg("--predicted")
        .arg(fixture_path("corpus.train.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line count mismatch"));
}

#[test]
fn test_generate_and_validate_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("repunct.toml");

    repunct()
        .arg("generate-config")
        .arg("-o")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration template written"));

    repunct()
        .arg("validate")
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Training window: 200 words"));
}

#[test]
fn test_validate_rejects_bad_window() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "[restore]\nmax_len = 1\n").unwrap();

    repunct()
        .arg("validate")
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_config_flag_applies_to_commands() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("repunct.toml");
    fs::write(&config, "[vocabulary]\nmin_count = 100\n").unwrap();

    repunct()
        .arg("--config")
        .arg(&config)
        .arg("vocab")
        .arg("-i")
        .arg(fixture_path("corpus.train.txt"))
        .arg("-o")
        .arg(temp_dir.path().join("vocabulary"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 2 words"));
}

#[test]
fn test_missing_input_files() {
    let temp_dir = TempDir::new().unwrap();

    repunct()
        .arg("vocab")
        .arg("-i")
        .arg("nonexistent/*.txt")
        .arg("-o")
        .arg(temp_dir.path().join("vocabulary"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files match"));
}

#[test]
fn test_help_lists_subcommands() {
    repunct()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("train-baseline"))
        .stdout(predicate::str::contains("generate-config"));
}

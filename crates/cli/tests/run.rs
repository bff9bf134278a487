use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn write_config(home: &TempDir, command: &str) -> Result<(), Box<dyn std::error::Error>> {
    let dir = home.path().join(".atomshields");
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("ascli.toml"),
        format!("[scanner]\ncommand = {command:?}\n"),
    )?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn run_delegates_to_scanner() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let repo = TempDir::new()?;
    let record = home.path().join("args.txt");
    let script = home.path().join("scanner.sh");
    fs::write(
        &script,
        format!("#!/bin/sh\necho \"$@\" > '{}'\n", record.display()),
    )?;
    write_config(&home, &format!("sh '{}'", script.display()))?;

    Command::cargo_bin("ascli")?
        .env("HOME", home.path())
        .args(["run", "-n", "demo", "-v", "-t"])
        .arg(repo.path())
        .assert()
        .success()
        .stderr(contains("Scan completed"));

    let recorded = fs::read_to_string(record)?;
    assert_eq!(
        recorded.trim(),
        format!("{} demo 1", repo.path().display())
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn scanner_failure_exits_non_zero() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let repo = TempDir::new()?;
    write_config(&home, "false")?;

    Command::cargo_bin("ascli")?
        .env("HOME", home.path())
        .args(["run", "-t"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(contains("scanner exited with"));
    Ok(())
}

#[test]
fn run_rejects_missing_target() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let repo = TempDir::new()?;

    Command::cargo_bin("ascli")?
        .env("HOME", home.path())
        .args(["run", "-t"])
        .arg(repo.path().join("nope"))
        .assert()
        .failure()
        .stderr(contains("target path does not exist"));
    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for help, version and config handling

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::setup_test_env;
use predicates::prelude::*;
use std::fs;

fn joust() -> Command {
    Command::cargo_bin("joust").unwrap()
}

#[test]
fn test_joust_help() {
    joust()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch agents play games"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn test_joust_version() {
    joust()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("joust"));
}

#[test]
fn test_config_check_accepts_valid_file() {
    let temp = setup_test_env();
    let path = temp.path().join("joust.toml");
    fs::write(
        &path,
        "[game]\nmax_retries = 5\nmove_timeout = \"30s\"\n\n[tournament]\ndraw_policy = \"coin_flip\"\n",
    )
    .unwrap();

    joust()
        .current_dir(temp.path())
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("joust.toml: ok"));
}

#[test]
fn test_config_check_rejects_zero_retries() {
    let temp = setup_test_env();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "[game]\nmax_retries = 0\n").unwrap();

    joust()
        .arg("config")
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("game.max_retries"));
}

#[test]
fn test_config_check_rejects_unknown_keys() {
    let temp = setup_test_env();
    let path = temp.path().join("typo.toml");
    fs::write(&path, "[game]\nmax_retry = 2\n").unwrap();

    joust()
        .arg("config")
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn test_config_check_without_file_fails() {
    let temp = setup_test_env();

    joust()
        .current_dir(temp.path())
        .args(["config", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no joust.toml found"));
}

#[test]
fn test_config_show_prints_defaults() {
    let temp = setup_test_env();

    joust()
        .current_dir(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_retries = 3"))
        .stdout(predicate::str::contains("draw_policy = \"rematch\""));
}

#[test]
fn test_config_show_reads_global_flag() {
    let temp = setup_test_env();
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[game]\nmax_retries = 7\n").unwrap();

    joust()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_retries = 7"));
}

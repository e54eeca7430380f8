// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure specs
//!
//! Verify exit codes and stop-on-error behavior as seen from the shell.

use crate::prelude::*;

#[test]
fn exit_code_of_last_command_is_returned() {
    let output = cmdchain().args(["true", "exit 7"]).output().unwrap();
    assert_eq!(output.code(), 7);
}

#[test]
fn failure_stops_chain_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");

    let touch = format!("touch '{}'", marker.display());
    let output = cmdchain()
        .args(["printf broke >&2; exit 3", &touch])
        .output()
        .unwrap();

    assert!(!marker.exists(), "second command must not run");
    assert_eq!(output.code(), 1);
    let stderr = output.stderr_str();
    let expected =
        "error: previous command `printf broke >&2; exit 3` failed with exit code 3: broke";
    assert!(stderr.contains(expected), "{stderr}");
}

#[test]
fn propagate_reports_failed_command_output() {
    let output = cmdchain()
        .args(["--propagate", "printf half; printf bad >&2; exit 3", "cat"])
        .output()
        .unwrap();

    assert_eq!(output.code(), 3);
    assert_eq!(output.stdout_str(), "half");
    assert!(output.stderr_str().contains("bad"));
}

#[test]
fn keep_going_runs_every_command() {
    let output = cmdchain()
        .args(["--keep-going", "printf partial; exit 1", "cat"])
        .output()
        .unwrap();

    assert_eq!(output.code(), 0);
    assert_eq!(output.stdout_str(), "partial");
}

#[test]
fn missing_shell_exits_128() {
    let output = cmdchain()
        .args(["--shell", "/nonexistent/shell-xyz", "true"])
        .output()
        .unwrap();

    assert_eq!(output.code(), 128);
    assert!(output.stderr_str().contains("failed to start `true`"));
}

#[test]
fn warnings_are_logged_by_default() {
    let output = cmdchain()
        .args(["--shell", "/nonexistent/shell-xyz", "true"])
        .output()
        .unwrap();

    let stderr = output.stderr_str();
    assert!(stderr.contains("WARN"), "{stderr}");
    assert!(stderr.contains("spawn failed"), "{stderr}");
}

#[test]
fn log_filter_env_overrides_default() {
    let output = cmdchain()
        .env("CMDCHAIN_LOG", "off")
        .args(["--shell", "/nonexistent/shell-xyz", "true"])
        .output()
        .unwrap();

    let stderr = output.stderr_str();
    assert!(!stderr.contains("spawn failed"), "{stderr}");
    assert!(stderr.contains("failed to start `true`"), "{stderr}");
}

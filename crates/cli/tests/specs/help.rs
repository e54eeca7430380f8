// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and usage specs

use crate::prelude::*;

#[test]
fn help_lists_options() {
    let output = cmdchain().arg("--help").output().unwrap();
    assert_eq!(output.code(), 0);
    let stdout = output.stdout_str();
    let flags = [
        "--shell",
        "--workdir",
        "--keep-going",
        "--config",
        "--stdin",
        "--output",
    ];
    for flag in flags {
        assert!(stdout.contains(flag), "missing {flag}:\n{stdout}");
    }
}

#[test]
fn missing_commands_is_usage_error() {
    let output = cmdchain().output().unwrap();
    assert_eq!(output.code(), 2);
    assert!(output.stderr_str().contains("COMMAND"));
}

#[test]
fn version_prints_version() {
    let output = cmdchain().arg("--version").output().unwrap();
    assert_eq!(output.code(), 0);
    assert!(output.stdout_str().starts_with("cmdchain "));
}

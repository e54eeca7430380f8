// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Piping specs
//!
//! Verify each command's stdout becomes the next command's stdin.

use crate::prelude::*;

#[test]
fn single_command_prints_stdout() {
    let output = cmdchain().arg("printf hello").output().unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(output.stdout_str(), "hello");
    assert_eq!(output.stderr_str(), "");
}

#[test]
fn chain_pipes_stdout_to_stdin() {
    let output = cmdchain()
        .args(["printf 'c\\na\\nb\\n'", "sort", "head -n 2"])
        .output()
        .unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(output.stdout_str(), "a\nb\n");
}

#[test]
fn last_stderr_is_forwarded() {
    let output = cmdchain()
        .args(["true", "printf warn >&2"])
        .output()
        .unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(output.stderr_str(), "warn");
}

#[test]
fn stdin_flag_seeds_chain() {
    let output = cmdchain()
        .args(["--stdin", "tr a-z A-Z"])
        .write_stdin("shout")
        .output()
        .unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(output.stdout_str(), "SHOUT");
}

#[test]
fn without_stdin_flag_first_command_gets_empty_input() {
    let output = cmdchain()
        .arg("wc -c")
        .write_stdin("ignored")
        .output()
        .unwrap();
    assert_eq!(output.stdout_str().trim(), "0");
}

#[test]
fn workdir_flag_sets_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "").unwrap();

    let output = cmdchain()
        .args(["-C", dir.path().to_str().unwrap(), "ls"])
        .output()
        .unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(output.stdout_str(), "marker.txt\n");
}

#[test]
fn config_file_sets_shell_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("chain.toml");
    std::fs::write(&config, "[env]\nGREETING = \"from config\"\n").unwrap();

    let config = config.to_str().unwrap();
    let output = cmdchain()
        .args(["--config", config, "printf '%s' \"$GREETING\""])
        .output()
        .unwrap();
    assert_eq!(output.stdout_str(), "from config");
}

#[test]
fn invalid_config_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("chain.toml");
    std::fs::write(&config, "unknown = true\n").unwrap();

    let output = cmdchain()
        .args(["--config", config.to_str().unwrap(), "true"])
        .output()
        .unwrap();
    assert_eq!(output.code(), 2);
    let stderr = output.stderr_str();
    assert!(stderr.contains("invalid config"), "{stderr}");
}

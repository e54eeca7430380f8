// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for single commands: output capture, exit codes, memoization.

use super::run_async;
use crate::{ChainConfig, Cmd, Upstream};

// ---------------------------------------------------------------------------
// Output capture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn captures_stdout() {
    let cmd = Cmd::new("printf hello");
    cmd.run().await;

    assert!(cmd.has_run());
    assert_eq!(cmd.stdout(), "hello");
    assert_eq!(cmd.stderr(), "");
    assert_eq!(cmd.code(), 0);
    assert!(!cmd.has_errors());
}

#[tokio::test]
async fn captures_stderr_separately() {
    let cmd = Cmd::new("printf hello 1>&2");
    cmd.run().await;

    assert!(cmd.has_run());
    assert_eq!(cmd.stdout(), "");
    assert_eq!(cmd.stderr(), "hello");
    assert_eq!(cmd.code(), 0);
    assert!(!cmd.has_errors());
}

#[tokio::test]
async fn captures_both_streams() {
    let cmd = Cmd::new("printf out; printf err >&2");
    cmd.run().await;

    assert_eq!(cmd.stdout(), "out");
    assert_eq!(cmd.stderr(), "err");
}

#[tokio::test]
async fn invalid_utf8_is_replaced() {
    let cmd = Cmd::new(r"printf 'a\377b'");
    cmd.run().await;

    assert_eq!(cmd.stdout(), "a\u{FFFD}b");
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

#[yare::parameterized(
    success = { "true", 0 },
    failure = { "false", 1 },
    seven = { "exit 7", 7 },
    max_normal = { "exit 127", 127 },
    not_found = { "definitely-not-a-command-xyz", 127 },
)]
fn exit_code(script: &str, expected: i32) {
    run_async(async {
        let cmd = Cmd::new(script);
        cmd.run().await;
        assert!(cmd.has_run());
        assert_eq!(cmd.code(), expected);
        assert!(!cmd.has_errors(), "errors: {:?}", cmd.errors());
    });
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn unrun_node_reports_defaults() {
    let cmd = Cmd::new("printf hello");

    assert!(!cmd.has_run());
    assert_eq!(cmd.command(), "printf hello");
    assert_eq!(cmd.stdout(), "");
    assert_eq!(cmd.stderr(), "");
    assert_eq!(cmd.code(), 0);
    assert!(cmd.errors().is_empty());
    assert!(cmd.outcome().is_none());
    assert!(cmd.upstream().is_none());
}

#[tokio::test]
async fn run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("count");
    let script = format!("echo x >> '{0}'; wc -l < '{0}'", counter.display());
    let cmd = Cmd::new(script);

    cmd.run().await;
    let first = cmd.stdout().to_string();
    cmd.run().await;

    assert_eq!(cmd.stdout(), first);
    assert_eq!(first.trim(), "1");
    let lines = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(lines.lines().count(), 1, "launched twice");
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn workdir_changes_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    // Canonicalize to resolve symlinks (e.g., /var -> /private/var on macOS)
    let canonical = dir.path().canonicalize().unwrap();

    let cmd = Cmd::with_config("pwd -P", ChainConfig::default().workdir(dir.path()));
    cmd.run().await;

    assert_eq!(cmd.code(), 0);
    assert_eq!(cmd.stdout().trim(), canonical.to_str().unwrap());
}

#[tokio::test]
async fn empty_workdir_inherits_cwd() {
    let expected = std::env::current_dir().unwrap().canonicalize().unwrap();

    let cmd = Cmd::with_config("pwd -P", ChainConfig::default().workdir(""));
    cmd.run().await;

    assert_eq!(cmd.code(), 0);
    assert_eq!(cmd.stdout().trim(), expected.to_str().unwrap());
}

#[tokio::test]
async fn env_is_passed_to_process() {
    let config = ChainConfig::default().env("CHAIN_TEST_VAR", "chained");
    let cmd = Cmd::with_config("printf '%s' \"$CHAIN_TEST_VAR\"", config);
    cmd.run().await;

    assert_eq!(cmd.stdout(), "chained");
}

#[tokio::test]
async fn custom_shell_is_used() {
    let config = ChainConfig::default().shell("/bin/sh");
    let cmd = Cmd::with_config("printf '%s' \"$0\"", config);
    cmd.run().await;

    assert_eq!(cmd.stdout(), "/bin/sh");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for stop-on-error, launch failures and abnormal termination.

use super::fake_cmd;
use crate::{
    ChainConfig, ChainError, Cmd, FakeLauncher, FakeResponse, PreviousCommandFailedError, Upstream,
    ABNORMAL_EXIT_CODE,
};

// ---------------------------------------------------------------------------
// Stop-on-error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_predecessor_skips_successor() {
    let build = FakeResponse::exit(2).stdout("partial").stderr("boom");
    let launcher = FakeLauncher::new().respond("build", build);
    let c1 = fake_cmd("build", &launcher);
    let c2 = c1.chain("deploy");
    c2.run().await;

    assert_eq!(launcher.commands(), vec!["build"], "deploy launched");
    assert!(c1.has_run());
    assert!(c2.has_run());
    assert_eq!(c2.stdout(), "");
    assert_eq!(c2.stderr(), "");
    assert_eq!(c2.code(), 0);

    let expected = PreviousCommandFailedError {
        previous_command: "build".to_string(),
        code: 2,
        stderr: "boom".to_string(),
    };
    assert_eq!(c2.errors().len(), 1);
    match &c2.errors()[0] {
        ChainError::PreviousCommandFailed(err) => assert_eq!(err, &expected),
        other => panic!("expected PreviousCommandFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn failed_predecessor_skips_real_successor() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let c1 = Cmd::new("printf oops >&2; exit 3");
    let c2 = c1.chain(format!("touch '{}'", marker.display()));
    c2.run().await;

    assert!(c2.has_run());
    assert!(c2.has_errors());
    assert!(!marker.exists(), "successor process must not be spawned");
    assert_eq!(
        c2.errors()[0].to_string(),
        "previous command `printf oops >&2; exit 3` failed with exit code 3: oops"
    );
}

#[tokio::test]
async fn skip_does_not_cascade() {
    let launcher = FakeLauncher::new().respond("a", FakeResponse::exit(1));
    let c = fake_cmd("a", &launcher).chain("b").chain("c");
    c.run().await;

    // `b` was skipped with code 0, so `c` runs normally on empty input.
    assert_eq!(launcher.commands(), vec!["a", "c"]);
    assert_eq!(launcher.calls()[1].stdin, "");
    assert_eq!(c.upstream().map(|b| b.code()), Some(0));
    assert!(c.has_run());
    assert!(!c.has_errors());
}

#[tokio::test]
async fn keep_going_runs_successor_with_failed_output() {
    let launcher = FakeLauncher::new()
        .respond("lint", FakeResponse::exit(1).stdout("warnings"))
        .respond("report", FakeResponse::echo());
    let config = ChainConfig::default().stop_on_error(false);
    let c1 = Cmd::builder("lint")
        .config(config)
        .launcher(std::sync::Arc::new(launcher.clone()))
        .build();
    let c2 = c1.chain("report");
    c2.run().await;

    assert_eq!(launcher.commands(), vec!["lint", "report"]);
    assert_eq!(c2.stdout(), "warnings");
    assert!(!c2.has_errors());
}

#[tokio::test]
async fn propagate_copies_failed_upstream_output() {
    let fetch = FakeResponse::exit(6).stdout("half").stderr("timeout");
    let launcher = FakeLauncher::new().respond("fetch", fetch);
    let config = ChainConfig::default().propagate_upstream_output(true);
    let c1 = Cmd::builder("fetch")
        .config(config)
        .launcher(std::sync::Arc::new(launcher.clone()))
        .build();
    let c2 = c1.chain("parse");
    c2.run().await;

    assert_eq!(launcher.commands(), vec!["fetch"]);
    assert_eq!(c2.stdout(), "half");
    assert_eq!(c2.stderr(), "timeout");
    assert_eq!(c2.code(), 6);
    assert!(c2.has_errors());
}

// ---------------------------------------------------------------------------
// Launch failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn setup_failure_sets_abnormal_code() {
    let launcher = FakeLauncher::new().respond("x", FakeResponse::setup_failure("stdout"));
    let cmd = fake_cmd("x", &launcher);
    cmd.run().await;

    assert!(cmd.has_run());
    assert_eq!(cmd.code(), ABNORMAL_EXIT_CODE);
    let [ChainError::Setup { stream, .. }] = cmd.errors() else {
        panic!("expected one setup error, got {:?}", cmd.errors());
    };
    assert_eq!(*stream, "stdout");
    assert_eq!(cmd.stderr(), cmd.errors()[0].to_string());
}

#[tokio::test]
async fn spawn_failure_with_missing_shell() {
    let config = ChainConfig::default().shell("/nonexistent/shell-xyz");
    let cmd = Cmd::with_config("true", config);
    cmd.run().await;

    assert!(cmd.has_run());
    assert_eq!(cmd.code(), ABNORMAL_EXIT_CODE);
    assert!(matches!(cmd.errors(), [ChainError::Spawn { .. }]));
    assert!(
        cmd.stderr().contains("failed to start `true`"),
        "stderr: {}",
        cmd.stderr()
    );
}

#[tokio::test]
async fn spawn_failure_with_missing_workdir() {
    let config = ChainConfig::default().workdir("/nonexistent/dir-xyz");
    let cmd = Cmd::with_config("true", config);
    cmd.run().await;

    assert_eq!(cmd.code(), ABNORMAL_EXIT_CODE);
    assert!(matches!(cmd.errors(), [ChainError::Spawn { .. }]));
}

#[tokio::test]
async fn spawn_failure_stops_successor() {
    let launcher = FakeLauncher::new().respond("a", FakeResponse::spawn_failure("no such shell"));
    let c2 = fake_cmd("a", &launcher).chain("b");
    c2.run().await;

    assert_eq!(launcher.commands(), vec!["a"]);
    match &c2.errors()[0] {
        ChainError::PreviousCommandFailed(err) => {
            assert_eq!(err.code, ABNORMAL_EXIT_CODE);
            assert!(err.stderr.contains("no such shell"));
        }
        other => panic!("expected PreviousCommandFailed, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Abnormal termination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn abnormal_termination_from_fake() {
    let crash = FakeResponse::abnormal("signal: 9").stderr("ignored");
    let launcher = FakeLauncher::new().respond("crash", crash);
    let cmd = fake_cmd("crash", &launcher);
    cmd.run().await;

    assert_eq!(cmd.code(), ABNORMAL_EXIT_CODE);
    assert_eq!(cmd.stderr(), "`crash` terminated abnormally: signal: 9");
    assert!(matches!(cmd.errors(), [ChainError::AbnormalTermination { .. }]));
}

#[cfg(unix)]
#[tokio::test]
async fn killed_process_is_abnormal() {
    let cmd = Cmd::new("kill -9 $$");
    cmd.run().await;

    assert_eq!(cmd.code(), ABNORMAL_EXIT_CODE);
    assert!(
        cmd.stderr().contains("terminated abnormally"),
        "stderr: {}",
        cmd.stderr()
    );
    assert!(matches!(cmd.errors(), [ChainError::AbnormalTermination { .. }]));
}

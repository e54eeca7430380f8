// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{ChainConfig, FakeLauncher, FakeResponse};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

fn request(command: &str) -> LaunchRequest {
    LaunchRequest::new(command, &ChainConfig::default())
}

/// Stdin that rejects every write with a fixed error kind.
struct RejectingStdin(io::ErrorKind);

impl AsyncWrite for RejectingStdin {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(self.0, "rejected")))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Stdout that fails on the first read.
struct FailingRead;

impl AsyncRead for FailingRead {
    fn poll_read(
        self: Pin<&mut Self>,
        _: &mut Context<'_>,
        _: &mut tokio::io::ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("stream torn down")))
    }
}

/// Launcher producing a process that ignores stdin and ends with `exit`.
struct StubLauncher {
    stdin_error: io::ErrorKind,
    failing_stdout: bool,
    exit: fn() -> io::Result<Termination>,
}

impl StubLauncher {
    fn new(stdin_error: io::ErrorKind, exit: fn() -> io::Result<Termination>) -> Self {
        Self {
            stdin_error,
            failing_stdout: false,
            exit,
        }
    }

    fn failing_stdout(mut self) -> Self {
        self.failing_stdout = true;
        self
    }
}

impl Launcher for StubLauncher {
    fn launch(&self, _: &LaunchRequest) -> Result<Launched, LaunchError> {
        let exit = self.exit;
        let stdout: Box<dyn AsyncRead + Send + Unpin> = if self.failing_stdout {
            Box::new(FailingRead)
        } else {
            Box::new(&b"out"[..])
        };
        Ok(Launched {
            stdin: Box::new(RejectingStdin(self.stdin_error)),
            stdout,
            stderr: Box::new(&b"err"[..]),
            exit: Box::pin(async move { exit() }),
        })
    }
}

fn exit_zero() -> io::Result<Termination> {
    Ok(Termination::Exited(0))
}

fn exit_three() -> io::Result<Termination> {
    Ok(Termination::Exited(3))
}

fn wait_fails() -> io::Result<Termination> {
    Err(io::Error::other("reaper gone"))
}

#[tokio::test]
async fn forwards_input_and_captures_output() {
    let launcher = FakeLauncher::new().respond("cat", FakeResponse::echo().stderr("note"));
    let outcome = execute(&launcher, &request("cat"), "piped data").await;

    assert_eq!(outcome.stdout, "piped data");
    assert_eq!(outcome.stderr, "note");
    assert_eq!(outcome.code, 0);
    assert!(outcome.errors.is_empty());
    assert_eq!(launcher.calls()[0].stdin, "piped data");
}

#[tokio::test]
async fn passes_request_to_launcher() {
    let launcher = FakeLauncher::new();
    let config = ChainConfig::default()
        .shell("bash")
        .workdir("/tmp")
        .env("K", "V");
    execute(&launcher, &LaunchRequest::new("ls", &config), "").await;

    let call = &launcher.calls()[0];
    assert_eq!(call.request.shell, "bash");
    assert_eq!(call.request.command, "ls");
    assert_eq!(
        call.request.workdir.as_deref(),
        Some(std::path::Path::new("/tmp"))
    );
    assert_eq!(call.request.env.get("K").map(String::as_str), Some("V"));
}

#[yare::parameterized(
    setup = {
        FakeResponse::setup_failure("stdin"),
        "failed to set up stdin for `x`: stdin unavailable",
    },
    spawn = { FakeResponse::spawn_failure("missing"), "failed to start `x`: missing" },
)]
fn launch_failure_is_fatal(response: FakeResponse, message: &str) {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let launcher = FakeLauncher::new().respond("x", response);
        let outcome = execute(&launcher, &request("x"), "ignored").await;

        assert_eq!(outcome.code, ABNORMAL_EXIT_CODE);
        assert_eq!(outcome.stderr, message);
        assert_eq!(outcome.stdout, "");
        assert_eq!(outcome.errors.len(), 1);
    });
}

#[tokio::test]
async fn input_forward_error_is_not_fatal() {
    let launcher = StubLauncher::new(io::ErrorKind::Other, exit_zero);
    let outcome = execute(&launcher, &request("x"), "data").await;

    assert_eq!(outcome.code, 0);
    assert_eq!(outcome.stdout, "out");
    assert_eq!(outcome.stderr, "err");
    assert!(matches!(&outcome.errors[..], [ChainError::InputForward { .. }]));
}

#[tokio::test]
async fn broken_pipe_on_stdin_is_ignored() {
    let launcher = StubLauncher::new(io::ErrorKind::BrokenPipe, exit_zero);
    let outcome = execute(&launcher, &request("x"), "data").await;

    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn wait_failure_is_fatal() {
    let launcher = StubLauncher::new(io::ErrorKind::BrokenPipe, wait_fails);
    let outcome = execute(&launcher, &request("x"), "").await;

    assert_eq!(outcome.code, ABNORMAL_EXIT_CODE);
    assert_eq!(outcome.stdout, "out");
    assert_eq!(outcome.stderr, "failed to wait for `x`: reaper gone");
    assert!(matches!(&outcome.errors[..], [ChainError::Wait { .. }]));
}

#[tokio::test]
async fn capture_error_is_not_fatal() {
    let launcher = StubLauncher::new(io::ErrorKind::BrokenPipe, exit_three).failing_stdout();
    let outcome = execute(&launcher, &request("x"), "").await;

    assert_eq!(outcome.code, 3);
    assert_eq!(outcome.stdout, "");
    assert_eq!(outcome.stderr, "err");
    let [ChainError::Capture { stream, .. }] = &outcome.errors[..] else {
        panic!("expected one capture error, got {:?}", outcome.errors);
    };
    assert_eq!(*stream, "stdout");
    assert_eq!(
        outcome.errors[0].to_string(),
        "failed to capture stdout of `x`: stream torn down"
    );
}

#[tokio::test]
async fn nonzero_exit_is_recorded_without_errors() {
    let launcher = FakeLauncher::new().respond("x", FakeResponse::exit(42).stderr("bad"));
    let outcome = execute(&launcher, &request("x"), "").await;

    assert_eq!(outcome.code, 42);
    assert_eq!(outcome.stderr, "bad");
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn large_payload_through_fake_pipes() {
    let payload = "z".repeat(512 * 1024);
    let launcher = FakeLauncher::new().respond("cat", FakeResponse::echo());
    let outcome = execute(&launcher, &request("cat"), &payload).await;

    assert_eq!(outcome.stdout.len(), payload.len());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-node execution: launch, feed stdin, drain output, reap.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{ChainError, LaunchError, LaunchRequest, Launched, Launcher, Termination, Upstream};

/// Exit code recorded when a process could not be started or did not exit
/// normally.
pub const ABNORMAL_EXIT_CODE: i32 = 128;

/// Everything a node captured from its one execution.
#[derive(Debug, Default)]
pub struct Outcome {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
    pub errors: Vec<ChainError>,
}

impl Outcome {
    /// A node that could not run its process at all.
    fn fatal(error: ChainError) -> Self {
        Self {
            stdout: String::new(),
            stderr: error.to_string(),
            code: ABNORMAL_EXIT_CODE,
            errors: vec![error],
        }
    }

    /// A node skipped because its predecessor failed under stop-on-error.
    ///
    /// Outputs stay empty unless `propagate` copies the predecessor's.
    pub(crate) fn skipped(upstream: &dyn Upstream, propagate: bool) -> Self {
        let error = crate::PreviousCommandFailedError::from_upstream(upstream);
        let mut outcome = Self {
            errors: vec![error.into()],
            ..Self::default()
        };
        if propagate {
            outcome.stdout = upstream.stdout().to_string();
            outcome.stderr = upstream.stderr().to_string();
            outcome.code = upstream.code();
        }
        outcome
    }

    /// Record a fatal error after the process was started.
    fn fail(&mut self, error: ChainError) {
        self.code = ABNORMAL_EXIT_CODE;
        self.stderr = error.to_string();
        self.errors.push(error);
    }
}

/// Launch `request`, feed `input` to its stdin and capture everything.
///
/// Stdin feeding and both output drains run concurrently and are joined
/// before the exit status is awaited, so a child blocked on a full pipe in
/// either direction always makes progress.
pub(crate) async fn execute(
    launcher: &dyn Launcher,
    request: &LaunchRequest,
    input: &str,
) -> Outcome {
    let command = &request.command;

    let Launched {
        stdin,
        stdout,
        stderr,
        exit,
    } = match launcher.launch(request) {
        Ok(launched) => launched,
        Err(LaunchError::Setup { stream, source }) => {
            tracing::warn!(cmd = %command, stream, error = %source, "stream setup failed");
            return Outcome::fatal(ChainError::Setup {
                command: command.clone(),
                stream,
                source,
            });
        }
        Err(LaunchError::Spawn(source)) => {
            tracing::warn!(cmd = %command, shell = %request.shell, error = %source, "spawn failed");
            return Outcome::fatal(ChainError::Spawn {
                command: command.clone(),
                source,
            });
        }
    };
    tracing::debug!(cmd = %command, input_bytes = input.len(), "launched");

    let (fed, out, err) = tokio::join!(feed(stdin, input), drain(stdout), drain(stderr));

    let mut outcome = Outcome::default();
    match fed {
        Ok(()) => {}
        // The child exited or closed stdin without reading everything.
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!(cmd = %command, "child closed stdin early");
        }
        Err(source) => {
            tracing::warn!(cmd = %command, error = %source, "input forwarding failed");
            outcome.errors.push(ChainError::InputForward {
                command: command.clone(),
                source,
            });
        }
    }
    match out {
        Ok(text) => outcome.stdout = text,
        Err(source) => outcome.errors.push(ChainError::Capture {
            command: command.clone(),
            stream: "stdout",
            source,
        }),
    }
    match err {
        Ok(text) => outcome.stderr = text,
        Err(source) => outcome.errors.push(ChainError::Capture {
            command: command.clone(),
            stream: "stderr",
            source,
        }),
    }

    match exit.await {
        Ok(Termination::Exited(code)) => outcome.code = code,
        Ok(Termination::Abnormal(description)) => {
            tracing::warn!(cmd = %command, %description, "terminated abnormally");
            outcome.fail(ChainError::AbnormalTermination {
                command: command.clone(),
                description,
            });
        }
        Err(source) => {
            tracing::warn!(cmd = %command, error = %source, "wait failed");
            outcome.fail(ChainError::Wait {
                command: command.clone(),
                source,
            });
        }
    }

    outcome
}

/// Write all of `input` and close the pipe.
async fn feed(mut stdin: Box<dyn AsyncWrite + Send + Unpin>, input: &str) -> std::io::Result<()> {
    stdin.write_all(input.as_bytes()).await?;
    stdin.shutdown().await
}

/// Read a stream to EOF as lossy UTF-8.
async fn drain(mut stream: Box<dyn AsyncRead + Send + Unpin>) -> std::io::Result<String> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

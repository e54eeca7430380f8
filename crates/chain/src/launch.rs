// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process launching boundary.
//!
//! The engine never touches `tokio::process` directly. It asks a [`Launcher`]
//! for a running process with three standard streams and an exit future,
//! which keeps the data-flow logic testable with [`FakeLauncher`].

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::ChainConfig;

/// Everything needed to start one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub shell: String,
    pub command: String,
    pub workdir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl LaunchRequest {
    pub fn new(command: impl Into<String>, config: &ChainConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            command: command.into(),
            workdir: config.effective_workdir().map(|dir| dir.to_path_buf()),
            env: config.env.clone(),
        }
    }
}

/// How a process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Normal exit with a status code.
    Exited(i32),
    /// No exit code was reported (killed by a signal, etc.).
    Abnormal(String),
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Termination::Exited(code),
            None => Termination::Abnormal(status.to_string()),
        }
    }
}

/// Resolves once the process has terminated.
pub type ExitFuture = Pin<Box<dyn Future<Output = std::io::Result<Termination>> + Send>>;

/// A started process with its standard streams detached.
pub struct Launched {
    pub stdin: Box<dyn AsyncWrite + Send + Unpin>,
    pub stdout: Box<dyn AsyncRead + Send + Unpin>,
    pub stderr: Box<dyn AsyncRead + Send + Unpin>,
    pub exit: ExitFuture,
}

/// Launch failures. Both are fatal to the node.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to set up {stream}: {source}")]
    Setup {
        stream: &'static str,
        source: std::io::Error,
    },

    #[error("failed to spawn: {0}")]
    Spawn(std::io::Error),
}

/// Capability to start a shell command.
pub trait Launcher: Send + Sync {
    fn launch(&self, request: &LaunchRequest) -> Result<Launched, LaunchError>;
}

/// Launches `<shell> -c <command>` via `tokio::process`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
        let mut process = tokio::process::Command::new(&request.shell);
        process.arg("-c").arg(&request.command);
        if let Some(dir) = &request.workdir {
            process.current_dir(dir);
        }
        process.envs(&request.env);
        process.stdin(Stdio::piped());
        process.stdout(Stdio::piped());
        process.stderr(Stdio::piped());

        let mut child = process.spawn().map_err(LaunchError::Spawn)?;

        let Some(stdin) = child.stdin.take() else {
            return Err(abandon(child, "stdin"));
        };
        let Some(stdout) = child.stdout.take() else {
            return Err(abandon(child, "stdout"));
        };
        let Some(stderr) = child.stderr.take() else {
            return Err(abandon(child, "stderr"));
        };

        Ok(Launched {
            stdin: Box::new(stdin),
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            exit: Box::pin(async move { child.wait().await.map(Termination::from) }),
        })
    }
}

/// Kill a child whose streams could not all be captured.
fn abandon(mut child: tokio::process::Child, stream: &'static str) -> LaunchError {
    if let Err(e) = child.start_kill() {
        tracing::warn!(stream, error = %e, "failed to kill partially set up child");
    }
    LaunchError::Setup {
        stream,
        source: std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            format!("{stream} was not captured"),
        ),
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{LaunchError, LaunchRequest, Launched, Launcher, Termination};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const PIPE_CAPACITY: usize = 64 * 1024;

    /// Scripted behavior for one command.
    #[derive(Debug, Clone)]
    pub struct FakeResponse {
        stdout: String,
        stderr: String,
        echo_stdin: bool,
        end: FakeEnd,
    }

    #[derive(Debug, Clone)]
    enum FakeEnd {
        Exit(i32),
        Abnormal(String),
        SetupFailure(&'static str),
        SpawnFailure(String),
    }

    impl Default for FakeResponse {
        fn default() -> Self {
            Self {
                stdout: String::new(),
                stderr: String::new(),
                echo_stdin: false,
                end: FakeEnd::Exit(0),
            }
        }
    }

    impl FakeResponse {
        /// Exit with `code` and no output.
        pub fn exit(code: i32) -> Self {
            Self {
                end: FakeEnd::Exit(code),
                ..Self::default()
            }
        }

        /// Copy everything received on stdin to stdout, like `cat`.
        pub fn echo() -> Self {
            Self {
                echo_stdin: true,
                ..Self::default()
            }
        }

        /// Die without an exit code.
        pub fn abnormal(description: impl Into<String>) -> Self {
            Self {
                end: FakeEnd::Abnormal(description.into()),
                ..Self::default()
            }
        }

        /// Fail to acquire the named stream.
        pub fn setup_failure(stream: &'static str) -> Self {
            Self {
                end: FakeEnd::SetupFailure(stream),
                ..Self::default()
            }
        }

        /// Fail to start at all.
        pub fn spawn_failure(message: impl Into<String>) -> Self {
            Self {
                end: FakeEnd::SpawnFailure(message.into()),
                ..Self::default()
            }
        }

        pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
            self.stdout = stdout.into();
            self
        }

        pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
            self.stderr = stderr.into();
            self
        }
    }

    /// Recorded launch
    #[derive(Debug, Clone)]
    pub struct LaunchCall {
        pub request: LaunchRequest,
        /// Bytes the fake process read from stdin, filled in once it exits.
        pub stdin: String,
    }

    #[derive(Default)]
    struct FakeLauncherState {
        responses: HashMap<String, FakeResponse>,
        calls: Vec<LaunchCall>,
    }

    /// Fake launcher for testing
    ///
    /// Commands without a scripted response exit 0 with no output.
    #[derive(Clone, Default)]
    pub struct FakeLauncher {
        inner: Arc<Mutex<FakeLauncherState>>,
    }

    impl FakeLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the response for an exact command text.
        pub fn respond(self, command: impl Into<String>, response: FakeResponse) -> Self {
            let mut state = self.inner.lock();
            state.responses.insert(command.into(), response);
            drop(state);
            self
        }

        /// Get all recorded launches
        pub fn calls(&self) -> Vec<LaunchCall> {
            self.inner.lock().calls.clone()
        }

        /// Commands launched, in launch order.
        pub fn commands(&self) -> Vec<String> {
            self.inner
                .lock()
                .calls
                .iter()
                .map(|c| c.request.command.clone())
                .collect()
        }
    }

    impl Launcher for FakeLauncher {
        fn launch(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
            let (response, index) = {
                let mut state = self.inner.lock();
                let response = state
                    .responses
                    .get(&request.command)
                    .cloned()
                    .unwrap_or_default();
                state.calls.push(LaunchCall {
                    request: request.clone(),
                    stdin: String::new(),
                });
                (response, state.calls.len() - 1)
            };

            let FakeResponse {
                stdout,
                stderr,
                echo_stdin,
                end,
            } = response;
            let termination = match end {
                FakeEnd::SetupFailure(stream) => {
                    return Err(LaunchError::Setup {
                        stream,
                        source: std::io::Error::other(format!("{stream} unavailable")),
                    });
                }
                FakeEnd::SpawnFailure(message) => {
                    return Err(LaunchError::Spawn(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        message,
                    )));
                }
                FakeEnd::Exit(code) => Termination::Exited(code),
                FakeEnd::Abnormal(description) => Termination::Abnormal(description),
            };

            let (stdin_writer, mut stdin_reader) = tokio::io::duplex(PIPE_CAPACITY);
            let (stdout_reader, mut stdout_writer) = tokio::io::duplex(PIPE_CAPACITY);
            let (stderr_reader, mut stderr_writer) = tokio::io::duplex(PIPE_CAPACITY);

            let inner = Arc::clone(&self.inner);
            let process = tokio::spawn(async move {
                let mut received = Vec::new();
                stdin_reader.read_to_end(&mut received).await?;
                let received = String::from_utf8_lossy(&received).into_owned();

                let stdout = if echo_stdin { &received } else { &stdout };
                stdout_writer.write_all(stdout.as_bytes()).await?;
                stderr_writer.write_all(stderr.as_bytes()).await?;
                drop(stdout_writer);
                drop(stderr_writer);

                if let Some(call) = inner.lock().calls.get_mut(index) {
                    call.stdin = received;
                }
                Ok::<Termination, std::io::Error>(termination)
            });

            Ok(Launched {
                stdin: Box::new(stdin_writer),
                stdout: Box::new(stdout_reader),
                stderr: Box::new(stderr_reader),
                exit: Box::pin(async move { process.await.map_err(std::io::Error::other)? }),
            })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncher, FakeResponse, LaunchCall};

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;

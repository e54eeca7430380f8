// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types recorded on chain nodes and raised by config loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::Upstream;

/// Errors recorded while running a node.
///
/// These never cross the `run` boundary. They accumulate in the node's error
/// list and are read back through [`Upstream::errors`].
#[derive(Debug, Error)]
pub enum ChainError {
    /// A standard stream of the child could not be acquired.
    #[error("failed to set up {stream} for `{command}`: {source}")]
    Setup {
        command: String,
        stream: &'static str,
        source: std::io::Error,
    },

    /// The process could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// Writing the predecessor's output to the child's stdin failed.
    #[error("failed to forward input to `{command}`: {source}")]
    InputForward {
        command: String,
        source: std::io::Error,
    },

    /// Reading one of the child's output streams failed.
    #[error("failed to capture {stream} of `{command}`: {source}")]
    Capture {
        command: String,
        stream: &'static str,
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },

    /// The child ended without a normal exit code (e.g. killed by a signal).
    #[error("`{command}` terminated abnormally: {description}")]
    AbnormalTermination {
        command: String,
        description: String,
    },

    /// The predecessor failed and stop-on-error skipped this node.
    #[error(transparent)]
    PreviousCommandFailed(#[from] PreviousCommandFailedError),

    /// Writing captured output into a redirect sink failed.
    #[error("failed to write redirected output: {source}")]
    Redirect { source: std::io::Error },
}

/// Snapshot of a failed predecessor, taken when stop-on-error fires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("previous command `{previous_command}` failed with exit code {code}: {stderr}")]
pub struct PreviousCommandFailedError {
    pub previous_command: String,
    pub code: i32,
    pub stderr: String,
}

impl PreviousCommandFailedError {
    /// Capture the predecessor's current command, code and stderr.
    pub fn from_upstream(upstream: &dyn Upstream) -> Self {
        Self {
            previous_command: upstream.command().to_string(),
            code: upstream.code(),
            stderr: upstream.stderr().to_string(),
        }
    }
}

/// Errors from loading a [`ChainConfig`](crate::ChainConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

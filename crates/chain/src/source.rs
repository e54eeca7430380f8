// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{ChainConfig, ChainError, Cmd, Upstream};

/// A fixed payload posing as an already-run predecessor.
///
/// Seeds a chain with literal input without launching anything. The content
/// is read eagerly at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSource {
    payload: String,
}

impl StaticSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Read `reader` to the end. Invalid UTF-8 is replaced.
    pub fn from_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::new(String::from_utf8_lossy(&buf)))
    }

    /// Async counterpart of [`StaticSource::from_reader`].
    pub async fn from_async_reader(mut reader: impl AsyncRead + Unpin) -> std::io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(Self::new(String::from_utf8_lossy(&buf)))
    }

    /// Start a chain fed by this payload.
    pub fn chain(self: &Arc<Self>, command: impl Into<String>) -> Arc<Cmd> {
        self.chain_with(command, ChainConfig::default())
    }

    pub fn chain_with(
        self: &Arc<Self>,
        command: impl Into<String>,
        config: ChainConfig,
    ) -> Arc<Cmd> {
        Cmd::from_upstream(self.clone(), command, config)
    }
}

#[async_trait]
impl Upstream for StaticSource {
    async fn run(&self) {}

    fn has_run(&self) -> bool {
        true
    }

    fn stdout(&self) -> &str {
        &self.payload
    }

    fn stderr(&self) -> &str {
        ""
    }

    fn code(&self) -> i32 {
        0
    }

    fn command(&self) -> &str {
        ""
    }

    fn errors(&self) -> &[ChainError] {
        &[]
    }

    fn has_errors(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

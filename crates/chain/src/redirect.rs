// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redirecting a node's captured stdout into a byte sink.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, OnceCell};

use crate::{ChainError, Upstream};

/// Writes an upstream's whole stdout into `sink`, once.
///
/// The upstream is run first if needed. Its output is written in a single
/// `write_all` regardless of its exit code. Sink failures are recorded in
/// this redirect's own error list.
pub struct Redirect<W> {
    upstream: Arc<dyn Upstream>,
    sink: Mutex<W>,
    errors: OnceCell<Vec<ChainError>>,
}

impl<W> Redirect<W>
where
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(upstream: Arc<dyn Upstream>, sink: W) -> Self {
        Self {
            upstream,
            sink: Mutex::new(sink),
            errors: OnceCell::new(),
        }
    }

    pub async fn run(&self) {
        self.errors.get_or_init(|| self.write_through()).await;
    }

    async fn write_through(&self) -> Vec<ChainError> {
        self.upstream.run().await;
        let payload = self.upstream.stdout();

        let mut sink = self.sink.lock().await;
        let written: std::io::Result<()> = async {
            sink.write_all(payload.as_bytes()).await?;
            sink.flush().await
        }
        .await;

        match written {
            Ok(()) => {
                tracing::debug!(
                    upstream = %self.upstream.command(),
                    bytes = payload.len(),
                    "redirected output"
                );
                Vec::new()
            }
            Err(source) => {
                tracing::warn!(
                    upstream = %self.upstream.command(),
                    error = %source,
                    "redirect failed"
                );
                vec![ChainError::Redirect { source }]
            }
        }
    }

    pub fn upstream(&self) -> &Arc<dyn Upstream> {
        &self.upstream
    }

    pub fn has_run(&self) -> bool {
        self.errors.initialized()
    }

    pub fn errors(&self) -> &[ChainError] {
        self.errors.get().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Give back the sink, e.g. to inspect an in-memory buffer.
    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }
}

#[cfg(test)]
#[path = "redirect_tests.rs"]
mod tests;

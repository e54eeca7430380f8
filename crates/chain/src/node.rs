// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain nodes: one shell command, its predecessor, and its captured result.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio::sync::OnceCell;
use tracing::Instrument;

use crate::engine::{self, Outcome};
use crate::{ChainConfig, ChainError, LaunchRequest, Launcher, Redirect, ShellLauncher, Upstream};

/// One command in a chain.
///
/// Nodes are handed out as `Arc<Cmd>` so several successors can share one
/// predecessor. A node runs at most once: the first `run` launches the
/// process (after running the predecessor), later and concurrent calls wait
/// for and reuse that result.
pub struct Cmd {
    command: String,
    config: ChainConfig,
    launcher: Arc<dyn Launcher>,
    upstream: Option<Arc<dyn Upstream>>,
    outcome: OnceCell<Outcome>,
}

impl Cmd {
    /// A root node with the default config.
    pub fn new(command: impl Into<String>) -> Arc<Self> {
        Self::builder(command).build()
    }

    /// A root node with an explicit config.
    pub fn with_config(command: impl Into<String>, config: ChainConfig) -> Arc<Self> {
        Self::builder(command).config(config).build()
    }

    /// A node chained after an arbitrary upstream, e.g. a [`StaticSource`](crate::StaticSource).
    pub fn from_upstream(
        upstream: Arc<dyn Upstream>,
        command: impl Into<String>,
        config: ChainConfig,
    ) -> Arc<Self> {
        Self::builder(command)
            .config(config)
            .upstream(upstream)
            .build()
    }

    pub fn builder(command: impl Into<String>) -> CmdBuilder {
        CmdBuilder {
            command: command.into(),
            config: ChainConfig::default(),
            launcher: Arc::new(ShellLauncher),
            upstream: None,
        }
    }

    /// Chain `command` after this node, reusing a copy of its config and its
    /// launcher. Nothing runs until the returned node is run.
    pub fn chain(self: &Arc<Self>, command: impl Into<String>) -> Arc<Cmd> {
        self.chain_with(command, self.config.clone())
    }

    /// Chain `command` after this node with its own config.
    pub fn chain_with(
        self: &Arc<Self>,
        command: impl Into<String>,
        config: ChainConfig,
    ) -> Arc<Cmd> {
        let upstream: Arc<dyn Upstream> = self.clone();
        Self::builder(command)
            .config(config)
            .launcher(Arc::clone(&self.launcher))
            .upstream(upstream)
            .build()
    }

    /// Send this node's stdout into `sink` once it has run.
    pub fn redirect<W>(self: &Arc<Self>, sink: W) -> Redirect<W>
    where
        W: AsyncWrite + Send + Unpin,
    {
        Redirect::new(self.clone(), sink)
    }

    /// The predecessor this node reads its stdin from.
    pub fn upstream(&self) -> Option<&Arc<dyn Upstream>> {
        self.upstream.as_ref()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// The captured result, once run.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.get()
    }

    async fn execute(&self) -> Outcome {
        let span = tracing::info_span!(
            "chain.cmd",
            cmd = %self.command,
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );
        async {
            if let Some(upstream) = &self.upstream {
                upstream.run().await;
                if self.config.stop_on_error && upstream.code() != 0 {
                    tracing::warn!(
                        upstream = %upstream.command(),
                        upstream_code = upstream.code(),
                        "skipping after upstream failure"
                    );
                    return Outcome::skipped(
                        upstream.as_ref(),
                        self.config.propagate_upstream_output,
                    );
                }
            }

            let start = Instant::now();
            let input = self.upstream.as_ref().map_or("", |u| u.stdout());
            let request = LaunchRequest::new(&self.command, &self.config);
            let outcome = engine::execute(self.launcher.as_ref(), &request, input).await;

            let span = tracing::Span::current();
            span.record("exit_code", outcome.code);
            span.record("duration_ms", start.elapsed().as_millis() as u64);
            outcome
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl Upstream for Cmd {
    async fn run(&self) {
        self.outcome.get_or_init(|| self.execute()).await;
    }

    fn has_run(&self) -> bool {
        self.outcome.initialized()
    }

    fn stdout(&self) -> &str {
        self.outcome.get().map_or("", |o| o.stdout.as_str())
    }

    fn stderr(&self) -> &str {
        self.outcome.get().map_or("", |o| o.stderr.as_str())
    }

    fn code(&self) -> i32 {
        self.outcome.get().map(|o| o.code).unwrap_or_default()
    }

    fn command(&self) -> &str {
        &self.command
    }

    fn errors(&self) -> &[ChainError] {
        match self.outcome.get() {
            Some(outcome) => &outcome.errors,
            None => &[],
        }
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd")
            .field("command", &self.command)
            .field("config", &self.config)
            .field("upstream", &self.upstream.as_ref().map(|u| u.command()))
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

/// Builder for nodes that need a custom launcher or upstream.
pub struct CmdBuilder {
    command: String,
    config: ChainConfig,
    launcher: Arc<dyn Launcher>,
    upstream: Option<Arc<dyn Upstream>>,
}

impl CmdBuilder {
    pub fn config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn build(self) -> Arc<Cmd> {
        Arc::new(Cmd {
            command: self.command,
            config: self.config,
            launcher: self.launcher,
            upstream: self.upstream,
            outcome: OnceCell::new(),
        })
    }
}

#[cfg(test)]
#[path = "node_tests/mod.rs"]
mod tests;

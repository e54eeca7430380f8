// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;

use crate::ChainError;

/// Anything that can sit upstream of a [`Cmd`](crate::Cmd).
///
/// [`Cmd`](crate::Cmd) and [`StaticSource`](crate::StaticSource) are the two
/// implementations. Successors hold an `Arc<dyn Upstream>` and only ever read
/// through this interface, so a chain can be seeded from either.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Execute if not executed yet. Repeated calls are no-ops.
    async fn run(&self);

    fn has_run(&self) -> bool;

    /// Captured standard output, empty until run.
    fn stdout(&self) -> &str;

    /// Captured standard error, empty until run.
    fn stderr(&self) -> &str;

    /// Exit code, 0 until run.
    fn code(&self) -> i32;

    /// The command text this node executes.
    fn command(&self) -> &str;

    fn errors(&self) -> &[ChainError];

    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}

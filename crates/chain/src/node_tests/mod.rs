// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for chain nodes.

use super::*;

mod basic;
mod chaining;
mod concurrency;
mod failures;

/// Sync wrapper for async execution in parameterized tests.
pub(crate) fn run_async<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Runtime::new().unwrap().block_on(f)
}

/// A root node launched through `launcher`.
pub(crate) fn fake_cmd(command: &str, launcher: &crate::FakeLauncher) -> Arc<Cmd> {
    Cmd::builder(command)
        .launcher(Arc::new(launcher.clone()))
        .build()
}

/// True when `upstream` points at the same allocation as `node`.
pub(crate) fn same_node(upstream: Option<&Arc<dyn Upstream>>, node: &Arc<Cmd>) -> bool {
    match upstream {
        Some(u) => std::ptr::addr_eq(Arc::as_ptr(u), Arc::as_ptr(node)),
        None => false,
    }
}

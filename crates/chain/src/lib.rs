// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cmdchain: lazy, memoized chains of shell commands.
//!
//! Each [`Cmd`] wraps one shell command. Chaining a command after another
//! feeds the predecessor's captured stdout into the successor's stdin. Nothing
//! runs until [`Upstream::run`] is awaited on a node, which first runs any
//! predecessor that has not run yet.
//!
//! ```no_run
//! use cmdchain::{Cmd, Upstream};
//!
//! # async fn demo() {
//! let words = Cmd::new("printf 'b\\na\\n'").chain("sort");
//! words.run().await;
//! assert_eq!(words.stdout(), "a\nb\n");
//! # }
//! ```

mod config;
mod engine;
mod error;
mod launch;
mod node;
mod redirect;
mod source;
mod upstream;

pub use config::{ChainConfig, DEFAULT_SHELL};
pub use engine::{Outcome, ABNORMAL_EXIT_CODE};
pub use error::{ChainError, ConfigError, PreviousCommandFailedError};
pub use launch::{
    ExitFuture, LaunchError, LaunchRequest, Launched, Launcher, ShellLauncher, Termination,
};
pub use node::{Cmd, CmdBuilder};
pub use redirect::Redirect;
pub use source::StaticSource;
pub use upstream::Upstream;

#[cfg(any(test, feature = "test-support"))]
pub use launch::{FakeLauncher, FakeResponse, LaunchCall};

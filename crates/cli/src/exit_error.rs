// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries the process exit code of a finished chain.
//!
//! `chain::run` returns `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to flush output and handle termination.

use std::fmt;

/// Exit code used when the last command exited 0 but recorded errors.
pub const ERRORS_EXIT_CODE: i32 = 1;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Exit status for a node that finished with `code` and maybe errors.
    ///
    /// Returns `None` when the chain succeeded cleanly.
    pub fn for_result(code: i32, has_errors: bool) -> Option<Self> {
        match (code, has_errors) {
            (0, false) => None,
            (0, true) => Some(Self::new(ERRORS_EXIT_CODE, "")),
            (code, _) => Some(Self::new(code, "")),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "exited with code {}", self.code)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;

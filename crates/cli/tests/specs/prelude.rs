// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs.

use std::process::Output;

/// A `cmdchain` invocation with color and inherited log filters disabled.
pub fn cmdchain() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("cmdchain").expect("binary should build");
    cmd.env("NO_COLOR", "1").env_remove("CMDCHAIN_LOG");
    cmd
}

pub trait OutputExt {
    fn stdout_str(&self) -> String;
    fn stderr_str(&self) -> String;
    fn code(&self) -> i32;
}

impl OutputExt for Output {
    fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

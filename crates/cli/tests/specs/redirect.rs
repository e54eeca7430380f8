// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output redirection specs

use crate::prelude::*;

#[test]
fn output_flag_writes_file_instead_of_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let output = cmdchain()
        .args(["-o", path.to_str().unwrap(), "printf 'b\\na\\n'", "sort"])
        .output()
        .unwrap();

    assert_eq!(output.code(), 0);
    assert_eq!(output.stdout_str(), "");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
}

#[test]
fn output_to_missing_directory_fails() {
    let output = cmdchain()
        .args(["-o", "/nonexistent/dir/out.txt", "true"])
        .output()
        .unwrap();

    assert_eq!(output.code(), 2);
    assert!(output.stderr_str().contains("failed to create"));
}

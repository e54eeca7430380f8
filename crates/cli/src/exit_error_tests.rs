// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    clean = { 0, false, None },
    errors_only = { 0, true, Some(ERRORS_EXIT_CODE) },
    failed = { 3, false, Some(3) },
    failed_with_errors = { 128, true, Some(128) },
)]
fn exit_code_for_result(code: i32, has_errors: bool, expected: Option<i32>) {
    assert_eq!(
        ExitError::for_result(code, has_errors).map(|e| e.code),
        expected
    );
}

#[test]
fn display_falls_back_to_code() {
    assert_eq!(ExitError::new(4, "").to_string(), "exited with code 4");
    assert_eq!(ExitError::new(4, "custom").to_string(), "custom");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for linking nodes and piping stdout into stdin.

use std::sync::Arc;

use super::{fake_cmd, same_node};
use crate::{ChainConfig, Cmd, FakeLauncher, FakeResponse, StaticSource, Upstream};

// ---------------------------------------------------------------------------
// Linking
// ---------------------------------------------------------------------------

#[test]
fn chain_links_to_original_node() {
    let c1 = Cmd::new("echo 'hi'");
    let c2 = c1.chain("echo 'hi2'");

    assert!(same_node(c2.upstream(), &c1));
    assert!(!c1.has_run());
    assert!(!c2.has_run());
}

#[test]
fn chain_copies_config() {
    let config = ChainConfig::default().shell("bash").stop_on_error(false);
    let c1 = Cmd::with_config("true", config.clone());
    let c2 = c1.chain("true");

    assert_eq!(c2.config(), &config);
}

#[test]
fn chain_with_uses_own_config() {
    let c1 = Cmd::new("true");
    let config = ChainConfig::default().stop_on_error(false);
    let c2 = c1.chain_with("true", config);

    assert!(c1.config().stop_on_error);
    assert!(!c2.config().stop_on_error);
}

#[tokio::test]
async fn chain_reuses_launcher() {
    let launcher = FakeLauncher::new();
    let c1 = fake_cmd("first", &launcher);
    let c2 = c1.chain("second");
    c2.run().await;

    assert_eq!(launcher.commands(), vec!["first", "second"]);
}

// ---------------------------------------------------------------------------
// Lazy upstream execution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn running_successor_runs_predecessor() {
    let c1 = Cmd::new("echo 'hi'");
    let c2 = c1.chain("echo 'hi2'");
    c2.run().await;

    assert!(same_node(c2.upstream(), &c1));
    assert!(c1.has_run());
    assert!(c2.has_run());
    assert_eq!(c1.stdout(), "hi\n");
    assert_eq!(c2.stdout(), "hi2\n");
}

#[tokio::test]
async fn three_link_chain_runs_in_order() {
    let launcher = FakeLauncher::new()
        .respond("a", FakeResponse::exit(0).stdout("one"))
        .respond("b", FakeResponse::echo())
        .respond("c", FakeResponse::echo());
    let c = fake_cmd("a", &launcher).chain("b").chain("c");
    c.run().await;

    assert_eq!(launcher.commands(), vec!["a", "b", "c"]);
    assert_eq!(c.stdout(), "one");
}

#[tokio::test]
async fn already_run_predecessor_is_not_relaunched() {
    let launcher = FakeLauncher::new().respond("a", FakeResponse::exit(0).stdout("x"));
    let c1 = fake_cmd("a", &launcher);
    c1.run().await;

    let c2 = c1.chain("b");
    c2.run().await;

    assert_eq!(launcher.commands(), vec!["a", "b"]);
}

// ---------------------------------------------------------------------------
// Data flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stdout_becomes_successor_stdin() {
    let c1 = Cmd::new("printf 'hello'");
    let c2 = c1.chain("cat");
    c2.run().await;

    assert!(c1.has_run());
    assert!(c2.has_run());
    assert_eq!(c2.stdout(), "hello");
    assert!(!c2.has_errors());
}

#[tokio::test]
async fn stdout_feeds_two_successors() {
    let c1 = Cmd::new("printf 'hello'");
    let c2 = c1.chain("cat");
    let c3 = c1.chain("cat");
    c2.run().await;
    c3.run().await;

    assert!(same_node(c2.upstream(), &c1));
    assert!(same_node(c3.upstream(), &c1));
    assert!(c1.has_run());
    assert!(c2.has_run());
    assert!(c3.has_run());
    assert_eq!(c2.stdout(), "hello");
    assert_eq!(c3.stdout(), "hello");
}

#[tokio::test]
async fn fan_out_launches_shared_predecessor_once() {
    let launcher = FakeLauncher::new()
        .respond("src", FakeResponse::exit(0).stdout("shared"))
        .respond("left", FakeResponse::echo())
        .respond("right", FakeResponse::echo());
    let src = fake_cmd("src", &launcher);
    let left = src.chain("left");
    let right = src.chain("right");
    left.run().await;
    right.run().await;

    assert_eq!(launcher.commands(), vec!["src", "left", "right"]);
    let calls = launcher.calls();
    assert_eq!(calls[1].stdin, "shared");
    assert_eq!(calls[2].stdin, "shared");
}

#[tokio::test]
async fn root_node_gets_empty_stdin() {
    let launcher = FakeLauncher::new();
    let cmd = fake_cmd("root", &launcher);
    cmd.run().await;

    assert_eq!(launcher.calls()[0].stdin, "");
}

#[tokio::test]
async fn pipeline_transforms_data() {
    let c = Cmd::new("printf 'b\\na\\nc\\n'")
        .chain("sort")
        .chain("tr a-z A-Z");
    c.run().await;

    assert_eq!(c.stdout(), "A\nB\nC\n");
    assert_eq!(c.code(), 0);
}

#[tokio::test]
async fn large_input_does_not_deadlock() {
    // Well past any OS pipe buffer in both directions.
    let c1 = Cmd::new("head -c 1048576 /dev/zero | tr '\\0' 'x'");
    let c2 = c1.chain("cat; head -c 1048576 /dev/zero | tr '\\0' 'y' >&2");
    c2.run().await;

    assert_eq!(c2.code(), 0);
    assert_eq!(c2.stdout().len(), 1_048_576);
    assert!(c2.stdout().bytes().all(|b| b == b'x'));
    assert_eq!(c2.stderr().len(), 1_048_576);
}

// ---------------------------------------------------------------------------
// Static sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn static_source_seeds_chain() {
    let source = Arc::new(StaticSource::new("hello"));
    let cmd = source.chain("cat");
    cmd.run().await;

    assert_eq!(cmd.stdout(), "hello");
    assert_eq!(cmd.code(), 0);
}

#[tokio::test]
async fn from_upstream_accepts_any_upstream() {
    let launcher = FakeLauncher::new().respond("sink", FakeResponse::echo());
    let source: Arc<dyn Upstream> = Arc::new(StaticSource::new("seed"));
    let cmd = Cmd::builder("sink")
        .launcher(Arc::new(launcher.clone()))
        .upstream(Arc::clone(&source))
        .build();
    cmd.run().await;

    assert_eq!(cmd.stdout(), "seed");
    assert_eq!(launcher.calls()[0].stdin, "seed");
}

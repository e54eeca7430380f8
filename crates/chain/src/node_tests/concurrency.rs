// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the one-shot execution guard under concurrent callers.

use super::fake_cmd;
use crate::{Cmd, FakeLauncher, FakeResponse, Upstream};

#[tokio::test]
async fn concurrent_runs_launch_once() {
    let launcher = FakeLauncher::new().respond("once", FakeResponse::exit(0).stdout("done"));
    let cmd = fake_cmd("once", &launcher);

    tokio::join!(cmd.run(), cmd.run(), cmd.run());

    assert_eq!(launcher.commands(), vec!["once"]);
    assert_eq!(cmd.stdout(), "done");
}

#[tokio::test]
async fn concurrent_successors_share_predecessor_run() {
    let launcher = FakeLauncher::new()
        .respond("src", FakeResponse::exit(0).stdout("payload"))
        .respond("left", FakeResponse::echo())
        .respond("right", FakeResponse::echo());
    let src = fake_cmd("src", &launcher);
    let left = src.chain("left");
    let right = src.chain("right");

    tokio::join!(left.run(), right.run());

    let commands = launcher.commands();
    assert_eq!(commands.iter().filter(|c| *c == "src").count(), 1);
    assert_eq!(left.stdout(), "payload");
    assert_eq!(right.stdout(), "payload");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn runs_from_many_tasks_spawn_one_process() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("count");
    let cmd = Cmd::new(format!("echo x >> '{}'; sleep 0.1", counter.display()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cmd = cmd.clone();
            tokio::spawn(async move { cmd.run().await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let lines = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(lines.lines().count(), 1);
    assert!(cmd.has_run());
}

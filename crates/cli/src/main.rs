// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cmdchain - run shell commands as a chain, each stdout feeding the next stdin.

mod chain;
mod color;
mod exit_error;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::exit_error::ExitError;

/// Environment variable holding a tracing filter, e.g. `CMDCHAIN_LOG=debug`.
const LOG_ENV: &str = "CMDCHAIN_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "cmdchain",
    version,
    about = "Run shell commands as a chain, piping each command's stdout into the next",
    styles = color::styles()
)]
pub(crate) struct Cli {
    /// Commands to chain, first to last
    #[arg(required = true, value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Shell interpreter used as `<SHELL> -c <COMMAND>`
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<String>,

    /// Working directory for every command
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Keep running later commands after one exits non-zero
    #[arg(long)]
    pub keep_going: bool,

    /// Report the failed command's output on the last command when the chain stops early
    #[arg(long)]
    pub propagate: bool,

    /// TOML file with chain settings; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Feed this process's stdin into the first command
    #[arg(long)]
    pub stdin: bool,

    /// Write the last command's stdout to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log each command as it runs
    #[arg(short, long)]
    pub verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "cmdchain=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = chain::run(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("{} {e:#}", color::error_label());
        std::process::exit(2);
    }
}

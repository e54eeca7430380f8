// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building a chain from CLI arguments and reporting its last node.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use cmdchain::{ChainConfig, ChainError, Cmd, StaticSource, Upstream};

use crate::color;
use crate::exit_error::ExitError;
use crate::Cli;

/// Merge the config file (if any) with command-line overrides.
pub(crate) fn resolve_config(cli: &Cli) -> Result<ChainConfig> {
    let mut config = match &cli.config {
        Some(path) => ChainConfig::load(path)?,
        None => ChainConfig::default(),
    };
    if let Some(shell) = &cli.shell {
        config = config.shell(shell.clone());
    }
    if let Some(dir) = &cli.workdir {
        config = config.workdir(dir.clone());
    }
    if cli.keep_going {
        config = config.stop_on_error(false);
    }
    if cli.propagate {
        config = config.propagate_upstream_output(true);
    }
    Ok(config)
}

/// Link `commands` first to last, optionally seeded with `input`.
pub(crate) fn build(
    commands: &[String],
    config: ChainConfig,
    input: Option<StaticSource>,
) -> Result<Arc<Cmd>> {
    let (first, rest) = commands.split_first().context("no commands given")?;
    let mut node = match input {
        Some(source) => Cmd::from_upstream(Arc::new(source), first.as_str(), config),
        None => Cmd::with_config(first.as_str(), config),
    };
    for command in rest {
        node = node.chain(command.as_str());
    }
    Ok(node)
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let input = if cli.stdin {
        let stdin = tokio::io::stdin();
        let source = StaticSource::from_async_reader(stdin)
            .await
            .context("failed to read stdin")?;
        Some(source)
    } else {
        None
    };
    let last = build(&cli.commands, config, input)?;
    tracing::debug!(links = cli.commands.len(), "running chain");

    let mut errors: Vec<String> = Vec::new();
    match &cli.output {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create {}", path.display()))?;
            let redirect = last.redirect(file);
            redirect.run().await;
            errors.extend(redirect.errors().iter().map(ChainError::to_string));
        }
        None => {
            last.run().await;
            let mut out = std::io::stdout().lock();
            out.write_all(last.stdout().as_bytes())?;
            out.flush()?;
        }
    }

    let has_errors = last.has_errors() || !errors.is_empty();
    let recorded = last.errors().iter().map(ChainError::to_string);

    let mut err = std::io::stderr().lock();
    err.write_all(last.stderr().as_bytes())?;
    for message in recorded.chain(errors) {
        writeln!(err, "{} {message}", color::error_label())?;
    }

    match ExitError::for_result(last.code(), has_errors) {
        Some(exit) => Err(exit.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;

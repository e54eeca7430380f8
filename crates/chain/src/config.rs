// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain configuration shared by every node in a chain.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// Interpreter used when none is configured.
pub const DEFAULT_SHELL: &str = "sh";

/// Per-node execution settings.
///
/// `chain` clones the predecessor's config into the new node, so changing a
/// config after chaining never reaches nodes that already hold a copy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    /// Skip a node when its predecessor exited non-zero.
    ///
    /// The skip does not cascade: a skipped node reports code 0 (unless
    /// `propagate_upstream_output` copies the failed code), so a node chained
    /// after it runs normally with empty input.
    pub stop_on_error: bool,
    /// Interpreter; commands run as `<shell> -c <command>`.
    pub shell: String,
    /// Working directory. `None` (or empty) inherits the caller's.
    pub workdir: Option<PathBuf>,
    /// Extra environment variables for the child.
    pub env: BTreeMap<String, String>,
    /// When a node is skipped by stop-on-error, copy the failed predecessor's
    /// stdout, stderr and code into it instead of leaving defaults.
    pub propagate_upstream_output: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            stop_on_error: true,
            shell: DEFAULT_SHELL.to_string(),
            workdir: None,
            env: BTreeMap::new(),
            propagate_upstream_output: false,
        }
    }
}

impl ChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    pub fn propagate_upstream_output(mut self, propagate: bool) -> Self {
        self.propagate_upstream_output = propagate;
        self
    }

    /// The working directory to launch in, treating an empty path as unset.
    pub fn effective_workdir(&self) -> Option<&Path> {
        self.workdir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Key/value configuration backends.
//!
//! The production backend shells out to `git config`; tests use
//! [`MemoryConfigSource`].

use crate::error::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Mutex;
use tracing::debug;

/// A git-style key/value configuration store
pub trait ConfigSource {
    /// Read a key. `Ok(None)` when the key is not set.
    fn get(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Write a key
    fn set(&self, key: &str, value: &str) -> ConfigResult<()>;

    /// Remove a key. Removing a key that is not set succeeds.
    fn unset(&self, key: &str) -> ConfigResult<()>;
}

/// Which git config file writes go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigScope {
    /// The repository's `.git/config` (reads see the usual cascade)
    #[default]
    Local,
    /// `~/.gitconfig`
    Global,
}

/// [`ConfigSource`] backed by the `git config` command
#[derive(Debug, Clone, Default)]
pub struct GitConfigSource {
    workdir: Option<PathBuf>,
    scope: ConfigScope,
}

impl GitConfigSource {
    /// Source that runs `git` in the current directory with local scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `git` in `workdir` instead of the current directory
    pub fn in_dir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Select the scope used for reads and writes
    pub fn with_scope(mut self, scope: ConfigScope) -> Self {
        self.scope = scope;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd.arg("config");
        if self.scope == ConfigScope::Global {
            cmd.arg("--global");
        }
        cmd
    }
}

impl ConfigSource for GitConfigSource {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let output = self.command().args(["--get", key]).output()?;

        // git exits with 1 when the key is missing
        if output.status.code() == Some(1) {
            debug!(key, "git config key not set");
            return Ok(None);
        }
        if !output.status.success() {
            return Err(ConfigError::GitCommand(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let output = self.command().args([key, value]).output()?;
        if !output.status.success() {
            return Err(ConfigError::GitCommand(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }

    fn unset(&self, key: &str) -> ConfigResult<()> {
        let output = self.command().args(["--unset", key]).output()?;

        // 5: the key was not set
        if output.status.success() || output.status.code() == Some(5) {
            return Ok(());
        }
        Err(ConfigError::GitCommand(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// In-memory [`ConfigSource`]
#[derive(Debug, Default)]
pub struct MemoryConfigSource {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryConfigSource {
    /// Empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Source pre-populated with `pairs`
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a consistent map
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigSource for MemoryConfigSource {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn unset(&self, key: &str) -> ConfigResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        (**self).set(key, value)
    }

    fn unset(&self, key: &str) -> ConfigResult<()> {
        (**self).unset(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_roundtrip() {
        let source = MemoryConfigSource::new();
        assert_eq!(source.get("a.b").unwrap(), None);

        source.set("a.b", "c").unwrap();
        assert_eq!(source.get("a.b").unwrap(), Some("c".to_string()));

        source.unset("a.b").unwrap();
        source.unset("a.b").unwrap();
        assert_eq!(source.get("a.b").unwrap(), None);
    }

    #[test]
    fn test_git_source_reads_repository_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let status = Command::new("git")
            .arg("init")
            .arg("-q")
            .current_dir(dir.path())
            .status()
            .unwrap();
        assert!(status.success());

        let source = GitConfigSource::new().in_dir(dir.path());
        assert_eq!(source.get("arweave-lfs.gateway").unwrap(), None);

        source.set("arweave-lfs.gateway", "https://g8way.io").unwrap();
        assert_eq!(
            source.get("arweave-lfs.gateway").unwrap(),
            Some("https://g8way.io".to_string())
        );

        source.unset("arweave-lfs.gateway").unwrap();
        source.unset("arweave-lfs.gateway").unwrap();
        assert_eq!(source.get("arweave-lfs.gateway").unwrap(), None);
    }
}

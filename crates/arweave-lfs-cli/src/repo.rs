// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Repository discovery for CLI commands

use anyhow::{Context, Result};
use arweave_lfs_git::GitRepository;
use tracing::debug;

/// The repository containing the current directory.
///
/// # Example
/// ```ignore
/// let repo = repo::discover()?;
/// println!("Repository at: {}", repo.work_tree().display());
/// ```
pub fn discover() -> Result<GitRepository> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    GitRepository::discover(&cwd).context("Not a git repository (or any parent up to mount point)")
}

/// Like [`discover`], but `None` outside a repository.
///
/// Filters still work there, without an index or a persistent store.
pub fn try_discover() -> Option<GitRepository> {
    let cwd = std::env::current_dir().ok()?;
    match GitRepository::discover(&cwd) {
        Ok(repo) => Some(repo),
        Err(e) => {
            debug!("running outside a repository: {}", e);
            None
        }
    }
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Access to the surrounding repository through the `git` command

use crate::error::{GitError, GitResult};
use crate::pointer::PointerFile;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Source of the pointer currently staged for a path
///
/// Clean consults this when the reference store has no entry for the
/// content, to reuse the id of an identical, already committed file.
pub trait IndexLookup {
    /// Pointer staged for `path`, or `None` when the path is not staged or
    /// the staged blob is not a pointer
    fn staged_pointer(&self, path: &str) -> GitResult<Option<PointerFile>>;
}

/// Index lookup for use outside any repository
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndex;

impl IndexLookup for NoIndex {
    fn staged_pointer(&self, _path: &str) -> GitResult<Option<PointerFile>> {
        Ok(None)
    }
}

/// A git working tree, driven through the `git` CLI
#[derive(Debug, Clone)]
pub struct GitRepository {
    work_tree: PathBuf,
    git_dir: PathBuf,
}

impl GitRepository {
    /// Find the repository containing `dir`
    pub fn discover(dir: &Path) -> GitResult<Self> {
        let output = run_git(dir, &["rev-parse", "--show-toplevel", "--absolute-git-dir"])
            .map_err(|e| GitError::RepositoryNotFound(format!("{}: {}", dir.display(), e)))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());

        match (lines.next(), lines.next()) {
            (Some(work_tree), Some(git_dir)) => Ok(Self {
                work_tree: PathBuf::from(work_tree),
                git_dir: PathBuf::from(git_dir),
            }),
            _ => Err(GitError::RepositoryNotFound(format!(
                "{}: unexpected rev-parse output",
                dir.display()
            ))),
        }
    }

    /// Top of the working tree
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// The `.git` directory
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Blob id staged for `path`, if the path is in the index
    pub fn staged_blob(&self, path: &str) -> GitResult<Option<String>> {
        let output = run_git(
            &self.work_tree,
            &["--literal-pathspecs", "ls-files", "-s", "--", path],
        )?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        // <mode> <object> <stage>\t<path>
        Ok(stdout
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .map(str::to_string))
    }

    /// Contents of a blob
    pub fn cat_blob(&self, blob: &str) -> GitResult<Vec<u8>> {
        Ok(run_git(&self.work_tree, &["cat-file", "-p", blob])?.stdout)
    }
}

impl IndexLookup for GitRepository {
    fn staged_pointer(&self, path: &str) -> GitResult<Option<PointerFile>> {
        let Some(blob) = self.staged_blob(path)? else {
            debug!(path, "not staged");
            return Ok(None);
        };
        let content = self.cat_blob(&blob)?;
        match PointerFile::parse_bytes(&content) {
            Ok(pointer) => Ok(Some(pointer)),
            Err(e) => {
                debug!(path, blob = %blob, "staged blob is not a pointer: {}", e);
                Ok(None)
            }
        }
    }
}

fn run_git(dir: &Path, args: &[&str]) -> GitResult<Output> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| GitError::GitCommand {
            command: args.join(" "),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(GitError::GitCommand {
            command: args.join(" "),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

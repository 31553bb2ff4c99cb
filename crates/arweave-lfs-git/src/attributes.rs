// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! `.gitattributes` management for tracked patterns

use crate::error::{GitError, GitResult};
use crate::filter::FILTER_DRIVER_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the attributes file
pub const GITATTRIBUTES: &str = ".gitattributes";

/// Keeps the attributes file itself out of the filter
pub const EXCLUSION_LINE: &str = ".gitattributes !filter !diff !merge";

/// Attributes line for a tracked pattern
pub fn tracking_line(pattern: &str) -> String {
    format!(
        "{pattern} filter={name} diff={name} merge={name}",
        pattern = pattern,
        name = FILTER_DRIVER_NAME
    )
}

/// What [`GitAttributes::track`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOutcome {
    /// Newly tracked patterns
    pub added: Vec<String>,
    /// Patterns that already had an entry
    pub already_present: Vec<String>,
    /// Patterns refused outright
    pub refused: Vec<String>,
}

/// The `.gitattributes` file at the top of a working tree
#[derive(Debug, Clone)]
pub struct GitAttributes {
    path: PathBuf,
}

impl GitAttributes {
    /// Attributes file for the working tree at `work_tree`
    pub fn new(work_tree: &Path) -> Self {
        Self {
            path: work_tree.join(GITATTRIBUTES),
        }
    }

    /// Location of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> GitResult<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&self.path).map_err(|e| GitError::GitattributesConfig(e.to_string()))
    }

    fn write(&self, content: &str) -> GitResult<()> {
        fs::write(&self.path, content).map_err(|e| GitError::GitattributesConfig(e.to_string()))
    }

    /// Patterns that already have any entry, in file order
    fn existing_patterns(content: &str) -> Vec<&str> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_whitespace().next())
            .collect()
    }

    /// Patterns routed through this filter
    pub fn tracked_patterns(&self) -> GitResult<Vec<String>> {
        let content = self.read()?;
        let filter_attr = format!("filter={}", FILTER_DRIVER_NAME);
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let pattern = parts.next()?;
                parts.any(|attr| attr == filter_attr).then(|| pattern.to_string())
            })
            .collect())
    }

    /// Track `patterns`, making sure the attributes file excludes itself
    pub fn track<S: AsRef<str>>(&self, patterns: &[S]) -> GitResult<TrackOutcome> {
        let mut content = self.read()?;
        let mut existing: Vec<String> = Self::existing_patterns(&content)
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut outcome = TrackOutcome::default();
        let mut additions = Vec::new();

        if !existing.iter().any(|p| p == GITATTRIBUTES) {
            additions.push(EXCLUSION_LINE.to_string());
            existing.push(GITATTRIBUTES.to_string());
        }

        for pattern in patterns.iter().map(|p| p.as_ref()) {
            if pattern == GITATTRIBUTES {
                warn!("Skipping tracking of {}", GITATTRIBUTES);
                outcome.refused.push(pattern.to_string());
            } else if existing.iter().any(|p| p == pattern) {
                debug!("Pattern {} already tracked", pattern);
                outcome.already_present.push(pattern.to_string());
            } else {
                additions.push(tracking_line(pattern));
                existing.push(pattern.to_string());
                outcome.added.push(pattern.to_string());
            }
        }

        if !additions.is_empty() {
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            for line in additions {
                content.push_str(&line);
                content.push('\n');
            }
            self.write(&content)?;
        }

        for pattern in &outcome.added {
            info!("Pattern {} added to {}", pattern, GITATTRIBUTES);
        }
        Ok(outcome)
    }

    /// Stop tracking `patterns`; returns the ones that were removed
    pub fn untrack<S: AsRef<str>>(&self, patterns: &[S]) -> GitResult<Vec<String>> {
        if !self.path.exists() {
            debug!("{} does not exist", GITATTRIBUTES);
            return Ok(Vec::new());
        }

        let content = self.read()?;
        let filter_attr = format!("filter={}", FILTER_DRIVER_NAME);
        let mut removed = Vec::new();
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| {
                let mut parts = line.split_whitespace();
                let Some(pattern) = parts.next() else {
                    return true;
                };
                let matches = patterns.iter().any(|p| p.as_ref() == pattern)
                    && parts.any(|attr| attr == filter_attr);
                if matches {
                    removed.push(pattern.to_string());
                }
                !matches
            })
            .collect();

        if !removed.is_empty() {
            let mut new_content = kept.join("\n");
            if !new_content.is_empty() {
                new_content.push('\n');
            }
            self.write(&new_content)?;
            for pattern in &removed {
                info!("Pattern {} removed from {}", pattern, GITATTRIBUTES);
            }
        }
        Ok(removed)
    }
}

/// Whether `path` names the attributes file itself
pub fn is_gitattributes(path: &str) -> bool {
    Path::new(path).file_name().is_some_and(|name| name == GITATTRIBUTES)
}

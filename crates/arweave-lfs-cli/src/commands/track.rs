// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Track file patterns with git-arweave-lfs

use crate::{output, repo};
use anyhow::{Context, Result};
use arweave_lfs_git::GitAttributes;
use clap::Args;
use console::style;

#[derive(Debug, Args)]
pub struct TrackCmd {
    /// File patterns to track (e.g., "*.psd", "*.mp4")
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Show tracked patterns without adding new ones
    #[arg(short, long)]
    pub list: bool,
}

impl TrackCmd {
    pub fn execute(self) -> Result<()> {
        let repo = repo::discover()?;
        let attributes = GitAttributes::new(repo.work_tree());

        if self.list || self.patterns.is_empty() {
            return list_tracked_patterns(&attributes);
        }

        let outcome = attributes
            .track(self.patterns.as_slice())
            .context("Failed to update .gitattributes")?;

        for pattern in &outcome.added {
            output::success(&format!("Now tracking: {}", style(pattern).yellow()));
        }
        for pattern in &outcome.already_present {
            output::info(&format!("Pattern already tracked: {}", style(pattern).yellow()));
        }
        for pattern in &outcome.refused {
            output::warning(&format!("Refusing to track {}", pattern));
        }

        if !outcome.added.is_empty() {
            println!();
            println!("  Commit .gitattributes to share the tracking with collaborators.");
            println!("  Run 'git arweave-lfs install' if the filter driver is not set up yet.");
        }

        Ok(())
    }
}

fn list_tracked_patterns(attributes: &GitAttributes) -> Result<()> {
    let patterns = attributes
        .tracked_patterns()
        .context("Failed to read .gitattributes")?;

    if patterns.is_empty() {
        output::info("No tracked patterns found");
        println!("  Use 'git arweave-lfs track <PATTERN>' to start tracking large files");
    } else {
        output::header("Tracked patterns:");
        for pattern in patterns {
            println!("  {}", style(pattern).yellow());
        }
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct UntrackCmd {
    /// File patterns to stop tracking
    #[arg(value_name = "PATTERN", required = true)]
    pub patterns: Vec<String>,
}

impl UntrackCmd {
    pub fn execute(self) -> Result<()> {
        let repo = repo::discover()?;
        let attributes = GitAttributes::new(repo.work_tree());

        let removed = attributes
            .untrack(self.patterns.as_slice())
            .context("Failed to update .gitattributes")?;

        for pattern in &self.patterns {
            if removed.contains(pattern) {
                output::success(&format!("Untracked: {}", style(pattern).yellow()));
            } else {
                output::info(&format!("Pattern was not tracked: {}", style(pattern).yellow()));
            }
        }
        Ok(())
    }
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Install the git-arweave-lfs filter and diff drivers

use crate::{output, repo};
use anyhow::{Context, Result};
use arweave_lfs_config::{ConfigScope, ConfigSource, GitConfigSource};
use clap::Args;
use console::style;

/// git config entries that wire the drivers up
pub const DRIVER_SETTINGS: [(&str, &str); 4] = [
    ("filter.arweave-lfs.clean", "git-arweave-lfs clean %f"),
    ("filter.arweave-lfs.smudge", "git-arweave-lfs smudge %f"),
    ("filter.arweave-lfs.required", "true"),
    ("diff.arweave-lfs.command", "git-arweave-lfs diff"),
];

fn config_source(local: bool) -> Result<GitConfigSource> {
    if local {
        let repo = repo::discover()?;
        Ok(GitConfigSource::new()
            .in_dir(repo.work_tree())
            .with_scope(ConfigScope::Local))
    } else {
        Ok(GitConfigSource::new().with_scope(ConfigScope::Global))
    }
}

#[derive(Debug, Args)]
pub struct InstallCmd {
    /// Install into the current repository instead of the global git config
    #[arg(short, long)]
    pub local: bool,
}

impl InstallCmd {
    pub fn execute(self) -> Result<()> {
        let source = config_source(self.local)?;

        for (key, value) in DRIVER_SETTINGS {
            source
                .set(key, value)
                .with_context(|| format!("Failed to run: git config {} {}", key, value))?;
        }

        let scope = if self.local { "repository" } else { "global" };
        output::success(&format!("Installed git-arweave-lfs filter driver ({})", scope));
        for (key, value) in DRIVER_SETTINGS {
            output::detail(key, value);
        }
        println!();
        println!("Next steps:");
        println!(
            "  1. Configure a wallet: {}",
            style("git arweave-lfs config set-wallet <path>").yellow()
        );
        println!(
            "  2. Track file types:   {}",
            style("git arweave-lfs track '*.psd'").yellow()
        );
        println!("  3. Commit as usual");

        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct UninstallCmd {
    /// Remove from the current repository instead of the global git config
    #[arg(short, long)]
    pub local: bool,
}

impl UninstallCmd {
    pub fn execute(self) -> Result<()> {
        let source = config_source(self.local)?;

        for (key, _) in DRIVER_SETTINGS {
            source
                .unset(key)
                .with_context(|| format!("Failed to run: git config --unset {}", key))?;
        }

        output::success("Removed git-arweave-lfs filter driver");
        output::info("Tracked patterns in .gitattributes were left in place");
        Ok(())
    }
}

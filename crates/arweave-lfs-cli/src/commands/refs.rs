// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Inspect and maintain the local reference store

use crate::{output, repo};
use anyhow::{Context, Result};
use arweave_lfs_git::{FileReference, ReferenceStore};
use chrono::Local;
use clap::Subcommand;
use console::style;

#[derive(Debug, Subcommand)]
pub enum RefsCmd {
    /// List every recorded upload
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show totals
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Fold the journal into a single snapshot file
    Compact,
}

impl RefsCmd {
    pub fn execute(self) -> Result<()> {
        let repo = repo::discover()?;
        let mut store = ReferenceStore::open(repo.git_dir());

        match self {
            RefsCmd::List { json } => {
                let mut references: Vec<&FileReference> = store.all().collect();
                references.sort_by(|a, b| a.file_path.cmp(&b.file_path));

                if json {
                    println!("{}", serde_json::to_string_pretty(&references)?);
                } else if references.is_empty() {
                    output::info("No uploads recorded in this repository");
                } else {
                    for reference in references {
                        println!(
                            "{}  {:>10}  {}  {}",
                            style(&reference.remote_id).yellow(),
                            output::format_size(reference.size),
                            reference.file_path,
                            style(reference.uploaded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"))
                                .dim()
                        );
                    }
                }
            }
            RefsCmd::Stats { json } => {
                let stats = store.stats();
                if json {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                } else {
                    output::header("Reference store");
                    output::detail("Files", &stats.total_files.to_string());
                    output::detail("Total size", &output::format_size(stats.total_size));
                }
            }
            RefsCmd::Compact => {
                let entries = store.compact().context("Failed to compact reference store")?;
                output::success(&format!("Compacted reference store ({} entries)", entries));
            }
        }
        Ok(())
    }
}

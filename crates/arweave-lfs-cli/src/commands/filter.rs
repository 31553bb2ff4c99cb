// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Clean and smudge filter processes
//!
//! Git runs these once per file with the payload on stdin. Stdout carries
//! nothing but the result, written only after it is complete; diagnostics
//! and logs go to stderr.

use crate::{output, repo};
use anyhow::{Context, Result};
use arweave_lfs_config::{Config, ConfigResult, Validator};
use arweave_lfs_git::{FilterDriver, IndexLookup, NoIndex, ReferenceStore};
use arweave_lfs_storage::{ArweaveTransport, TransportSettings};
use clap::Args;
use std::io;
use tracing::debug;

fn transport(config: ConfigResult<Config>) -> Result<ArweaveTransport> {
    let config = config.context("Failed to read git-arweave-lfs configuration")?;
    config
        .validate()
        .context("Invalid git-arweave-lfs configuration")?;

    let settings = TransportSettings {
        gateway_url: config.gateway_url().to_string(),
        upload_url: config.upload_url().to_string(),
        timeout: config.timeout(),
        wallet_path: config.wallet_path().map(|p| p.to_path_buf()),
    };
    ArweaveTransport::new(settings).context("Failed to create Arweave transport")
}

#[derive(Debug, Args)]
pub struct CleanCmd {
    /// Path of the file being cleaned, relative to the working tree
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl CleanCmd {
    pub async fn execute(self, config: ConfigResult<Config>) -> Result<()> {
        let transport = transport(config)?;

        match repo::try_discover() {
            Some(repo) => {
                let store = ReferenceStore::open(repo.git_dir());
                clean(FilterDriver::new(transport, repo, store), &self.path).await
            }
            None => {
                let driver = FilterDriver::new(transport, NoIndex, ReferenceStore::in_memory());
                clean(driver, &self.path).await
            }
        }
    }
}

async fn clean<I: IndexLookup>(mut driver: FilterDriver<ArweaveTransport, I>, path: &str) -> Result<()> {
    let result = driver
        .run_clean(path, io::stdin(), io::stdout())
        .await
        .with_context(|| format!("Clean failed for {}", path))?;
    debug!(path, source = ?result.source(), "clean finished");
    Ok(())
}

#[derive(Debug, Args)]
pub struct SmudgeCmd {
    /// Path of the file being checked out, relative to the working tree
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl SmudgeCmd {
    pub async fn execute(self, config: ConfigResult<Config>) -> Result<()> {
        let transport = transport(config)?;
        let driver = FilterDriver::new(transport, NoIndex, ReferenceStore::in_memory());

        let result = driver
            .run_smudge(&self.path, io::stdin(), io::stdout())
            .await
            .with_context(|| format!("Smudge failed for {}", self.path))?;

        if let Some(diagnostic) = result.diagnostic() {
            output::diagnostic(diagnostic);
        }
        Ok(())
    }
}

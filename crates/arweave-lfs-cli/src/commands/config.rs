// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Wallet and endpoint configuration

use crate::output;
use anyhow::{Context, Result};
use arweave_lfs_config::{
    Config, ConfigLoader, ConfigResult, ConfigScope, GitConfigSource, Origin, Setting, Validator,
};
use clap::Subcommand;
use console::style;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    /// Use the JWK wallet at PATH to sign uploads
    SetWallet {
        /// Path to an Arweave JWK wallet file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Write to the global git config
        #[arg(short, long)]
        global: bool,
    },

    /// Download from the gateway at URL
    SetGateway {
        /// Gateway base URL, e.g. https://arweave.net
        #[arg(value_name = "URL")]
        url: String,

        /// Write to the global git config
        #[arg(short, long)]
        global: bool,
    },

    /// Upload through the bundling service at URL
    SetUploadUrl {
        /// Upload service base URL, e.g. https://upload.ardrive.io
        #[arg(value_name = "URL")]
        url: String,

        /// Write to the global git config
        #[arg(short, long)]
        global: bool,
    },

    /// Show the effective configuration and where each value comes from
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn loader(global: bool) -> ConfigLoader<GitConfigSource> {
    let scope = if global {
        ConfigScope::Global
    } else {
        ConfigScope::Local
    };
    ConfigLoader::new(GitConfigSource::new().with_scope(scope))
}

impl ConfigCmd {
    pub fn execute(self, config: ConfigResult<Config>) -> Result<()> {
        match self {
            ConfigCmd::SetWallet { path, global } => {
                // Filters run from the top of the working tree
                let path = std::fs::canonicalize(&path).unwrap_or(path);
                loader(global)
                    .set_wallet(&path)
                    .context("Failed to set wallet")?;
                output::success(&format!("Wallet set to {}", path.display()));
                Ok(())
            }
            ConfigCmd::SetGateway { url, global } => {
                loader(global)
                    .set_gateway(&url)
                    .context("Failed to set gateway")?;
                output::success(&format!("Gateway set to {}", url));
                Ok(())
            }
            ConfigCmd::SetUploadUrl { url, global } => {
                loader(global)
                    .set_upload_url(&url)
                    .context("Failed to set upload service")?;
                output::success(&format!("Upload service set to {}", url));
                Ok(())
            }
            ConfigCmd::Show { json } => {
                let config = config.context("Failed to read git-arweave-lfs configuration")?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    show(&config);
                }
                Ok(())
            }
        }
    }
}

fn describe<T: std::fmt::Display>(setting: &Setting<T>) -> String {
    format!("{} {}", setting.value, style(format!("({})", setting.origin)).dim())
}

fn show(config: &Config) {
    output::header("git-arweave-lfs configuration");
    match &config.wallet_path {
        Some(wallet) => output::detail(
            "Wallet",
            &format!("{} {}", wallet.value.display(), style(format!("({})", wallet.origin)).dim()),
        ),
        None => output::detail(
            "Wallet",
            &format!("not configured {}", style(format!("({})", Origin::Default)).dim()),
        ),
    }
    output::detail("Gateway", &describe(&config.gateway_url));
    output::detail("Upload service", &describe(&config.upload_url));
    output::detail("Timeout (s)", &describe(&config.timeout_secs));
    output::detail("Log level", &describe(&config.log_level));

    if let Err(e) = config.validate() {
        println!();
        output::warning(&format!("{}", e));
    }
}

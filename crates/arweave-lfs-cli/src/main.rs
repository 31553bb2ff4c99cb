// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! `git-arweave-lfs`: keeps large files out of Git history and on Arweave.

mod commands;
mod output;
mod repo;

use anyhow::Result;
use arweave_lfs_config::{Config, ConfigLoader, GitConfigSource, DEFAULT_LOG_LEVEL};
use arweave_lfs_observability::{init_tracing_with_config, LogConfig};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use commands::*;
use std::io;

#[derive(Parser)]
#[command(name = "git-arweave-lfs")]
#[command(version, about = "Store large Git files on Arweave")]
#[command(
    long_about = "git-arweave-lfs replaces large files in Git history with small pointer files.
The content itself is uploaded to Arweave on commit and downloaded again on checkout."
)]
#[command(propagate_version = true)]
#[command(author = "git-arweave-lfs Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Colored output (always|auto|never)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the filter and diff drivers in git config
    Install(InstallCmd),

    /// Remove the filter and diff drivers from git config
    Uninstall(UninstallCmd),

    /// Route file patterns through git-arweave-lfs
    Track(TrackCmd),

    /// Stop routing file patterns through git-arweave-lfs
    Untrack(UntrackCmd),

    /// Show or change wallet and endpoint settings
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Clean filter: content on stdin, pointer on stdout (git add)
    Clean(CleanCmd),

    /// Smudge filter: pointer on stdin, content on stdout (git checkout)
    Smudge(SmudgeCmd),

    /// External diff driver for tracked files
    Diff(DiffCmd),

    /// Inspect the local record of uploaded files
    #[command(subcommand)]
    Refs(RefsCmd),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Commands git runs on its own, whose stdout belongs to git
    fn is_driver(&self) -> bool {
        matches!(
            self,
            Commands::Clean(_) | Commands::Smudge(_) | Commands::Diff(_)
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color.as_str() {
        "never" => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        "always" => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
        "auto" => {}
        _ => {
            output::error(&format!("Invalid color option: {}", cli.color));
            std::process::exit(2);
        }
    }

    // Validation happens per command; a bad gateway must not stop `config show`
    let config = ConfigLoader::new(GitConfigSource::new())
        .without_validation()
        .load();

    let driver = cli.command.is_driver();
    let mut log_config = if driver {
        LogConfig::new()
    } else {
        LogConfig::interactive().with_color(console::colors_enabled_stderr())
    };
    log_config = log_config.with_level(log_level(&cli, config.as_ref().ok()));
    // Only fails when a subscriber is already installed
    init_tracing_with_config(log_config).ok();

    let result = match cli.command {
        Commands::Install(cmd) => cmd.execute(),
        Commands::Uninstall(cmd) => cmd.execute(),
        Commands::Track(cmd) => cmd.execute(),
        Commands::Untrack(cmd) => cmd.execute(),
        Commands::Config(cmd) => cmd.execute(config),
        Commands::Clean(cmd) => cmd.execute(config).await,
        Commands::Smudge(cmd) => cmd.execute(config).await,
        Commands::Diff(cmd) => cmd.execute(),
        Commands::Refs(cmd) => cmd.execute(),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        if driver {
            output::diagnostic(&format!("{:#}", e));
        } else {
            output::error(&format!("Error: {:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}

/// `--quiet` and `--verbose` win over the configured filter
fn log_level(cli: &Cli, config: Option<&Config>) -> String {
    if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config
            .map(|c| c.log_level().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "git-arweave-lfs", &mut io::stdout());
}

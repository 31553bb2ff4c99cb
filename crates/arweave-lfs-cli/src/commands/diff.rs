// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! External diff driver entry point

use anyhow::{Context, Result};
use arweave_lfs_git::{run_diff_driver, Comparison};
use clap::Args;
use std::io::{self, Write};
use tracing::debug;

/// Compare two versions of a tracked file. Exits successfully whether or not they differ.
///
/// Git passes `<path> <old-file> <old-hex> <old-mode> <new-file> <new-hex> <new-mode>`.
#[derive(Debug, Args)]
pub struct DiffCmd {
    /// Arguments as passed by git
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl DiffCmd {
    pub fn execute(self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let comparison =
            run_diff_driver(&self.args, &mut out).context("Failed to write diff output")?;
        out.flush().context("Failed to write diff output")?;

        debug!(identical = comparison == Comparison::Identical, "diff finished");
        Ok(())
    }
}

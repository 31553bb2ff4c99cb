// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Command modules for the git-arweave-lfs CLI
pub mod config;
pub mod diff;
pub mod filter;
pub mod install;
pub mod refs;
pub mod track;

pub use config::ConfigCmd;
pub use diff::DiffCmd;
pub use filter::{CleanCmd, SmudgeCmd};
pub use install::{InstallCmd, UninstallCmd};
pub use refs::RefsCmd;
pub use track::{TrackCmd, UntrackCmd};

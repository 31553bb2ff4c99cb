// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Structured logging for git-arweave-lfs.
//!
//! Thin wrapper around `tracing-subscriber` that always writes to stderr,
//! keeping stdout clean for git filter payloads.
//!
//! # Example
//!
//! ```ignore
//! use arweave_lfs_observability::{init_tracing_with_config, LogConfig};
//!
//! init_tracing_with_config(LogConfig::new().with_level("info"))?;
//! tracing::info!("ready");
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, DEFAULT_LEVEL};
pub use initialization::{init_tracing, init_tracing_with_config};

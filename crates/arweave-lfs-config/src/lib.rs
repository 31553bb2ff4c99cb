// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Configuration resolution for git-arweave-lfs
//!
//! Settings live in git's own key/value configuration under the
//! `arweave-lfs.*` section and can be overridden per process with
//! `ARWEAVE_LFS_*` environment variables.
//!
//! | setting | git key | env var |
//! |---|---|---|
//! | wallet path | `arweave-lfs.wallet` | `ARWEAVE_LFS_WALLET` |
//! | download gateway | `arweave-lfs.gateway` | `ARWEAVE_LFS_GATEWAY` |
//! | upload service | `arweave-lfs.uploadurl` | `ARWEAVE_LFS_UPLOAD_URL` |
//! | timeout (seconds) | `arweave-lfs.timeout` | `ARWEAVE_LFS_TIMEOUT` |
//! | log filter | `arweave-lfs.loglevel` | `ARWEAVE_LFS_LOG` |
//!
//! # Example
//!
//! ```no_run
//! use arweave_lfs_config::{ConfigLoader, GitConfigSource};
//!
//! let config = ConfigLoader::new(GitConfigSource::new()).load()?;
//! println!("downloading from {}", config.gateway_url());
//! # Ok::<(), arweave_lfs_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::*;
pub use source::{ConfigScope, ConfigSource, GitConfigSource, MemoryConfigSource};
pub use validation::{validate_service_url, Validator};

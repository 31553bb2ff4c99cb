// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Effective configuration and the names it is read from.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public Arweave gateway used for downloads when nothing else is configured
pub const DEFAULT_GATEWAY: &str = "https://arweave.net";

/// Turbo upload service
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.ardrive.io";

/// Per-request network timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Log filter used by filter processes
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// git config keys
pub mod keys {
    /// Path to the Arweave JWK wallet
    pub const WALLET: &str = "arweave-lfs.wallet";
    /// Download gateway base URL
    pub const GATEWAY: &str = "arweave-lfs.gateway";
    /// Upload service base URL
    pub const UPLOAD_URL: &str = "arweave-lfs.uploadurl";
    /// Network timeout in seconds
    pub const TIMEOUT: &str = "arweave-lfs.timeout";
    /// Log filter directive
    pub const LOG_LEVEL: &str = "arweave-lfs.loglevel";
}

/// Environment variables; these take precedence over git config
pub mod env {
    /// Path to the Arweave JWK wallet
    pub const WALLET: &str = "ARWEAVE_LFS_WALLET";
    /// Download gateway base URL
    pub const GATEWAY: &str = "ARWEAVE_LFS_GATEWAY";
    /// Upload service base URL
    pub const UPLOAD_URL: &str = "ARWEAVE_LFS_UPLOAD_URL";
    /// Network timeout in seconds
    pub const TIMEOUT: &str = "ARWEAVE_LFS_TIMEOUT";
    /// Log filter directive
    pub const LOG_LEVEL: &str = "ARWEAVE_LFS_LOG";
}

/// Where a setting's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Built-in default
    Default,
    /// `git config`
    GitConfig,
    /// Environment variable
    Environment,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Default => write!(f, "default"),
            Origin::GitConfig => write!(f, "git config"),
            Origin::Environment => write!(f, "environment"),
        }
    }
}

/// A value together with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting<T> {
    /// The effective value
    pub value: T,
    /// Where it came from
    pub origin: Origin,
}

impl<T> Setting<T> {
    /// A built-in default
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            origin: Origin::Default,
        }
    }

    /// A value read from `origin`
    pub fn new(value: T, origin: Origin) -> Self {
        Self { value, origin }
    }
}

/// Effective configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Wallet used to sign uploads. Absent means read-only operation.
    pub wallet_path: Option<Setting<PathBuf>>,

    /// Gateway base URL for downloads
    pub gateway_url: Setting<String>,

    /// Turbo upload service base URL
    pub upload_url: Setting<String>,

    /// Network timeout in seconds
    pub timeout_secs: Setting<u64>,

    /// Log filter directive
    pub log_level: Setting<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallet_path: None,
            gateway_url: Setting::default_value(DEFAULT_GATEWAY.to_string()),
            upload_url: Setting::default_value(DEFAULT_UPLOAD_URL.to_string()),
            timeout_secs: Setting::default_value(DEFAULT_TIMEOUT_SECS),
            log_level: Setting::default_value(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Config {
    /// Wallet path, if one is configured
    pub fn wallet_path(&self) -> Option<&Path> {
        self.wallet_path.as_ref().map(|s| s.value.as_path())
    }

    /// Gateway base URL without a trailing slash
    pub fn gateway_url(&self) -> &str {
        self.gateway_url.value.trim_end_matches('/')
    }

    /// Upload service base URL without a trailing slash
    pub fn upload_url(&self) -> &str {
        self.upload_url.value.trim_end_matches('/')
    }

    /// Network timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.value)
    }

    /// Log filter directive
    pub fn log_level(&self) -> &str {
        &self.log_level.value
    }
}

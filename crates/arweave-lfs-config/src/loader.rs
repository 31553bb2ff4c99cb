// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{env, keys, Config, Origin, Setting};
use crate::source::ConfigSource;
use crate::validation::{validate_service_url, Validator};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where environment overrides are read from
#[derive(Debug, Clone, Default)]
enum Environment {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl Environment {
    fn var(&self, name: &str) -> Option<String> {
        let value = match self {
            Environment::Process => std::env::var(name).ok(),
            Environment::Fixed(vars) => vars.get(name).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Resolves the effective [`Config`]: defaults, then git config, then
/// environment variables.
pub struct ConfigLoader<S> {
    source: S,
    env: Environment,
    validate: bool,
}

impl<S: ConfigSource> ConfigLoader<S> {
    /// Create a loader over `source` that reads the process environment
    pub fn new(source: S) -> Self {
        ConfigLoader {
            source,
            env: Environment::Process,
            validate: true,
        }
    }

    /// Replace the process environment with a fixed set of variables
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Environment::Fixed(vars);
        self
    }

    /// Skip validation of the resolved configuration
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// The underlying key/value source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the effective configuration
    pub fn load(&self) -> ConfigResult<Config> {
        let mut config = Config::default();
        self.apply_git_config(&mut config)?;
        self.apply_env_overrides(&mut config)?;

        if self.validate {
            config.validate()?;
        }

        debug!(
            gateway = config.gateway_url(),
            upload = config.upload_url(),
            wallet_configured = config.wallet_path.is_some(),
            "configuration resolved"
        );
        Ok(config)
    }

    fn apply_git_config(&self, config: &mut Config) -> ConfigResult<()> {
        if let Some(value) = self.source.get(keys::WALLET)? {
            config.wallet_path = Some(Setting::new(PathBuf::from(value), Origin::GitConfig));
        }
        if let Some(value) = self.source.get(keys::GATEWAY)? {
            config.gateway_url = Setting::new(value, Origin::GitConfig);
        }
        if let Some(value) = self.source.get(keys::UPLOAD_URL)? {
            config.upload_url = Setting::new(value, Origin::GitConfig);
        }
        if let Some(value) = self.source.get(keys::TIMEOUT)? {
            let secs = value.parse().map_err(|_| {
                ConfigError::invalid_value(keys::TIMEOUT, format!("expected seconds, got '{}'", value))
            })?;
            config.timeout_secs = Setting::new(secs, Origin::GitConfig);
        }
        if let Some(value) = self.source.get(keys::LOG_LEVEL)? {
            config.log_level = Setting::new(value, Origin::GitConfig);
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        if let Some(value) = self.env.var(env::WALLET) {
            config.wallet_path = Some(Setting::new(PathBuf::from(value), Origin::Environment));
        }
        if let Some(value) = self.env.var(env::GATEWAY) {
            config.gateway_url = Setting::new(value, Origin::Environment);
        }
        if let Some(value) = self.env.var(env::UPLOAD_URL) {
            config.upload_url = Setting::new(value, Origin::Environment);
        }
        if let Some(value) = self.env.var(env::TIMEOUT) {
            let secs = value.parse().map_err(|_| {
                ConfigError::env_var_parsing_error(env::TIMEOUT, &value, "expected whole seconds")
            })?;
            config.timeout_secs = Setting::new(secs, Origin::Environment);
        }
        if let Some(value) = self.env.var(env::LOG_LEVEL) {
            config.log_level = Setting::new(value, Origin::Environment);
        }
        Ok(())
    }

    /// Persist the wallet path. The file must exist.
    pub fn set_wallet(&self, path: &Path) -> ConfigResult<()> {
        if !path.is_file() {
            return Err(ConfigError::WalletNotFound(path.to_path_buf()));
        }
        self.source.set(keys::WALLET, &path.to_string_lossy())?;
        info!("Wallet path set to {}", path.display());
        Ok(())
    }

    /// Persist the download gateway after validating it
    pub fn set_gateway(&self, url: &str) -> ConfigResult<()> {
        validate_service_url(keys::GATEWAY, url)?;
        self.source.set(keys::GATEWAY, url)?;
        info!("Download gateway set to {}", url);
        Ok(())
    }

    /// Persist the upload service URL after validating it
    pub fn set_upload_url(&self, url: &str) -> ConfigResult<()> {
        validate_service_url(keys::UPLOAD_URL, url)?;
        self.source.set(keys::UPLOAD_URL, url)?;
        info!("Upload service set to {}", url);
        Ok(())
    }
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving or updating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error, typically while spawning `git`
    #[error("IO error reading configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// `git config` exited unsuccessfully
    #[error("git config failed: {0}")]
    GitCommand(String),

    /// An environment override could not be parsed
    #[error("Environment variable parsing error: {variable_name}={value}. {reason}")]
    EnvVarParsingError {
        /// Variable name
        variable_name: String,
        /// Raw value
        value: String,
        /// What was expected
        reason: String,
    },

    /// A configured value is out of range or malformed
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Configuration key
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// `set-wallet` was pointed at a path that does not exist
    #[error("Wallet file not found: {}", .0.display())]
    WalletNotFound(PathBuf),
}

impl ConfigError {
    /// Build an [`ConfigError::EnvVarParsingError`]
    pub fn env_var_parsing_error(
        variable_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::EnvVarParsingError {
            variable_name: variable_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`ConfigError::InvalidValue`]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

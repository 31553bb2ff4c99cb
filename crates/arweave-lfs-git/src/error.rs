// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Error types for Git integration

use arweave_lfs_storage::StorageError;
use thiserror::Error;

/// Result type for Git operations
pub type GitResult<T> = Result<T, GitError>;

/// Error types for Git integration operations
#[derive(Debug, Error)]
pub enum GitError {
    /// Error parsing pointer file
    #[error("Failed to parse pointer file: {0}")]
    PointerParse(String),

    /// Input is too large to be a pointer file
    #[error("Not a pointer file: {0} bytes exceeds the pointer size limit")]
    PointerTooLarge(usize),

    /// Missing required field in pointer file
    #[error("Missing required field in pointer file: {0}")]
    MissingPointerField(&'static str),

    /// Invalid OID format
    #[error("Invalid OID format: {0}")]
    InvalidOid(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reference store serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blob transport error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Missing or unusable configuration, typically the wallet
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Downloaded bytes do not match the pointer
    #[error(
        "Integrity check failed for {remote_id}: expected sha256:{expected} ({expected_size} bytes), got sha256:{actual} ({actual_size} bytes)"
    )]
    IntegrityMismatch {
        /// Remote object that was downloaded
        remote_id: String,
        /// Digest recorded in the pointer
        expected: String,
        /// Digest of the downloaded bytes
        actual: String,
        /// Size recorded in the pointer
        expected_size: u64,
        /// Size of the downloaded bytes
        actual_size: u64,
    },

    /// A `git` subprocess failed
    #[error("git {command} failed: {message}")]
    GitCommand {
        /// Subcommand and arguments
        command: String,
        /// stderr or spawn error
        message: String,
    },

    /// .gitattributes configuration error
    #[error("Failed to configure .gitattributes: {0}")]
    GitattributesConfig(String),

    /// Repository not found
    #[error("Not inside a git repository: {0}")]
    RepositoryNotFound(String),
}

impl GitError {
    /// Whether the failure is a configuration problem (missing wallet and
    /// friends) rather than a transport or data problem
    pub fn is_configuration(&self) -> bool {
        match self {
            GitError::Configuration(_) => true,
            GitError::Storage(e) => e.is_credentials_missing(),
            _ => false,
        }
    }

    /// Whether the failure came from decoding a pointer
    pub fn is_pointer_error(&self) -> bool {
        matches!(
            self,
            GitError::PointerParse(_)
                | GitError::PointerTooLarge(_)
                | GitError::MissingPointerField(_)
                | GitError::InvalidOid(_)
        )
    }
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Transport error types and utilities

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for transport operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Why an upload was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFailure {
    /// No wallet configured, or the wallet could not be loaded
    CredentialsMissing,
    /// The upload service reported an empty or short balance
    InsufficientFunds,
    /// The upload service rejected the signature or account
    AuthenticationFailed,
    /// Anything else: connection errors, 5xx, malformed responses
    TransportFailure,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UploadFailure::CredentialsMissing => "credentials missing",
            UploadFailure::InsufficientFunds => "insufficient funds",
            UploadFailure::AuthenticationFailed => "authentication failed",
            UploadFailure::TransportFailure => "transport failure",
        };
        f.write_str(text)
    }
}

/// Errors that can occur while moving blobs to or from the remote store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Upload refused or failed
    #[error("upload failed ({reason}): {message}")]
    Upload {
        /// Classified cause
        reason: UploadFailure,
        /// Human readable detail
        message: String,
    },

    /// The gateway answered with a non-success status
    #[error("download of {id} failed with status {status}")]
    Download {
        /// Remote object id
        id: String,
        /// HTTP status code
        status: u16,
    },

    /// Network failure while downloading
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote object id is empty or contains whitespace
    #[error("invalid remote object id: {0:?}")]
    InvalidObjectId(String),

    /// Wallet file could not be parsed as an Arweave JWK
    #[error("invalid wallet: {0}")]
    InvalidWallet(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Create an upload error with the given reason
    pub fn upload<S: Into<String>>(reason: UploadFailure, message: S) -> Self {
        StorageError::Upload {
            reason,
            message: message.into(),
        }
    }

    /// Shorthand for a [`UploadFailure::CredentialsMissing`] upload error
    pub fn credentials_missing<S: Into<String>>(message: S) -> Self {
        Self::upload(UploadFailure::CredentialsMissing, message)
    }

    /// The upload failure reason, if this is an upload error
    pub fn upload_failure(&self) -> Option<UploadFailure> {
        match self {
            StorageError::Upload { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Check if this is an upload refused for lack of credentials
    pub fn is_credentials_missing(&self) -> bool {
        self.upload_failure() == Some(UploadFailure::CredentialsMissing)
    }

    /// Check if the remote answered 404 for a download
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Download { status: 404, .. })
    }
}

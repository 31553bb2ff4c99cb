// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Blob transport for git-arweave-lfs
//!
//! Large file contents never enter the git object database. They are
//! uploaded once to Arweave and fetched back by transaction id.
//!
//! # Architecture
//!
//! The [`BlobTransport`] trait is the only seam the filter pipeline sees:
//!
//! - [`ArweaveTransport`](arweave::ArweaveTransport) downloads from a public
//!   gateway and uploads signed ANS-104 data items to a Turbo bundler
//! - [`MockTransport`](mock::MockTransport) keeps everything in memory for
//!   tests
//!
//! Uploads need a wallet; downloads never do. Wallets are read lazily on the
//! first upload (see [`wallet::LazySigner`]).
//!
//! # Examples
//!
//! ```no_run
//! use arweave_lfs_storage::{BlobTransport, mock::MockTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), arweave_lfs_storage::StorageError> {
//!     let transport = MockTransport::new();
//!     let id = transport.upload(b"hello", "text/plain").await?;
//!     assert_eq!(transport.download(&id).await?, b"hello");
//!     Ok(())
//! }
//! ```

pub mod arweave;
pub mod content_type;
pub mod data_item;
pub mod error;
pub mod mock;
pub mod wallet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

pub use arweave::{ArweaveTransport, TransportSettings};
pub use content_type::{content_type_for_path, DEFAULT_CONTENT_TYPE};
pub use error::{StorageError, StorageResult, UploadFailure};
pub use wallet::{ArweaveWallet, LazySigner};

/// Identifier of an uploaded blob (an Arweave transaction or data item id)
///
/// Never empty and never contains whitespace, so it always fits on a single
/// pointer line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteObjectId(String);

impl RemoteObjectId {
    /// Validate and wrap an id
    pub fn new(id: impl Into<String>) -> StorageResult<Self> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(StorageError::InvalidObjectId(id));
        }
        Ok(Self(id))
    }

    /// The id as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RemoteObjectId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RemoteObjectId {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteObjectId> for String {
    fn from(id: RemoteObjectId) -> Self {
        id.0
    }
}

/// Moves whole blobs to and from the remote store
///
/// Implementations must be `Send + Sync` and `Debug`. Each call is a single
/// attempt; retries are left to the caller.
#[async_trait]
pub trait BlobTransport: Send + Sync + Debug {
    /// Upload `data` and return its permanent id.
    ///
    /// # Errors
    ///
    /// [`StorageError::Upload`] with a classified [`UploadFailure`]. Missing
    /// credentials are reported as [`UploadFailure::CredentialsMissing`]
    /// without touching the network.
    async fn upload(&self, data: &[u8], content_type: &str) -> StorageResult<RemoteObjectId>;

    /// Download the full contents of `id`
    async fn download(&self, id: &RemoteObjectId) -> StorageResult<Vec<u8>>;

    /// Whether uploads can be attempted at all
    fn can_upload(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: BlobTransport + ?Sized> BlobTransport for std::sync::Arc<T> {
    async fn upload(&self, data: &[u8], content_type: &str) -> StorageResult<RemoteObjectId> {
        (**self).upload(data, content_type).await
    }

    async fn download(&self, id: &RemoteObjectId) -> StorageResult<Vec<u8>> {
        (**self).download(id).await
    }

    fn can_upload(&self) -> bool {
        (**self).can_upload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_object_id_validation() {
        assert!(RemoteObjectId::new("").is_err());
        assert!(RemoteObjectId::new("has space").is_err());
        assert!(RemoteObjectId::new("line\nbreak").is_err());

        let id: RemoteObjectId = "bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U".parse().unwrap();
        assert_eq!(id.as_str(), "bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U");
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_remote_object_id_serde() {
        let id = RemoteObjectId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert!(serde_json::from_str::<RemoteObjectId>("\"\"").is_err());
    }
}

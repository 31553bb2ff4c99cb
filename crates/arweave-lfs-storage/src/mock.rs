// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! In-memory mock transport for testing
//!
//! Provides a thread-safe, in-memory implementation of
//! [`BlobTransport`](crate::BlobTransport). Ids are handed out from a
//! counter (`mock-tx-0001`, `mock-tx-0002`, ...) and every call is counted
//! so tests can assert on network traffic.
//!
//! # Examples
//!
//! ```rust,no_run
//! use arweave_lfs_storage::{BlobTransport, mock::MockTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), arweave_lfs_storage::StorageError> {
//!     let transport = MockTransport::new();
//!     let id = transport.upload(b"hello", "text/plain").await?;
//!     assert_eq!(id.as_str(), "mock-tx-0001");
//!     assert_eq!(transport.upload_count(), 1);
//!     Ok(())
//! }
//! ```

use crate::error::{StorageError, StorageResult, UploadFailure};
use crate::{BlobTransport, RemoteObjectId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct MockState {
    objects: HashMap<RemoteObjectId, Vec<u8>>,
    content_types: Vec<String>,
}

/// In-memory mock transport
///
/// Clones share the same store and counters.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    next_id: Arc<AtomicUsize>,
    uploads: Arc<AtomicUsize>,
    downloads: Arc<AtomicUsize>,
    upload_failure: Option<UploadFailure>,
}

impl MockTransport {
    /// Create an empty transport that accepts uploads
    pub fn new() -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockState::default())),
            next_id: Arc::new(AtomicUsize::new(1)),
            uploads: Arc::new(AtomicUsize::new(0)),
            downloads: Arc::new(AtomicUsize::new(0)),
            upload_failure: None,
        }
    }

    /// A transport with no wallet: every upload fails with
    /// [`UploadFailure::CredentialsMissing`]
    pub fn without_credentials() -> Self {
        Self::failing_uploads(UploadFailure::CredentialsMissing)
    }

    /// A transport whose uploads always fail for `reason`
    pub fn failing_uploads(reason: UploadFailure) -> Self {
        MockTransport {
            upload_failure: Some(reason),
            ..Self::new()
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an object as if it had been uploaded earlier
    pub fn insert(&self, id: &RemoteObjectId, data: &[u8]) {
        self.lock().objects.insert(id.clone(), data.to_vec());
    }

    /// Overwrite a stored object with different bytes
    pub fn corrupt(&self, id: &RemoteObjectId, data: &[u8]) {
        self.insert(id, data);
    }

    /// Stored bytes for `id`, if any
    pub fn object(&self, id: &RemoteObjectId) -> Option<Vec<u8>> {
        self.lock().objects.get(id).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upload attempts so far, including failed ones
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Download attempts so far
    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Content type passed to the most recent upload
    pub fn last_content_type(&self) -> Option<String> {
        self.lock().content_types.last().cloned()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("uploads", &self.upload_count())
            .field("downloads", &self.download_count())
            .finish()
    }
}

#[async_trait]
impl BlobTransport for MockTransport {
    async fn upload(&self, data: &[u8], content_type: &str) -> StorageResult<RemoteObjectId> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.upload_failure {
            return Err(StorageError::upload(reason, "mock upload refused"));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = RemoteObjectId::new(format!("mock-tx-{:04}", n))?;
        let mut state = self.lock();
        state.objects.insert(id.clone(), data.to_vec());
        state.content_types.push(content_type.to_string());
        Ok(id)
    }

    async fn download(&self, id: &RemoteObjectId) -> StorageResult<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.object(id).ok_or_else(|| StorageError::Download {
            id: id.to_string(),
            status: 404,
        })
    }

    fn can_upload(&self) -> bool {
        self.upload_failure != Some(UploadFailure::CredentialsMissing)
    }
}

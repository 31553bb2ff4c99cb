// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Git filter driver
//!
//! Git runs `clean` when content enters the index and `smudge` when it is
//! written to the working tree:
//!
//! ```text
//! clean:  content ─▶ digest ─▶ reference store ─▶ staged pointer ─▶ upload ─▶ pointer
//! smudge: pointer ─▶ decode ─▶ download ─▶ verify digest and size ─▶ content
//! ```
//!
//! Clean reaches the network only when neither the reference store nor the
//! pointer already staged for the path covers the content. Smudge never
//! needs credentials.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arweave_lfs_git::{FilterDriver, NoIndex, ReferenceStore};
//! use arweave_lfs_storage::mock::MockTransport;
//!
//! # async fn example() -> arweave_lfs_git::GitResult<()> {
//! let mut driver = FilterDriver::new(MockTransport::new(), NoIndex, ReferenceStore::in_memory());
//! let pointer = driver.clean("assets/logo.png", b"png bytes").await?;
//! let content = driver.smudge("assets/logo.png", &pointer.to_bytes()).await?;
//! assert_eq!(content.to_bytes().as_ref(), b"png bytes");
//! # Ok(())
//! # }
//! ```

use crate::attributes::is_gitattributes;
use crate::digest::ContentDigest;
use crate::error::{GitError, GitResult};
use crate::pointer::PointerFile;
use crate::references::{FileReference, ReferenceStore};
use crate::repository::IndexLookup;
use arweave_lfs_storage::{content_type_for_path, BlobTransport};
use std::borrow::Cow;
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// Filter driver name used in Git configuration and `.gitattributes`
pub const FILTER_DRIVER_NAME: &str = "arweave-lfs";

/// Where clean found the remote id it put in the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    /// Content was recorded in the reference store
    ReferenceStore,
    /// Identical content is already staged as a pointer
    Index,
    /// Content was uploaded just now
    Upload,
}

/// Result of cleaning one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutput {
    /// Content that must not be filtered, returned unchanged
    Passthrough(Vec<u8>),
    /// Pointer replacing the content
    Pointer {
        /// The pointer
        pointer: PointerFile,
        /// How its remote id was obtained
        source: PointerSource,
    },
}

impl CleanOutput {
    /// Bytes to hand back to git
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            CleanOutput::Passthrough(raw) => Cow::Borrowed(raw),
            CleanOutput::Pointer { pointer, .. } => Cow::Owned(pointer.to_bytes()),
        }
    }

    /// The pointer, unless the content was passed through
    pub fn pointer(&self) -> Option<&PointerFile> {
        match self {
            CleanOutput::Pointer { pointer, .. } => Some(pointer),
            CleanOutput::Passthrough(_) => None,
        }
    }

    /// How the pointer was resolved
    pub fn source(&self) -> Option<PointerSource> {
        match self {
            CleanOutput::Pointer { source, .. } => Some(*source),
            CleanOutput::Passthrough(_) => None,
        }
    }
}

/// Result of smudging one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmudgeOutput {
    /// Verified content
    Content(Vec<u8>),
    /// Input that could not be resolved, returned unchanged
    Passthrough {
        /// The original input
        raw: Vec<u8>,
        /// Diagnostic for stderr
        reason: String,
    },
}

impl SmudgeOutput {
    /// Bytes to hand back to git
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            SmudgeOutput::Content(data) => Cow::Borrowed(data),
            SmudgeOutput::Passthrough { raw, .. } => Cow::Borrowed(raw),
        }
    }

    /// Diagnostic for a passthrough
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            SmudgeOutput::Passthrough { reason, .. } => Some(reason),
            SmudgeOutput::Content(_) => None,
        }
    }
}

fn missing_wallet(path: &str, reason: impl std::fmt::Display) -> GitError {
    GitError::Configuration(format!(
        "cannot upload {}: {}. Configure a wallet with: git arweave-lfs config set-wallet <path>",
        path, reason
    ))
}

/// Check downloaded bytes against the pointer they were fetched for
pub fn verify_content(pointer: &PointerFile, data: &[u8]) -> GitResult<()> {
    let actual = ContentDigest::of(data);
    let actual_size = data.len() as u64;
    if actual != pointer.oid || actual_size != pointer.size {
        return Err(GitError::IntegrityMismatch {
            remote_id: pointer.remote_id.to_string(),
            expected: pointer.oid.to_hex(),
            actual: actual.to_hex(),
            expected_size: pointer.size,
            actual_size,
        });
    }
    Ok(())
}

/// Clean/smudge filter over a blob transport, an index and a reference store
pub struct FilterDriver<T, I> {
    transport: T,
    index: I,
    store: ReferenceStore,
}

impl<T: BlobTransport, I: IndexLookup> FilterDriver<T, I> {
    /// Creates a new filter driver
    pub fn new(transport: T, index: I, store: ReferenceStore) -> Self {
        Self {
            transport,
            index,
            store,
        }
    }

    /// The reference store
    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    /// The blob transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes the clean filter (content → pointer)
    ///
    /// # Errors
    ///
    /// - `GitError::Configuration` when new content has to be uploaded but
    ///   no usable wallet is configured
    /// - `GitError::Storage` when the upload itself fails
    pub async fn clean(&mut self, path: &str, content: &[u8]) -> GitResult<CleanOutput> {
        if is_gitattributes(path) {
            debug!(path, "passing attributes file through");
            return Ok(CleanOutput::Passthrough(content.to_vec()));
        }

        if PointerFile::is_pointer(content) && PointerFile::parse_bytes(content).is_ok() {
            debug!(path, "input is already a pointer, passing through");
            return Ok(CleanOutput::Passthrough(content.to_vec()));
        }

        let digest = ContentDigest::of(content);
        let size = content.len() as u64;
        debug!(path, %digest, size, "cleaning");

        if let Some(reference) = self.store.lookup(&digest) {
            debug!(path, id = %reference.remote_id, "content already uploaded");
            return Ok(CleanOutput::Pointer {
                pointer: PointerFile::from_reference(reference, size),
                source: PointerSource::ReferenceStore,
            });
        }

        let staged = match self.index.staged_pointer(path) {
            Ok(staged) => staged.filter(|pointer| pointer.matches(&digest)),
            Err(e) => {
                debug!(path, "index lookup failed, treating as unstaged: {}", e);
                None
            }
        };
        if let Some(staged) = staged {
            debug!(path, id = %staged.remote_id, "content matches staged pointer");
            return Ok(CleanOutput::Pointer {
                pointer: PointerFile::new(digest, size, staged.remote_id),
                source: PointerSource::Index,
            });
        }

        if !self.transport.can_upload() {
            return Err(missing_wallet(path, "no wallet configured"));
        }

        let content_type = content_type_for_path(path);
        info!(path, size, content_type = %content_type, "uploading to Arweave");
        let remote_id = match self.transport.upload(content, &content_type).await {
            Ok(id) => id,
            Err(e) if e.is_credentials_missing() => return Err(missing_wallet(path, e)),
            Err(e) => return Err(e.into()),
        };
        info!(path, id = %remote_id, "upload complete");

        let reference = FileReference::new(path, digest, remote_id.clone(), size);
        if let Err(e) = self.store.record(reference) {
            warn!(path, "Failed to record reference, the next clean will upload again: {}", e);
        }

        Ok(CleanOutput::Pointer {
            pointer: PointerFile::new(digest, size, remote_id),
            source: PointerSource::Upload,
        })
    }

    /// Executes the smudge filter (pointer → content)
    ///
    /// Input that does not decode as a pointer with a remote id is returned
    /// unchanged with a diagnostic. Downloaded bytes are always checked
    /// against the pointer's digest and size.
    pub async fn smudge(&self, path: &str, input: &[u8]) -> GitResult<SmudgeOutput> {
        let pointer = match PointerFile::parse_bytes(input) {
            Ok(pointer) => pointer,
            Err(e) if e.is_pointer_error() => {
                debug!(path, "passing through: {}", e);
                return Ok(SmudgeOutput::Passthrough {
                    raw: input.to_vec(),
                    reason: format!("Transaction ID not available for {}: {}", path, e),
                });
            }
            Err(e) => return Err(e),
        };

        info!(path, id = %pointer.remote_id, size = pointer.size, "downloading from Arweave");
        let data = match self.transport.download(&pointer.remote_id).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                warn!(
                    path,
                    id = %pointer.remote_id,
                    "Object not found on the gateway, a recent upload may not be available yet"
                );
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        verify_content(&pointer, &data)?;
        debug!(path, size = data.len(), "download verified");
        Ok(SmudgeOutput::Content(data))
    }

    /// Clean `input` into `output`, writing only once the pointer is ready
    pub async fn run_clean<R: Read, W: Write>(
        &mut self,
        path: &str,
        mut input: R,
        mut output: W,
    ) -> GitResult<CleanOutput> {
        let mut content = Vec::new();
        input.read_to_end(&mut content)?;
        let result = self.clean(path, &content).await?;
        output.write_all(&result.to_bytes())?;
        output.flush()?;
        Ok(result)
    }

    /// Smudge `input` into `output`, writing only once content is verified
    pub async fn run_smudge<R: Read, W: Write>(
        &self,
        path: &str,
        mut input: R,
        mut output: W,
    ) -> GitResult<SmudgeOutput> {
        let mut raw = Vec::new();
        input.read_to_end(&mut raw)?;
        let result = self.smudge(path, &raw).await?;
        output.write_all(&result.to_bytes())?;
        output.flush()?;
        Ok(result)
    }
}

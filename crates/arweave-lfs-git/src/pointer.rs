// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Pointer file implementation
//!
//! Pointer files are small text files that replace large files in the Git
//! repository. They carry everything needed to fetch the real content back
//! from Arweave, with no local state.
//!
//! ## Format Specification
//!
//! ```text
//! version git-arweave-lfs:v1
//! oid sha256:4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393
//! size 12345
//! arweave-tx-id bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U
//! ```
//!
//! Decoding accepts the lines in any order, skips blank lines and keys it
//! does not know, and tolerates a missing `version` line.

use crate::digest::{ContentDigest, DIGEST_ALGORITHM};
use crate::error::{GitError, GitResult};
use crate::references::FileReference;
use arweave_lfs_storage::RemoteObjectId;
use std::fmt;

/// Pointer file format version written by this crate
pub const POINTER_VERSION: &str = "git-arweave-lfs:v1";

/// Inputs larger than this are never pointers
pub const MAX_POINTER_SIZE: usize = 1024;

const KEY_VERSION: &str = "version";
const KEY_OID: &str = "oid";
const KEY_SIZE: &str = "size";
const KEY_REMOTE_ID: &str = "arweave-tx-id";

/// A decoded pointer file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerFile {
    /// Version of the pointer file format
    pub version: String,

    /// SHA-256 of the actual file content
    pub oid: ContentDigest,

    /// Size of the actual file in bytes
    pub size: u64,

    /// Arweave id the content was uploaded under
    pub remote_id: RemoteObjectId,
}

impl PointerFile {
    /// Creates a new pointer file in the current format
    ///
    /// # Example
    ///
    /// ```rust
    /// use arweave_lfs_git::{ContentDigest, PointerFile};
    /// use arweave_lfs_storage::RemoteObjectId;
    ///
    /// let pointer = PointerFile::new(
    ///     ContentDigest::of(b"hello"),
    ///     5,
    ///     RemoteObjectId::new("bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U")?,
    /// );
    /// assert!(pointer.to_string().starts_with("version git-arweave-lfs:v1\n"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(oid: ContentDigest, size: u64, remote_id: RemoteObjectId) -> Self {
        Self {
            version: POINTER_VERSION.to_string(),
            oid,
            size,
            remote_id,
        }
    }

    /// Pointer for a recorded reference, with the size of the content
    /// actually being cleaned
    pub fn from_reference(reference: &FileReference, size: u64) -> Self {
        Self::new(reference.digest, size, reference.remote_id.clone())
    }

    /// Parses a pointer file from its text representation
    ///
    /// # Errors
    ///
    /// - `GitError::PointerTooLarge` if the text exceeds [`MAX_POINTER_SIZE`]
    /// - `GitError::MissingPointerField` naming `oid`, `size` or `arweave-tx-id`
    /// - `GitError::InvalidOid` for anything but `sha256:` plus 64 hex digits
    /// - `GitError::PointerParse` for a non-numeric size, an empty value or
    ///   a repeated key
    pub fn parse(content: &str) -> GitResult<Self> {
        if content.len() > MAX_POINTER_SIZE {
            return Err(GitError::PointerTooLarge(content.len()));
        }

        let mut version: Option<String> = None;
        let mut oid: Option<ContentDigest> = None;
        let mut size: Option<u64> = None;
        let mut remote_id: Option<RemoteObjectId> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };

            match key {
                KEY_VERSION => set_once(&mut version, key, value, |v| Ok(v.to_string()))?,
                KEY_OID => set_once(&mut oid, key, value, parse_oid)?,
                KEY_SIZE => set_once(&mut size, key, value, |v| {
                    v.parse::<u64>()
                        .map_err(|e| GitError::PointerParse(format!("Invalid size value '{}': {}", v, e)))
                })?,
                KEY_REMOTE_ID => set_once(&mut remote_id, key, value, |v| {
                    RemoteObjectId::new(v)
                        .map_err(|e| GitError::PointerParse(e.to_string()))
                })?,
                _ => {}
            }
        }

        Ok(Self {
            version: version.unwrap_or_else(|| POINTER_VERSION.to_string()),
            oid: oid.ok_or(GitError::MissingPointerField(KEY_OID))?,
            size: size.ok_or(GitError::MissingPointerField(KEY_SIZE))?,
            remote_id: remote_id.ok_or(GitError::MissingPointerField(KEY_REMOTE_ID))?,
        })
    }

    /// Parses raw bytes as a pointer; non UTF-8 input is a parse error
    pub fn parse_bytes(content: &[u8]) -> GitResult<Self> {
        if content.len() > MAX_POINTER_SIZE {
            return Err(GitError::PointerTooLarge(content.len()));
        }
        let text = std::str::from_utf8(content)
            .map_err(|_| GitError::PointerParse("content is not UTF-8 text".to_string()))?;
        Self::parse(text)
    }

    /// Checks if the given content looks like a pointer file
    ///
    /// This is a fast check that doesn't do full parsing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use arweave_lfs_git::PointerFile;
    ///
    /// let content = b"version git-arweave-lfs:v1\noid sha256:abc\nsize 1\narweave-tx-id x\n";
    /// assert!(PointerFile::is_pointer(content));
    /// assert!(!PointerFile::is_pointer(b"This is just regular file content"));
    /// ```
    pub fn is_pointer(content: &[u8]) -> bool {
        if content.len() > MAX_POINTER_SIZE {
            return false;
        }
        let Ok(text) = std::str::from_utf8(content) else {
            return false;
        };

        let mut has_oid = false;
        let mut has_remote_id = false;
        for line in text.lines().map(str::trim) {
            has_oid |= line.starts_with("oid sha256:");
            has_remote_id |= line.starts_with("arweave-tx-id ");
        }
        has_oid && has_remote_id
    }

    /// Converts the pointer file to its text representation
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Returns the OID with the algorithm prefix
    pub fn oid_with_prefix(&self) -> String {
        format!("{}:{}", DIGEST_ALGORITHM, self.oid)
    }

    /// Whether this pointer stands for exactly `digest`
    pub fn matches(&self, digest: &ContentDigest) -> bool {
        self.oid == *digest
    }
}

fn set_once<T>(
    slot: &mut Option<T>,
    key: &str,
    value: &str,
    parse: impl FnOnce(&str) -> GitResult<T>,
) -> GitResult<()> {
    if slot.is_some() {
        return Err(GitError::PointerParse(format!("Duplicate field: {}", key)));
    }
    if value.is_empty() {
        return Err(GitError::PointerParse(format!("Empty value for field: {}", key)));
    }
    *slot = Some(parse(value)?);
    Ok(())
}

fn parse_oid(value: &str) -> GitResult<ContentDigest> {
    let Some((algorithm, hash)) = value.split_once(':') else {
        return Err(GitError::InvalidOid(format!(
            "OID must be in format 'sha256:hash', got: {}",
            value
        )));
    };
    if algorithm != DIGEST_ALGORITHM {
        return Err(GitError::InvalidOid(format!(
            "Only sha256 hashing is supported, got: {}",
            algorithm
        )));
    }
    ContentDigest::from_hex(hash)
}

impl fmt::Display for PointerFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}\n{} {}\n{} {}\n{} {}\n",
            KEY_VERSION,
            POINTER_VERSION,
            KEY_OID,
            self.oid_with_prefix(),
            KEY_SIZE,
            self.size,
            KEY_REMOTE_ID,
            self.remote_id
        )
    }
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! SHA-256 content digests

use crate::error::{GitError, GitResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Name of the only supported digest algorithm
pub const DIGEST_ALGORITHM: &str = "sha256";

const BUFFER_SIZE: usize = 64 * 1024;

/// SHA-256 of a byte sequence; the sole de-duplication key
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Digest of an in-memory buffer
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Digest and length of everything `reader` yields
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<(Self, u64)> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
            total += n as u64;
        }
        Ok((Self(hasher.finalize().into()), total))
    }

    /// Digest and length of a file on disk
    pub fn from_file(path: &Path) -> io::Result<(Self, u64)> {
        Self::from_reader(File::open(path)?)
    }

    /// Parse 64 hex characters
    pub fn from_hex(hex_str: &str) -> GitResult<Self> {
        if hex_str.len() != 64 {
            return Err(GitError::InvalidOid(format!(
                "expected 64 hex characters, got {}",
                hex_str.len()
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|e| GitError::InvalidOid(format!("invalid SHA-256 hash '{}': {}", hex_str, e)))?;
        Ok(Self(bytes))
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = GitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = GitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<ContentDigest> for String {
    fn from(digest: ContentDigest) -> Self {
        digest.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_known_digest() {
        assert_eq!(ContentDigest::of(b"hello").to_hex(), HELLO);
    }

    #[test]
    fn test_reader_matches_buffer() {
        let data = vec![7u8; BUFFER_SIZE * 2 + 13];
        let (digest, len) = ContentDigest::from_reader(data.as_slice()).unwrap();
        assert_eq!(digest, ContentDigest::of(&data));
        assert_eq!(len, data.len() as u64);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello").unwrap();
        let (digest, len) = ContentDigest::from_file(&path).unwrap();
        assert_eq!(digest.to_hex(), HELLO);
        assert_eq!(len, 5);
    }

    #[test]
    fn test_from_hex() {
        let digest: ContentDigest = HELLO.parse().unwrap();
        assert_eq!(digest, ContentDigest::of(b"hello"));
        assert_eq!(ContentDigest::from_hex(&HELLO.to_uppercase()).unwrap(), digest);

        assert!(ContentDigest::from_hex("abc").is_err());
        assert!(ContentDigest::from_hex(&"g".repeat(64)).is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let digest = ContentDigest::of(b"hello");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", HELLO));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}

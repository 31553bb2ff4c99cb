// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! ANS-104 data items
//!
//! Uploads go to the bundler as signed binary data items:
//!
//! ```text
//! u16 LE   signature type (1 = Arweave RSA-PSS)
//! [512]    signature
//! [512]    owner
//! u8       target present (always 0)
//! u8       anchor present (always 0)
//! u64 LE   number of tags
//! u64 LE   length of the encoded tags
//! [..]     Avro-encoded tags
//! [..]     data
//! ```
//!
//! The signature covers the SHA-384 "deep hash" of the item's fields and
//! the item id is the base64url SHA-256 of the signature.

use crate::error::StorageResult;
use crate::wallet::{ArweaveWallet, OWNER_LENGTH};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256, Sha384};

/// Signature type for Arweave RSA-PSS keys
pub const SIGNATURE_TYPE_ARWEAVE: u16 = 1;

/// A name/value tag attached to a data item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Tag value
    pub value: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Input to [`deep_hash`]
#[derive(Debug, Clone)]
pub enum DeepHashChunk<'a> {
    /// Raw bytes
    Blob(&'a [u8]),
    /// Nested list
    List(Vec<DeepHashChunk<'a>>),
}

fn sha384_array(hasher: Sha384) -> [u8; 48] {
    let mut out = [0u8; 48];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Arweave deep hash (SHA-384) over a tree of byte strings
pub fn deep_hash(chunk: &DeepHashChunk<'_>) -> [u8; 48] {
    match chunk {
        DeepHashChunk::Blob(data) => {
            let mut hasher = Sha384::new();
            hasher.update(Sha384::digest(format!("blob{}", data.len()).as_bytes()));
            hasher.update(Sha384::digest(data));
            sha384_array(hasher)
        }
        DeepHashChunk::List(items) => {
            let mut acc = sha384_array(Sha384::new_with_prefix(format!("list{}", items.len())));
            for item in items {
                let mut hasher = Sha384::new();
                hasher.update(acc);
                hasher.update(deep_hash(item));
                acc = sha384_array(hasher);
            }
            acc
        }
    }
}

fn write_avro_long(out: &mut Vec<u8>, value: i64) {
    let mut n = ((value << 1) ^ (value >> 63)) as u64;
    loop {
        let byte = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

fn write_avro_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_avro_long(out, bytes.len() as i64);
    out.extend_from_slice(bytes);
}

/// Encode tags as an Avro array of `{name: bytes, value: bytes}` records.
/// No tags encode to no bytes at all.
pub fn encode_tags(tags: &[Tag]) -> Vec<u8> {
    let mut out = Vec::new();
    if tags.is_empty() {
        return out;
    }
    write_avro_long(&mut out, tags.len() as i64);
    for tag in tags {
        write_avro_bytes(&mut out, tag.name.as_bytes());
        write_avro_bytes(&mut out, tag.value.as_bytes());
    }
    write_avro_long(&mut out, 0);
    out
}

/// A signed data item ready for upload
#[derive(Debug, Clone)]
pub struct DataItem {
    signature: Vec<u8>,
    owner: Vec<u8>,
    tag_count: usize,
    tag_bytes: Vec<u8>,
    data: Vec<u8>,
}

impl DataItem {
    /// Build and sign a data item for `data` with `tags`
    pub fn sign(wallet: &ArweaveWallet, tags: &[Tag], data: &[u8]) -> StorageResult<Self> {
        let owner = wallet.owner().to_vec();
        let tag_bytes = encode_tags(tags);
        let message = signature_message(&owner, &tag_bytes, data);
        let mut signature = wallet.sign(&message)?;
        if signature.len() < OWNER_LENGTH {
            let mut padded = vec![0u8; OWNER_LENGTH - signature.len()];
            padded.append(&mut signature);
            signature = padded;
        }

        Ok(Self {
            signature,
            owner,
            tag_count: tags.len(),
            tag_bytes,
            data: data.to_vec(),
        })
    }

    /// Item id: base64url of SHA-256 over the signature
    pub fn id(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(&self.signature))
    }

    /// Payload carried by the item
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Owner field (public modulus)
    pub fn owner(&self) -> &[u8] {
        &self.owner
    }

    /// Raw signature
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Message the signature was computed over
    pub fn signed_message(&self) -> [u8; 48] {
        signature_message(&self.owner, &self.tag_bytes, &self.data)
    }

    /// Binary ANS-104 encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            2 + self.signature.len() + self.owner.len() + 2 + 16 + self.tag_bytes.len() + self.data.len(),
        );
        out.extend_from_slice(&SIGNATURE_TYPE_ARWEAVE.to_le_bytes());
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.owner);
        out.push(0); // target
        out.push(0); // anchor
        out.extend_from_slice(&(self.tag_count as u64).to_le_bytes());
        out.extend_from_slice(&(self.tag_bytes.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.tag_bytes);
        out.extend_from_slice(&self.data);
        out
    }
}

fn signature_message(owner: &[u8], tag_bytes: &[u8], data: &[u8]) -> [u8; 48] {
    let signature_type = SIGNATURE_TYPE_ARWEAVE.to_string();
    deep_hash(&DeepHashChunk::List(vec![
        DeepHashChunk::Blob(b"dataitem"),
        DeepHashChunk::Blob(b"1"),
        DeepHashChunk::Blob(signature_type.as_bytes()),
        DeepHashChunk::Blob(owner),
        DeepHashChunk::Blob(b""),
        DeepHashChunk::Blob(b""),
        DeepHashChunk::Blob(tag_bytes),
        DeepHashChunk::Blob(data),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pss::{Signature, VerifyingKey};
    use rsa::signature::Verifier;

    const FIXTURE: &str = include_str!("../tests/fixtures/test-wallet.json");

    #[test]
    fn test_deep_hash_blob() {
        let hash = deep_hash(&DeepHashChunk::Blob(b"hello"));
        assert_eq!(
            hash.to_vec(),
            hex::decode(
                "33ab2407a6c328c0bc1bbe5971f49af5c1908985f83c3d2bd89a9e221dd8b068dc61ce968ba3f9ab12d5361ba3944382"
            )
            .unwrap()
        );
    }

    #[test]
    fn test_deep_hash_nested_list() {
        let hash = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"dataitem"),
            DeepHashChunk::Blob(b"1"),
            DeepHashChunk::Blob(b"1"),
            DeepHashChunk::Blob(b""),
            DeepHashChunk::List(vec![DeepHashChunk::Blob(b"nested")]),
        ]));
        assert_eq!(
            hash.to_vec(),
            hex::decode(
                "f68598e742c98f337d0a104049011401f7539d816af9db30645a684df6deed8e65a1897a3930b5ec879ffc708d6f10a9"
            )
            .unwrap()
        );
    }

    #[test]
    fn test_avro_zigzag() {
        let mut out = Vec::new();
        write_avro_long(&mut out, 64);
        assert_eq!(out, vec![128, 1]);

        out.clear();
        write_avro_long(&mut out, 300);
        assert_eq!(out, vec![216, 4]);
    }

    #[test]
    fn test_encode_tags() {
        assert!(encode_tags(&[]).is_empty());

        let encoded = encode_tags(&[
            Tag::new("Content-Type", "text/plain"),
            Tag::new("App-Name", "git-arweave-lfs"),
        ]);
        let mut expected = vec![4, 24];
        expected.extend_from_slice(b"Content-Type");
        expected.push(20);
        expected.extend_from_slice(b"text/plain");
        expected.push(16);
        expected.extend_from_slice(b"App-Name");
        expected.push(30);
        expected.extend_from_slice(b"git-arweave-lfs");
        expected.push(0);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_signed_item_layout() {
        let wallet = ArweaveWallet::from_jwk(FIXTURE).unwrap();
        let tags = [Tag::new("Content-Type", "text/plain")];
        let item = DataItem::sign(&wallet, &tags, b"hello").unwrap();
        let bytes = item.to_bytes();
        let tag_bytes = encode_tags(&tags);

        assert_eq!(&bytes[0..2], &[1, 0]);
        assert_eq!(&bytes[2..514], item.signature());
        assert_eq!(&bytes[514..1026], wallet.owner());
        assert_eq!(&bytes[1026..1028], &[0, 0]);
        assert_eq!(&bytes[1028..1036], &1u64.to_le_bytes());
        assert_eq!(&bytes[1036..1044], &(tag_bytes.len() as u64).to_le_bytes());
        assert_eq!(&bytes[1044..1044 + tag_bytes.len()], tag_bytes.as_slice());
        assert_eq!(&bytes[1044 + tag_bytes.len()..], b"hello");

        assert_eq!(item.id().len(), 43);
        assert_eq!(item.id(), URL_SAFE_NO_PAD.encode(Sha256::digest(item.signature())));
    }

    #[test]
    fn test_signature_covers_deep_hash() {
        let wallet = ArweaveWallet::from_jwk(FIXTURE).unwrap();
        let item = DataItem::sign(&wallet, &[], b"payload").unwrap();

        let verifying_key = VerifyingKey::<Sha256>::new(wallet.public_key());
        let signature = Signature::try_from(item.signature()).unwrap();
        assert!(verifying_key.verify(&item.signed_message(), &signature).is_ok());
    }
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Arweave wallets and lazily loaded upload credentials
//!
//! A wallet is an RSA-4096 key stored as a JSON Web Key. Reading it is
//! deferred until the first upload: clean on an already-recorded file,
//! smudge and diff never touch it, so a missing wallet is only an error
//! once something actually has to be signed.

use crate::error::{StorageError, StorageResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::debug;

/// Length of an Arweave owner (RSA modulus) and of its signatures
pub const OWNER_LENGTH: usize = 512;

#[derive(Deserialize)]
struct Jwk {
    kty: String,
    n: String,
    e: String,
    d: String,
    p: String,
    q: String,
}

fn decode_component(name: &str, value: &str) -> StorageResult<BigUint> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| StorageError::InvalidWallet(format!("field '{}' is not base64url: {}", name, e)))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// A loaded Arweave wallet able to sign data items
#[derive(Clone)]
pub struct ArweaveWallet {
    key: RsaPrivateKey,
    owner: Vec<u8>,
}

impl ArweaveWallet {
    /// Parse a wallet from JWK text
    pub fn from_jwk(json: &str) -> StorageResult<Self> {
        let jwk: Jwk = serde_json::from_str(json)
            .map_err(|e| StorageError::InvalidWallet(format!("not a JWK: {}", e)))?;
        if jwk.kty != "RSA" {
            return Err(StorageError::InvalidWallet(format!(
                "unsupported key type '{}'",
                jwk.kty
            )));
        }

        let key = RsaPrivateKey::from_components(
            decode_component("n", &jwk.n)?,
            decode_component("e", &jwk.e)?,
            decode_component("d", &jwk.d)?,
            vec![decode_component("p", &jwk.p)?, decode_component("q", &jwk.q)?],
        )
        .map_err(|e| StorageError::InvalidWallet(e.to_string()))?;

        let modulus = key.n().to_bytes_be();
        if modulus.len() > OWNER_LENGTH {
            return Err(StorageError::InvalidWallet(format!(
                "modulus is {} bytes, expected at most {}",
                modulus.len(),
                OWNER_LENGTH
            )));
        }
        let mut owner = vec![0u8; OWNER_LENGTH - modulus.len()];
        owner.extend_from_slice(&modulus);

        Ok(Self { key, owner })
    }

    /// Read and parse a wallet file
    pub async fn from_file(path: &Path) -> StorageResult<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_jwk(&text)
    }

    /// Public modulus, big-endian, left-padded to [`OWNER_LENGTH`]
    pub fn owner(&self) -> &[u8] {
        &self.owner
    }

    /// Wallet address: base64url of SHA-256 over the owner
    pub fn address(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(&self.owner))
    }

    /// Public half of the key
    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }

    /// RSA-PSS/SHA-256 signature over `message`
    pub fn sign(&self, message: &[u8]) -> StorageResult<Vec<u8>> {
        let signing_key = BlindedSigningKey::<Sha256>::new(self.key.clone());
        let signature = signing_key
            .try_sign_with_rng(&mut rand::thread_rng(), message)
            .map_err(|e| StorageError::InvalidWallet(format!("signing failed: {}", e)))?;
        Ok(signature.to_vec())
    }
}

impl fmt::Debug for ArweaveWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArweaveWallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Upload credentials that are resolved on first use
#[derive(Debug, Default)]
pub struct LazySigner {
    wallet_path: Option<PathBuf>,
    wallet: OnceCell<ArweaveWallet>,
}

impl LazySigner {
    /// Signer backed by the wallet file at `path`, if any
    pub fn new(wallet_path: Option<PathBuf>) -> Self {
        Self {
            wallet_path,
            wallet: OnceCell::new(),
        }
    }

    /// Signer with no wallet at all
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Signer around an already loaded wallet
    pub fn with_wallet(wallet: ArweaveWallet) -> Self {
        Self {
            wallet_path: None,
            wallet: OnceCell::new_with(Some(wallet)),
        }
    }

    /// Whether uploads could be attempted at all
    pub fn is_configured(&self) -> bool {
        self.wallet_path.is_some() || self.wallet.initialized()
    }

    /// Whether the wallet has been read yet
    pub fn is_loaded(&self) -> bool {
        self.wallet.initialized()
    }

    /// Load the wallet on first call and return it.
    ///
    /// Every failure maps to a credentials-missing upload error.
    pub async fn wallet(&self) -> StorageResult<&ArweaveWallet> {
        self.wallet
            .get_or_try_init(|| async {
                let Some(path) = self.wallet_path.as_deref() else {
                    return Err(StorageError::credentials_missing("no wallet configured"));
                };
                debug!(path = %path.display(), "loading wallet");
                ArweaveWallet::from_file(path).await.map_err(|e| {
                    StorageError::credentials_missing(format!(
                        "cannot load wallet {}: {}",
                        path.display(),
                        e
                    ))
                })
            })
            .await
    }
}

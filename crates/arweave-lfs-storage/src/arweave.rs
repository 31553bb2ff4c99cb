// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Arweave transport: gateway downloads and Turbo uploads
//!
//! Downloads are plain `GET {gateway}/{id}` requests. Uploads are signed
//! ANS-104 data items posted to `{upload_url}/v1/tx`, which answers with a
//! JSON receipt carrying the item id.

use crate::data_item::{DataItem, Tag};
use crate::error::{StorageError, StorageResult, UploadFailure};
use crate::wallet::LazySigner;
use crate::{BlobTransport, RemoteObjectId};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Value of the `App-Name` tag on every upload
pub const APP_NAME: &str = "git-arweave-lfs";

/// Everything needed to construct an [`ArweaveTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Gateway base URL for downloads
    pub gateway_url: String,
    /// Upload service base URL
    pub upload_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Wallet used to sign uploads, if any
    pub wallet_path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct UploadReceipt {
    id: String,
}

/// Map a rejected upload to a failure reason
pub fn classify_upload_failure(status: u16, body: &str) -> UploadFailure {
    let body = body.to_ascii_lowercase();
    match status {
        402 => UploadFailure::InsufficientFunds,
        401 | 403 => UploadFailure::AuthenticationFailed,
        _ if body.contains("insufficient") || body.contains("balance") => {
            UploadFailure::InsufficientFunds
        }
        _ => UploadFailure::TransportFailure,
    }
}

/// [`BlobTransport`] backed by an Arweave gateway and a Turbo bundler
pub struct ArweaveTransport {
    client: reqwest::Client,
    gateway_url: String,
    upload_url: String,
    signer: LazySigner,
}

impl ArweaveTransport {
    /// Build a transport from settings. The wallet is not read here.
    pub fn new(settings: TransportSettings) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::Transport(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            gateway_url: settings.gateway_url.trim_end_matches('/').to_string(),
            upload_url: settings.upload_url.trim_end_matches('/').to_string(),
            signer: LazySigner::new(settings.wallet_path),
        })
    }

    /// Download gateway base URL
    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    /// Upload service base URL
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Upload credentials
    pub fn signer(&self) -> &LazySigner {
        &self.signer
    }
}

impl fmt::Debug for ArweaveTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArweaveTransport")
            .field("gateway_url", &self.gateway_url)
            .field("upload_url", &self.upload_url)
            .field("wallet_loaded", &self.signer.is_loaded())
            .finish()
    }
}

#[async_trait]
impl BlobTransport for ArweaveTransport {
    async fn upload(&self, data: &[u8], content_type: &str) -> StorageResult<RemoteObjectId> {
        let wallet = self.signer.wallet().await?;

        let tags = [
            Tag::new("Content-Type", content_type),
            Tag::new("App-Name", APP_NAME),
            Tag::new("file-hash", hex::encode(Sha256::digest(data))),
        ];
        let item = DataItem::sign(wallet, &tags, data)?;
        let url = format!("{}/v1/tx", self.upload_url);
        debug!(url = %url, size = data.len(), item = %item.id(), "uploading data item");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(item.to_bytes())
            .send()
            .await
            .map_err(|e| StorageError::upload(UploadFailure::TransportFailure, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::upload(UploadFailure::TransportFailure, e.to_string()))?;

        if !status.is_success() {
            let reason = classify_upload_failure(status.as_u16(), &body);
            warn!(status = status.as_u16(), %reason, "upload rejected");
            return Err(StorageError::upload(
                reason,
                format!("{} {}", status.as_u16(), body.trim()),
            ));
        }

        let receipt: UploadReceipt = serde_json::from_str(&body).map_err(|e| {
            StorageError::upload(
                UploadFailure::TransportFailure,
                format!("unexpected upload response: {}", e),
            )
        })?;
        let id = RemoteObjectId::new(receipt.id)
            .map_err(|e| StorageError::upload(UploadFailure::TransportFailure, e.to_string()))?;

        info!(id = %id, size = data.len(), "uploaded to Arweave");
        Ok(id)
    }

    async fn download(&self, id: &RemoteObjectId) -> StorageResult<Vec<u8>> {
        let url = format!("{}/{}", self.gateway_url, id);
        debug!(url = %url, "downloading");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Download {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;
        debug!(id = %id, size = bytes.len(), "downloaded");
        Ok(bytes.to_vec())
    }

    fn can_upload(&self) -> bool {
        self.signer.is_configured()
    }
}

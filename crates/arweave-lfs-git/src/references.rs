// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Hash-addressed store of uploaded files
//!
//! Maps content digests to the Arweave objects they were uploaded as, so
//! that identical content is never uploaded twice. State lives under
//! `<git-dir>/arweave-lfs/`:
//!
//! - `references.jsonl`: append-only journal, one [`FileReference`] per line
//! - `references.json`: snapshot object keyed by digest, read first if present
//! - `references.jsonl.compacting`: journal set aside by a running or
//!   interrupted `compact`, read between the two
//!
//! Loading never fails. Missing files mean an empty store; unreadable
//! files and corrupt lines are skipped with a warning.

use crate::digest::ContentDigest;
use crate::error::GitResult;
use arweave_lfs_storage::RemoteObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory under the git dir holding local state
pub const STORE_DIR: &str = "arweave-lfs";

/// Append-only journal file name
pub const JOURNAL_FILE: &str = "references.jsonl";

/// Snapshot file name
pub const SNAPSHOT_FILE: &str = "references.json";

/// Journal renamed aside while it is folded into the snapshot
pub const COMPACTING_FILE: &str = "references.jsonl.compacting";

/// One uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    /// Path the content was first cleaned from
    #[serde(rename = "filePath")]
    pub file_path: String,

    /// SHA-256 of the content
    #[serde(rename = "hash")]
    pub digest: ContentDigest,

    /// Arweave id of the uploaded object
    #[serde(rename = "txId")]
    pub remote_id: RemoteObjectId,

    /// Content size in bytes
    pub size: u64,

    /// When the upload completed
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

impl FileReference {
    /// A reference for an upload that just finished
    pub fn new(
        file_path: impl Into<String>,
        digest: ContentDigest,
        remote_id: RemoteObjectId,
        size: u64,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            digest,
            remote_id,
            size,
            uploaded_at: Utc::now(),
        }
    }
}

/// Summary of the store contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Number of distinct digests
    pub total_files: usize,
    /// Sum of their sizes in bytes
    pub total_size: u64,
}

/// Digest-keyed reference store
#[derive(Debug, Default)]
pub struct ReferenceStore {
    dir: Option<PathBuf>,
    entries: BTreeMap<ContentDigest, FileReference>,
}

impl ReferenceStore {
    /// Open the store under `git_dir`, loading whatever can be read
    pub fn open(git_dir: &Path) -> Self {
        let dir = git_dir.join(STORE_DIR);
        let entries = load_entries(&dir);
        debug!(path = %dir.display(), entries = entries.len(), "reference store loaded");
        Self {
            dir: Some(dir),
            entries,
        }
    }

    /// A store that keeps nothing on disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Journal location, if persistent
    pub fn journal_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(JOURNAL_FILE))
    }

    /// Snapshot location, if persistent
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(SNAPSHOT_FILE))
    }

    /// Reference for `digest`, if the content was uploaded before
    pub fn lookup(&self, digest: &ContentDigest) -> Option<&FileReference> {
        self.entries.get(digest)
    }

    /// Persist `reference` to the journal, then remember it.
    ///
    /// The line is appended with a single write on a file opened in append
    /// mode and synced before returning. A torn last line left by an
    /// interrupted writer is terminated first so it cannot swallow the
    /// new record.
    pub fn record(&mut self, reference: FileReference) -> GitResult<()> {
        if let Some(path) = self.journal_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&path)?;

            let mut line = Vec::new();
            if !ends_with_newline(&mut file)? {
                line.push(b'\n');
            }
            serde_json::to_writer(&mut line, &reference)?;
            line.push(b'\n');

            file.write_all(&line)?;
            file.sync_data()?;
        }

        debug!(digest = %reference.digest, id = %reference.remote_id, "reference recorded");
        self.entries.insert(reference.digest, reference);
        Ok(())
    }

    /// All references, ordered by digest
    pub fn all(&self) -> impl Iterator<Item = &FileReference> {
        self.entries.values()
    }

    /// First reference uploaded under `id`
    pub fn find_by_remote_id(&self, id: &RemoteObjectId) -> Option<&FileReference> {
        self.entries.values().find(|r| &r.remote_id == id)
    }

    /// Number of distinct digests
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count and total size of recorded content
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_files: self.entries.len(),
            total_size: self.entries.values().map(|r| r.size).sum(),
        }
    }

    /// Fold snapshot and journal into a fresh snapshot and empty the journal.
    ///
    /// The journal is renamed aside before it is read, so records appended
    /// by other processes meanwhile land in a new journal and survive.
    /// Entries appended since this store was opened are picked up first.
    /// Returns the number of entries in the new snapshot.
    pub fn compact(&mut self) -> GitResult<usize> {
        let Some(dir) = self.dir.clone() else {
            return Ok(self.entries.len());
        };

        let journal = dir.join(JOURNAL_FILE);
        let aside = dir.join(COMPACTING_FILE);
        // A leftover from an interrupted compaction is folded as is
        if !aside.exists() {
            match fs::rename(&journal, &aside) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let mut merged = load_entries(&dir);
        for (digest, reference) in std::mem::take(&mut self.entries) {
            merged.entry(digest).or_insert(reference);
        }
        self.entries = merged;

        fs::create_dir_all(&dir)?;
        let snapshot: BTreeMap<String, &FileReference> = self
            .entries
            .iter()
            .map(|(digest, reference)| (digest.to_hex(), reference))
            .collect();
        let tmp = dir.join(format!("{}.tmp", SNAPSHOT_FILE));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(&snapshot)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, dir.join(SNAPSHOT_FILE))?;

        match fs::remove_file(&aside) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(entries = self.entries.len(), "reference store compacted");
        Ok(self.entries.len())
    }
}

fn load_entries(dir: &Path) -> BTreeMap<ContentDigest, FileReference> {
    let mut entries = BTreeMap::new();
    load_snapshot(&dir.join(SNAPSHOT_FILE), &mut entries);
    load_journal(&dir.join(COMPACTING_FILE), &mut entries);
    load_journal(&dir.join(JOURNAL_FILE), &mut entries);
    entries
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn load_snapshot(path: &Path, entries: &mut BTreeMap<ContentDigest, FileReference>) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!("Failed to read {}, ignoring it: {}", path.display(), e);
            return;
        }
    };

    let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to parse {}, starting without it: {}", path.display(), e);
            return;
        }
    };

    for (key, value) in raw {
        match serde_json::from_value::<FileReference>(value) {
            Ok(reference) => {
                entries.insert(reference.digest, reference);
            }
            Err(e) => warn!("Skipping reference {} in {}: {}", key, path.display(), e),
        }
    }
}

fn load_journal(path: &Path, entries: &mut BTreeMap<ContentDigest, FileReference>) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!("Failed to read {}, ignoring it: {}", path.display(), e);
            return;
        }
    };

    for (index, line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_slice::<FileReference>(line) {
            Ok(reference) => {
                entries.insert(reference.digest, reference);
            }
            Err(e) => warn!("Skipping line {} of {}: {}", index + 1, path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn reference(content: &[u8], id: &str) -> FileReference {
        FileReference::new(
            "assets/file.bin",
            ContentDigest::of(content),
            RemoteObjectId::new(id).unwrap(),
            content.len() as u64,
        )
    }

    #[test]
    fn test_missing_state_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ReferenceStore::open(dir.path());
        assert!(store.is_empty());
        assert_eq!(store.stats(), StoreStats::default());
    }

    #[test]
    fn test_record_and_reopen() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"hello", "tx-1")).unwrap();
        store.record(reference(b"world!", "tx-2")).unwrap();

        let reopened = ReferenceStore::open(dir.path());
        assert_eq!(reopened.len(), 2);
        let found = reopened.lookup(&ContentDigest::of(b"hello")).unwrap();
        assert_eq!(found.remote_id.as_str(), "tx-1");
        assert_eq!(reopened.stats().total_size, 11);
    }

    #[test]
    fn test_journal_line_format() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"hello", "tx-1")).unwrap();

        let text = fs::read_to_string(store.journal_path().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(json["txId"], "tx-1");
        assert_eq!(json["filePath"], "assets/file.bin");
        assert_eq!(json["size"], 5);
        assert_eq!(
            json["hash"],
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert!(json["uploadedAt"].is_string());
    }

    #[test]
    fn test_two_writers_keep_both_entries() {
        let dir = TempDir::new().unwrap();
        let mut first = ReferenceStore::open(dir.path());
        let mut second = ReferenceStore::open(dir.path());
        first.record(reference(b"one", "tx-1")).unwrap();
        second.record(reference(b"two", "tx-2")).unwrap();

        assert_eq!(ReferenceStore::open(dir.path()).len(), 2);
    }

    #[test]
    fn test_legacy_snapshot_is_loaded() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join(STORE_DIR);
        fs::create_dir_all(&store_dir).unwrap();
        let hash = ContentDigest::of(b"legacy").to_hex();
        let snapshot = format!(
            r#"{{"{hash}": {{"filePath": "big.psd", "txId": "legacy-tx", "size": 6, "hash": "{hash}", "uploadedAt": "2024-03-01T12:00:00.000Z"}}}}"#
        );
        fs::write(store_dir.join(SNAPSHOT_FILE), snapshot).unwrap();

        let store = ReferenceStore::open(dir.path());
        let found = store.lookup(&ContentDigest::of(b"legacy")).unwrap();
        assert_eq!(found.file_path, "big.psd");
        let id = RemoteObjectId::new("legacy-tx").unwrap();
        assert_eq!(store.find_by_remote_id(&id).unwrap().size, 6);
    }

    #[test]
    fn test_journal_overrides_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"same", "old-tx")).unwrap();
        store.compact().unwrap();
        store.record(reference(b"same", "new-tx")).unwrap();

        let reopened = ReferenceStore::open(dir.path());
        assert_eq!(
            reopened.lookup(&ContentDigest::of(b"same")).unwrap().remote_id.as_str(),
            "new-tx"
        );
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"good", "tx-1")).unwrap();

        let journal = store.journal_path().unwrap();
        let mut file = OpenOptions::new().append(true).open(&journal).unwrap();
        file.write_all(b"{not json\n").unwrap();
        drop(file);
        store.record(reference(b"also good", "tx-2")).unwrap();

        assert_eq!(ReferenceStore::open(dir.path()).len(), 2);
    }

    #[test]
    fn test_corrupt_snapshot_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join(STORE_DIR);
        fs::create_dir_all(&store_dir).unwrap();
        fs::write(store_dir.join(SNAPSHOT_FILE), "garbage").unwrap();

        assert!(ReferenceStore::open(dir.path()).is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_skips_only_that_line() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"a", "tx-a")).unwrap();

        let journal = store.journal_path().unwrap();
        let mut file = OpenOptions::new().append(true).open(&journal).unwrap();
        file.write_all(b"{\"filePath\":\"caf\xc3\n").unwrap();
        drop(file);
        store.record(reference(b"b", "tx-b")).unwrap();

        let reopened = ReferenceStore::open(dir.path());
        assert_eq!(reopened.len(), 2);
        assert!(reopened.lookup(&ContentDigest::of(b"a")).is_some());
    }

    #[test]
    fn test_record_after_torn_line_is_kept() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"a", "tx-a")).unwrap();

        let journal = store.journal_path().unwrap();
        let mut file = OpenOptions::new().append(true).open(&journal).unwrap();
        file.write_all(b"{\"filePath\":\"x").unwrap();
        drop(file);
        store.record(reference(b"b", "tx-b")).unwrap();

        let reopened = ReferenceStore::open(dir.path());
        assert_eq!(reopened.len(), 2);
        assert_eq!(
            reopened.lookup(&ContentDigest::of(b"b")).unwrap().remote_id.as_str(),
            "tx-b"
        );
    }

    #[test]
    fn test_compact_empties_journal() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"a", "tx-a")).unwrap();
        store.record(reference(b"b", "tx-b")).unwrap();

        assert_eq!(store.compact().unwrap(), 2);
        assert!(!store.journal_path().unwrap().exists());
        assert!(!dir.path().join(STORE_DIR).join(COMPACTING_FILE).exists());
        assert!(store.snapshot_path().unwrap().exists());
        assert_eq!(ReferenceStore::open(dir.path()).len(), 2);
    }

    #[test]
    fn test_record_during_compaction_survives() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::open(dir.path());
        store.record(reference(b"a", "tx-a")).unwrap();

        // Journal already set aside by a compaction that has not finished
        let store_dir = dir.path().join(STORE_DIR);
        fs::rename(store_dir.join(JOURNAL_FILE), store_dir.join(COMPACTING_FILE)).unwrap();
        let mut other = ReferenceStore::open(dir.path());
        assert_eq!(other.len(), 1);
        other.record(reference(b"b", "tx-b")).unwrap();

        assert_eq!(store.compact().unwrap(), 2);
        let reopened = ReferenceStore::open(dir.path());
        assert_eq!(reopened.len(), 2);
        assert!(!store_dir.join(COMPACTING_FILE).exists());
    }

    #[test]
    fn test_in_memory_store() {
        let mut store = ReferenceStore::in_memory();
        store.record(reference(b"x", "tx-x")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.journal_path().is_none());
        assert_eq!(store.all().count(), 1);
    }
}

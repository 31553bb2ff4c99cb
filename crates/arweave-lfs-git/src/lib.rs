// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! # git-arweave-lfs Git Integration Layer
//!
//! Git filter and diff drivers that keep large files out of the object
//! database and on Arweave instead.
//!
//! ## Architecture
//!
//! - **Content digests**: SHA-256 of file content, the de-duplication key
//! - **Pointer files**: small text files stored in Git in place of content
//! - **Reference store**: local digest → Arweave id map under `.git/arweave-lfs/`
//! - **Filter driver**: clean (content → pointer) and smudge (pointer → content)
//! - **Diff driver**: fast equality check so unchanged binaries show no diff
//! - **Attributes**: `.gitattributes` entries routing patterns through the filter
//!
//! ## Pointer File Format
//!
//! ```text
//! version git-arweave-lfs:v1
//! oid sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
//! size 5
//! arweave-tx-id bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use arweave_lfs_git::PointerFile;
//!
//! let content = "version git-arweave-lfs:v1\n\
//!                oid sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824\n\
//!                size 5\n\
//!                arweave-tx-id bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U\n";
//! let pointer = PointerFile::parse(content)?;
//! assert_eq!(pointer.size, 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attributes;
pub mod diff;
pub mod digest;
pub mod error;
pub mod filter;
pub mod pointer;
pub mod references;
pub mod repository;

pub use attributes::{GitAttributes, TrackOutcome};
pub use diff::{compare_files, run_diff_driver, Comparison};
pub use digest::ContentDigest;
pub use error::{GitError, GitResult};
pub use filter::{CleanOutput, FilterDriver, PointerSource, SmudgeOutput, FILTER_DRIVER_NAME};
pub use pointer::PointerFile;
pub use references::{FileReference, ReferenceStore, StoreStats};
pub use repository::{GitRepository, IndexLookup, NoIndex};

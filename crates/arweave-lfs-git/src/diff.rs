// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! External diff driver for tracked binaries
//!
//! Git invokes the driver as
//! `<path> <old-file> <old-hex> <old-mode> <new-file> <new-hex> <new-mode>`.
//! Identical files produce no output at all; anything else, including any
//! error along the way, is reported as `Binary files <path> differ`.

use crate::digest::ContentDigest;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Number of arguments git passes to an external diff driver
pub const DIFF_ARG_COUNT: usize = 7;

/// Outcome of comparing two files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Byte-for-byte identical
    Identical,
    /// Different, missing or unreadable
    Differ,
}

/// Compare two files: existence, then length, then SHA-256.
///
/// Never fails; any error counts as [`Comparison::Differ`].
pub fn compare_files(old: &Path, new: &Path) -> Comparison {
    match try_compare(old, new) {
        Ok(comparison) => comparison,
        Err(e) => {
            debug!(old = %old.display(), new = %new.display(), "comparison failed: {}", e);
            Comparison::Differ
        }
    }
}

fn try_compare(old: &Path, new: &Path) -> io::Result<Comparison> {
    if !old.exists() || !new.exists() {
        return Ok(Comparison::Differ);
    }

    let old_len = fs::metadata(old)?.len();
    let new_len = fs::metadata(new)?.len();
    if old_len != new_len {
        return Ok(Comparison::Differ);
    }

    let (old_digest, _) = ContentDigest::from_file(old)?;
    let (new_digest, _) = ContentDigest::from_file(new)?;
    Ok(if old_digest == new_digest {
        Comparison::Identical
    } else {
        Comparison::Differ
    })
}

/// Run the diff driver over git's arguments, writing the verdict to `out`
pub fn run_diff_driver<S: AsRef<str>, W: Write>(args: &[S], out: &mut W) -> io::Result<Comparison> {
    if args.len() < DIFF_ARG_COUNT {
        writeln!(out, "Binary files differ")?;
        return Ok(Comparison::Differ);
    }

    let path = args[0].as_ref();
    let old_file = Path::new(args[1].as_ref());
    let new_file = Path::new(args[4].as_ref());

    let comparison = compare_files(old_file, new_file);
    if comparison == Comparison::Differ {
        writeln!(out, "Binary files {} differ", path)?;
    }
    Ok(comparison)
}

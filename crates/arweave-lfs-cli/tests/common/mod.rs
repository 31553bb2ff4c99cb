// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Common helpers for git-arweave-lfs CLI tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use std::process;
use tempfile::TempDir;

/// Variables that would leak the developer's setup into tests
const ISOLATED_VARS: [&str; 6] = [
    "ARWEAVE_LFS_WALLET",
    "ARWEAVE_LFS_GATEWAY",
    "ARWEAVE_LFS_UPLOAD_URL",
    "ARWEAVE_LFS_TIMEOUT",
    "ARWEAVE_LFS_LOG",
    "RUST_LOG",
];

/// SHA-256 of `hello`
pub const HELLO_DIGEST: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// A scratch work directory with its own `$HOME`
pub struct Sandbox {
    pub home: TempDir,
    pub work: TempDir,
}

impl Sandbox {
    /// Empty sandbox, not a repository
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create home dir"),
            work: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Sandbox whose work directory is a fresh git repository
    pub fn with_repo() -> Self {
        let sandbox = Self::new();
        sandbox.git(&["init", "-q"]);
        sandbox
    }

    pub fn path(&self) -> &Path {
        self.work.path()
    }

    fn isolate(&self, cmd: &mut process::Command) {
        cmd.current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("GIT_CONFIG_NOSYSTEM", "1");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
    }

    /// `git-arweave-lfs` running inside the sandbox
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = process::Command::new(assert_cmd::cargo::cargo_bin("git-arweave-lfs"));
        self.isolate(&mut cmd);
        Command::from_std(cmd)
    }

    /// Run `git` inside the sandbox, returning stdout
    pub fn git(&self, args: &[&str]) -> String {
        let mut cmd = process::Command::new("git");
        cmd.args(args);
        self.isolate(&mut cmd);
        let output = cmd.output().expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

/// Pointer text for a digest, size and transaction id
pub fn pointer_text(digest_hex: &str, size: usize, tx_id: &str) -> String {
    format!(
        "version git-arweave-lfs:v1\noid sha256:{}\nsize {}\narweave-tx-id {}\n",
        digest_hex, size, tx_id
    )
}

// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! CLI tests for install, track, config, refs and completions

mod common;

use common::{Sandbox, HELLO_DIGEST};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// Install
// ============================================================================

#[test]
fn test_install_local_sets_driver_config() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["install", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed git-arweave-lfs filter driver"));

    assert_eq!(
        sandbox.git(&["config", "--get", "filter.arweave-lfs.clean"]).trim(),
        "git-arweave-lfs clean %f"
    );
    assert_eq!(
        sandbox.git(&["config", "--get", "filter.arweave-lfs.smudge"]).trim(),
        "git-arweave-lfs smudge %f"
    );
    assert_eq!(
        sandbox.git(&["config", "--get", "filter.arweave-lfs.required"]).trim(),
        "true"
    );
    assert_eq!(
        sandbox.git(&["config", "--get", "diff.arweave-lfs.command"]).trim(),
        "git-arweave-lfs diff"
    );
}

#[test]
fn test_install_global_writes_home_config() {
    let sandbox = Sandbox::new();

    sandbox.cmd().arg("install").assert().success();

    let gitconfig = fs::read_to_string(sandbox.home.path().join(".gitconfig")).unwrap();
    assert!(gitconfig.contains("[filter \"arweave-lfs\"]"));
    assert!(gitconfig.contains("clean = git-arweave-lfs clean %f"));
}

#[test]
fn test_uninstall_local_removes_driver_config() {
    let sandbox = Sandbox::with_repo();

    sandbox.cmd().args(["install", "--local"]).assert().success();
    sandbox.cmd().args(["uninstall", "--local"]).assert().success();
    // Twice is fine
    sandbox.cmd().args(["uninstall", "--local"]).assert().success();

    let config = sandbox.git(&["config", "--list", "--local"]);
    assert!(!config.contains("arweave-lfs"));
}

#[test]
fn test_install_local_outside_repository_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["install", "--local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a git repository"));
}

// ============================================================================
// Track
// ============================================================================

#[test]
fn test_track_patterns() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["track", "*.psd", "*.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Now tracking"));

    let content = fs::read_to_string(sandbox.path().join(".gitattributes")).unwrap();
    assert_eq!(
        content,
        ".gitattributes !filter !diff !merge\n\
         *.psd filter=arweave-lfs diff=arweave-lfs merge=arweave-lfs\n\
         *.mp4 filter=arweave-lfs diff=arweave-lfs merge=arweave-lfs\n"
    );

    let attrs = sandbox.git(&["check-attr", "filter", "--", "art.psd"]);
    assert_eq!(attrs.trim(), "art.psd: filter: arweave-lfs");
}

#[test]
fn test_track_existing_pattern_is_not_duplicated() {
    let sandbox = Sandbox::with_repo();

    sandbox.cmd().args(["track", "*.psd"]).assert().success();
    sandbox
        .cmd()
        .args(["track", "*.psd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pattern already tracked"));

    let content = fs::read_to_string(sandbox.path().join(".gitattributes")).unwrap();
    assert_eq!(content.matches("*.psd").count(), 1);
}

#[test]
fn test_track_refuses_gitattributes() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["track", ".gitattributes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Refusing to track .gitattributes"));
}

#[test]
fn test_track_list() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["track", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracked patterns found"));

    sandbox.cmd().args(["track", "*.wav"]).assert().success();
    sandbox
        .cmd()
        .args(["track", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*.wav"));
}

#[test]
fn test_untrack_pattern() {
    let sandbox = Sandbox::with_repo();

    sandbox.cmd().args(["track", "*.psd", "*.wav"]).assert().success();
    sandbox
        .cmd()
        .args(["untrack", "*.psd", "*.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Untracked"))
        .stdout(predicate::str::contains("Pattern was not tracked"));

    let content = fs::read_to_string(sandbox.path().join(".gitattributes")).unwrap();
    assert!(!content.contains("*.psd"));
    assert!(content.contains("*.wav filter=arweave-lfs"));
}

#[test]
fn test_track_outside_repository_fails() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["track", "*.psd"]).assert().failure();
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_show_defaults() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://arweave.net"))
        .stdout(predicate::str::contains("https://upload.ardrive.io"))
        .stdout(predicate::str::contains("not configured"));
}

#[test]
fn test_config_set_gateway() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["config", "set-gateway", "https://g8way.io"])
        .assert()
        .success();
    assert_eq!(
        sandbox.git(&["config", "--get", "arweave-lfs.gateway"]).trim(),
        "https://g8way.io"
    );

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://g8way.io"))
        .stdout(predicate::str::contains("git config"));
}

#[test]
fn test_config_set_gateway_rejects_invalid_url() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["config", "set-gateway", "ftp://arweave.net"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported scheme"));
}

#[test]
fn test_config_set_wallet() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["config", "set-wallet", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wallet file not found"));

    fs::write(sandbox.path().join("wallet.json"), "{}").unwrap();
    sandbox
        .cmd()
        .args(["config", "set-wallet", "wallet.json"])
        .assert()
        .success();

    let stored = sandbox.git(&["config", "--get", "arweave-lfs.wallet"]);
    assert!(stored.trim().ends_with("wallet.json"));
    assert!(std::path::Path::new(stored.trim()).is_absolute());
}

#[test]
fn test_config_show_json_reports_environment_origin() {
    let sandbox = Sandbox::with_repo();

    let output = sandbox
        .cmd()
        .args(["config", "show", "--json"])
        .env("ARWEAVE_LFS_UPLOAD_URL", "http://localhost:1984")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["upload_url"]["value"], "http://localhost:1984");
    assert_eq!(json["upload_url"]["origin"], "environment");
    assert_eq!(json["gateway_url"]["origin"], "default");
    assert!(json["wallet_path"].is_null());
}

// ============================================================================
// Refs
// ============================================================================

#[test]
fn test_refs_list_and_stats() {
    let sandbox = Sandbox::with_repo();

    sandbox
        .cmd()
        .args(["refs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No uploads recorded"));

    let store = sandbox.path().join(".git/arweave-lfs");
    fs::create_dir_all(&store).unwrap();
    fs::write(
        store.join("references.jsonl"),
        format!(
            "{{\"filePath\":\"hello.txt\",\"hash\":\"{}\",\"txId\":\"tx-hello\",\"size\":5,\"uploadedAt\":\"2026-01-02T03:04:05Z\"}}\n",
            HELLO_DIGEST
        ),
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["refs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tx-hello"))
        .stdout(predicate::str::contains("hello.txt"));

    let output = sandbox.cmd().args(["refs", "stats", "--json"]).output().unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["totalFiles"], 1);
    assert_eq!(stats["totalSize"], 5);

    sandbox
        .cmd()
        .args(["refs", "compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entries"));
    assert!(store.join("references.json").exists());
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git-arweave-lfs"));
}

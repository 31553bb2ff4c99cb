// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Configuration resolution against a real git repository.

use arweave_lfs_config::{keys, ConfigLoader, GitConfigSource, Origin};
use std::collections::HashMap;
use std::process::Command;
use tempfile::TempDir;

fn init_git_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = Command::new("git")
        .args(["init", "-q"])
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to init git repo");
    assert!(output.status.success(), "git init failed");
    temp_dir
}

#[test]
fn test_setters_round_trip_through_git_config() {
    let repo = init_git_repo();
    let wallet = repo.path().join("wallet.json");
    std::fs::write(&wallet, "{}").unwrap();

    let loader = ConfigLoader::new(GitConfigSource::new().in_dir(repo.path())).with_env(HashMap::new());
    loader.set_wallet(&wallet).unwrap();
    loader.set_gateway("https://g8way.io").unwrap();

    let config = loader.load().unwrap();
    assert_eq!(config.wallet_path(), Some(wallet.as_path()));
    assert_eq!(config.gateway_url(), "https://g8way.io");
    assert_eq!(config.gateway_url.origin, Origin::GitConfig);
}

#[test]
fn test_environment_beats_repository_config() {
    let repo = init_git_repo();
    let status = Command::new("git")
        .args(["config", keys::GATEWAY, "https://g8way.io"])
        .current_dir(repo.path())
        .status()
        .unwrap();
    assert!(status.success());

    let mut env = HashMap::new();
    env.insert("ARWEAVE_LFS_GATEWAY".to_string(), "https://ar-io.net".to_string());

    let config = ConfigLoader::new(GitConfigSource::new().in_dir(repo.path()))
        .with_env(env)
        .load()
        .unwrap();
    assert_eq!(config.gateway_url(), "https://ar-io.net");
    assert_eq!(config.gateway_url.origin, Origin::Environment);
}

#[test]
fn test_config_serializes_with_origins() {
    let config = ConfigLoader::new(arweave_lfs_config::MemoryConfigSource::new())
        .with_env(HashMap::new())
        .load()
        .unwrap();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["gateway_url"]["origin"], "default");
    assert_eq!(json["gateway_url"]["value"], "https://arweave.net");
}

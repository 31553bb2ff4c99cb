// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Integration tests for logging configuration.
//!
//! Only one global subscriber can be installed per process, so a single test
//! performs the installation and checks that a second attempt fails cleanly.

use arweave_lfs_observability::{init_tracing_with_config, LogConfig, LogFormat};

#[test]
fn test_config_builder_chaining() {
    let config = LogConfig::new()
        .with_format(LogFormat::Json)
        .with_level("debug")
        .with_timestamps(true)
        .with_color(false)
        .with_targets(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, Some("debug".to_string()));
    assert!(config.use_timestamps);
    assert!(!config.use_color);
    assert!(config.include_targets);
}

#[test]
fn test_second_initialization_is_an_error_not_a_panic() {
    let first = init_tracing_with_config(LogConfig::new().with_level("warn"));
    assert!(first.is_ok());

    let second = init_tracing_with_config(LogConfig::new().with_level("debug"));
    assert!(second.is_err());
}

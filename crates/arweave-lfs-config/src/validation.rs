// git-arweave-lfs - Large Git files on Arweave
// Copyright (C) 2025 git-arweave-lfs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{keys, Config};
use url::Url;

/// Validator for configuration settings
pub trait Validator {
    /// Check every field, returning the first problem found
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        validate_service_url(keys::GATEWAY, &self.gateway_url.value)?;
        validate_service_url(keys::UPLOAD_URL, &self.upload_url.value)?;

        if self.timeout_secs.value == 0 {
            return Err(ConfigError::invalid_value(
                keys::TIMEOUT,
                "timeout must be at least one second",
            ));
        }

        if self.log_level.value.trim().is_empty() {
            return Err(ConfigError::invalid_value(keys::LOG_LEVEL, "empty log filter"));
        }

        Ok(())
    }
}

/// Check that `value` is an absolute http(s) URL with a host
pub fn validate_service_url(field: &str, value: &str) -> ConfigResult<()> {
    let parsed = Url::parse(value)
        .map_err(|e| ConfigError::invalid_value(field, format!("invalid URL '{}': {}", value, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::invalid_value(
            field,
            format!("unsupported scheme '{}', expected http or https", parsed.scheme()),
        ));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::invalid_value(field, format!("URL '{}' has no host", value)));
    }

    Ok(())
}

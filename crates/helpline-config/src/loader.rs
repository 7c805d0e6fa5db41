// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./helpline.toml` > `~/.config/helpline/helpline.toml`
//! > `/etc/helpline/helpline.toml` with environment variable overrides via the
//! `HELPLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HelplineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/helpline/helpline.toml` (system-wide)
/// 3. `~/.config/helpline/helpline.toml` (user XDG config)
/// 4. `./helpline.toml` (local directory)
/// 5. `HELPLINE_*` environment variables
pub fn load_config() -> Result<HelplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelplineConfig::default()))
        .merge(Toml::file("/etc/helpline/helpline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("helpline/helpline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("helpline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<HelplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelplineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HelplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelplineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `HELPLINE_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("HELPLINE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("geo_", "geo.", 1);
        mapped.into()
    })
}

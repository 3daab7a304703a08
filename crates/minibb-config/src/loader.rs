// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./minibb.toml` > `~/.config/minibb/minibb.toml` > `/etc/minibb/minibb.toml`
//! with environment variable overrides via the `MINIBB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::MinibbConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/minibb/minibb.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "minibb.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/minibb/minibb.toml` (system-wide)
/// 3. `~/.config/minibb/minibb.toml` (user XDG config)
/// 4. `./minibb.toml` (local directory)
/// 5. `MINIBB_*` environment variables
/// 6. `DATABASE_PATH` (kept for existing deployments)
pub fn load_config() -> Result<MinibbConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<MinibbConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MinibbConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MinibbConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(MinibbConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MinibbConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
        .merge(legacy_env_provider())
}

/// `~/.config/minibb/minibb.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("minibb").join(LOCAL_CONFIG_FILE))
}

/// Map `MINIBB_<SECTION>_<KEY>` onto `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `MINIBB_STORAGE_DATABASE_PATH` must become
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("MINIBB_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("storage_", "storage.", 1)
            .replacen("logging_", "logging.", 1)
            .replacen("pagination_", "pagination.", 1)
            .replacen("import_", "import.", 1);
        mapped.into()
    })
}

/// The unprefixed `DATABASE_PATH` variable earlier releases read.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["DATABASE_PATH"])
        .map(|_| "storage.database_path".into())
}

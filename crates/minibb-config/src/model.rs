// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for MiniBB.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use minibb_core::PageLimits;
use serde::{Deserialize, Serialize};

/// Top-level MiniBB configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MinibbConfig {
    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Listing page sizes.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Bulk thread import behavior.
    #[serde(default)]
    pub import: ImportConfig,
}

/// SQLite storage configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the database file. `:memory:` opens a private in-memory store.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Use write-ahead logging.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// How long a statement waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    "minibb.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level for MiniBB's own targets (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Page size configuration for topic and post listings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size used when the caller gives none or an out-of-range value.
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,

    /// Largest page size a caller may request.
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

impl PaginationConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_per_page: self.default_per_page,
            max_per_page: self.max_per_page,
        }
    }
}

fn default_per_page() -> u32 {
    50
}

fn default_max_per_page() -> u32 {
    100
}

/// Bulk import configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Create boards named by imported threads when they do not exist yet.
    #[serde(default)]
    pub create_missing_boards: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MinibbConfig::default();
        assert_eq!(config.storage.database_path, "minibb.db");
        assert!(config.storage.wal_mode);
        assert_eq!(config.storage.busy_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.pagination.default_per_page, 50);
        assert_eq!(config.pagination.max_per_page, 100);
        assert!(!config.import.create_missing_boards);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: MinibbConfig = toml::from_str("").unwrap();
        assert_eq!(config, MinibbConfig::default());
    }

    #[test]
    fn pagination_limits_carry_both_bounds() {
        let pagination = PaginationConfig {
            default_per_page: 20,
            max_per_page: 40,
        };
        let limits = pagination.limits();
        assert_eq!(limits.default_per_page, 20);
        assert_eq!(limits.max_per_page, 40);
    }
}

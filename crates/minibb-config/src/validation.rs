// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Covers constraints serde attributes cannot express: non-empty paths,
//! known log levels, and consistent page-size bounds.

use crate::diagnostic::ConfigError;
use crate::model::MinibbConfig;

/// Levels accepted by `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MinibbConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let pagination = &config.pagination;
    if pagination.max_per_page == 0 {
        errors.push(ConfigError::Validation {
            message: "pagination.max_per_page must be at least 1".to_string(),
        });
    }
    if pagination.default_per_page == 0 {
        errors.push(ConfigError::Validation {
            message: "pagination.default_per_page must be at least 1".to_string(),
        });
    } else if pagination.default_per_page > pagination.max_per_page {
        errors.push(ConfigError::Validation {
            message: format!(
                "pagination.default_per_page ({}) must not exceed pagination.max_per_page ({})",
                pagination.default_per_page, pagination.max_per_page
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = MinibbConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = MinibbConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = MinibbConfig::default();
        config.logging.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("verbose"))));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = MinibbConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn default_page_size_above_max_fails_validation() {
        let mut config = MinibbConfig::default();
        config.pagination.default_per_page = 200;
        config.pagination.max_per_page = 100;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = MinibbConfig::default();
        config.storage.database_path = String::new();
        config.logging.level = "loud".to_string();
        config.pagination.max_per_page = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}

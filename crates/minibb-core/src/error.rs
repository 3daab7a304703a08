// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the MiniBB bulletin board.

use thiserror::Error;

/// The primary error type used across MiniBB crates.
#[derive(Debug, Error)]
pub enum BbError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (statement failure, transaction protocol misuse,
    /// connection loss).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A referenced board, topic, or post does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Caller-supplied input was rejected before touching the store.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BbError {
    /// Whether the failure was caused by the caller's input rather than the data layer.
    pub fn is_client_error(&self) -> bool {
        matches!(self, BbError::NotFound { .. } | BbError::Validation(_))
    }
}

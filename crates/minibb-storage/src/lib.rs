// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for MiniBB.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the nested unit-of-work
//! coordinator every write goes through.

pub mod adapter;
pub mod database;
pub mod error;
pub mod migrations;
pub mod models;
pub mod querier;
pub mod queries;
pub mod tx;

pub use adapter::SqliteForum;
pub use database::Database;
pub use error::TxError;
pub use models::*;
pub use querier::{Executed, Querier};
pub use tx::{ActiveQuerier, TxCoordinator};

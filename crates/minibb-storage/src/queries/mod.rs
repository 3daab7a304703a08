// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data-access functions for boards, topics, and posts.
//!
//! Readers take any [`Querier`](crate::Querier) so they work on a bare
//! connection or inside a unit of work. Writers take the coordinator and run
//! as their own unit of work, which nests as a savepoint when the caller
//! already has one open.

pub mod boards;
pub mod import;
pub mod posts;
pub mod topics;

#[cfg(test)]
pub(crate) fn migrated() -> rusqlite::Connection {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    crate::migrations::run_migrations(&mut conn).unwrap();
    conn
}

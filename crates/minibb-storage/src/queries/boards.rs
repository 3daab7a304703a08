// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board lookups.

use minibb_core::BbError;
use rusqlite::{Row, params};

use crate::models::Board;
use crate::querier::Querier;

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        slug: row.get(1)?,
        description: row.get(2)?,
    })
}

/// All boards in id order.
pub fn list_boards<Q: Querier + ?Sized>(q: &Q) -> Result<Vec<Board>, BbError> {
    Ok(q.query_rows(
        "SELECT id, slug, description FROM boards ORDER BY id",
        [],
        board_from_row,
    )?)
}

pub fn get_board_by_id<Q: Querier + ?Sized>(q: &Q, id: i64) -> Result<Option<Board>, BbError> {
    Ok(q.query_row(
        "SELECT id, slug, description FROM boards WHERE id = ?1",
        params![id],
        board_from_row,
    )?)
}

pub fn get_board_by_slug<Q: Querier + ?Sized>(
    q: &Q,
    slug: &str,
) -> Result<Option<Board>, BbError> {
    Ok(q.query_row(
        "SELECT id, slug, description FROM boards WHERE slug = ?1",
        params![slug],
        board_from_row,
    )?)
}

/// Insert a board. A duplicate slug surfaces as a storage error.
pub fn create_board<Q: Querier + ?Sized>(
    q: &Q,
    slug: &str,
    description: &str,
) -> Result<Board, BbError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(BbError::Validation("board slug required".into()));
    }
    let inserted = q.execute(
        "INSERT INTO boards (slug, description) VALUES (?1, ?2)",
        params![slug, description],
    )?;
    Ok(Board {
        id: inserted.last_insert_id,
        slug: slug.to_string(),
        description: description.to_string(),
    })
}

// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! The SQL files under `migrations/` are compiled into the binary and applied
//! on every [`Database::open`](crate::Database::open). Refinery records applied
//! versions in `refinery_schema_history`, so reopening is a no-op.

use minibb_core::BbError;
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply all pending migrations.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), BbError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| BbError::Storage {
            source: Box::new(e),
        })?;
    debug!(
        applied = report.applied_migrations().len(),
        "schema migrations complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(conn: &rusqlite::Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn creates_forum_tables() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        let names = tables(&conn);
        for expected in ["boards", "posts", "refinery_schema_history", "topics"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn seeds_default_boards_once() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();
        let slugs: Vec<String> = conn
            .prepare("SELECT slug FROM boards ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(slugs, vec!["general", "watercooler"]);
    }

    #[test]
    fn new_topic_defaults_to_open_with_no_posts() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO topics (board_id, title, author) VALUES (1, 't', 'a')",
            [],
        )
        .unwrap();
        let (status, count): (String, i64) = conn
            .query_row("SELECT status, post_count FROM topics", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(status, "open");
        assert_eq!(count, 0);
    }
}

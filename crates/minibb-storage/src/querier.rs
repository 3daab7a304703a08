// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capability every data-access function runs against.
//!
//! A bare [`rusqlite::Connection`], an open [`rusqlite::Transaction`], and the
//! coordinator's current executor all implement [`Querier`], so accessors
//! compose the same way standalone or nested inside a unit of work. They
//! differ only in whether their writes are visible outside the enclosing
//! transaction.

use rusqlite::{Connection, OptionalExtension, Params, Row, Transaction};

use crate::error::TxError;

/// Result of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: usize,
    /// Rowid of the most recent successful insert on this connection.
    pub last_insert_id: i64,
}

/// Something that parameterized SQL can be sent to.
pub trait Querier {
    /// The connection statements are issued on.
    fn connection(&self) -> &Connection;

    /// Whether statements currently run inside an open transaction.
    fn in_transaction(&self) -> bool {
        !self.connection().is_autocommit()
    }

    /// Run a single write statement.
    fn execute<P: Params>(&self, sql: &str, params: P) -> Result<Executed, TxError> {
        let conn = self.connection();
        let rows_affected = conn.prepare_cached(sql)?.execute(params)?;
        Ok(Executed {
            rows_affected,
            last_insert_id: conn.last_insert_rowid(),
        })
    }

    /// Run a query and map every row.
    ///
    /// The row cursor is walked to the end before returning, so the statement
    /// is always released before the connection is used again.
    fn query_rows<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, TxError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.connection().prepare_cached(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Run a query expected to yield at most one row. `None` means no rows.
    fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, TxError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.connection().prepare_cached(sql)?;
        let row = stmt.query_row(params, map).optional()?;
        Ok(row)
    }
}

impl Querier for Connection {
    fn connection(&self) -> &Connection {
        self
    }
}

impl Querier for Transaction<'_> {
    fn connection(&self) -> &Connection {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn scratch() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL UNIQUE);")
            .unwrap();
        conn
    }

    // `Connection` has inherent `execute`/`query_row` methods, so the trait
    // methods are called by path throughout.

    #[test]
    fn execute_reports_rows_and_insert_id() {
        let conn = scratch();
        let first = Querier::execute(&conn, "INSERT INTO notes (body) VALUES (?1)", params!["a"])
            .unwrap();
        let second = Querier::execute(&conn, "INSERT INTO notes (body) VALUES (?1)", params!["b"])
            .unwrap();
        assert_eq!(first.rows_affected, 1);
        assert_eq!(second.last_insert_id, first.last_insert_id + 1);
    }

    #[test]
    fn constraint_violation_is_a_statement_error() {
        let conn = scratch();
        Querier::execute(&conn, "INSERT INTO notes (body) VALUES (?1)", params!["dup"]).unwrap();
        let err = Querier::execute(&conn, "INSERT INTO notes (body) VALUES (?1)", params!["dup"])
            .unwrap_err();
        assert!(matches!(err, TxError::Statement(_)));
    }

    #[test]
    fn malformed_sql_is_a_statement_error() {
        let conn = scratch();
        let err = Querier::execute(&conn, "INSERT INTO nowhere VALUES (", []).unwrap_err();
        assert!(matches!(err, TxError::Statement(_)));
    }

    #[test]
    fn query_row_signals_no_rows_with_none() {
        let conn = scratch();
        let found = Querier::query_row(&conn, "SELECT body FROM notes WHERE id = ?1", [42], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn query_rows_maps_every_row_in_order() {
        let conn = scratch();
        for body in ["x", "y", "z"] {
            Querier::execute(&conn, "INSERT INTO notes (body) VALUES (?1)", params![body]).unwrap();
        }
        let bodies = Querier::query_rows(&conn, "SELECT body FROM notes ORDER BY id", [], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        assert_eq!(bodies, vec!["x", "y", "z"]);
    }

    #[test]
    fn transaction_writes_are_visible_through_the_transaction() {
        let mut conn = scratch();
        assert!(!Querier::in_transaction(&conn));
        {
            let tx = conn.transaction().unwrap();
            assert!(Querier::in_transaction(&tx));
            Querier::execute(&tx, "INSERT INTO notes (body) VALUES (?1)", params!["t"]).unwrap();
            let seen = Querier::query_row(&tx, "SELECT COUNT(*) FROM notes", [], |row| {
                row.get::<_, i64>(0)
            })
            .unwrap();
            assert_eq!(seen, Some(1));
            // Dropped without commit: rolled back.
        }
        let after = Querier::query_row(&conn, "SELECT COUNT(*) FROM notes", [], |row| {
            row.get::<_, i64>(0)
        })
        .unwrap();
        assert_eq!(after, Some(0));
    }
}

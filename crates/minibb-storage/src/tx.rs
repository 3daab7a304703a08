// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nested units of work over a single SQLite transaction.
//!
//! The outermost unit opens the physical transaction; every unit nested
//! beneath it gets a savepoint. Committing a nested unit releases its
//! savepoint (its writes become part of the enclosing unit), rolling it back
//! undoes only what it wrote. Only the root commit or rollback finalizes the
//! transaction.
//!
//! Savepoints are named `sp_<n>` from a counter that only grows while the root
//! is open, so sibling units at the same depth never share a name.
//!
//! SQLite may end the whole transaction on its own (`INSERT OR ROLLBACK`,
//! `RAISE(ROLLBACK)`, a full disk). The coordinator then refuses every
//! statement and every new level until the root unit settles, so nothing
//! written afterwards can slip out in autocommit mode.
//!
//! A coordinator borrows one connection and is driven through `&mut self`;
//! concurrent requests each need their own connection and coordinator.

use rusqlite::{Connection, Params, Row, Transaction, TransactionBehavior};
use tracing::{debug, error, warn};

use crate::error::TxError;
use crate::querier::{Executed, Querier};

/// The executor statements should currently go through.
#[derive(Debug, Clone, Copy)]
pub enum ActiveQuerier<'a> {
    /// No unit of work is open; statements autocommit.
    Connection(&'a Connection),
    /// Statements run inside the root transaction.
    Transaction(&'a Transaction<'a>),
    /// The database ended the root transaction behind the coordinator's
    /// back. Every statement fails with [`TxError::TransactionLost`].
    Lost(&'a Connection),
}

impl ActiveQuerier<'_> {
    fn ensure_usable(&self) -> Result<(), TxError> {
        match self {
            ActiveQuerier::Lost(_) => Err(TxError::TransactionLost),
            _ => Ok(()),
        }
    }
}

impl Querier for ActiveQuerier<'_> {
    fn connection(&self) -> &Connection {
        match *self {
            ActiveQuerier::Connection(conn) | ActiveQuerier::Lost(conn) => conn,
            ActiveQuerier::Transaction(tx) => Querier::connection(tx),
        }
    }

    fn execute<P: Params>(&self, sql: &str, params: P) -> Result<Executed, TxError> {
        self.ensure_usable()?;
        Querier::execute(self.connection(), sql, params)
    }

    fn query_rows<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, TxError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.ensure_usable()?;
        Querier::query_rows(self.connection(), sql, params, map)
    }

    fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, TxError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.ensure_usable()?;
        Querier::query_row(self.connection(), sql, params, map)
    }
}

/// Runs composable units of work atomically on one connection.
pub struct TxCoordinator<'c> {
    conn: &'c Connection,
    root: Option<Transaction<'c>>,
    checkpoints: Vec<String>,
    next_checkpoint: u64,
}

impl<'c> TxCoordinator<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            root: None,
            checkpoints: Vec::new(),
            next_checkpoint: 0,
        }
    }

    /// Current nesting level. `0` means no transaction is open.
    pub fn depth(&self) -> usize {
        match self.root {
            None => 0,
            Some(_) => 1 + self.checkpoints.len(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.root.is_none()
    }

    /// Whether a root is recorded but SQLite has already ended it.
    pub fn is_lost(&self) -> bool {
        self.root.is_some() && self.conn.is_autocommit()
    }

    /// Opens the root transaction, or a savepoint when one is already open.
    ///
    /// On failure the nesting level is unchanged.
    pub fn begin(&mut self) -> Result<(), TxError> {
        if self.root.is_none() {
            let root = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
            self.root = Some(root);
            self.next_checkpoint = 0;
            debug!(depth = 1, "began root transaction");
            return Ok(());
        }
        // A SAVEPOINT issued in autocommit mode would open a fresh transaction.
        self.ensure_root_alive("begin")?;

        self.next_checkpoint += 1;
        let name = format!("sp_{}", self.next_checkpoint);
        self.active_root("begin")?
            .execute_batch(&format!("SAVEPOINT {name}"))?;
        debug!(depth = self.checkpoints.len() + 2, checkpoint = %name, "created checkpoint");
        self.checkpoints.push(name);
        Ok(())
    }

    /// Finalizes the root transaction, or releases the innermost savepoint.
    ///
    /// The nesting level drops by one even when the statement fails.
    pub fn commit(&mut self) -> Result<(), TxError> {
        match self.checkpoints.pop() {
            Some(name) => {
                debug!(depth = self.depth(), checkpoint = %name, "releasing checkpoint");
                self.ensure_root_alive("commit")?;
                self.active_root("commit")?
                    .execute_batch(&format!("RELEASE SAVEPOINT {name}"))?;
                Ok(())
            }
            None => {
                let root = self
                    .root
                    .take()
                    .ok_or(TxError::NoActiveUnit { op: "commit" })?;
                self.next_checkpoint = 0;
                if self.conn.is_autocommit() {
                    // Dropping a handle whose transaction already ended is a no-op.
                    warn!("root transaction ended by the database before commit");
                    return Err(TxError::TransactionLost);
                }
                // A failed COMMIT is rolled back when `root` drops.
                root.commit()?;
                debug!(depth = 0, "committed root transaction");
                Ok(())
            }
        }
    }

    /// Rolls back the root transaction, or everything written since the
    /// innermost savepoint while keeping the transaction open.
    ///
    /// The nesting level drops by one even when the statement fails.
    pub fn rollback(&mut self) -> Result<(), TxError> {
        match self.checkpoints.pop() {
            Some(name) => {
                debug!(depth = self.depth(), checkpoint = %name, "rolling back to checkpoint");
                self.ensure_root_alive("rollback")?;
                self.active_root("rollback")?.execute_batch(&format!(
                    "ROLLBACK TO SAVEPOINT {name}; RELEASE SAVEPOINT {name};"
                ))?;
                Ok(())
            }
            None => {
                let root = self
                    .root
                    .take()
                    .ok_or(TxError::NoActiveUnit { op: "rollback" })?;
                self.next_checkpoint = 0;
                if self.conn.is_autocommit() {
                    debug!(depth = 0, "root transaction already ended by the database");
                    return Ok(());
                }
                root.rollback()?;
                debug!(depth = 0, "rolled back root transaction");
                Ok(())
            }
        }
    }

    /// The executor for the current level: the open transaction if any,
    /// otherwise the bare connection.
    pub fn querier(&self) -> ActiveQuerier<'_> {
        match &self.root {
            Some(_) if self.conn.is_autocommit() => ActiveQuerier::Lost(self.conn),
            Some(root) => ActiveQuerier::Transaction(root),
            None => ActiveQuerier::Connection(self.conn),
        }
    }

    /// Runs `work` as one unit of work.
    ///
    /// `work` receives this coordinator, which queries through [`querier`] and
    /// can nest further units with `run`. On `Ok` the unit commits, on `Err`
    /// it rolls back. If the rollback fails too, the result is
    /// [`TxError::Compound`] carrying both failures. A panic inside `work`
    /// rolls the unit back before unwinding continues.
    ///
    /// Levels opened with [`begin`] inside `work` and left open are rolled back
    /// before the unit settles.
    ///
    /// [`querier`]: TxCoordinator::querier
    /// [`begin`]: TxCoordinator::begin
    pub fn run<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut TxCoordinator<'c>) -> Result<T, E>,
        E: From<TxError> + std::error::Error + Send + Sync + 'static,
    {
        self.begin()?;
        let depth = self.depth();
        let scope = UnitScope {
            coord: self,
            depth,
            settled: false,
        };
        let outcome = work(&mut *scope.coord);
        scope.settle(outcome)
    }

    fn active_root(&self, op: &'static str) -> Result<&Transaction<'c>, TxError> {
        self.root.as_ref().ok_or(TxError::NoActiveUnit { op })
    }

    fn ensure_root_alive(&self, op: &'static str) -> Result<(), TxError> {
        if self.is_lost() {
            warn!(op, depth = self.depth(), "transaction ended by the database, refusing");
            return Err(TxError::TransactionLost);
        }
        Ok(())
    }
}

/// Statements go through [`TxCoordinator::querier`], so they are refused
/// once the database has ended the transaction.
impl Querier for TxCoordinator<'_> {
    fn connection(&self) -> &Connection {
        match &self.root {
            Some(root) => Querier::connection(root),
            None => self.conn,
        }
    }

    fn execute<P: Params>(&self, sql: &str, params: P) -> Result<Executed, TxError> {
        self.querier().execute(sql, params)
    }

    fn query_rows<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, TxError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.querier().query_rows(sql, params, map)
    }

    fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, TxError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.querier().query_row(sql, params, map)
    }
}

impl Drop for TxCoordinator<'_> {
    fn drop(&mut self) {
        if self.root.is_some() {
            // The transaction handle rolls back when it drops.
            warn!(depth = self.depth(), "coordinator dropped with an open transaction");
        }
    }
}

/// Settles one `run` call on every exit path.
struct UnitScope<'s, 'c> {
    coord: &'s mut TxCoordinator<'c>,
    /// Depth this unit opened at.
    depth: usize,
    settled: bool,
}

impl UnitScope<'_, '_> {
    fn settle<T, E>(mut self, outcome: Result<T, E>) -> Result<T, E>
    where
        E: From<TxError> + std::error::Error + Send + Sync + 'static,
    {
        self.settled = true;

        let actual = self.coord.depth();
        if actual < self.depth {
            let misuse = TxError::UnbalancedUnit {
                expected: self.depth,
                actual,
            };
            return Err(match outcome {
                Ok(_) => misuse.into(),
                Err(err) => TxError::Compound {
                    original: Box::new(err),
                    rollback: Box::new(misuse),
                }
                .into(),
            });
        }
        self.close_leaked_levels();

        match outcome {
            Ok(value) => {
                self.coord.commit()?;
                Ok(value)
            }
            Err(err) => match self.coord.rollback() {
                Ok(()) => Err(err),
                Err(rollback) => Err(TxError::Compound {
                    original: Box::new(err),
                    rollback: Box::new(rollback),
                }
                .into()),
            },
        }
    }

    fn close_leaked_levels(&mut self) {
        while self.coord.depth() > self.depth {
            warn!(
                depth = self.coord.depth(),
                unit_depth = self.depth,
                "unit of work left a level open, rolling it back"
            );
            if let Err(err) = self.coord.rollback() {
                error!(error = %err, "rollback of leaked level failed");
            }
        }
    }
}

impl Drop for UnitScope<'_, '_> {
    fn drop(&mut self) {
        if self.settled || self.coord.depth() < self.depth {
            return;
        }
        // Only reachable while unwinding out of `work`.
        self.close_leaked_levels();
        warn!(depth = self.depth, "unit of work unwound, rolling back");
        if let Err(err) = self.coord.rollback() {
            error!(error = %err, depth = self.depth, "rollback during unwind failed");
        }
    }
}

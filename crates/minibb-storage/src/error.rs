// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failures raised by the querier and the transaction coordinator.

use minibb_core::BbError;
use thiserror::Error;

/// Errors produced while executing statements or driving a transaction.
#[derive(Debug, Error)]
pub enum TxError {
    /// The underlying statement failed: constraint violation, malformed SQL,
    /// or a connection fault mid-statement. Never retried.
    #[error("statement failed: {0}")]
    Statement(#[from] rusqlite::Error),

    /// `commit` or `rollback` was called with no unit of work open.
    #[error("no active unit of work to {op}")]
    NoActiveUnit { op: &'static str },

    /// A unit of work closed more levels than it opened, so the coordinator
    /// cannot tell which level the caller meant to settle.
    #[error("unit of work at depth {expected} returned with depth {actual}")]
    UnbalancedUnit { expected: usize, actual: usize },

    /// SQLite ended the root transaction on its own, for example through
    /// `INSERT OR ROLLBACK` or a full disk. Everything written since the root
    /// began is gone, and statements are refused until the root unit settles.
    #[error("transaction was ended by the database; unit of work cannot continue")]
    TransactionLost,

    /// A unit of work failed and the rollback it triggered failed as well.
    #[error("{original}; rollback also failed: {rollback}")]
    Compound {
        #[source]
        original: Box<dyn std::error::Error + Send + Sync>,
        rollback: Box<TxError>,
    },
}

impl TxError {
    /// Whether this is a caller protocol error rather than a data-layer fault.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            TxError::NoActiveUnit { .. } | TxError::UnbalancedUnit { .. }
        )
    }
}

impl From<TxError> for BbError {
    fn from(err: TxError) -> Self {
        BbError::Storage {
            source: Box::new(err),
        }
    }
}

/// Convert a tokio-rusqlite error into `BbError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> BbError {
    BbError::Storage {
        source: Box::new(e),
    }
}

// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bulk thread import.
//!
//! The whole import is one unit of work and every thread is a unit nested
//! under it. A thread that fails is rolled back on its own and reported; the
//! threads around it still commit.

use minibb_core::BbError;
use tracing::{info, warn};

use crate::error::TxError;
use crate::models::{ImportReport, ImportedThread, NewPost, NewTopic, SkippedThread};
use crate::queries::{boards, posts, topics};
use crate::tx::TxCoordinator;

/// Parse the JSON import format: `[{ "board", "title", "posts": [{ "author", "content" }] }]`.
pub fn parse_threads(json: &str) -> Result<Vec<ImportedThread>, BbError> {
    serde_json::from_str(json)
        .map_err(|e| BbError::Validation(format!("malformed import file: {e}")))
}

/// Import `threads` in input order.
///
/// Boards named by a thread but absent from the store are created with an
/// empty description when `create_missing_boards` is set; otherwise the
/// thread is skipped.
pub fn import_threads(
    coord: &mut TxCoordinator<'_>,
    threads: &[ImportedThread],
    create_missing_boards: bool,
) -> Result<ImportReport, BbError> {
    coord.run(|tx| {
        let mut report = ImportReport::default();
        for (index, thread) in threads.iter().enumerate() {
            match import_thread(tx, thread, create_missing_boards) {
                Ok(posts) => {
                    report.imported += 1;
                    report.posts += posts;
                }
                Err(err) if is_transaction_fault(&err) => return Err(err),
                Err(err) => {
                    warn!(index, title = %thread.title, error = %err, "skipping thread");
                    report.skipped.push(SkippedThread {
                        index,
                        title: thread.title.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(
            imported = report.imported,
            posts = report.posts,
            skipped = report.skipped.len(),
            "import complete"
        );
        Ok(report)
    })
}

fn import_thread(
    coord: &mut TxCoordinator<'_>,
    thread: &ImportedThread,
    create_missing_boards: bool,
) -> Result<usize, BbError> {
    coord.run(|tx| {
        let Some((opening, replies)) = thread.posts.split_first() else {
            return Err(BbError::Validation("thread has no posts".into()));
        };

        let board = match boards::get_board_by_slug(tx, &thread.board)? {
            Some(board) => board,
            None if create_missing_boards => boards::create_board(tx, &thread.board, "")?,
            None => {
                return Err(BbError::NotFound {
                    entity: "board",
                    key: thread.board.clone(),
                });
            }
        };

        let topic = topics::create_topic(
            tx,
            &NewTopic {
                board_id: board.id,
                title: thread.title.clone(),
                author: opening.author.clone(),
                content: opening.content.clone(),
            },
        )?;
        for reply in replies {
            posts::create_post(
                tx,
                &NewPost {
                    topic_id: topic.id,
                    author: reply.author.clone(),
                    content: reply.content.clone(),
                },
            )?;
        }
        Ok(thread.posts.len())
    })
}

/// Failures that leave the surrounding transaction in doubt, so the import
/// cannot keep going.
fn is_transaction_fault(err: &BbError) -> bool {
    match err {
        BbError::Storage { source } => source
            .downcast_ref::<TxError>()
            .is_some_and(|tx| {
                tx.is_misuse() || matches!(tx, TxError::Compound { .. } | TxError::TransactionLost)
            }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImportedPost;
    use crate::querier::Querier;
    use crate::queries::migrated;

    fn thread(board: &str, title: &str, posts: &[(&str, &str)]) -> ImportedThread {
        ImportedThread {
            board: board.into(),
            title: title.into(),
            posts: posts
                .iter()
                .map(|(author, content)| ImportedPost {
                    author: (*author).into(),
                    content: (*content).into(),
                })
                .collect(),
        }
    }

    fn titles(conn: &rusqlite::Connection) -> Vec<String> {
        Querier::query_rows(conn, "SELECT title FROM topics ORDER BY id", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn failing_threads_are_skipped_and_the_rest_commit() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);
        let threads = vec![
            thread("general", "Welcome", &[("alice", "hi"), ("bob", "hello")]),
            thread("nowhere", "Lost", &[("carol", "where am I")]),
            thread("general", "Half", &[("dave", "start"), ("", "blank reply")]),
            thread("watercooler", "Empty", &[]),
            thread("watercooler", "Coffee", &[("erin", "espresso")]),
        ];

        let report = import_threads(&mut coord, &threads, false).unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.posts, 3);
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![1, 2, 3]);
        assert!(report.skipped[0].reason.contains("board not found"));
        assert_eq!(titles(&conn), vec!["Welcome", "Coffee"]);
        assert!(coord.is_idle());
    }

    #[test]
    fn missing_boards_are_created_when_allowed() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);
        let threads = vec![thread("rust", "Borrowck", &[("ferris", "help")])];

        let report = import_threads(&mut coord, &threads, true).unwrap();
        assert_eq!(report.imported, 1);
        let board = boards::get_board_by_slug(&conn, "rust").unwrap().unwrap();
        assert_eq!(board.description, "");
    }

    #[test]
    fn board_created_for_a_failed_thread_is_rolled_back() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);
        let threads = vec![thread("ghost", "Broken", &[("amy", "ok"), ("ben", "")])];

        let report = import_threads(&mut coord, &threads, true).unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(boards::get_board_by_slug(&conn, "ghost").unwrap(), None);
    }

    #[test]
    fn parse_threads_reads_the_import_format() {
        let json = r#"[{"board":"general","title":"T","posts":[{"author":"a","content":"c"}]}]"#;
        let threads = parse_threads(json).unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].posts[0].author, "a");

        assert!(matches!(parse_threads("{"), Err(BbError::Validation(_))));
    }

    #[test]
    fn misuse_errors_abort_the_import() {
        let misuse: BbError = TxError::UnbalancedUnit {
            expected: 2,
            actual: 1,
        }
        .into();
        assert!(is_transaction_fault(&misuse));
        let lost: BbError = TxError::TransactionLost.into();
        assert!(is_transaction_fault(&lost));
        assert!(!is_transaction_fault(&BbError::Validation("x".into())));
        let statement: BbError = TxError::Statement(rusqlite::Error::QueryReturnedNoRows).into();
        assert!(!is_transaction_fault(&statement));
    }
}

// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic reads and topic creation.

use minibb_core::{BbError, PageRequest};
use rusqlite::{Row, params};
use tracing::debug;

use crate::models::{NewPost, NewTopic, Topic};
use crate::querier::Querier;
use crate::queries::{boards, posts};
use crate::tx::TxCoordinator;

fn topic_from_row(row: &Row<'_>) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        author: row.get(3)?,
        pub_date: row.get(4)?,
        status: row.get(5)?,
        last_post_id: row.get(6)?,
        post_count: row.get(7)?,
    })
}

pub fn get_topic<Q: Querier + ?Sized>(q: &Q, id: i64) -> Result<Option<Topic>, BbError> {
    Ok(q.query_row(
        "SELECT id, board_id, title, author, pub_date, status, last_post_id, post_count
         FROM topics WHERE id = ?1",
        params![id],
        topic_from_row,
    )?)
}

/// One page of a board's topics, newest first.
pub fn list_topics_by_board<Q: Querier + ?Sized>(
    q: &Q,
    board_id: i64,
    page: &PageRequest,
) -> Result<Vec<Topic>, BbError> {
    Ok(q.query_rows(
        "SELECT id, board_id, title, author, pub_date, status, last_post_id, post_count
         FROM topics
         WHERE board_id = ?1
         ORDER BY pub_date DESC, id DESC
         LIMIT ?2 OFFSET ?3",
        params![board_id, page.limit(), page.offset()],
        topic_from_row,
    )?)
}

pub fn count_topics_by_board<Q: Querier + ?Sized>(q: &Q, board_id: i64) -> Result<i64, BbError> {
    let count = q.query_row(
        "SELECT COUNT(*) FROM topics WHERE board_id = ?1",
        params![board_id],
        |row| row.get(0),
    )?;
    Ok(count.unwrap_or(0))
}

pub fn most_recent_topic_by_board<Q: Querier + ?Sized>(
    q: &Q,
    board_id: i64,
) -> Result<Option<Topic>, BbError> {
    Ok(q.query_row(
        "SELECT id, board_id, title, author, pub_date, status, last_post_id, post_count
         FROM topics
         WHERE board_id = ?1
         ORDER BY pub_date DESC, id DESC
         LIMIT 1",
        params![board_id],
        topic_from_row,
    )?)
}

/// Create a topic and its opening post as one unit of work.
///
/// The opening post goes through [`posts::create_post`], so it runs as a
/// nested unit under this one.
pub fn create_topic(coord: &mut TxCoordinator<'_>, new: &NewTopic) -> Result<Topic, BbError> {
    new.validate()?;
    coord.run(|tx| {
        if boards::get_board_by_id(tx, new.board_id)?.is_none() {
            return Err(BbError::NotFound {
                entity: "board",
                key: new.board_id.to_string(),
            });
        }

        let topic_id = tx
            .execute(
                "INSERT INTO topics (board_id, title, author) VALUES (?1, ?2, ?3)",
                params![new.board_id, new.title, new.author],
            )?
            .last_insert_id;
        posts::create_post(
            tx,
            &NewPost {
                topic_id,
                author: new.author.clone(),
                content: new.content.clone(),
            },
        )?;
        debug!(topic_id, board_id = new.board_id, "topic created");

        get_topic(tx, topic_id)?
            .ok_or_else(|| BbError::Internal(format!("topic {topic_id} missing after insert")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::migrated;

    fn new_topic(board_id: i64, title: &str) -> NewTopic {
        NewTopic {
            board_id,
            title: title.into(),
            author: "alice".into(),
            content: format!("{title} body"),
        }
    }

    fn topic_count(conn: &rusqlite::Connection) -> i64 {
        Querier::query_row(conn, "SELECT COUNT(*) FROM topics", [], |row| row.get(0))
            .unwrap()
            .unwrap_or(0)
    }

    #[test]
    fn create_topic_writes_topic_and_opening_post() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);

        let topic = create_topic(&mut coord, &new_topic(1, "Hello")).unwrap();
        assert_eq!(topic.title, "Hello");
        assert_eq!(topic.status, "open");
        assert_eq!(topic.post_count, 1);

        let opening = posts::get_post(&conn, topic.last_post_id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(opening.topic_id, topic.id);
        assert_eq!(opening.content, "Hello body");
        assert!(coord.is_idle());
    }

    #[test]
    fn unknown_board_is_not_found_and_writes_nothing() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);

        let err = create_topic(&mut coord, &new_topic(77, "Orphan")).unwrap_err();
        assert!(matches!(err, BbError::NotFound { entity: "board", .. }));
        assert_eq!(topic_count(&conn), 0);
    }

    #[test]
    fn failing_opening_post_rolls_back_the_topic() {
        let conn = migrated();
        // Make the post insert fail after the topic row exists.
        conn.execute_batch(
            "CREATE TRIGGER reject_posts BEFORE INSERT ON posts
             BEGIN SELECT RAISE(ABORT, 'posts are closed'); END;",
        )
        .unwrap();
        let mut coord = TxCoordinator::new(&conn);

        let err = create_topic(&mut coord, &new_topic(1, "Doomed")).unwrap_err();
        assert!(err.to_string().contains("posts are closed"), "{err}");
        assert_eq!(topic_count(&conn), 0);
        assert!(coord.is_idle());
    }

    #[test]
    fn topics_are_listed_newest_first_with_counts() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);
        for title in ["one", "two", "three"] {
            create_topic(&mut coord, &new_topic(1, title)).unwrap();
        }
        create_topic(&mut coord, &new_topic(2, "elsewhere")).unwrap();

        let page = PageRequest { page: 1, per_page: 2 };
        let titles: Vec<_> = list_topics_by_board(&conn, 1, &page)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["three", "two"]);

        let page = PageRequest { page: 2, per_page: 2 };
        let titles: Vec<_> = list_topics_by_board(&conn, 1, &page)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["one"]);

        assert_eq!(count_topics_by_board(&conn, 1).unwrap(), 3);
        assert_eq!(
            most_recent_topic_by_board(&conn, 2).unwrap().map(|t| t.title),
            Some("elsewhere".to_string())
        );
    }

    #[test]
    fn topics_inside_a_failed_outer_unit_disappear() {
        let conn = migrated();
        let mut coord = TxCoordinator::new(&conn);

        let result = coord.run(|tx| -> Result<(), BbError> {
            create_topic(tx, &new_topic(1, "first"))?;
            create_topic(tx, &new_topic(2, "second"))?;
            assert_eq!(topic_count(tx.connection()), 2);
            Err(BbError::Validation("abort".into()))
        });

        assert!(result.is_err());
        assert_eq!(topic_count(&conn), 0);
    }
}

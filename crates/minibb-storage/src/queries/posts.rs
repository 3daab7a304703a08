// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post reads and replies.

use minibb_core::{BbError, PageRequest};
use rusqlite::{Row, params};
use tracing::debug;

use crate::models::{NewPost, Post};
use crate::querier::Querier;
use crate::queries::topics;
use crate::tx::TxCoordinator;

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        author: row.get(2)?,
        content: row.get(3)?,
        pub_date: row.get(4)?,
    })
}

pub fn get_post<Q: Querier + ?Sized>(q: &Q, id: i64) -> Result<Option<Post>, BbError> {
    Ok(q.query_row(
        "SELECT id, topic_id, author, content, pub_date FROM posts WHERE id = ?1",
        params![id],
        post_from_row,
    )?)
}

/// One page of a topic's posts, oldest first.
pub fn list_posts_by_topic<Q: Querier + ?Sized>(
    q: &Q,
    topic_id: i64,
    page: &PageRequest,
) -> Result<Vec<Post>, BbError> {
    Ok(q.query_rows(
        "SELECT id, topic_id, author, content, pub_date FROM posts
         WHERE topic_id = ?1
         ORDER BY pub_date ASC, id ASC
         LIMIT ?2 OFFSET ?3",
        params![topic_id, page.limit(), page.offset()],
        post_from_row,
    )?)
}

pub fn count_posts_by_topic<Q: Querier + ?Sized>(q: &Q, topic_id: i64) -> Result<i64, BbError> {
    let count = q.query_row(
        "SELECT COUNT(*) FROM posts WHERE topic_id = ?1",
        params![topic_id],
        |row| row.get(0),
    )?;
    Ok(count.unwrap_or(0))
}

pub fn most_recent_post_by_topic<Q: Querier + ?Sized>(
    q: &Q,
    topic_id: i64,
) -> Result<Option<Post>, BbError> {
    Ok(q.query_row(
        "SELECT id, topic_id, author, content, pub_date FROM posts
         WHERE topic_id = ?1
         ORDER BY pub_date DESC, id DESC
         LIMIT 1",
        params![topic_id],
        post_from_row,
    )?)
}

/// Latest post across every topic on a board.
pub fn most_recent_post_by_board<Q: Querier + ?Sized>(
    q: &Q,
    board_id: i64,
) -> Result<Option<Post>, BbError> {
    Ok(q.query_row(
        "SELECT p.id, p.topic_id, p.author, p.content, p.pub_date
         FROM posts p JOIN topics t ON t.id = p.topic_id
         WHERE t.board_id = ?1
         ORDER BY p.pub_date DESC, p.id DESC
         LIMIT 1",
        params![board_id],
        post_from_row,
    )?)
}

/// Append a post to a topic and bump the topic's counters, as one unit of work.
pub fn create_post(coord: &mut TxCoordinator<'_>, new: &NewPost) -> Result<Post, BbError> {
    new.validate()?;
    coord.run(|tx| {
        if topics::get_topic(tx, new.topic_id)?.is_none() {
            return Err(BbError::NotFound {
                entity: "topic",
                key: new.topic_id.to_string(),
            });
        }

        let post_id = tx
            .execute(
                "INSERT INTO posts (topic_id, author, content) VALUES (?1, ?2, ?3)",
                params![new.topic_id, new.author, new.content],
            )?
            .last_insert_id;
        tx.execute(
            "UPDATE topics SET last_post_id = ?1, post_count = post_count + 1 WHERE id = ?2",
            params![post_id, new.topic_id],
        )?;
        debug!(post_id, topic_id = new.topic_id, depth = tx.depth(), "post created");

        get_post(tx, post_id)?
            .ok_or_else(|| BbError::Internal(format!("post {post_id} missing after insert")))
    })
}

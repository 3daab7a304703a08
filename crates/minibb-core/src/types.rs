// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage backend and its consumers.
//!
//! Timestamps are kept as the text SQLite produces for `CURRENT_TIMESTAMP`
//! (`YYYY-MM-DD HH:MM:SS`, UTC).

use serde::{Deserialize, Serialize};

use crate::error::BbError;
use crate::pagination::PaginationMeta;

/// A board groups topics under a URL-friendly slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub slug: String,
    pub description: String,
}

/// A discussion thread on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub board_id: i64,
    pub title: String,
    pub author: String,
    pub pub_date: String,
    pub status: String,
    /// Most recent post in the topic; absent only mid-creation.
    pub last_post_id: Option<i64>,
    pub post_count: i64,
}

/// A single message within a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub topic_id: i64,
    pub author: String,
    pub content: String,
    pub pub_date: String,
}

/// Board listing entry with its latest activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardWithRecent {
    #[serde(flatten)]
    pub board: Board,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_topic: Option<Topic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_post: Option<Post>,
}

/// One page of topics for a board.
#[derive(Debug, Clone, Serialize)]
pub struct TopicPage {
    pub board: Board,
    pub topics: Vec<Topic>,
    pub pagination: PaginationMeta,
}

/// One page of posts for a topic.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub topic: Topic,
    pub posts: Vec<Post>,
    pub pagination: PaginationMeta,
}

/// Input for creating a topic together with its opening post.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTopic {
    pub board_id: i64,
    pub title: String,
    pub author: String,
    pub content: String,
}

impl NewTopic {
    /// Reject blank fields before any statement is issued.
    pub fn validate(&self) -> Result<(), BbError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.author.trim().is_empty() {
            missing.push("author");
        }
        if self.content.trim().is_empty() {
            missing.push("content");
        }
        if self.board_id <= 0 {
            missing.push("board_id");
        }
        require(&missing)
    }
}

/// Input for replying to an existing topic.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub topic_id: i64,
    pub author: String,
    pub content: String,
}

impl NewPost {
    /// Reject blank fields before any statement is issued.
    pub fn validate(&self) -> Result<(), BbError> {
        let mut missing = Vec::new();
        if self.topic_id <= 0 {
            missing.push("topic_id");
        }
        if self.author.trim().is_empty() {
            missing.push("author");
        }
        if self.content.trim().is_empty() {
            missing.push("content");
        }
        require(&missing)
    }
}

fn require(missing: &[&str]) -> Result<(), BbError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BbError::Validation(format!(
            "{} required",
            missing.join(", ")
        )))
    }
}

/// A thread in the bulk import format: `[{ board, title, posts: [{ author, content }] }]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedThread {
    pub board: String,
    pub title: String,
    pub posts: Vec<ImportedPost>,
}

/// A post inside an [`ImportedThread`]. The first post opens the topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedPost {
    pub author: String,
    pub content: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Threads committed.
    pub imported: usize,
    /// Posts committed across all imported threads.
    pub posts: usize,
    /// Threads rolled back, in input order.
    pub skipped: Vec<SkippedThread>,
}

/// A thread that failed to import and was rolled back on its own.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedThread {
    /// Position in the input array.
    pub index: usize,
    pub title: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(title: &str, author: &str, content: &str) -> NewTopic {
        NewTopic {
            board_id: 1,
            title: title.to_string(),
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn new_topic_with_all_fields_validates() {
        assert!(topic("Hello", "alice", "first!").validate().is_ok());
    }

    #[test]
    fn new_topic_reports_every_blank_field() {
        let err = topic(" ", "", "body").validate().unwrap_err();
        match err {
            BbError::Validation(msg) => {
                assert!(msg.contains("title"));
                assert!(msg.contains("author"));
                assert!(!msg.contains("content"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn new_post_requires_positive_topic_id() {
        let post = NewPost {
            topic_id: 0,
            author: "bob".into(),
            content: "reply".into(),
        };
        assert!(matches!(post.validate(), Err(BbError::Validation(m)) if m.contains("topic_id")));
    }

    #[test]
    fn board_with_recent_flattens_board_fields() {
        let entry = BoardWithRecent {
            board: Board {
                id: 1,
                slug: "general".into(),
                description: "General discussion".into(),
            },
            recent_topic: None,
            recent_post: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["slug"], "general");
        assert_eq!(json["id"], 1);
        assert!(json.get("recent_topic").is_none());
    }

    #[test]
    fn imported_thread_deserializes_from_populate_format() {
        let json = r#"[{
            "board": "general",
            "title": "Rust vs Go",
            "posts": [
                {"author": "gopher", "content": "Go is simpler"},
                {"author": "ferris!tripcode", "content": "Rust is safer"}
            ]
        }]"#;
        let threads: Vec<ImportedThread> = serde_json::from_str(json).unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].posts.len(), 2);
        assert_eq!(threads[0].posts[1].author, "ferris!tripcode");
    }
}

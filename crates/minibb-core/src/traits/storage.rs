// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for the bulletin board backend.

use async_trait::async_trait;

use crate::error::BbError;
use crate::pagination::PageRequest;
use crate::types::{
    Board, BoardWithRecent, ImportReport, ImportedThread, NewPost, NewTopic, Post, PostPage,
    Topic, TopicPage,
};

/// Persistence backend for boards, topics, and posts.
///
/// Every write method is atomic: it either applies completely or leaves the
/// store untouched.
#[async_trait]
pub trait ForumStorage: Send + Sync {
    /// Opens the backend and brings its schema up to date.
    async fn initialize(&self) -> Result<(), BbError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), BbError>;

    /// All boards in id order, each with its most recent topic and post.
    async fn list_boards_with_recent(&self) -> Result<Vec<BoardWithRecent>, BbError>;

    async fn board_by_slug(&self, slug: &str) -> Result<Option<Board>, BbError>;

    async fn topic(&self, id: i64) -> Result<Option<Topic>, BbError>;

    /// A page of topics on `board_slug`, newest first.
    async fn list_topics(&self, board_slug: &str, page: PageRequest)
    -> Result<TopicPage, BbError>;

    /// A page of posts in `topic_id`, oldest first.
    async fn list_posts(&self, topic_id: i64, page: PageRequest) -> Result<PostPage, BbError>;

    /// Creates a topic and its opening post as one unit.
    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, BbError>;

    /// Appends a post and bumps the topic's counters as one unit.
    async fn create_post(&self, post: NewPost) -> Result<Post, BbError>;

    /// Imports threads in one transaction; a failing thread is rolled back
    /// on its own and reported rather than aborting the whole import.
    async fn import_threads(
        &self,
        threads: Vec<ImportedThread>,
        create_missing_boards: bool,
    ) -> Result<ImportReport, BbError>;
}

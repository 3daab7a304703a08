// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ForumStorage trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use minibb_config::model::StorageConfig;
use minibb_core::{
    BbError, Board, BoardWithRecent, ForumStorage, ImportReport, ImportedThread, NewPost,
    NewTopic, PageRequest, Post, PostPage, Topic, TopicPage,
};

use crate::database::Database;
use crate::queries::{boards, import, posts, topics};

/// SQLite-backed forum storage.
///
/// Wraps a [`Database`] handle and delegates to the query modules. The
/// database is opened lazily by [`ForumStorage::initialize`].
pub struct SqliteForum {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteForum {
    /// The database is not opened until [`ForumStorage::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, BbError> {
        self.db.get().ok_or_else(|| BbError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl ForumStorage for SqliteForum {
    async fn initialize(&self) -> Result<(), BbError> {
        let db = Database::open(&self.config.database_path, &self.config).await?;
        self.db.set(db).map_err(|_| BbError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite forum storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), BbError> {
        self.db()?.checkpoint().await
    }

    async fn list_boards_with_recent(&self) -> Result<Vec<BoardWithRecent>, BbError> {
        self.db()?
            .read(|conn| {
                boards::list_boards(conn)?
                    .into_iter()
                    .map(|board| -> Result<BoardWithRecent, BbError> {
                        Ok(BoardWithRecent {
                            recent_topic: topics::most_recent_topic_by_board(conn, board.id)?,
                            recent_post: posts::most_recent_post_by_board(conn, board.id)?,
                            board,
                        })
                    })
                    .collect()
            })
            .await
    }

    async fn board_by_slug(&self, slug: &str) -> Result<Option<Board>, BbError> {
        let slug = slug.to_string();
        self.db()?
            .read(move |conn| boards::get_board_by_slug(conn, &slug))
            .await
    }

    async fn topic(&self, id: i64) -> Result<Option<Topic>, BbError> {
        self.db()?.read(move |conn| topics::get_topic(conn, id)).await
    }

    async fn list_topics(&self, board_slug: &str, page: PageRequest) -> Result<TopicPage, BbError> {
        let slug = board_slug.to_string();
        self.db()?
            .read(move |conn| {
                let board = boards::get_board_by_slug(conn, &slug)?.ok_or(BbError::NotFound {
                    entity: "board",
                    key: slug.clone(),
                })?;
                let topics = topics::list_topics_by_board(conn, board.id, &page)?;
                let total = topics::count_topics_by_board(conn, board.id)?;
                Ok(TopicPage {
                    board,
                    topics,
                    pagination: page.meta(total),
                })
            })
            .await
    }

    async fn list_posts(&self, topic_id: i64, page: PageRequest) -> Result<PostPage, BbError> {
        self.db()?
            .read(move |conn| {
                let topic = topics::get_topic(conn, topic_id)?.ok_or(BbError::NotFound {
                    entity: "topic",
                    key: topic_id.to_string(),
                })?;
                let posts = posts::list_posts_by_topic(conn, topic_id, &page)?;
                let total = posts::count_posts_by_topic(conn, topic_id)?;
                Ok(PostPage {
                    topic,
                    posts,
                    pagination: page.meta(total),
                })
            })
            .await
    }

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, BbError> {
        self.db()?
            .transact(move |tx| topics::create_topic(tx, &topic))
            .await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, BbError> {
        self.db()?
            .transact(move |tx| posts::create_post(tx, &post))
            .await
    }

    async fn import_threads(
        &self,
        threads: Vec<ImportedThread>,
        create_missing_boards: bool,
    ) -> Result<ImportReport, BbError> {
        self.db()?
            .transact(move |tx| import::import_threads(tx, &threads, create_missing_boards))
            .await
    }
}

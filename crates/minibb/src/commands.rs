// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Each opens the configured store, runs one
//! operation, and returns its result as JSON.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use minibb_config::MinibbConfig;
use minibb_core::{BbError, ForumStorage, NewPost, NewTopic, PageRequest};
use minibb_storage::SqliteForum;
use minibb_storage::queries::import::parse_threads;

use crate::Commands;

pub async fn execute(command: Commands, config: &MinibbConfig) -> Result<Value, BbError> {
    let forum = SqliteForum::new(config.storage.clone());
    forum.initialize().await?;
    let output = dispatch(&forum, command, config).await;
    settle(output, forum.close().await)
}

/// Combines a command's result with the result of closing the store.
/// A failed command keeps its own error; a close failure behind it is only logged.
fn settle(output: Result<Value, BbError>, closed: Result<(), BbError>) -> Result<Value, BbError> {
    match (output, closed) {
        (output, Ok(())) => output,
        (Ok(_), Err(close)) => Err(close),
        (Err(err), Err(close)) => {
            warn!(error = %close, "closing the database failed after the command failed");
            Err(err)
        }
    }
}

async fn dispatch(
    forum: &SqliteForum,
    command: Commands,
    config: &MinibbConfig,
) -> Result<Value, BbError> {
    let limits = config.pagination.limits();
    match command {
        Commands::Migrate => Ok(json!({
            "status": "ok",
            "database": config.storage.database_path,
        })),
        Commands::Boards => to_json(&forum.list_boards_with_recent().await?),
        Commands::Topics {
            slug,
            page,
            per_page,
        } => {
            let request = PageRequest::parse(page, per_page, limits);
            to_json(&forum.list_topics(&slug, request).await?)
        }
        Commands::Posts {
            topic_id,
            page,
            per_page,
        } => {
            let request = PageRequest::parse(page, per_page, limits);
            to_json(&forum.list_posts(topic_id, request).await?)
        }
        Commands::NewTopic {
            slug,
            title,
            author,
            content,
        } => {
            let board = forum
                .board_by_slug(&slug)
                .await?
                .ok_or(BbError::NotFound {
                    entity: "board",
                    key: slug,
                })?;
            let topic = forum
                .create_topic(NewTopic {
                    board_id: board.id,
                    title,
                    author,
                    content,
                })
                .await?;
            info!(topic_id = topic.id, board = %board.slug, "topic created");
            to_json(&topic)
        }
        Commands::Reply {
            topic_id,
            author,
            content,
        } => {
            let post = forum
                .create_post(NewPost {
                    topic_id,
                    author,
                    content,
                })
                .await?;
            to_json(&post)
        }
        Commands::Import {
            file,
            create_boards,
        } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| BbError::Validation(format!("cannot read {}: {e}", file.display())))?;
            let threads = parse_threads(&raw)?;
            let create_missing = create_boards || config.import.create_missing_boards;
            to_json(&forum.import_threads(threads, create_missing).await?)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, BbError> {
    serde_json::to_value(value).map_err(|e| BbError::Internal(format!("serialize output: {e}")))
}

// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the MiniBB bulletin board.
//!
//! This crate provides the error type, the board/topic/post domain types,
//! pagination arithmetic, and the storage trait that the SQLite backend
//! implements. It has no database dependency of its own.

pub mod error;
pub mod pagination;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BbError;
pub use pagination::{PageLimits, PageRequest, PaginationMeta};
pub use traits::ForumStorage;
pub use types::{
    Board, BoardWithRecent, ImportReport, ImportedPost, ImportedThread, NewPost, NewTopic, Post,
    PostPage, SkippedThread, Topic, TopicPage,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bb_error_has_all_variants() {
        let _config = BbError::Config("test".into());
        let _storage = BbError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _not_found = BbError::NotFound {
            entity: "board",
            key: "general".into(),
        };
        let _validation = BbError::Validation("test".into());
        let _internal = BbError::Internal("test".into());
    }

    #[test]
    fn client_errors_are_distinguished_from_data_layer_faults() {
        assert!(BbError::Validation("title is required".into()).is_client_error());
        assert!(
            BbError::NotFound {
                entity: "topic",
                key: "7".into()
            }
            .is_client_error()
        );
        assert!(
            !BbError::Storage {
                source: Box::new(std::io::Error::other("disk full")),
            }
            .is_client_error()
        );
        assert!(!BbError::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn forum_storage_is_object_safe() {
        fn _assert_object_safe(_: &dyn ForumStorage) {}
    }
}

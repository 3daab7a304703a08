// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `minibb_core::types` so the storage trait can
//! name them; they are re-exported here for use within the storage crate.

pub use minibb_core::types::{
    Board, BoardWithRecent, ImportReport, ImportedPost, ImportedThread, NewPost, NewTopic, Post,
    SkippedThread, Topic,
};

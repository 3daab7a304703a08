// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend traits implemented by storage crates.

pub mod storage;

pub use storage::ForumStorage;

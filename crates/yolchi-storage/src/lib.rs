// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite storage for Yolchi.
//!
//! Provides the read-only driver registry over the registry tables and the
//! key-value state store that holds campaign documents.

pub mod database;
pub mod documents;
pub mod migrations;
pub mod queries;
pub mod registry;
pub mod state;

pub use database::Database;
pub use documents::DocumentStore;
pub use registry::SqliteDriverRegistry;
pub use state::{MemoryStateStore, SqliteStateStore, state_store_for};

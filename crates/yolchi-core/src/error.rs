// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Yolchi campaign service.

use thiserror::Error;

/// The primary error type shared by the registry, state store and report services.
#[derive(Debug, Error)]
pub enum YolchiError {
    /// Configuration errors (invalid values detected after loading).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A campaign document could not be serialized for writing.
    #[error("document `{key}` could not be encoded: {source}")]
    Document {
        key: String,
        source: serde_json::Error,
    },

    /// Caller supplied an unusable request (missing field, bad date range).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl YolchiError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        YolchiError::Storage {
            source: Box::new(err),
        }
    }

    /// Shorthand for [`YolchiError::NotFound`].
    pub fn not_found(kind: &str, id: impl Into<String>) -> Self {
        YolchiError::NotFound {
            kind: kind.to_string(),
            id: id.into(),
        }
    }
}

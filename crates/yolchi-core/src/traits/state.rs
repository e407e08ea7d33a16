// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store holding campaign documents as raw JSON strings.

use async_trait::async_trait;

use crate::error::YolchiError;

/// Raw string storage keyed by fixed document keys.
///
/// Writes replace the whole value; there is no patch or compare-and-swap.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Stored value for `key`, or `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, YolchiError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), YolchiError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), YolchiError>;
}

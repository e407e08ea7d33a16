// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned campaign documents persisted through a [`StateStore`](super::StateStore).

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A JSON document stored wholesale under a fixed key.
///
/// Stored form is an envelope `{"version": n, "data": ...}`. Values written
/// before the envelope existed are read as version 0 and passed to
/// [`Document::migrate`]. Anything that cannot be read yields `Default`.
pub trait Document: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Fixed state-store key.
    const KEY: &'static str;

    /// Current schema version written on save.
    const VERSION: u32 = 1;

    /// Upgrade a payload written at an older `version`.
    fn migrate(version: u32, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        let _ = version;
        serde_json::from_value(data)
    }
}

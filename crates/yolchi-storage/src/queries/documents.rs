// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw key-value access to the `campaign_documents` table.

use rusqlite::{OptionalExtension, params};
use yolchi_core::YolchiError;

use crate::database::{Database, map_tr_err};

/// Stored value for `key`, if any.
pub async fn get_document(db: &Database, key: &str) -> Result<Option<String>, YolchiError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM campaign_documents WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok::<_, rusqlite::Error>(value)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace the value stored under `key`.
pub async fn put_document(db: &Database, key: &str, value: &str) -> Result<(), YolchiError> {
    let key = key.to_string();
    let value = value.to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaign_documents (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove `key`; returns whether a row existed.
pub async fn delete_document(db: &Database, key: &str) -> Result<bool, YolchiError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM campaign_documents WHERE key = ?1",
                params![key],
            )?;
            Ok::<_, rusqlite::Error>(removed > 0)
        })
        .await
        .map_err(map_tr_err)
}

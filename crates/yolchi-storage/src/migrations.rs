// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied on
//! every open; refinery records progress in `refinery_schema_history`.

use tracing::debug;
use yolchi_core::YolchiError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), YolchiError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(YolchiError::storage)?;
    for migration in report.applied_migrations() {
        debug!(migration = %migration, "migration applied");
    }
    Ok(())
}

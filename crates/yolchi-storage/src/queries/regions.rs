// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Region and sub-region lookups for filter pickers.

use rusqlite::params;
use yolchi_core::{Region, SubRegion, YolchiError};

use crate::database::{Database, map_tr_err};

pub async fn list_regions(db: &Database) -> Result<Vec<Region>, YolchiError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM regions ORDER BY name, id")?;
            let rows = stmt.query_map([], |row| {
                Ok(Region {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?;
            let regions = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, rusqlite::Error>(regions)
        })
        .await
        .map_err(map_tr_err)
}

/// Sub-regions by name; `None` lists every region's.
pub async fn list_sub_regions(
    db: &Database,
    region_id: Option<&str>,
) -> Result<Vec<SubRegion>, YolchiError> {
    let region_id = region_id.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, region_id FROM sub_regions \
                 WHERE ?1 IS NULL OR region_id = ?1 ORDER BY name, id",
            )?;
            let rows = stmt.query_map(params![region_id], |row| {
                Ok(SubRegion {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    region_id: row.get(2)?,
                })
            })?;
            let sub_regions = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, rusqlite::Error>(sub_regions)
        })
        .await
        .map_err(map_tr_err)
}

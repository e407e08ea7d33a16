// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grouped registration counts (status, local day, departure sub-region,
//! route region).

use rusqlite::types::Type;
use rusqlite::{Row, params_from_iter};
use yolchi_core::{
    DailyStats, DriverFilter, DriverStatus, RegionStats, StatusSummary, SubRegionStats,
    YolchiError,
};

use crate::database::{Database, map_tr_err};
use crate::queries::drivers::{Binds, FROM_DRIVERS, where_clause};

/// Id and label reported for drivers without a departure sub-region.
pub const UNKNOWN_SUB_REGION_ID: &str = "0";
pub const UNKNOWN_SUB_REGION_NAME: &str = "Noma'lum";

const STATUS_COLUMNS: &str = "SUM(c.status = 'pending'), SUM(c.status = 'active'), \
     SUM(c.status = 'inactive'), SUM(c.status = 'blocked'), COUNT(*)";

fn count(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let n: Option<i64> = row.get(idx)?;
    Ok(n.and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
}

/// Read the five [`STATUS_COLUMNS`] starting at `first`.
fn summary_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<StatusSummary> {
    Ok(StatusSummary {
        pending: count(row, first)?,
        active: count(row, first + 1)?,
        inactive: count(row, first + 2)?,
        blocked: count(row, first + 3)?,
        total: count(row, first + 4)?,
    })
}

/// SQLite date modifier for a whole-hour offset, e.g. `+5 hours`.
pub(crate) fn offset_modifier(utc_offset_hours: i32) -> String {
    format!("{utc_offset_hours:+} hours")
}

/// Per-status counts of rows matching the filter.
pub async fn status_summary(
    db: &Database,
    filter: &DriverFilter,
) -> Result<StatusSummary, YolchiError> {
    let mut binds = Binds::default();
    let where_sql = where_clause(filter, &mut binds);
    let sql = format!("SELECT c.status, COUNT(*) {FROM_DRIVERS} {where_sql} GROUP BY c.status");
    let values = binds.into_values();

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                let status: String = row.get(0)?;
                let status = status.parse::<DriverStatus>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })?;
                Ok((status, count(row, 1)?))
            })?;
            let mut summary = StatusSummary::default();
            for row in rows {
                let (status, n) = row?;
                match status {
                    DriverStatus::Pending => summary.pending = n,
                    DriverStatus::Active => summary.active = n,
                    DriverStatus::Inactive => summary.inactive = n,
                    DriverStatus::Blocked => summary.blocked = n,
                }
                summary.total += n;
            }
            Ok::<_, rusqlite::Error>(summary)
        })
        .await
        .map_err(map_tr_err)
}

/// Per local-day counts, oldest day first.
pub async fn daily_breakdown(
    db: &Database,
    filter: &DriverFilter,
    utc_offset_hours: i32,
) -> Result<Vec<DailyStats>, YolchiError> {
    let mut binds = Binds::default();
    let modifier = binds.bind(offset_modifier(utc_offset_hours));
    let where_sql = where_clause(filter, &mut binds);
    let sql = format!(
        "SELECT date(c.created_at, {modifier}) AS day, {STATUS_COLUMNS} \
         {FROM_DRIVERS} {where_sql} GROUP BY day ORDER BY day"
    );
    let values = binds.into_values();

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                Ok(DailyStats {
                    date: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    counts: summary_from_row(row, 1)?,
                })
            })?;
            let days = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, rusqlite::Error>(days)
        })
        .await
        .map_err(map_tr_err)
}

/// Per departure sub-region counts, largest first.
pub async fn sub_region_breakdown(
    db: &Database,
    filter: &DriverFilter,
) -> Result<Vec<SubRegionStats>, YolchiError> {
    let mut binds = Binds::default();
    let unknown_id = binds.bind(UNKNOWN_SUB_REGION_ID);
    let unknown_name = binds.bind(UNKNOWN_SUB_REGION_NAME);
    let where_sql = where_clause(filter, &mut binds);
    let sql = format!(
        "SELECT COALESCE(dsr.id, {unknown_id}), COALESCE(dsr.name, {unknown_name}), {STATUS_COLUMNS} \
         {FROM_DRIVERS} LEFT JOIN sub_regions dsr ON dsr.id = di.departure_sub_region_id \
         {where_sql} GROUP BY dsr.id, dsr.name ORDER BY COUNT(*) DESC, 1"
    );
    let values = binds.into_values();

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                Ok(SubRegionStats {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    counts: summary_from_row(row, 2)?,
                })
            })?;
            let regions = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, rusqlite::Error>(regions)
        })
        .await
        .map_err(map_tr_err)
}

/// Per route region counts, skipping `excluded_region_id`.
///
/// Each driver is counted once per distinct region among its departure and
/// arrival, so the totals can exceed the number of drivers.
pub async fn region_breakdown(
    db: &Database,
    filter: &DriverFilter,
    excluded_region_id: &str,
) -> Result<Vec<RegionStats>, YolchiError> {
    let mut binds = Binds::default();
    let where_sql = where_clause(filter, &mut binds);
    let excluded = binds.bind(excluded_region_id);
    let where_sql = if where_sql.is_empty() {
        format!("WHERE rr.id <> {excluded}")
    } else {
        format!("{where_sql} AND rr.id <> {excluded}")
    };
    let sql = format!(
        "SELECT dr.region_id, dr.region_name, \
         SUM(dr.status = 'pending'), SUM(dr.status = 'active'), \
         SUM(dr.status = 'inactive'), SUM(dr.status = 'blocked'), COUNT(*) \
         FROM (SELECT DISTINCT c.id AS customer_id, c.status AS status, \
               rr.id AS region_id, rr.name AS region_name \
               {FROM_DRIVERS} \
               JOIN regions rr ON rr.id IN (di.departure_region_id, di.arrival_region_id) \
               {where_sql}) dr \
         GROUP BY dr.region_id, dr.region_name \
         ORDER BY SUM(dr.status = 'active') DESC, COUNT(*) DESC, dr.region_name"
    );
    let values = binds.into_values();

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                Ok(RegionStats {
                    region_id: row.get(0)?,
                    region_name: row.get(1)?,
                    counts: summary_from_row(row, 2)?,
                })
            })?;
            let regions = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, rusqlite::Error>(regions)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_modifier_is_signed() {
        assert_eq!(offset_modifier(5), "+5 hours");
        assert_eq!(offset_modifier(-3), "-3 hours");
        assert_eq!(offset_modifier(0), "+0 hours");
    }
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver list queries assembled from a [`DriverFilter`].
//!
//! Every caller-supplied value is bound as a parameter. List-valued filters
//! bind one JSON array and expand it with `json_each`; only the whitelisted
//! sort column and the numeric page window are formatted into the SQL text.

use rusqlite::types::Type;
use rusqlite::{Row, params_from_iter};
use serde::Deserialize;
use yolchi_core::types::{Ordering, RouteScope, SortKey, SortOrder, StatusScope};
use yolchi_core::{Driver, DriverFilter, DriverStatus, InactiveReason, Route, YolchiError};

use crate::database::{Database, map_tr_err};

/// Joins shared by every driver query.
pub(crate) const FROM_DRIVERS: &str = "FROM customers c \
     LEFT JOIN driver_infos di ON di.customer_id = c.id \
     LEFT JOIN regions r ON r.id = di.region_id \
     LEFT JOIN sub_regions sr ON sr.id = di.sub_region_id";

/// Positional parameters collected while building a statement.
#[derive(Debug, Default)]
pub(crate) struct Binds {
    values: Vec<String>,
}

impl Binds {
    /// Push a value and return its `?N` placeholder.
    pub(crate) fn bind(&mut self, value: impl Into<String>) -> String {
        self.values.push(value.into());
        format!("?{}", self.values.len())
    }

    /// Bind a list as a JSON array and return a subquery over its elements.
    pub(crate) fn bind_list<S: AsRef<str>>(&mut self, values: &[S]) -> String {
        let array = serde_json::Value::from(
            values
                .iter()
                .map(|v| v.as_ref().to_string())
                .collect::<Vec<_>>(),
        );
        let placeholder = self.bind(array.to_string());
        format!("(SELECT value FROM json_each({placeholder}))")
    }

    pub(crate) fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// Build the `WHERE` clause for a filter (empty string when unrestricted).
pub(crate) fn where_clause(filter: &DriverFilter, binds: &mut Binds) -> String {
    let mut conditions: Vec<String> = Vec::new();

    if let Some(role) = &filter.role_id {
        conditions.push(format!("c.role_id = {}", binds.bind(role.clone())));
    }

    match &filter.status {
        StatusScope::Any => {}
        StatusScope::In(statuses) => {
            let names: Vec<String> = statuses.iter().map(ToString::to_string).collect();
            conditions.push(format!("c.status IN {}", binds.bind_list(&names)));
        }
        StatusScope::InOrTrackedActive {
            statuses,
            tracked_ids,
        } => {
            let names: Vec<String> = statuses.iter().map(ToString::to_string).collect();
            let status_list = binds.bind_list(&names);
            let id_list = binds.bind_list(tracked_ids);
            conditions.push(format!(
                "(c.status IN {status_list} OR (c.status = 'active' AND c.id IN {id_list}))"
            ));
        }
    }

    if let Some(from) = filter.created_from {
        conditions.push(format!("c.created_at >= {}", binds.bind(from.to_string())));
    }
    if let Some(before) = filter.created_before {
        conditions.push(format!("c.created_at < {}", binds.bind(before.to_string())));
    }
    if let Some(to) = filter.created_to.and_then(|d| d.succ_opt()) {
        conditions.push(format!("c.created_at < {}", binds.bind(to.to_string())));
    }

    if let Some(region) = &filter.region_id {
        conditions.push(format!("di.region_id = {}", binds.bind(region.clone())));
    }
    if let Some(sub_region) = &filter.sub_region_id {
        conditions.push(format!("di.sub_region_id = {}", binds.bind(sub_region.clone())));
    }

    match &filter.route {
        None => {}
        Some(RouteScope::Corridor(corridor)) => {
            conditions.push(route_pair(binds, &corridor.region_id, &corridor.city_id));
        }
        Some(RouteScope::CorridorOrHome {
            corridor,
            home_region_id,
        }) => {
            let pair = route_pair(binds, &corridor.region_id, &corridor.city_id);
            let home = binds.bind(home_region_id.clone());
            conditions.push(format!("({pair} OR di.region_id = {home})"));
        }
        Some(RouteScope::PairedWithCity { region_id, city_id }) => {
            conditions.push(route_pair(binds, region_id, city_id));
        }
    }

    if !filter.source_tags.is_empty() {
        conditions.push(format!(
            "c.register_sources_comment IN {}",
            binds.bind_list(&filter.source_tags)
        ));
    }

    if filter.require_phone {
        conditions.push("c.phone_number IS NOT NULL AND c.phone_number <> ''".to_string());
    }
    if filter.require_profile {
        conditions.push("di.customer_id IS NOT NULL".to_string());
    }

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Route runs a -> b or b -> a.
fn route_pair(binds: &mut Binds, a: &str, b: &str) -> String {
    let a = binds.bind(a);
    let b = binds.bind(b);
    format!(
        "((di.departure_region_id = {a} AND di.arrival_region_id = {b}) \
         OR (di.departure_region_id = {b} AND di.arrival_region_id = {a}))"
    )
}

fn order_clause(ordering: Ordering) -> String {
    match ordering {
        Ordering::StatusThenNewest => "ORDER BY c.status DESC, c.created_at DESC, c.id".to_string(),
        Ordering::By(key, order) => {
            let column = match key {
                SortKey::CreatedAt => "c.created_at",
                SortKey::Status => "c.status",
                SortKey::FirstName => "c.first_name",
                SortKey::LastName => "c.last_name",
                SortKey::RegionName => "r.name",
                SortKey::SubRegionName => "sr.name",
            };
            let dir = match order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            format!("ORDER BY {column} {dir}, c.id")
        }
    }
}

#[derive(Deserialize)]
struct StoredReason {
    reason_id: String,
    reason_title: String,
}

/// Column index of the `inactive_reasons` JSON array in [`list_drivers`].
const REASONS_COLUMN: usize = 16;

fn driver_from_row(row: &Row<'_>, fixable: &[String]) -> rusqlite::Result<Driver> {
    let status: String = row.get(5)?;
    let status = status
        .parse::<DriverStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let reasons_json: String = row.get(REASONS_COLUMN)?;
    let stored: Vec<StoredReason> = serde_json::from_str(&reasons_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(REASONS_COLUMN, Type::Text, Box::new(e))
    })?;
    let inactive_reasons = stored
        .into_iter()
        .map(|r| InactiveReason {
            is_fixable: fixable.contains(&r.reason_id),
            reason_id: r.reason_id,
            reason_title: r.reason_title,
        })
        .collect();

    Ok(Driver {
        id: row.get(0)?,
        role_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone_number: row.get(4)?,
        status,
        created_at: row.get(6)?,
        source_tag: row.get(7)?,
        region_id: row.get(8)?,
        region_name: row.get(9)?,
        sub_region_id: row.get(10)?,
        sub_region_name: row.get(11)?,
        route: Route {
            departure_region_id: row.get(12)?,
            departure_sub_region_id: row.get(13)?,
            arrival_region_id: row.get(14)?,
            arrival_sub_region_id: row.get(15)?,
        },
        inactive_reasons,
    })
}

/// Rows matching the filter in its ordering and page window.
pub async fn list_drivers(db: &Database, filter: &DriverFilter) -> Result<Vec<Driver>, YolchiError> {
    let mut binds = Binds::default();

    let reasons = if filter.reason_ids.is_empty() {
        "'[]'".to_string()
    } else {
        let ids = binds.bind_list(&filter.reason_ids);
        format!(
            "(SELECT json_group_array(json_object('reason_id', rs.id, 'reason_title', rs.title)) \
               FROM customer_moderation_reasons cmr \
               JOIN reasons rs ON rs.id = cmr.reason_id \
              WHERE cmr.customer_id = c.id AND rs.id IN {ids})"
        )
    };
    let where_sql = where_clause(filter, &mut binds);
    let order_sql = order_clause(filter.ordering);
    let page_sql = filter
        .page
        .map(|p| format!("LIMIT {} OFFSET {}", p.limit, p.offset()))
        .unwrap_or_default();

    let sql = format!(
        "SELECT c.id, c.role_id, c.first_name, c.last_name, c.phone_number, c.status, \
                c.created_at, c.register_sources_comment, di.region_id, r.name, \
                di.sub_region_id, sr.name, di.departure_region_id, di.departure_sub_region_id, \
                di.arrival_region_id, di.arrival_sub_region_id, {reasons} \
         {FROM_DRIVERS} {where_sql} {order_sql} {page_sql}"
    );
    let values = binds.into_values();
    let fixable = filter.fixable_reason_ids.clone();

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                driver_from_row(row, &fixable)
            })?;
            let drivers = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, rusqlite::Error>(drivers)
        })
        .await
        .map_err(map_tr_err)
}

/// Number of rows matching the filter, ignoring its page window.
pub async fn count_drivers(db: &Database, filter: &DriverFilter) -> Result<u64, YolchiError> {
    let mut binds = Binds::default();
    let where_sql = where_clause(filter, &mut binds);
    let sql = format!("SELECT COUNT(*) {FROM_DRIVERS} {where_sql}");
    let values = binds.into_values();

    db.connection()
        .call(move |conn| {
            let total: i64 =
                conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
            Ok::<_, rusqlite::Error>(u64::try_from(total).unwrap_or(0))
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use yolchi_core::Corridor;

    #[test]
    fn unrestricted_filter_has_no_where() {
        let mut binds = Binds::default();
        assert_eq!(where_clause(&DriverFilter::default(), &mut binds), "");
        assert!(binds.into_values().is_empty());
    }

    #[test]
    fn placeholders_follow_bind_order() {
        let filter = DriverFilter {
            role_id: Some("2".into()),
            status: StatusScope::In(vec![DriverStatus::Active]),
            created_from: NaiveDate::from_ymd_opt(2026, 1, 26),
            route: Some(RouteScope::Corridor(Corridor::new("9", "2"))),
            ..DriverFilter::default()
        };
        let mut binds = Binds::default();
        let sql = where_clause(&filter, &mut binds);

        assert!(sql.starts_with("WHERE c.role_id = ?1 AND c.status IN (SELECT value FROM json_each(?2))"));
        assert!(sql.contains("c.created_at >= ?3"));
        assert!(sql.contains("di.departure_region_id = ?4 AND di.arrival_region_id = ?5"));
        assert_eq!(
            binds.into_values(),
            vec!["2", "[\"active\"]", "2026-01-26", "9", "2"]
        );
    }

    #[test]
    fn inclusive_end_date_binds_next_day() {
        let filter = DriverFilter {
            created_to: NaiveDate::from_ymd_opt(2026, 1, 31),
            ..DriverFilter::default()
        };
        let mut binds = Binds::default();
        let sql = where_clause(&filter, &mut binds);
        assert_eq!(sql, "WHERE c.created_at < ?1");
        assert_eq!(binds.into_values(), vec!["2026-02-01"]);
    }

    #[test]
    fn profile_requirement_needs_no_bind() {
        let filter = DriverFilter {
            require_profile: true,
            ..DriverFilter::default()
        };
        let mut binds = Binds::default();
        assert_eq!(
            where_clause(&filter, &mut binds),
            "WHERE di.customer_id IS NOT NULL"
        );
        assert!(binds.into_values().is_empty());
    }

    #[test]
    fn sort_uses_whitelisted_columns() {
        assert_eq!(
            order_clause(Ordering::By(SortKey::RegionName, SortOrder::Asc)),
            "ORDER BY r.name ASC, c.id"
        );
        assert!(order_clause(Ordering::StatusThenNewest).starts_with("ORDER BY c.status DESC"));
    }
}

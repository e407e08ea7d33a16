// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry row types and query filters shared across Yolchi crates.
//!
//! Registry rows keep the snake_case field names of the underlying tables;
//! aggregated report types live in the crates that compute them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Moderation status of a registry account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Pending,
    Active,
    Inactive,
    Blocked,
}

impl DriverStatus {
    /// All statuses in display order.
    pub const ALL: [DriverStatus; 4] = [
        DriverStatus::Pending,
        DriverStatus::Active,
        DriverStatus::Inactive,
        DriverStatus::Blocked,
    ];
}

/// Returns true when the first-name field marks a completed profile.
///
/// A bare login leaves the name empty; whitespace-only names count as empty.
pub fn has_full_profile(first_name: Option<&str>) -> bool {
    first_name.is_some_and(|name| !name.trim().is_empty())
}

/// Habitual route of a driver (region identifiers from the lookup table).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub departure_region_id: Option<String>,
    pub departure_sub_region_id: Option<String>,
    pub arrival_region_id: Option<String>,
    pub arrival_sub_region_id: Option<String>,
}

/// The fixed two-region pair (province and its principal city) used as the route filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub region_id: String,
    pub city_id: String,
}

impl Corridor {
    pub fn new(region_id: impl Into<String>, city_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            city_id: city_id.into(),
        }
    }

    /// True when the route runs region -> city or city -> region.
    pub fn contains(&self, route: &Route) -> bool {
        let (Some(dep), Some(arr)) = (
            route.departure_region_id.as_deref(),
            route.arrival_region_id.as_deref(),
        ) else {
            return false;
        };
        (dep == self.region_id && arr == self.city_id)
            || (dep == self.city_id && arr == self.region_id)
    }
}

/// An inactivity reason attached to a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveReason {
    pub reason_id: String,
    pub reason_title: String,
    pub is_fixable: bool,
}

/// A registry row (customer joined with its driver profile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub role_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: DriverStatus,
    /// ISO 8601 UTC timestamp.
    pub created_at: String,
    /// Acquisition-source tag written at registration.
    pub source_tag: Option<String>,
    pub region_id: Option<String>,
    pub region_name: Option<String>,
    pub sub_region_id: Option<String>,
    pub sub_region_name: Option<String>,
    #[serde(flatten)]
    pub route: Route,
    #[serde(default)]
    pub inactive_reasons: Vec<InactiveReason>,
}

impl Driver {
    pub fn is_fully_registered(&self) -> bool {
        has_full_profile(self.first_name.as_deref())
    }

    /// "First Last" with empty parts dropped; `None` when both are blank.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// UTC registration date taken from the `created_at` prefix.
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.get(..10)?.parse().ok()
    }

    pub fn registered_since(&self, date: NaiveDate) -> bool {
        self.created_date().is_some_and(|d| d >= date)
    }
}

/// Which statuses a driver query admits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusScope {
    #[default]
    Any,
    In(Vec<DriverStatus>),
    /// Listed statuses, plus `active` rows whose id is in `tracked_ids`.
    InOrTrackedActive {
        statuses: Vec<DriverStatus>,
        tracked_ids: Vec<String>,
    },
}

/// Route restriction for a driver query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteScope {
    /// Route matches the corridor in either direction.
    Corridor(Corridor),
    /// Route matches the corridor, or the home region equals `home_region_id`.
    CorridorOrHome {
        corridor: Corridor,
        home_region_id: String,
    },
    /// Route pairs `region_id` with the corridor city in either direction.
    PairedWithCity { region_id: String, city_id: String },
}

/// Sortable columns of the driver list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Status,
    FirstName,
    LastName,
    RegionName,
    SubRegionName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Ordering applied to a driver query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    By(SortKey, SortOrder),
    /// Status descending, then newest first.
    StatusThenNewest,
}

impl Default for Ordering {
    fn default() -> Self {
        Ordering::By(SortKey::CreatedAt, SortOrder::Desc)
    }
}

/// Page window, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Parameterized driver query. Every field narrows the result; defaults admit all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverFilter {
    pub role_id: Option<String>,
    pub status: StatusScope,
    /// Registered on or after this UTC date.
    pub created_from: Option<NaiveDate>,
    /// Registered strictly before this UTC date.
    pub created_before: Option<NaiveDate>,
    /// Registered on or before this UTC date (inclusive whole day).
    pub created_to: Option<NaiveDate>,
    pub region_id: Option<String>,
    pub sub_region_id: Option<String>,
    pub route: Option<RouteScope>,
    pub source_tags: Vec<String>,
    pub require_phone: bool,
    /// Only accounts with a driver profile row.
    pub require_profile: bool,
    /// Reason ids to attach as `inactive_reasons`; empty attaches none.
    pub reason_ids: Vec<String>,
    /// Subset of `reason_ids` classified as fixable.
    pub fixable_reason_ids: Vec<String>,
    pub ordering: Ordering,
    pub page: Option<PageRequest>,
}

impl DriverFilter {
    /// Filter restricted to accounts with the given role.
    pub fn role(role_id: impl Into<String>) -> Self {
        Self {
            role_id: Some(role_id.into()),
            ..Self::default()
        }
    }
}

/// Per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub pending: u64,
    pub active: u64,
    pub inactive: u64,
    pub blocked: u64,
    pub total: u64,
}

impl StatusSummary {
    pub fn record(&mut self, status: DriverStatus) {
        match status {
            DriverStatus::Pending => self.pending += 1,
            DriverStatus::Active => self.active += 1,
            DriverStatus::Inactive => self.inactive += 1,
            DriverStatus::Blocked => self.blocked += 1,
        }
        self.total += 1;
    }

    pub fn get(&self, status: DriverStatus) -> u64 {
        match status {
            DriverStatus::Pending => self.pending,
            DriverStatus::Active => self.active,
            DriverStatus::Inactive => self.inactive,
            DriverStatus::Blocked => self.blocked,
        }
    }
}

impl FromIterator<DriverStatus> for StatusSummary {
    fn from_iter<I: IntoIterator<Item = DriverStatus>>(iter: I) -> Self {
        let mut summary = StatusSummary::default();
        for status in iter {
            summary.record(status);
        }
        summary
    }
}

/// Registrations per local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    #[serde(flatten)]
    pub counts: StatusSummary,
}

/// Registrations per departure sub-region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRegionStats {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub counts: StatusSummary,
}

/// Registrations per route region, counting a driver once for each distinct
/// region on its route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    pub region_id: String,
    pub region_name: String,
    #[serde(flatten)]
    pub counts: StatusSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRegion {
    pub id: String,
    pub name: String,
    pub region_id: String,
}

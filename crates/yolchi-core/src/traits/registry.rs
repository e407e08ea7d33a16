// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only access to the driver registry.

use async_trait::async_trait;

use crate::error::YolchiError;
use crate::types::{
    DailyStats, Driver, DriverFilter, Region, RegionStats, StatusSummary, SubRegion,
    SubRegionStats,
};

/// Query interface over the relational driver registry.
///
/// Implementations never write: moderation workflows own the rows, this
/// service only reads point-in-time snapshots.
#[async_trait]
pub trait DriverRegistry: Send + Sync {
    /// Rows matching the filter, in the filter's ordering and page window.
    async fn list_drivers(&self, filter: &DriverFilter) -> Result<Vec<Driver>, YolchiError>;

    /// Number of rows matching the filter, ignoring its page window.
    async fn count_drivers(&self, filter: &DriverFilter) -> Result<u64, YolchiError>;

    /// Per-status counts of rows matching the filter.
    async fn status_summary(&self, filter: &DriverFilter) -> Result<StatusSummary, YolchiError>;

    /// Per-day counts, days taken in local time at `utc_offset_hours`, oldest first.
    async fn daily_breakdown(
        &self,
        filter: &DriverFilter,
        utc_offset_hours: i32,
    ) -> Result<Vec<DailyStats>, YolchiError>;

    /// Per departure sub-region counts, largest first.
    async fn sub_region_breakdown(
        &self,
        filter: &DriverFilter,
    ) -> Result<Vec<SubRegionStats>, YolchiError>;

    /// Per route region counts (departure or arrival), skipping
    /// `excluded_region_id`; most actives first, then largest.
    async fn region_breakdown(
        &self,
        filter: &DriverFilter,
        excluded_region_id: &str,
    ) -> Result<Vec<RegionStats>, YolchiError>;

    /// Every region, by name.
    async fn list_regions(&self) -> Result<Vec<Region>, YolchiError>;

    /// Sub-regions by name, optionally of one region only.
    async fn list_sub_regions(
        &self,
        region_id: Option<&str>,
    ) -> Result<Vec<SubRegion>, YolchiError>;
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`DriverRegistry`] trait.

use async_trait::async_trait;
use tracing::debug;
use yolchi_core::{
    DailyStats, Driver, DriverFilter, DriverRegistry, Region, RegionStats, StatusSummary,
    SubRegion, SubRegionStats, YolchiError,
};

use crate::database::Database;
use crate::queries;

/// Driver registry backed by the registry tables of a [`Database`].
#[derive(Clone)]
pub struct SqliteDriverRegistry {
    db: Database,
}

impl SqliteDriverRegistry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DriverRegistry for SqliteDriverRegistry {
    async fn list_drivers(&self, filter: &DriverFilter) -> Result<Vec<Driver>, YolchiError> {
        let drivers = queries::drivers::list_drivers(&self.db, filter).await?;
        debug!(rows = drivers.len(), "registry list query");
        Ok(drivers)
    }

    async fn count_drivers(&self, filter: &DriverFilter) -> Result<u64, YolchiError> {
        queries::drivers::count_drivers(&self.db, filter).await
    }

    async fn status_summary(&self, filter: &DriverFilter) -> Result<StatusSummary, YolchiError> {
        queries::stats::status_summary(&self.db, filter).await
    }

    async fn daily_breakdown(
        &self,
        filter: &DriverFilter,
        utc_offset_hours: i32,
    ) -> Result<Vec<DailyStats>, YolchiError> {
        queries::stats::daily_breakdown(&self.db, filter, utc_offset_hours).await
    }

    async fn sub_region_breakdown(
        &self,
        filter: &DriverFilter,
    ) -> Result<Vec<SubRegionStats>, YolchiError> {
        queries::stats::sub_region_breakdown(&self.db, filter).await
    }

    async fn region_breakdown(
        &self,
        filter: &DriverFilter,
        excluded_region_id: &str,
    ) -> Result<Vec<RegionStats>, YolchiError> {
        queries::stats::region_breakdown(&self.db, filter, excluded_region_id).await
    }

    async fn list_regions(&self) -> Result<Vec<Region>, YolchiError> {
        queries::regions::list_regions(&self.db).await
    }

    async fn list_sub_regions(
        &self,
        region_id: Option<&str>,
    ) -> Result<Vec<SubRegion>, YolchiError> {
        queries::regions::list_sub_regions(&self.db, region_id).await
    }
}

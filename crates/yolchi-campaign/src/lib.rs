// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign report services for Yolchi.
//!
//! [`Campaign`] binds the configuration, the driver registry and the campaign
//! documents together. Each report reads a registry snapshot and the documents
//! it needs, aggregates in memory and returns a serializable value. Updates
//! load one document, change it and write the whole document back.
//!
//! Operations are grouped by area:
//! - [`sms`]: SMS recipient list upload, conversion report, ad-hoc matching
//! - [`call_center`]: operator call list
//! - [`target`]: lead-form and regular target ads
//! - [`channels`]: flyer and telegram attribution
//! - [`reactivation`]: pre-campaign drivers, tracking and the tracked set
//! - [`stats`]: corridor and all-region statistics, dashboard, region
//!   lookups and the driver list
//! - [`budget`]: ledger summary and expense entry
//! - [`records`]: marketing campaigns, SMS batches and daily expenses

pub mod budget;
pub mod call_center;
pub mod channels;
pub mod clock;
pub mod documents;
pub mod reactivation;
pub mod records;
pub mod sms;
pub mod stats;
pub mod target;

use std::sync::Arc;

use chrono::NaiveDate;
use yolchi_config::model::YolchiConfig;
use yolchi_core::{Corridor, DriverFilter, DriverRegistry, StateStore};
use yolchi_funnel::{Pacing, PacingPlan, local_today};
use yolchi_storage::DocumentStore;

pub use clock::{Clock, FixedClock, SystemClock};
pub use documents::{
    CallCenterList, CallEntry, CallOutcome, ContactKind, ConversionStats, ReactivationStatus,
    SmsUpload, TargetStats, TrackedIds, TrackingBook, TrackingEntry, TrackingStats,
};

/// Report services over one campaign. Cloning shares the underlying stores.
#[derive(Clone)]
pub struct Campaign {
    config: Arc<YolchiConfig>,
    registry: Arc<dyn DriverRegistry>,
    documents: DocumentStore,
    clock: Arc<dyn Clock>,
}

impl Campaign {
    pub fn new(
        config: Arc<YolchiConfig>,
        registry: Arc<dyn DriverRegistry>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            config,
            registry,
            documents: DocumentStore::new(state),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock (tests pin "today" this way).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &YolchiConfig {
        &self.config
    }

    fn corridor(&self) -> Corridor {
        Corridor::new(
            self.config.campaign.region_id.as_str(),
            self.config.campaign.city_id.as_str(),
        )
    }

    /// Filter admitting every driver-role account.
    fn drivers(&self) -> DriverFilter {
        DriverFilter::role(self.config.campaign.driver_role_id.as_str())
    }

    /// Driver-role accounts that have a driver profile row.
    fn profiled_drivers(&self) -> DriverFilter {
        DriverFilter {
            require_profile: true,
            ..self.drivers()
        }
    }

    fn driver_role(&self) -> &str {
        &self.config.campaign.driver_role_id
    }

    /// Campaign calendar day at the configured UTC offset.
    fn today(&self) -> NaiveDate {
        local_today(self.clock.now(), self.config.campaign.utc_offset_hours)
    }

    fn timestamp(&self) -> String {
        clock::timestamp(self.clock.now())
    }

    /// Pace `current` actives against the campaign target as of today.
    fn pacing(&self, current: u64) -> Pacing {
        let campaign = &self.config.campaign;
        PacingPlan {
            start_date: campaign.start_date,
            duration_days: campaign.duration_days,
            target: campaign.target_active_drivers,
        }
        .evaluate(current, self.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tracing_test::traced_test;
    use yolchi_core::{
        DailyStats, Driver, Region, RegionStats, StatusSummary, SubRegion, SubRegionStats,
        YolchiError,
    };
    use yolchi_cost::{Currency, NewExpense};
    use yolchi_storage::MemoryStateStore;

    use crate::budget::BudgetUpdate;
    use crate::documents::{TargetStatsUpdate, TrackingUpdate};

    /// Registry with no accounts.
    struct EmptyRegistry;

    #[async_trait]
    impl DriverRegistry for EmptyRegistry {
        async fn list_drivers(&self, _: &DriverFilter) -> Result<Vec<Driver>, YolchiError> {
            Ok(Vec::new())
        }

        async fn count_drivers(&self, _: &DriverFilter) -> Result<u64, YolchiError> {
            Ok(0)
        }

        async fn status_summary(&self, _: &DriverFilter) -> Result<StatusSummary, YolchiError> {
            Ok(StatusSummary::default())
        }

        async fn daily_breakdown(
            &self,
            _: &DriverFilter,
            _: i32,
        ) -> Result<Vec<DailyStats>, YolchiError> {
            Ok(Vec::new())
        }

        async fn sub_region_breakdown(
            &self,
            _: &DriverFilter,
        ) -> Result<Vec<SubRegionStats>, YolchiError> {
            Ok(Vec::new())
        }

        async fn region_breakdown(
            &self,
            _: &DriverFilter,
            _: &str,
        ) -> Result<Vec<RegionStats>, YolchiError> {
            Ok(Vec::new())
        }

        async fn list_regions(&self) -> Result<Vec<Region>, YolchiError> {
            Ok(Vec::new())
        }

        async fn list_sub_regions(&self, _: Option<&str>) -> Result<Vec<SubRegion>, YolchiError> {
            Ok(Vec::new())
        }
    }

    fn campaign() -> Campaign {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 20, 30, 0).unwrap();
        Campaign::new(
            Arc::new(YolchiConfig::default()),
            Arc::new(EmptyRegistry),
            Arc::new(MemoryStateStore::new()),
        )
        .with_clock(Arc::new(FixedClock(now)))
    }

    #[test]
    fn today_uses_the_campaign_offset() {
        // 20:30 UTC is already the next day at UTC+5.
        assert_eq!(
            campaign().today(),
            NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
        );
    }

    #[traced_test]
    #[tokio::test]
    async fn budget_total_and_expense_in_one_update() {
        let campaign = campaign();
        let change = campaign
            .update_budget(BudgetUpdate {
                total_budget: Some(500.0),
                expense: Some(NewExpense {
                    category_id: "other".into(),
                    amount: 25.0,
                    currency: Some(Currency::Usd),
                    ..NewExpense::default()
                }),
            })
            .await
            .unwrap();
        assert_eq!(change.added.len(), 1);
        assert_eq!(change.added[0].date, campaign.today());
        assert_eq!(change.added[0].created_at, "2026-02-01T20:30:00.000Z");
        assert!((change.summary.remaining - 475.0).abs() < 1e-10);
        assert!(logs_contain("budget total set"));

        let report = campaign.budget_report().await.unwrap();
        assert_eq!(report.updated_at.as_deref(), Some("2026-02-01T20:30:00.000Z"));
    }

    #[tokio::test]
    async fn target_counts_merge_and_report_without_registrants() {
        let campaign = campaign();
        campaign
            .update_target_stats(TargetStatsUpdate {
                lead_views: Some(900),
                ..TargetStatsUpdate::default()
            })
            .await
            .unwrap();
        campaign
            .update_target_stats(TargetStatsUpdate {
                lead_installs: Some(12),
                ..TargetStatsUpdate::default()
            })
            .await
            .unwrap();

        let report = campaign.target_report().await.unwrap();
        assert_eq!(report.lead.views, 900);
        assert_eq!(report.lead.installs, 12);
        assert_eq!(report.lead.funnel.stage_costs.per_login, None);
        assert!((report.cost.total_usd).abs() < 1e-10);
    }

    #[tokio::test]
    async fn repeated_status_counts_one_attempt() {
        let campaign = campaign();
        let update = || TrackingUpdate {
            driver_id: "d1".into(),
            call_status: Some(ReactivationStatus::NoAnswer),
            notes: None,
        };
        campaign.track(update()).await.unwrap();
        let receipt = campaign.track(update()).await.unwrap();
        assert_eq!(receipt.entry.call_attempts, 1);
        assert_eq!(receipt.stats.total_called, 1);

        let stats = campaign.untrack("d1").await.unwrap();
        assert_eq!(stats.total_called, 0);
        assert!(campaign.tracking().await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn empty_registry_reports_zero_pacing() {
        let dashboard = campaign().dashboard().await.unwrap();
        assert_eq!(dashboard.combined.current, 0);
        assert_eq!(dashboard.stats.pacing.days_passed, 5);
        assert!(dashboard.stats.inactive_breakdown.by_reason.is_empty());
    }
}

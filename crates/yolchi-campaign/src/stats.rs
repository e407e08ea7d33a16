// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corridor and all-region statistics, the combined dashboard and the driver
//! list.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use yolchi_core::{
    DailyStats, Driver, DriverFilter, DriverStatus, Ordering, PageRequest, Region, RegionStats,
    RouteScope, SortKey, SortOrder, StatusScope, StatusSummary, SubRegion, SubRegionStats,
    YolchiError,
};
use yolchi_funnel::Pacing;

use crate::Campaign;
use crate::documents::{TrackingBook, TrackingStats};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonCount {
    pub reason_id: String,
    pub title: String,
    pub is_fixable: bool,
    pub count: u64,
}

/// Inactive corridor drivers by moderation reason.
///
/// A driver with several reasons counts once per reason in `by_reason`, and
/// once in each class it has a reason in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveBreakdown {
    pub fixable: u64,
    pub not_eligible: u64,
    pub by_reason: Vec<ReasonCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsMeta {
    pub data_start_date: NaiveDate,
    pub campaign_start: NaiveDate,
    pub campaign_end: NaiveDate,
    pub region: String,
    pub region_id: String,
    pub from_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorStats {
    pub summary: StatusSummary,
    pub pacing: Pacing,
    pub inactive_breakdown: InactiveBreakdown,
    pub daily: Vec<DailyStats>,
    pub sub_regions: Vec<SubRegionStats>,
    pub meta: StatsMeta,
}

/// Scope tag reported by [`AllRegionStats`].
pub const ALL_REGIONS_SCOPE: &str = "all_regions";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllRegionSummary {
    #[serde(flatten)]
    pub counts: StatusSummary,
    /// Currently active drivers registered before the window.
    pub old_active_drivers: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllRegionMeta {
    pub data_start_date: NaiveDate,
    pub campaign_start: NaiveDate,
    pub campaign_end: NaiveDate,
    pub scope: &'static str,
    pub from_date: NaiveDate,
}

/// Nationwide registrations, with the corridor city left out of the per-region
/// breakdown since every route passes through it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllRegionStats {
    pub summary: AllRegionSummary,
    pub pacing: Pacing,
    pub inactive_breakdown: InactiveBreakdown,
    pub by_region: Vec<RegionStats>,
    pub daily: Vec<DailyStats>,
    pub meta: AllRegionMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: CorridorStats,
    pub tracking: TrackingStats,
    /// Pacing with reactivation conversions added to the corridor actives.
    pub combined: Pacing,
}

/// Driver list query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverListQuery {
    /// A status name, or `all`.
    pub status: Option<String>,
    pub region_id: Option<String>,
    pub sub_region_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Region paired with the corridor city in either route direction.
    pub route_region_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverPage {
    pub data: Vec<Driver>,
    pub pagination: Pagination,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl DriverListQuery {
    fn status_scope(&self) -> Result<StatusScope, YolchiError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(StatusScope::Any),
            Some(name) => name
                .parse::<DriverStatus>()
                .map(|s| StatusScope::In(vec![s]))
                .map_err(|_| YolchiError::InvalidInput(format!("unknown status '{name}'"))),
        }
    }

    /// Whitelisted sort; unknown columns fall back to the registration time.
    fn ordering(&self) -> Ordering {
        let key = self
            .sort_by
            .as_deref()
            .and_then(|k| k.parse::<SortKey>().ok())
            .unwrap_or_default();
        let order = self
            .sort_order
            .as_deref()
            .and_then(|o| o.to_ascii_lowercase().parse::<SortOrder>().ok())
            .unwrap_or_default();
        Ordering::By(key, order)
    }

    fn page(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Tally inactive drivers by reason, titled from the registry, then the
/// configured label, then the bare id.
fn inactive_breakdown(
    drivers: &[Driver],
    labels: &BTreeMap<String, String>,
    reason_order: &[String],
) -> InactiveBreakdown {
    let mut breakdown = InactiveBreakdown::default();
    let mut by_reason: BTreeMap<&str, ReasonCount> = BTreeMap::new();

    for driver in drivers {
        let reasons = &driver.inactive_reasons;
        if reasons.iter().any(|r| r.is_fixable) {
            breakdown.fixable += 1;
        }
        if reasons.iter().any(|r| !r.is_fixable) {
            breakdown.not_eligible += 1;
        }
        for reason in reasons {
            by_reason
                .entry(reason.reason_id.as_str())
                .or_insert_with(|| ReasonCount {
                    reason_id: reason.reason_id.clone(),
                    title: Some(reason.reason_title.trim())
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .or_else(|| labels.get(&reason.reason_id).cloned())
                        .unwrap_or_else(|| reason.reason_id.clone()),
                    is_fixable: reason.is_fixable,
                    count: 0,
                })
                .count += 1;
        }
    }

    let mut ordered: Vec<ReasonCount> = reason_order
        .iter()
        .filter_map(|id| by_reason.remove(id.as_str()))
        .collect();
    ordered.extend(by_reason.into_values());
    breakdown.by_reason = ordered;
    breakdown
}

impl Campaign {
    /// Corridor registrations since `from_date` (default: data start).
    pub async fn corridor_stats(
        &self,
        from_date: Option<NaiveDate>,
    ) -> Result<CorridorStats, YolchiError> {
        let campaign = &self.config.campaign;
        let reasons = &self.config.reasons;
        let from_date = from_date.unwrap_or(campaign.data_start_date);

        let cohort = DriverFilter {
            created_from: Some(from_date),
            route: Some(RouteScope::Corridor(self.corridor())),
            ..self.profiled_drivers()
        };
        let inactive = DriverFilter {
            status: StatusScope::In(vec![DriverStatus::Inactive]),
            reason_ids: reasons.all_ids(),
            fixable_reason_ids: reasons.fixable.clone(),
            ..cohort.clone()
        };

        let (summary, daily, sub_regions, inactive_drivers) = tokio::try_join!(
            self.registry.status_summary(&cohort),
            self.registry
                .daily_breakdown(&cohort, campaign.utc_offset_hours),
            self.registry.sub_region_breakdown(&cohort),
            self.registry.list_drivers(&inactive),
        )?;
        debug!(%from_date, total = summary.total, "corridor stats computed");

        Ok(CorridorStats {
            pacing: self.pacing(summary.active),
            inactive_breakdown: inactive_breakdown(
                &inactive_drivers,
                &reasons.labels,
                &reasons.all_ids(),
            ),
            summary,
            daily,
            sub_regions,
            meta: StatsMeta {
                data_start_date: campaign.data_start_date,
                campaign_start: campaign.start_date,
                campaign_end: campaign.end_date,
                region: campaign.region_name.clone(),
                region_id: campaign.region_id.clone(),
                from_date,
            },
        })
    }

    /// Registrations in every region since `from_date` (default: data start).
    pub async fn all_region_stats(
        &self,
        from_date: Option<NaiveDate>,
    ) -> Result<AllRegionStats, YolchiError> {
        let campaign = &self.config.campaign;
        let reasons = &self.config.reasons;
        let from_date = from_date.unwrap_or(campaign.data_start_date);

        let cohort = DriverFilter {
            created_from: Some(from_date),
            ..self.profiled_drivers()
        };
        let inactive = DriverFilter {
            status: StatusScope::In(vec![DriverStatus::Inactive]),
            reason_ids: reasons.all_ids(),
            fixable_reason_ids: reasons.fixable.clone(),
            ..cohort.clone()
        };
        let old_active = DriverFilter {
            status: StatusScope::In(vec![DriverStatus::Active]),
            created_before: Some(from_date),
            ..self.profiled_drivers()
        };

        let (counts, by_region, daily, inactive_drivers, old_active_drivers) = tokio::try_join!(
            self.registry.status_summary(&cohort),
            self.registry.region_breakdown(&cohort, &campaign.city_id),
            self.registry
                .daily_breakdown(&cohort, campaign.utc_offset_hours),
            self.registry.list_drivers(&inactive),
            self.registry.count_drivers(&old_active),
        )?;
        debug!(
            %from_date,
            total = counts.total,
            regions = by_region.len(),
            "all-region stats computed"
        );

        Ok(AllRegionStats {
            pacing: self.pacing(counts.active),
            inactive_breakdown: inactive_breakdown(
                &inactive_drivers,
                &reasons.labels,
                &reasons.all_ids(),
            ),
            summary: AllRegionSummary {
                counts,
                old_active_drivers,
            },
            by_region,
            daily,
            meta: AllRegionMeta {
                data_start_date: campaign.data_start_date,
                campaign_start: campaign.start_date,
                campaign_end: campaign.end_date,
                scope: ALL_REGIONS_SCOPE,
                from_date,
            },
        })
    }

    pub async fn regions(&self) -> Result<Vec<Region>, YolchiError> {
        self.registry.list_regions().await
    }

    /// Sub-regions of `region_id`, or all of them when it is absent or blank.
    pub async fn sub_regions(
        &self,
        region_id: Option<String>,
    ) -> Result<Vec<SubRegion>, YolchiError> {
        let region_id = non_blank(region_id);
        self.registry.list_sub_regions(region_id.as_deref()).await
    }

    /// Corridor stats with pacing credited for reactivation conversions too.
    pub async fn dashboard(&self) -> Result<Dashboard, YolchiError> {
        let (stats, book) = tokio::try_join!(
            self.corridor_stats(None),
            self.documents.load::<TrackingBook>(),
        )?;
        let combined = self.pacing(stats.summary.active + book.stats.total_converted);
        Ok(Dashboard {
            stats,
            tracking: book.stats,
            combined,
        })
    }

    pub async fn driver_list(&self, query: DriverListQuery) -> Result<DriverPage, YolchiError> {
        if let (Some(from), Some(to)) = (query.date_from, query.date_to)
            && from > to
        {
            return Err(YolchiError::InvalidInput(format!(
                "date_from {from} is after date_to {to}"
            )));
        }
        let page = query.page();
        let filter = DriverFilter {
            status: query.status_scope()?,
            created_from: query.date_from,
            created_to: query.date_to,
            ordering: query.ordering(),
            page: Some(page),
            route: non_blank(query.route_region_id).map(|region_id| RouteScope::PairedWithCity {
                region_id,
                city_id: self.config.campaign.city_id.clone(),
            }),
            region_id: non_blank(query.region_id),
            sub_region_id: non_blank(query.sub_region_id),
            ..self.drivers()
        };

        let (data, total) = tokio::try_join!(
            self.registry.list_drivers(&filter),
            self.registry.count_drivers(&filter),
        )?;
        Ok(DriverPage {
            data,
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total,
                total_pages: total.div_ceil(u64::from(page.limit)),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yolchi_core::{InactiveReason, Route};

    fn inactive(id: &str, reasons: &[(&str, &str, bool)]) -> Driver {
        Driver {
            id: id.into(),
            role_id: "2".into(),
            first_name: Some("Aziz".into()),
            last_name: None,
            phone_number: Some("998901234567".into()),
            status: DriverStatus::Inactive,
            created_at: "2026-02-01T08:00:00.000Z".into(),
            source_tag: None,
            region_id: None,
            region_name: None,
            sub_region_id: None,
            sub_region_name: None,
            route: Route::default(),
            inactive_reasons: reasons
                .iter()
                .map(|(reason_id, title, fixable)| InactiveReason {
                    reason_id: (*reason_id).into(),
                    reason_title: (*title).into(),
                    is_fixable: *fixable,
                })
                .collect(),
        }
    }

    #[test]
    fn breakdown_counts_classes_and_reasons() {
        let drivers = vec![
            inactive("1", &[("59", "Passport photo", true)]),
            inactive("2", &[("59", "Passport photo", true), ("65", "", false)]),
            inactive("3", &[]),
        ];
        let labels = BTreeMap::from([("65".to_string(), "Car too old".to_string())]);
        let order = vec!["59".to_string(), "60".to_string(), "65".to_string()];

        let breakdown = inactive_breakdown(&drivers, &labels, &order);
        assert_eq!(breakdown.fixable, 2);
        assert_eq!(breakdown.not_eligible, 1);
        assert_eq!(breakdown.by_reason.len(), 2);
        assert_eq!(breakdown.by_reason[0].reason_id, "59");
        assert_eq!(breakdown.by_reason[0].count, 2);
        assert_eq!(breakdown.by_reason[1].title, "Car too old");
        assert!(!breakdown.by_reason[1].is_fixable);
    }

    #[test]
    fn query_defaults_and_clamps() {
        let query = DriverListQuery {
            limit: Some(500),
            page: Some(0),
            sort_by: Some("password".into()),
            sort_order: Some("ASC".into()),
            ..DriverListQuery::default()
        };
        assert_eq!(query.page(), PageRequest { page: 1, limit: 100 });
        assert_eq!(
            query.ordering(),
            Ordering::By(SortKey::CreatedAt, SortOrder::Asc)
        );
        assert_eq!(query.status_scope().unwrap(), StatusScope::Any);

        let query = DriverListQuery {
            status: Some("inactive".into()),
            sort_by: Some("last_name".into()),
            ..DriverListQuery::default()
        };
        assert_eq!(query.page(), PageRequest { page: 1, limit: 20 });
        assert_eq!(
            query.status_scope().unwrap(),
            StatusScope::In(vec![DriverStatus::Inactive])
        );
        assert_eq!(
            query.ordering(),
            Ordering::By(SortKey::LastName, SortOrder::Desc)
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let query = DriverListQuery {
            status: Some("retired".into()),
            ..DriverListQuery::default()
        };
        assert!(matches!(
            query.status_scope(),
            Err(YolchiError::InvalidInput(_))
        ));
    }
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reactivation of drivers registered before the campaign data window.
//!
//! Candidates are pre-campaign drivers on the corridor or living in the home
//! region. Operators follow them up through the tracking book; the tracked-id
//! set keeps reactivated (now active) drivers visible in the default list.

use serde::Serialize;
use tracing::{debug, info};
use yolchi_core::{
    Driver, DriverFilter, DriverStatus, Ordering, RouteScope, StatusScope, StatusSummary,
    YolchiError,
};
use yolchi_funnel::conversion_rate;

use crate::Campaign;
use crate::documents::{TrackedIds, TrackingBook, TrackingEntry, TrackingStats, TrackingUpdate};

const DEFAULT_STATUSES: [DriverStatus; 2] = [DriverStatus::Inactive, DriverStatus::Pending];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub total: u64,
    pub inactive: u64,
    pub active: u64,
    pub pending: u64,
    /// Active share of the listed candidates.
    pub conversion_rate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateList {
    pub data: Vec<Driver>,
    pub summary: CandidateSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingReceipt {
    pub entry: TrackingEntry,
    pub stats: TrackingStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackedSet {
    pub ids: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackedChange {
    pub added: usize,
    pub total: usize,
}

impl Campaign {
    /// Query for reactivation candidates.
    ///
    /// Without an explicit status the list holds inactive and pending drivers
    /// plus active drivers that are tracked.
    fn candidate_filter(&self, status: Option<DriverStatus>, tracked: Vec<String>) -> DriverFilter {
        let campaign = &self.config.campaign;
        let reasons = &self.config.reasons;
        DriverFilter {
            created_before: Some(campaign.data_start_date),
            route: Some(RouteScope::CorridorOrHome {
                corridor: self.corridor(),
                home_region_id: campaign.region_id.clone(),
            }),
            status: match status {
                Some(status) => StatusScope::In(vec![status]),
                None => StatusScope::InOrTrackedActive {
                    statuses: DEFAULT_STATUSES.to_vec(),
                    tracked_ids: tracked,
                },
            },
            reason_ids: reasons.all_ids(),
            fixable_reason_ids: reasons.fixable.clone(),
            ordering: Ordering::StatusThenNewest,
            ..self.profiled_drivers()
        }
    }

    /// Every id the default list keeps visible once active.
    async fn followed_ids(&self) -> Result<Vec<String>, YolchiError> {
        let (mut tracked, book) = tokio::try_join!(
            self.documents.load::<TrackedIds>(),
            self.documents.load::<TrackingBook>(),
        )?;
        tracked.add(book.entries.into_keys());
        Ok(tracked.ids)
    }

    pub async fn reactivation_candidates(
        &self,
        status: Option<DriverStatus>,
    ) -> Result<CandidateList, YolchiError> {
        let tracked = match status {
            Some(_) => Vec::new(),
            None => self.followed_ids().await?,
        };
        let data = self
            .registry
            .list_drivers(&self.candidate_filter(status, tracked))
            .await?;

        let counts: StatusSummary = data.iter().map(|d| d.status).collect();
        Ok(CandidateList {
            summary: CandidateSummary {
                total: counts.total,
                inactive: counts.inactive,
                active: counts.active,
                pending: counts.pending,
                conversion_rate: conversion_rate(counts.active, counts.total),
            },
            data,
        })
    }

    pub async fn tracking(&self) -> Result<TrackingBook, YolchiError> {
        self.documents.load().await
    }

    /// Create or update the tracking entry for one driver.
    pub async fn track(&self, update: TrackingUpdate) -> Result<TrackingReceipt, YolchiError> {
        if update.driver_id.trim().is_empty() {
            return Err(YolchiError::InvalidInput("driverId is required".into()));
        }
        let now = self.timestamp();
        let mut book: TrackingBook = self.documents.load().await?;
        let entry = book.upsert(update, &now);
        book.recompute(&now);
        self.documents.save(&book).await?;

        debug!(
            driver_id = %entry.driver_id,
            status = %entry.call_status,
            attempts = entry.call_attempts,
            "tracking entry saved"
        );
        Ok(TrackingReceipt {
            entry,
            stats: book.stats,
        })
    }

    /// Drop the tracking entry for `driver_id`; absent ids are ignored.
    pub async fn untrack(&self, driver_id: &str) -> Result<TrackingStats, YolchiError> {
        let now = self.timestamp();
        let mut book: TrackingBook = self.documents.load().await?;
        if book.remove(driver_id) {
            debug!(driver_id, "tracking entry removed");
        }
        book.recompute(&now);
        self.documents.save(&book).await?;
        Ok(book.stats)
    }

    pub async fn tracked_ids(&self) -> Result<TrackedSet, YolchiError> {
        let tracked: TrackedIds = self.documents.load().await?;
        Ok(TrackedSet {
            total: tracked.ids.len(),
            ids: tracked.ids,
        })
    }

    pub async fn add_tracked(&self, ids: Vec<String>) -> Result<TrackedChange, YolchiError> {
        if ids.iter().all(|id| id.trim().is_empty()) {
            return Err(YolchiError::InvalidInput("driverIds must not be empty".into()));
        }
        let mut tracked: TrackedIds = self.documents.load().await?;
        let added = tracked.add(ids);
        self.documents.save(&tracked).await?;
        info!(added, total = tracked.ids.len(), "tracked drivers added");
        Ok(TrackedChange {
            added,
            total: tracked.ids.len(),
        })
    }

    pub async fn remove_tracked(&self, driver_id: &str) -> Result<TrackedSet, YolchiError> {
        let mut tracked: TrackedIds = self.documents.load().await?;
        if !tracked.remove(driver_id) {
            return Err(YolchiError::not_found("tracked driver", driver_id));
        }
        self.documents.save(&tracked).await?;
        Ok(TrackedSet {
            total: tracked.ids.len(),
            ids: tracked.ids,
        })
    }

    /// Track every current inactive or pending candidate.
    pub async fn sync_tracked(&self) -> Result<TrackedChange, YolchiError> {
        let filter = DriverFilter {
            status: StatusScope::In(DEFAULT_STATUSES.to_vec()),
            reason_ids: Vec::new(),
            fixable_reason_ids: Vec::new(),
            ..self.candidate_filter(None, Vec::new())
        };
        let (candidates, mut tracked) = tokio::try_join!(
            self.registry.list_drivers(&filter),
            self.documents.load::<TrackedIds>(),
        )?;
        let added = tracked.add(candidates.into_iter().map(|d| d.id));
        self.documents.save(&tracked).await?;
        info!(added, total = tracked.ids.len(), "tracked drivers synced");
        Ok(TrackedChange {
            added,
            total: tracked.ids.len(),
        })
    }
}

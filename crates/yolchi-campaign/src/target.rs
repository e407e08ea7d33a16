// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Target ads: lead-form and regular sub-channels.

use serde::Serialize;
use tracing::info;
use yolchi_core::{DriverFilter, YolchiError};
use yolchi_cost::{BudgetLedger, Spend};
use yolchi_funnel::{AttributionTable, Channel, ChannelFunnels, PhoneKeySet};

use crate::Campaign;
use crate::channels::PricedFunnel;
use crate::documents::{TargetStats, TargetStatsUpdate};

/// `ads` is the category used before lead and regular ads were split.
pub const REGULAR_CATEGORIES: &[&str] = &["ads_regular", "ads"];
pub const LEAD_CATEGORIES: &[&str] = &["ads_lead"];

/// One ad sub-channel: manual platform counts and the registry funnel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdFunnel {
    pub views: u64,
    pub installs: u64,
    /// Reported by the ad platform; regular ads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrations: Option<u64>,
    #[serde(flatten)]
    pub funnel: PricedFunnel,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TargetCost {
    #[serde(rename = "regularUSD")]
    pub regular_usd: f64,
    #[serde(rename = "leadUSD")]
    pub lead_usd: f64,
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport {
    pub regular: AdFunnel,
    pub lead: AdFunnel,
    pub cost: TargetCost,
    pub updated_at: Option<String>,
}

impl Campaign {
    pub async fn target_report(&self) -> Result<TargetReport, YolchiError> {
        let sources = &self.config.sources;
        let cohort_filter = DriverFilter {
            source_tags: vec![sources.lead.clone(), sources.regular_target.clone()],
            created_from: Some(self.config.campaign.data_start_date),
            require_phone: true,
            ..self.drivers()
        };
        let (stats, ledger, cohort) = tokio::try_join!(
            self.documents.load::<TargetStats>(),
            self.documents.load::<BudgetLedger>(),
            self.registry.list_drivers(&cohort_filter),
        )?;

        // Tagged rows never reach the SMS rule, so no recipient list is needed.
        let no_recipients = PhoneKeySet::default();
        let table = AttributionTable::new(sources, &no_recipients);
        let funnels = ChannelFunnels::aggregate(&table, &cohort, &self.corridor());

        let rate = self.config.budget.usd_to_local;
        let regular_usd = ledger.spend_usd(REGULAR_CATEGORIES, rate);
        let lead_usd = ledger.spend_usd(LEAD_CATEGORIES, rate);

        Ok(TargetReport {
            regular: AdFunnel {
                views: stats.regular_views,
                installs: stats.regular_installs,
                registrations: Some(stats.regular_registrations),
                funnel: PricedFunnel::new(
                    funnels.funnel(Channel::Regular),
                    Spend::from_usd(regular_usd, rate),
                ),
            },
            lead: AdFunnel {
                views: stats.lead_views,
                installs: stats.lead_installs,
                registrations: None,
                funnel: PricedFunnel::new(
                    funnels.funnel(Channel::Lead),
                    Spend::from_usd(lead_usd, rate),
                ),
            },
            cost: TargetCost {
                regular_usd,
                lead_usd,
                total_usd: regular_usd + lead_usd,
            },
            updated_at: stats.updated_at,
        })
    }

    /// Merge the provided manual counts into the stored stats.
    pub async fn update_target_stats(
        &self,
        update: TargetStatsUpdate,
    ) -> Result<TargetStats, YolchiError> {
        let mut stats: TargetStats = self.documents.load().await?;
        stats.apply(update);
        stats.updated_at = Some(self.timestamp());
        self.documents.save(&stats).await?;
        info!(
            regular_views = stats.regular_views,
            lead_views = stats.lead_views,
            "target stats updated"
        );
        Ok(stats)
    }
}

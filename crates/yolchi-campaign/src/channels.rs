// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flyer and telegram funnels.
//!
//! Registrations since the flyer start date are attributed with the channel
//! table; anything untagged whose number is not on the SMS list counts as a
//! flyer registration.

use serde::Serialize;
use yolchi_core::{DriverFilter, YolchiError};
use yolchi_cost::{BudgetLedger, Spend, StageCosts};
use yolchi_funnel::{AttributionTable, Channel, ChannelFunnels, Funnel, PhoneKeySet};

use crate::Campaign;
use crate::documents::SmsUpload;

pub const FLYER_CATEGORIES: &[&str] = &["flyers"];
pub const TELEGRAM_CATEGORIES: &[&str] = &["telegram"];

/// A funnel with the spend credited to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedFunnel {
    #[serde(flatten)]
    pub funnel: Funnel,
    #[serde(flatten)]
    pub spend: Spend,
    /// Unit costs against the all-routes stages.
    pub stage_costs: StageCosts,
}

impl PricedFunnel {
    pub fn new(funnel: Funnel, spend: Spend) -> Self {
        let stage_costs = StageCosts::new(spend.usd, funnel.without_route());
        Self {
            funnel,
            spend,
            stage_costs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReport {
    pub flyer: PricedFunnel,
    /// Organic channel posts; not priced.
    pub telegram_global: PricedFunnel,
    pub telegram_ads: PricedFunnel,
    pub telegram_total: Spend,
}

impl Campaign {
    /// Normalized numbers of the stored SMS list as match keys.
    async fn sms_recipients(&self) -> Result<PhoneKeySet, YolchiError> {
        let upload: SmsUpload = self.documents.load().await?;
        Ok(PhoneKeySet::from_phones(&upload.phone_numbers))
    }

    pub async fn channel_report(&self) -> Result<ChannelReport, YolchiError> {
        let cohort_filter = DriverFilter {
            created_from: Some(self.config.campaign.flyer_start_date),
            require_phone: true,
            ..self.drivers()
        };
        let (recipients, ledger, cohort) = tokio::try_join!(
            self.sms_recipients(),
            self.documents.load::<BudgetLedger>(),
            self.registry.list_drivers(&cohort_filter),
        )?;

        let table = AttributionTable::new(&self.config.sources, &recipients);
        let funnels = ChannelFunnels::aggregate(&table, &cohort, &self.corridor());

        let rate = self.config.budget.usd_to_local;
        let flyer_spend = Spend::from_usd(ledger.spend_usd(FLYER_CATEGORIES, rate), rate);
        let telegram_spend = Spend::from_usd(ledger.spend_usd(TELEGRAM_CATEGORIES, rate), rate);

        Ok(ChannelReport {
            flyer: PricedFunnel::new(funnels.funnel(Channel::Flyer), flyer_spend),
            telegram_global: PricedFunnel::new(
                funnels.funnel(Channel::TelegramGlobal),
                Spend::default(),
            ),
            telegram_ads: PricedFunnel::new(funnels.funnel(Channel::TelegramAds), telegram_spend),
            telegram_total: telegram_spend,
        })
    }
}

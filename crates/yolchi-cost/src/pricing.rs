// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-unit cost: category spend divided by a funnel stage count.
//!
//! A zero count has no unit cost and yields `None`, serialized as `null`.

use serde::Serialize;
use yolchi_config::model::BudgetConfig;
use yolchi_funnel::FunnelStages;

/// Category id whose `cost_per_unit` prices one SMS.
pub const SMS_CATEGORY: &str = "sms";

/// `spend / count`, or `None` when `count` is zero.
pub fn per_unit(spend: f64, count: u64) -> Option<f64> {
    (count > 0).then(|| spend / count as f64)
}

/// A spend in both currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Spend {
    #[serde(rename = "costUSD")]
    pub usd: f64,
    #[serde(rename = "costUZS")]
    pub local: f64,
}

impl Spend {
    pub fn from_usd(usd: f64, usd_to_local: f64) -> Self {
        Self {
            usd,
            local: usd * usd_to_local,
        }
    }

    pub fn from_local(local: f64, usd_to_local: f64) -> Self {
        Self {
            usd: local / usd_to_local,
            local,
        }
    }
}

/// USD cost per login, full registration and active driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCosts {
    pub per_login: Option<f64>,
    pub per_full_register: Option<f64>,
    pub per_active: Option<f64>,
}

impl StageCosts {
    pub fn new(spend_usd: f64, stages: &FunnelStages) -> Self {
        Self {
            per_login: per_unit(spend_usd, stages.login),
            per_full_register: per_unit(spend_usd, stages.full_register),
            per_active: per_unit(spend_usd, stages.active),
        }
    }
}

/// Cost of an SMS send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsCost {
    pub uzs: f64,
    pub usd: f64,
    pub per_sms: f64,
}

/// Price `sent` messages at the configured per-SMS rate (zero when unpriced).
pub fn sms_cost(sent: u64, config: &BudgetConfig) -> SmsCost {
    let per_sms = config
        .category(SMS_CATEGORY)
        .and_then(|c| c.cost_per_unit)
        .unwrap_or(0.0);
    let uzs = sent as f64 * per_sms;
    SmsCost {
        uzs,
        usd: uzs / config.usd_to_local,
        per_sms,
    }
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Four-stage conversion funnels: contacted, logged in, fully registered, active.
//!
//! A row counts as logged in once it is in the cohort handed to the
//! aggregator; selecting the cohort (role, phone present, registration date)
//! is the caller's query. Each stage is counted twice, once for drivers on the
//! corridor and once for every route.

use std::collections::BTreeMap;

use serde::Serialize;
use yolchi_core::{Corridor, Driver, DriverStatus};

use crate::attribution::{AttributionTable, Channel};

/// Stage counts after contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStages {
    pub login: u64,
    pub full_register: u64,
    pub active: u64,
}

impl FunnelStages {
    /// Count one logged-in row into its deepest stage and all before it.
    pub fn record(&mut self, driver: &Driver) {
        self.login += 1;
        if driver.is_fully_registered() {
            self.full_register += 1;
            if driver.status == DriverStatus::Active {
                self.active += 1;
            }
        }
    }

    /// Stage-to-stage conversion, each against the stage before it.
    pub fn rates(&self, contacted: u64) -> StageRates {
        StageRates {
            login: conversion_rate(self.login, contacted),
            full_register: conversion_rate(self.full_register, self.login),
            active: conversion_rate(self.active, self.full_register),
        }
    }
}

/// Formatted stage conversion percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRates {
    pub login: String,
    pub full_register: String,
    pub active: String,
}

/// Stage counts with and without the corridor restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSplit {
    pub with_route_filter: FunnelStages,
    pub without_route_filter: FunnelStages,
}

impl RouteSplit {
    pub fn record(&mut self, driver: &Driver, corridor: &Corridor) {
        self.without_route_filter.record(driver);
        if corridor.contains(&driver.route) {
            self.with_route_filter.record(driver);
        }
    }
}

/// One channel's funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    pub contacted: u64,
    #[serde(flatten)]
    pub stages: RouteSplit,
    /// Conversion across all routes.
    pub rates: StageRates,
}

impl Funnel {
    fn from_split(contacted: u64, stages: RouteSplit) -> Self {
        Self {
            contacted,
            rates: stages.without_route_filter.rates(contacted),
            stages,
        }
    }

    /// Funnel of a tag-driven cohort: every member counts as contacted.
    pub fn from_cohort<'a>(cohort: impl IntoIterator<Item = &'a Driver>, corridor: &Corridor) -> Self {
        let mut stages = RouteSplit::default();
        for driver in cohort {
            stages.record(driver, corridor);
        }
        Self::from_split(stages.without_route_filter.login, stages)
    }

    /// Funnel of a list-driven cohort where `contacted` is the list size.
    ///
    /// The cohort must hold at most one row per contact.
    pub fn from_contacted<'a>(
        contacted: u64,
        cohort: impl IntoIterator<Item = &'a Driver>,
        corridor: &Corridor,
    ) -> Self {
        let mut stages = RouteSplit::default();
        for driver in cohort {
            stages.record(driver, corridor);
        }
        Self::from_split(contacted.max(stages.without_route_filter.login), stages)
    }

    pub fn with_route(&self) -> &FunnelStages {
        &self.stages.with_route_filter
    }

    pub fn without_route(&self) -> &FunnelStages {
        &self.stages.without_route_filter
    }
}

impl Default for Funnel {
    fn default() -> Self {
        Self::from_split(0, RouteSplit::default())
    }
}

/// Funnels for every channel of one cohort, attributed by the priority table.
#[derive(Debug, Clone, Default)]
pub struct ChannelFunnels {
    splits: BTreeMap<Channel, RouteSplit>,
}

impl ChannelFunnels {
    pub fn aggregate<'a>(
        table: &AttributionTable<'_>,
        cohort: impl IntoIterator<Item = &'a Driver>,
        corridor: &Corridor,
    ) -> Self {
        let mut splits: BTreeMap<Channel, RouteSplit> = BTreeMap::new();
        for driver in cohort {
            splits
                .entry(table.attribute(driver))
                .or_default()
                .record(driver, corridor);
        }
        Self { splits }
    }

    /// Funnel of one channel; empty when nobody was attributed to it.
    pub fn funnel(&self, channel: Channel) -> Funnel {
        let split = self.splits.get(&channel).copied().unwrap_or_default();
        Funnel::from_split(split.without_route_filter.login, split)
    }

    /// Attributed rows across all channels.
    pub fn total(&self) -> u64 {
        self.splits
            .values()
            .map(|s| s.without_route_filter.login)
            .sum()
    }
}

/// `numerator / denominator` as a percentage with one decimal, e.g. `"12.5%"`.
///
/// A zero denominator yields `"0%"`.
pub fn conversion_rate(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", numerator as f64 / denominator as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PhoneKeySet;
    use yolchi_config::model::SourceConfig;
    use yolchi_core::Route;

    fn row(name: &str, status: DriverStatus, route: (&str, &str), tag: Option<&str>) -> Driver {
        Driver {
            id: format!("{name}-{status}"),
            role_id: "2".into(),
            first_name: Some(name.into()),
            last_name: None,
            phone_number: Some("998909999999".into()),
            status,
            created_at: "2026-01-27T00:00:00.000Z".into(),
            source_tag: tag.map(Into::into),
            region_id: None,
            region_name: None,
            sub_region_id: None,
            sub_region_name: None,
            route: Route {
                departure_region_id: Some(route.0.into()),
                arrival_region_id: Some(route.1.into()),
                ..Route::default()
            },
            inactive_reasons: Vec::new(),
        }
    }

    #[test]
    fn corridor_cohort_counts_each_stage() {
        let corridor = Corridor::new("9", "2");
        let cohort = [
            row("Aziz", DriverStatus::Active, ("9", "2"), None),
            row("Bek", DriverStatus::Pending, ("2", "9"), None),
            row("", DriverStatus::Pending, ("9", "2"), None),
        ];
        let funnel = Funnel::from_cohort(&cohort, &corridor);
        assert_eq!(
            *funnel.with_route(),
            FunnelStages {
                login: 3,
                full_register: 2,
                active: 1
            }
        );
        assert_eq!(funnel.contacted, 3);
    }

    #[test]
    fn active_without_profile_is_not_counted_active() {
        let corridor = Corridor::new("9", "2");
        let cohort = [row("  ", DriverStatus::Active, ("9", "2"), None)];
        let funnel = Funnel::from_cohort(&cohort, &corridor);
        assert_eq!(funnel.with_route().full_register, 0);
        assert_eq!(funnel.with_route().active, 0);
    }

    #[test]
    fn route_filter_narrows_counts() {
        let corridor = Corridor::new("9", "2");
        let cohort = [
            row("Aziz", DriverStatus::Active, ("9", "2"), None),
            row("Far", DriverStatus::Active, ("3", "2"), None),
        ];
        let funnel = Funnel::from_contacted(10, &cohort, &corridor);
        assert_eq!(funnel.contacted, 10);
        assert_eq!(funnel.with_route().active, 1);
        assert_eq!(funnel.without_route().active, 2);
        assert_eq!(funnel.rates.login, "20.0%");
        assert_eq!(funnel.rates.active, "100.0%");
    }

    #[test]
    fn channels_are_mutually_exclusive() {
        let corridor = Corridor::new("9", "2");
        let sources = SourceConfig::default();
        let sms = PhoneKeySet::from_phones(["998909999999"]);
        let table = AttributionTable::new(&sources, &sms);
        let cohort = [
            row("A", DriverStatus::Active, ("9", "2"), Some("telegram_ads")),
            row("B", DriverStatus::Active, ("9", "2"), Some(&sources.lead)),
            row("C", DriverStatus::Active, ("9", "2"), None),
        ];
        let funnels = ChannelFunnels::aggregate(&table, &cohort, &corridor);
        assert_eq!(funnels.funnel(Channel::TelegramAds).with_route().login, 1);
        assert_eq!(funnels.funnel(Channel::Lead).with_route().login, 1);
        assert_eq!(funnels.funnel(Channel::Sms).with_route().login, 1);
        assert_eq!(funnels.funnel(Channel::Flyer).with_route().login, 0);
        assert_eq!(funnels.total(), 3);
    }

    #[test]
    fn zero_denominator_rate() {
        assert_eq!(conversion_rate(0, 0), "0%");
        assert_eq!(conversion_rate(5, 0), "0%");
        assert_eq!(conversion_rate(1, 3), "33.3%");
        assert_eq!(conversion_rate(2, 2), "100.0%");
    }

    #[test]
    fn funnel_serializes_with_route_keys() {
        let funnel = Funnel::default();
        let json = serde_json::to_value(&funnel).unwrap();
        assert_eq!(json["withRouteFilter"]["fullRegister"], 0);
        assert_eq!(json["withoutRouteFilter"]["login"], 0);
        assert_eq!(json["contacted"], 0);
        assert_eq!(json["rates"]["login"], "0%");
    }
}

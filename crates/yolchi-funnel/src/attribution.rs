// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Acquisition-channel attribution.
//!
//! Every registrant lands in exactly one channel. Rules are evaluated top-down
//! and the first matching rule decides:
//!
//! | # | Rule | Channel |
//! |---|------|---------|
//! | 1 | source tag is the telegram-global tag | [`Channel::TelegramGlobal`] |
//! | 2 | source tag is the telegram-ads tag | [`Channel::TelegramAds`] |
//! | 3 | source tag is the lead-form tag | [`Channel::Lead`] |
//! | 4 | source tag is the regular-target tag | [`Channel::Regular`] |
//! | 5 | phone is not on the SMS recipient list | [`Channel::Flyer`] |
//! | 6 | anything else | [`Channel::Sms`] |

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use yolchi_config::model::SourceConfig;
use yolchi_core::Driver;

use crate::matcher::PhoneKeySet;

/// Acquisition channel credited with a registration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    TelegramGlobal,
    TelegramAds,
    /// Target ads with a lead form.
    Lead,
    /// Regular target ads.
    Regular,
    /// Physical flyers and everything else not otherwise attributed.
    Flyer,
    Sms,
}

type Predicate = fn(&AttributionTable<'_>, &Driver) -> bool;

/// Ordered `(predicate, channel)` rules; first match wins.
const RULES: &[(Predicate, Channel)] = &[
    (tagged_telegram_global, Channel::TelegramGlobal),
    (tagged_telegram_ads, Channel::TelegramAds),
    (tagged_lead, Channel::Lead),
    (tagged_regular, Channel::Regular),
    (not_sms_recipient, Channel::Flyer),
    (always, Channel::Sms),
];

fn tagged_telegram_global(t: &AttributionTable<'_>, d: &Driver) -> bool {
    t.tag_is(d, &t.sources.telegram_global)
}

fn tagged_telegram_ads(t: &AttributionTable<'_>, d: &Driver) -> bool {
    t.tag_is(d, &t.sources.telegram_ads)
}

fn tagged_lead(t: &AttributionTable<'_>, d: &Driver) -> bool {
    t.tag_is(d, &t.sources.lead)
}

fn tagged_regular(t: &AttributionTable<'_>, d: &Driver) -> bool {
    t.tag_is(d, &t.sources.regular_target)
}

fn not_sms_recipient(t: &AttributionTable<'_>, d: &Driver) -> bool {
    !t.is_sms_recipient(d)
}

fn always(_: &AttributionTable<'_>, _: &Driver) -> bool {
    true
}

/// Attribution rules bound to the configured source tags and SMS list.
#[derive(Debug, Clone, Copy)]
pub struct AttributionTable<'a> {
    sources: &'a SourceConfig,
    sms_recipients: &'a PhoneKeySet,
}

impl<'a> AttributionTable<'a> {
    pub fn new(sources: &'a SourceConfig, sms_recipients: &'a PhoneKeySet) -> Self {
        Self {
            sources,
            sms_recipients,
        }
    }

    fn tag_is(&self, driver: &Driver, tag: &str) -> bool {
        driver.source_tag.as_deref() == Some(tag)
    }

    fn is_sms_recipient(&self, driver: &Driver) -> bool {
        driver
            .phone_number
            .as_deref()
            .is_some_and(|p| self.sms_recipients.contains_phone(p))
    }

    /// Channel credited with `driver`.
    pub fn attribute(&self, driver: &Driver) -> Channel {
        RULES
            .iter()
            .find(|(applies, _)| applies(self, driver))
            .map(|(_, channel)| *channel)
            .unwrap_or(Channel::Sms)
    }
}

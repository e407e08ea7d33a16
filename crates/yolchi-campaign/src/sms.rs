// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS recipient list: upload, conversion report and ad-hoc matching.

use serde::Serialize;
use tracing::info;
use yolchi_core::{Driver, StatusSummary, YolchiError};
use yolchi_cost::{SmsCost, sms_cost};
use yolchi_funnel::{
    Funnel, ImportMode, PhoneKeySet, conversion_rate, import_contacts, match_drivers,
    match_unique, phone,
};

use crate::Campaign;
use crate::documents::{ConversionStats, SmsUpload};

/// Response to an SMS list upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsUploadReceipt {
    pub total_numbers: u64,
    pub matched_drivers: u64,
    /// Lines without a usable phone number.
    pub skipped: usize,
    pub conversion_stats: ConversionStats,
    pub cost: SmsCost,
    pub conversion_rate: String,
}

/// Conversion of the stored SMS list against the current registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsReport {
    pub uploaded: bool,
    pub uploaded_at: Option<String>,
    pub total_sent: u64,
    pub matched_drivers: u64,
    pub conversion_stats: ConversionStats,
    pub cost: SmsCost,
    pub conversion_rate: String,
    /// Recipients who registered on or after the data-start date.
    pub funnel: Funnel,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total_sent: u64,
    pub registered: u64,
    pub not_registered: u64,
    pub in_corridor: u64,
    pub conversion_rate: String,
}

/// Registry lookup of a pasted phone list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsMatchReport {
    pub summary: MatchSummary,
    pub status_breakdown: StatusSummary,
    pub matched: Vec<Driver>,
    /// Normalized numbers with no registry row.
    pub not_registered: Vec<String>,
    pub in_corridor: Vec<Driver>,
}

impl Campaign {
    /// Replace the SMS list with the numbers in `csv`.
    ///
    /// Numbers come from `phone_column` (default 0) of each line.
    pub async fn upload_sms(
        &self,
        csv: &str,
        phone_column: Option<usize>,
    ) -> Result<SmsUploadReceipt, YolchiError> {
        if csv.trim().is_empty() {
            return Err(YolchiError::InvalidInput("csvData is required".into()));
        }
        let outcome = import_contacts(
            csv,
            ImportMode::PhoneOnly {
                column: phone_column.unwrap_or(0),
            },
        );
        let phones = outcome.phones();
        let keys = PhoneKeySet::from_phones(&phones);

        let drivers = self.registry.list_drivers(&self.profiled_drivers()).await?;
        let matched = match_drivers(&keys, &drivers, self.driver_role());
        let conversion_stats = ConversionStats::from_matches(&matched);

        let upload = SmsUpload {
            total_sent: phones.len() as u64,
            phone_numbers: phones,
            uploaded_at: Some(self.timestamp()),
            matched_drivers: matched.iter().map(|m| m.driver.id.clone()).collect(),
            conversion_stats,
        };
        self.documents.save(&upload).await?;

        info!(
            numbers = upload.total_sent,
            matched = upload.matched_drivers.len(),
            skipped = outcome.skipped,
            "sms list uploaded"
        );
        Ok(SmsUploadReceipt {
            total_numbers: upload.total_sent,
            matched_drivers: upload.matched_drivers.len() as u64,
            skipped: outcome.skipped,
            conversion_stats,
            cost: sms_cost(upload.total_sent, &self.config.budget),
            conversion_rate: conversion_rate(
                conversion_stats.converted,
                conversion_stats.total_matched,
            ),
        })
    }

    /// Current conversion of the stored list.
    ///
    /// Statuses are re-read from the registry; a list that was never uploaded
    /// reports `uploaded: false` with zero counts.
    pub async fn sms_report(&self) -> Result<SmsReport, YolchiError> {
        let upload: SmsUpload = self.documents.load().await?;
        if !upload.is_uploaded() {
            return Ok(SmsReport {
                uploaded: false,
                uploaded_at: None,
                total_sent: 0,
                matched_drivers: 0,
                conversion_stats: ConversionStats::default(),
                cost: sms_cost(0, &self.config.budget),
                conversion_rate: conversion_rate(0, 0),
                funnel: Funnel::default(),
            });
        }

        let drivers = self.registry.list_drivers(&self.profiled_drivers()).await?;
        let keys = PhoneKeySet::from_phones(&upload.phone_numbers);
        let role = self.driver_role();

        let matched = match_drivers(&keys, &drivers, role);
        let conversion_stats = ConversionStats::from_matches(&matched);

        let start = self.config.campaign.data_start_date;
        let cohort: Vec<&Driver> = match_unique(&keys, &drivers, role)
            .into_iter()
            .map(|m| m.driver)
            .filter(|d| d.registered_since(start))
            .collect();
        let funnel = Funnel::from_contacted(upload.total_sent, cohort, &self.corridor());

        Ok(SmsReport {
            uploaded: true,
            uploaded_at: upload.uploaded_at,
            total_sent: upload.total_sent,
            matched_drivers: matched.len() as u64,
            conversion_stats,
            cost: sms_cost(upload.total_sent, &self.config.budget),
            conversion_rate: conversion_rate(
                conversion_stats.converted,
                conversion_stats.total_matched,
            ),
            funnel,
        })
    }

    pub async fn clear_sms(&self) -> Result<(), YolchiError> {
        self.documents.clear::<SmsUpload>().await?;
        info!("sms list cleared");
        Ok(())
    }

    /// Look up a pasted list of numbers without storing it.
    pub async fn match_phones(&self, phones: &[String]) -> Result<SmsMatchReport, YolchiError> {
        if phones.is_empty() {
            return Err(YolchiError::InvalidInput("no phone numbers provided".into()));
        }
        let normalized: Vec<String> = phones.iter().map(|p| phone::normalize(p)).collect();
        let keys = PhoneKeySet::from_phones(&normalized);

        let drivers = self.registry.list_drivers(&self.drivers()).await?;
        let matched: Vec<Driver> = match_drivers(&keys, &drivers, self.driver_role())
            .into_iter()
            .map(|m| m.driver.clone())
            .collect();

        let registered =
            PhoneKeySet::from_phones(matched.iter().filter_map(|d| d.phone_number.as_deref()));
        let not_registered: Vec<String> = normalized
            .iter()
            .filter(|p| !registered.contains_phone(p))
            .cloned()
            .collect();

        let corridor = self.corridor();
        let in_corridor: Vec<Driver> = matched
            .iter()
            .filter(|d| corridor.contains(&d.route))
            .cloned()
            .collect();
        let status_breakdown: StatusSummary = matched.iter().map(|d| d.status).collect();

        Ok(SmsMatchReport {
            summary: MatchSummary {
                total_sent: normalized.len() as u64,
                registered: matched.len() as u64,
                not_registered: not_registered.len() as u64,
                in_corridor: in_corridor.len() as u64,
                conversion_rate: conversion_rate(matched.len() as u64, normalized.len() as u64),
            },
            status_breakdown,
            matched,
            not_registered,
            in_corridor,
        })
    }
}

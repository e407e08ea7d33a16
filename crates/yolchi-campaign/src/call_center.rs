// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator call list: import, per-number updates and the registration report.
//!
//! The report joins every listed number with any registry account on the
//! last-9 key, whatever its role, so operators can see numbers that
//! registered as passengers.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};
use yolchi_core::{DriverFilter, DriverStatus, YolchiError};
use yolchi_funnel::{
    DriverMatch, ImportMode, PhoneKeySet, RegistryIndex, conversion_rate, import_contacts, phone,
};

use crate::Campaign;
use crate::documents::{CallCenterList, CallEntry, CallOutcome, ContactKind};

/// Distinguish an absent field from an explicit `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Patch for one call-list entry.
///
/// `manualType` and `notes` may be sent as `null` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallUpdate {
    pub phone: String,
    #[serde(default)]
    pub call_status: Option<CallOutcome>,
    #[serde(default, deserialize_with = "present")]
    pub manual_type: Option<Option<ContactKind>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallListImport {
    pub total: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// A list entry with what the registry knows about its number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEntryView {
    #[serde(flatten)]
    pub entry: CallEntry,
    pub is_registered: bool,
    pub is_driver: bool,
    pub is_full_register: bool,
    /// Set for driver accounts only.
    pub driver_status: Option<DriverStatus>,
    pub user_name: Option<String>,
}

impl CallEntryView {
    fn new(entry: CallEntry, found: Option<DriverMatch<'_>>) -> Self {
        match found {
            Some(m) => Self {
                entry,
                is_registered: true,
                is_driver: m.is_driver,
                is_full_register: m.is_full_register,
                driver_status: m.is_driver.then_some(m.status),
                user_name: m
                    .driver
                    .first_name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .and_then(|_| m.driver.display_name()),
            },
            None => Self {
                entry,
                is_registered: false,
                is_driver: false,
                is_full_register: false,
                driver_status: None,
                user_name: None,
            },
        }
    }

    fn is_called(&self) -> bool {
        self.entry.call_status != CallOutcome::NotCalled
    }

    fn is_active_driver(&self) -> bool {
        self.is_driver && self.driver_status == Some(DriverStatus::Active)
    }
}

/// Registration outcome among numbers that were called.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallConversion {
    pub registered: u64,
    /// Registered but never completed the profile.
    pub login_only: u64,
    pub full_register: u64,
    pub drivers: u64,
    pub active_drivers: u64,
    /// Registered share of called numbers.
    pub conversion_rate: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStats {
    pub total: u64,
    /// Not fully registered and not yet called.
    pub needs_call: u64,
    pub called: u64,
    pub full_registered: u64,
    pub will_register: u64,
    pub not_reachable: u64,
    pub drivers: u64,
    pub active_drivers: u64,
    pub call_conversion: CallConversion,
}

impl CallStats {
    fn from_views(views: &[CallEntryView]) -> Self {
        let count = |pred: &dyn Fn(&CallEntryView) -> bool| -> u64 {
            views.iter().filter(|&v| pred(v)).count() as u64
        };
        let called: Vec<&CallEntryView> = views.iter().filter(|v| v.is_called()).collect();
        let called_count = |pred: &dyn Fn(&CallEntryView) -> bool| -> u64 {
            called.iter().filter(|&&v| pred(v)).count() as u64
        };
        let registered = called_count(&|v| v.is_registered);

        Self {
            total: views.len() as u64,
            needs_call: count(&|v| !v.is_full_register && !v.is_called()),
            called: called.len() as u64,
            full_registered: count(&|v| v.is_full_register),
            will_register: count(&|v| v.entry.call_status == CallOutcome::WillRegister),
            not_reachable: count(&|v| v.entry.call_status == CallOutcome::NotReachable),
            drivers: count(&|v| v.is_driver),
            active_drivers: count(&|v| v.is_active_driver()),
            call_conversion: CallConversion {
                registered,
                login_only: called_count(&|v| v.is_registered && !v.is_full_register),
                full_register: called_count(&|v| v.is_full_register),
                drivers: called_count(&|v| v.is_driver),
                active_drivers: called_count(&|v| v.is_active_driver()),
                conversion_rate: conversion_rate(registered, called.len() as u64),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallCenterReport {
    pub uploaded: bool,
    pub uploaded_at: Option<String>,
    pub stats: Option<CallStats>,
    pub entries: Vec<CallEntryView>,
}

impl Campaign {
    /// Replace the call list with the numbers and messages in `csv`.
    pub async fn import_call_list(&self, csv: &str) -> Result<CallListImport, YolchiError> {
        if csv.trim().is_empty() {
            return Err(YolchiError::InvalidInput("csvData is required".into()));
        }
        let outcome = import_contacts(csv, ImportMode::WithMessage);
        let list = CallCenterList {
            entries: outcome
                .entries
                .into_iter()
                .map(|e| CallEntry::new(e.phone, e.message))
                .collect(),
            uploaded_at: Some(self.timestamp()),
        };
        self.documents.save(&list).await?;

        info!(
            entries = list.entries.len(),
            skipped = outcome.skipped,
            duplicates = outcome.duplicates,
            "call list imported"
        );
        Ok(CallListImport {
            total: list.entries.len(),
            skipped: outcome.skipped,
            duplicates: outcome.duplicates,
        })
    }

    /// Patch the entry whose normalized phone equals `update.phone`.
    ///
    /// Setting a call status stamps `calledAt`.
    pub async fn update_call(&self, update: CallUpdate) -> Result<CallEntry, YolchiError> {
        let mut list: CallCenterList = self.documents.load().await?;
        if !list.is_uploaded() {
            return Err(YolchiError::InvalidInput("no call list uploaded".into()));
        }

        let wanted = phone::normalize(&update.phone);
        let entry = list
            .entries
            .iter_mut()
            .find(|e| phone::normalize(&e.phone) == wanted)
            .ok_or_else(|| YolchiError::not_found("call list entry", update.phone.as_str()))?;

        if let Some(status) = update.call_status {
            entry.call_status = status;
            entry.called_at = Some(self.timestamp());
        }
        if let Some(kind) = update.manual_type {
            entry.manual_type = kind;
        }
        if let Some(notes) = update.notes {
            entry.notes = notes;
        }
        let updated = entry.clone();

        self.documents.save(&list).await?;
        debug!(phone = %updated.phone, status = %updated.call_status, "call entry updated");
        Ok(updated)
    }

    /// Reset every call outcome, keeping the numbers. Returns the entry count.
    pub async fn reset_calls(&self) -> Result<usize, YolchiError> {
        let mut list: CallCenterList = self.documents.load().await?;
        if !list.is_uploaded() {
            return Ok(0);
        }
        list.entries.iter_mut().for_each(CallEntry::reset_call);
        self.documents.save(&list).await?;
        info!(entries = list.entries.len(), "call outcomes reset");
        Ok(list.entries.len())
    }

    pub async fn clear_call_list(&self) -> Result<(), YolchiError> {
        self.documents.clear::<CallCenterList>().await?;
        info!("call list cleared");
        Ok(())
    }

    pub async fn call_center_report(&self) -> Result<CallCenterReport, YolchiError> {
        let list: CallCenterList = self.documents.load().await?;
        if !list.is_uploaded() {
            return Ok(CallCenterReport {
                uploaded: false,
                uploaded_at: None,
                stats: None,
                entries: Vec::new(),
            });
        }

        let keys = PhoneKeySet::from_phones(list.entries.iter().map(|e| e.phone.as_str()));
        let contacts = DriverFilter {
            require_phone: true,
            ..DriverFilter::default()
        };
        let accounts = self.registry.list_drivers(&contacts).await?;
        let index = RegistryIndex::build(&keys, &accounts, self.driver_role());

        let entries: Vec<CallEntryView> = list
            .entries
            .into_iter()
            .map(|entry| {
                let found = index.lookup(&entry.phone);
                CallEntryView::new(entry, found)
            })
            .collect();

        Ok(CallCenterReport {
            uploaded: true,
            uploaded_at: list.uploaded_at,
            stats: Some(CallStats::from_views(&entries)),
            entries,
        })
    }
}

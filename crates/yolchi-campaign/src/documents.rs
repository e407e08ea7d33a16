// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign documents held in the state store.
//!
//! Field names are camelCase so lists written by the dashboard before the
//! versioned envelope existed still load.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use yolchi_core::{Document, DriverStatus};
use yolchi_funnel::DriverMatch;

/// Status counts over the registry rows matched by an SMS list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionStats {
    pub total_matched: u64,
    /// Matched rows that are active.
    pub converted: u64,
    pub pending: u64,
    pub inactive: u64,
}

impl ConversionStats {
    pub fn from_matches(matches: &[DriverMatch<'_>]) -> Self {
        let mut stats = Self::default();
        for m in matches {
            stats.total_matched += 1;
            match m.status {
                DriverStatus::Active => stats.converted += 1,
                DriverStatus::Pending => stats.pending += 1,
                DriverStatus::Inactive => stats.inactive += 1,
                DriverStatus::Blocked => {}
            }
        }
        stats
    }
}

/// The last uploaded SMS recipient list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsUpload {
    /// Unique normalized numbers.
    pub phone_numbers: Vec<String>,
    pub uploaded_at: Option<String>,
    pub total_sent: u64,
    /// Registry ids matched at upload time.
    pub matched_drivers: Vec<String>,
    pub conversion_stats: ConversionStats,
}

impl Document for SmsUpload {
    const KEY: &'static str = "reactivation-sms-data";
}

impl SmsUpload {
    pub fn is_uploaded(&self) -> bool {
        self.uploaded_at.is_some()
    }
}

/// Operator classification of a number on the call list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Driver,
    Client,
}

/// Outcome of an operator call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    #[default]
    NotCalled,
    WillRegister,
    NotReachable,
    WrongRoute,
    NotSuitable,
    AlreadyRegistered,
}

/// One number on the call list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEntry {
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub manual_type: Option<ContactKind>,
    #[serde(default)]
    pub call_status: CallOutcome,
    #[serde(default)]
    pub called_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CallEntry {
    pub fn new(phone: String, message: String) -> Self {
        Self {
            phone,
            message,
            manual_type: None,
            call_status: CallOutcome::NotCalled,
            called_at: None,
            notes: None,
        }
    }

    /// Clear the call outcome, keeping the number, message and classification.
    pub fn reset_call(&mut self) {
        self.call_status = CallOutcome::NotCalled;
        self.called_at = None;
        self.notes = None;
    }
}

/// The call-center list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallCenterList {
    pub entries: Vec<CallEntry>,
    pub uploaded_at: Option<String>,
}

impl Document for CallCenterList {
    const KEY: &'static str = "call-center-data-v3";
}

impl CallCenterList {
    pub fn is_uploaded(&self) -> bool {
        self.uploaded_at.is_some()
    }
}

/// Manually entered target-ads figures from the ad platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetStats {
    pub regular_views: u64,
    pub regular_installs: u64,
    pub regular_registrations: u64,
    pub lead_views: u64,
    pub lead_installs: u64,
    pub updated_at: Option<String>,
}

impl Document for TargetStats {
    const KEY: &'static str = "reactivation-target-stats";
}

/// Partial update of [`TargetStats`]; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetStatsUpdate {
    pub regular_views: Option<u64>,
    pub regular_installs: Option<u64>,
    pub regular_registrations: Option<u64>,
    pub lead_views: Option<u64>,
    pub lead_installs: Option<u64>,
}

impl TargetStats {
    pub fn apply(&mut self, update: TargetStatsUpdate) {
        let TargetStatsUpdate {
            regular_views,
            regular_installs,
            regular_registrations,
            lead_views,
            lead_installs,
        } = update;
        self.regular_views = regular_views.unwrap_or(self.regular_views);
        self.regular_installs = regular_installs.unwrap_or(self.regular_installs);
        self.regular_registrations = regular_registrations.unwrap_or(self.regular_registrations);
        self.lead_views = lead_views.unwrap_or(self.lead_views);
        self.lead_installs = lead_installs.unwrap_or(self.lead_installs);
    }
}

/// Follow-up state of a reactivation call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReactivationStatus {
    #[default]
    NotCalled,
    Called,
    NoAnswer,
    Callback,
    Interested,
    NotInterested,
    Converted,
}

/// Reactivation follow-up for one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    pub driver_id: String,
    #[serde(default)]
    pub call_status: ReactivationStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub last_contact_date: Option<String>,
    #[serde(default)]
    pub call_attempts: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Totals derived from the tracking entries on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingStats {
    pub total_called: u64,
    pub total_converted: u64,
    pub last_updated: Option<String>,
}

/// A tracking change submitted by an operator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingUpdate {
    pub driver_id: String,
    #[serde(default)]
    pub call_status: Option<ReactivationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Reactivation tracking keyed by driver id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingBook {
    pub entries: BTreeMap<String, TrackingEntry>,
    pub stats: TrackingStats,
}

impl Document for TrackingBook {
    const KEY: &'static str = "reactivation-tracking";
}

impl TrackingBook {
    /// Apply `update` at `now` and return the resulting entry.
    ///
    /// A status other than `not_called` stamps the contact date; it adds an
    /// attempt only when it differs from the stored status.
    pub fn upsert(&mut self, update: TrackingUpdate, now: &str) -> TrackingEntry {
        let existing = self.entries.get(&update.driver_id);
        let contacted = update
            .call_status
            .filter(|s| *s != ReactivationStatus::NotCalled);
        let previous_status = existing.map(|e| e.call_status);
        let attempts = existing.map_or(0, |e| e.call_attempts);

        let entry = TrackingEntry {
            driver_id: update.driver_id.clone(),
            call_status: update
                .call_status
                .or(previous_status)
                .unwrap_or_default(),
            notes: update
                .notes
                .or_else(|| existing.map(|e| e.notes.clone()))
                .unwrap_or_default(),
            last_contact_date: match contacted {
                Some(_) => Some(now.to_string()),
                None => existing.and_then(|e| e.last_contact_date.clone()),
            },
            call_attempts: match contacted {
                Some(status) if previous_status != Some(status) => attempts + 1,
                _ => attempts,
            },
            created_at: existing.map_or_else(|| now.to_string(), |e| e.created_at.clone()),
            updated_at: now.to_string(),
        };
        self.entries.insert(update.driver_id, entry.clone());
        entry
    }

    pub fn remove(&mut self, driver_id: &str) -> bool {
        self.entries.remove(driver_id).is_some()
    }

    /// Recount the stats from the entries.
    pub fn recompute(&mut self, now: &str) {
        let entries = self.entries.values();
        self.stats = TrackingStats {
            total_called: entries
                .clone()
                .filter(|e| e.call_status != ReactivationStatus::NotCalled)
                .count() as u64,
            total_converted: entries
                .filter(|e| e.call_status == ReactivationStatus::Converted)
                .count() as u64,
            last_updated: Some(now.to_string()),
        };
    }
}

/// Driver ids followed for reactivation, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackedIds {
    pub ids: Vec<String>,
}

impl Document for TrackedIds {
    const KEY: &'static str = "reactivation-tracked-ids";

    /// Early writers stored a bare array of ids.
    fn migrate(version: u32, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        if version == 0 && data.is_array() {
            return Ok(Self {
                ids: serde_json::from_value(data)?,
            });
        }
        serde_json::from_value(data)
    }
}

impl TrackedIds {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Append ids not yet present, skipping blanks; returns how many were added.
    pub fn add<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.ids.len();
        let mut seen: HashSet<String> = self.ids.iter().cloned().collect();
        for id in ids {
            let id: String = id.into();
            let id = id.trim();
            if !id.is_empty() && seen.insert(id.to_string()) {
                self.ids.push(id.to_string());
            }
        }
        self.ids.len() - before
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        self.ids.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: &str = "2026-02-01T08:00:00.000Z";
    const T2: &str = "2026-02-02T08:00:00.000Z";
    const T3: &str = "2026-02-03T08:00:00.000Z";

    fn update(status: Option<ReactivationStatus>, notes: Option<&str>) -> TrackingUpdate {
        TrackingUpdate {
            driver_id: "d1".into(),
            call_status: status,
            notes: notes.map(Into::into),
        }
    }

    #[test]
    fn attempts_count_status_changes_only() {
        let mut book = TrackingBook::default();

        let first = book.upsert(update(Some(ReactivationStatus::NoAnswer), None), T1);
        assert_eq!(first.call_attempts, 1);
        assert_eq!(first.last_contact_date.as_deref(), Some(T1));
        assert_eq!(first.created_at, T1);

        let same = book.upsert(update(Some(ReactivationStatus::NoAnswer), None), T2);
        assert_eq!(same.call_attempts, 1);
        assert_eq!(same.last_contact_date.as_deref(), Some(T2));

        let changed = book.upsert(update(Some(ReactivationStatus::Converted), None), T3);
        assert_eq!(changed.call_attempts, 2);
        assert_eq!(changed.created_at, T1);
        assert_eq!(changed.updated_at, T3);
    }

    #[test]
    fn notes_only_update_keeps_status_and_contact() {
        let mut book = TrackingBook::default();
        book.upsert(update(Some(ReactivationStatus::Callback), Some("evening")), T1);

        let entry = book.upsert(update(None, Some("after 18:00")), T2);
        assert_eq!(entry.call_status, ReactivationStatus::Callback);
        assert_eq!(entry.notes, "after 18:00");
        assert_eq!(entry.call_attempts, 1);
        assert_eq!(entry.last_contact_date.as_deref(), Some(T1));
    }

    #[test]
    fn not_called_never_counts_as_contact() {
        let mut book = TrackingBook::default();
        let entry = book.upsert(update(Some(ReactivationStatus::NotCalled), None), T1);
        assert_eq!(entry.call_attempts, 0);
        assert_eq!(entry.last_contact_date, None);
    }

    #[test]
    fn stats_follow_entries() {
        let mut book = TrackingBook::default();
        book.upsert(update(Some(ReactivationStatus::Converted), None), T1);
        book.upsert(
            TrackingUpdate {
                driver_id: "d2".into(),
                call_status: Some(ReactivationStatus::NotCalled),
                notes: None,
            },
            T1,
        );
        book.recompute(T2);
        assert_eq!(book.stats.total_called, 1);
        assert_eq!(book.stats.total_converted, 1);

        assert!(book.remove("d1"));
        book.recompute(T3);
        assert_eq!(book.stats.total_converted, 0);
        assert_eq!(book.stats.last_updated.as_deref(), Some(T3));
    }

    #[test]
    fn target_update_merges_present_fields() {
        let mut stats = TargetStats {
            regular_views: 100,
            lead_views: 40,
            ..TargetStats::default()
        };
        let update: TargetStatsUpdate =
            serde_json::from_str(r#"{"regularInstalls": 12, "leadViews": 55}"#).unwrap();
        stats.apply(update);
        assert_eq!(stats.regular_views, 100);
        assert_eq!(stats.regular_installs, 12);
        assert_eq!(stats.lead_views, 55);
    }

    #[test]
    fn tracked_ids_accept_legacy_array() {
        let ids = TrackedIds::migrate(0, serde_json::json!(["a", "b"])).unwrap();
        assert_eq!(ids.ids, vec!["a", "b"]);

        let ids = TrackedIds::migrate(1, serde_json::json!({"ids": ["c"]})).unwrap();
        assert_eq!(ids.ids, vec!["c"]);
    }

    #[test]
    fn tracked_ids_add_skips_known_and_blank() {
        let mut tracked = TrackedIds::default();
        assert_eq!(tracked.add(["a", "b", "a", " "]), 2);
        assert_eq!(tracked.add(vec!["b".to_string(), "c".to_string()]), 1);
        assert_eq!(tracked.ids, vec!["a", "b", "c"]);
        assert!(tracked.remove("b"));
        assert!(!tracked.remove("b"));
    }

    #[test]
    fn tracked_ids_add_large_batch_keeps_first_order() {
        let mut tracked = TrackedIds::default();
        tracked.add(["d0"]);
        let batch: Vec<String> = (0..5000).map(|i| format!("d{}", i % 2500)).collect();
        assert_eq!(tracked.add(batch), 2499);
        assert_eq!(tracked.ids.len(), 2500);
        assert_eq!(tracked.ids[0], "d0");
        assert_eq!(tracked.ids[1], "d1");
        assert_eq!(tracked.ids[2499], "d2499");
        assert_eq!(tracked.add([" d7 ", "d2500"]), 1);
    }

    #[test]
    fn legacy_call_list_loads() {
        let raw = serde_json::json!({
            "entries": [{
                "phone": "998901234567",
                "message": "hi",
                "manualType": null,
                "callStatus": "will_register",
                "calledAt": "2026-02-01T08:00:00.000Z",
                "notes": null
            }],
            "uploadedAt": "2026-02-01T07:00:00.000Z"
        });
        let list = CallCenterList::migrate(0, raw).unwrap();
        assert!(list.is_uploaded());
        assert_eq!(list.entries[0].call_status, CallOutcome::WillRegister);
    }
}

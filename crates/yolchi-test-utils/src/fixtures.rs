// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry account fixtures.
//!
//! A fixture starts as a pending, fully registered driver without a phone or
//! route; builder methods narrow it down to the row a test needs.

use rusqlite::params;
use yolchi_core::DriverStatus;

/// Role id of driver accounts in the default configuration.
pub const DRIVER_ROLE: &str = "2";
/// Role id used for passenger accounts in fixtures.
pub const PASSENGER_ROLE: &str = "1";

/// One registry account to insert.
#[derive(Debug, Clone)]
pub struct DriverFixture {
    pub id: String,
    pub role_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: DriverStatus,
    pub source_tag: Option<String>,
    pub created_at: String,
    pub region_id: Option<String>,
    pub sub_region_id: Option<String>,
    pub departure_region_id: Option<String>,
    pub arrival_region_id: Option<String>,
    pub reason_ids: Vec<String>,
    /// Whether a `driver_infos` row is written.
    pub has_profile: bool,
}

impl DriverFixture {
    pub fn driver(id: &str) -> Self {
        Self {
            id: id.to_string(),
            role_id: DRIVER_ROLE.to_string(),
            first_name: Some(format!("Driver {id}")),
            last_name: None,
            phone_number: None,
            status: DriverStatus::Pending,
            source_tag: None,
            created_at: "2026-01-27T08:00:00.000Z".to_string(),
            region_id: None,
            sub_region_id: None,
            departure_region_id: None,
            arrival_region_id: None,
            reason_ids: Vec::new(),
            has_profile: true,
        }
    }

    pub fn passenger(id: &str) -> Self {
        Self {
            role_id: PASSENGER_ROLE.to_string(),
            ..Self::driver(id)
        }
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.phone_number = Some(phone.to_string());
        self
    }

    pub fn status(mut self, status: DriverStatus) -> Self {
        self.status = status;
        self
    }

    /// Logged in but never completed the profile.
    pub fn login_only(mut self) -> Self {
        self.first_name = Some(String::new());
        self
    }

    pub fn name(mut self, first: &str, last: &str) -> Self {
        self.first_name = Some(first.to_string());
        self.last_name = Some(last.to_string());
        self
    }

    /// Registration instant, e.g. `2026-01-27T08:00:00.000Z`.
    pub fn created(mut self, created_at: &str) -> Self {
        self.created_at = created_at.to_string();
        self
    }

    pub fn source(mut self, tag: &str) -> Self {
        self.source_tag = Some(tag.to_string());
        self
    }

    pub fn home(mut self, region_id: &str, sub_region_id: Option<&str>) -> Self {
        self.region_id = Some(region_id.to_string());
        self.sub_region_id = sub_region_id.map(str::to_string);
        self
    }

    pub fn route(mut self, departure: &str, arrival: &str) -> Self {
        self.departure_region_id = Some(departure.to_string());
        self.arrival_region_id = Some(arrival.to_string());
        self
    }

    pub fn reason(mut self, reason_id: &str) -> Self {
        self.reason_ids.push(reason_id.to_string());
        self
    }

    /// Account row only, as left by an abandoned signup.
    pub fn without_profile(mut self) -> Self {
        self.has_profile = false;
        self
    }

    /// Insert the account, its driver profile and its moderation reasons.
    pub(crate) fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO customers \
             (id, role_id, first_name, last_name, phone_number, status, register_sources_comment, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.id,
                self.role_id,
                self.first_name,
                self.last_name,
                self.phone_number,
                self.status.to_string(),
                self.source_tag,
                self.created_at,
            ],
        )?;
        if self.has_profile {
            conn.execute(
                "INSERT INTO driver_infos \
                 (customer_id, region_id, sub_region_id, departure_region_id, arrival_region_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    self.id,
                    self.region_id,
                    self.sub_region_id,
                    self.departure_region_id,
                    self.arrival_region_id,
                ],
            )?;
        }
        for reason_id in &self.reason_ids {
            conn.execute(
                "INSERT INTO customer_moderation_reasons (customer_id, reason_id) VALUES (?1, ?2)",
                params![self.id, reason_id],
            )?;
        }
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` opens a temp SQLite database, seeds the registry reference
//! tables and the requested driver fixtures, and wires the campaign services
//! to it with a clock pinned to a fixed instant.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use yolchi_campaign::{Campaign, FixedClock};
use yolchi_config::model::{StateBackend, YolchiConfig};
use yolchi_core::YolchiError;
use yolchi_storage::{Database, SqliteDriverRegistry, state_store_for};

use crate::fixtures::DriverFixture;

/// Regions seeded besides the configured corridor ends.
const OTHER_REGIONS: &[(&str, &str)] = &[("3", "Samarqand")];
const SUB_REGIONS: &[(&str, &str, &str)] = &[("91", "9", "Chirchiq"), ("92", "9", "Angren")];

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: YolchiConfig,
    drivers: Vec<DriverFixture>,
    extra_reasons: Vec<(String, String)>,
    now: DateTime<Utc>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: YolchiConfig::default(),
            drivers: Vec::new(),
            extra_reasons: Vec::new(),
            // Day 10 of the default campaign in local time.
            now: Utc.with_ymd_and_hms(2026, 2, 7, 7, 0, 0).single().unwrap_or_default(),
        }
    }

    /// Replace the configuration. The database path is always overridden.
    pub fn with_config(mut self, config: YolchiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_driver(mut self, driver: DriverFixture) -> Self {
        self.drivers.push(driver);
        self
    }

    pub fn with_drivers(mut self, drivers: impl IntoIterator<Item = DriverFixture>) -> Self {
        self.drivers.extend(drivers);
        self
    }

    /// Seed a moderation reason beyond the configured labels.
    pub fn with_reason(mut self, id: &str, title: &str) -> Self {
        self.extra_reasons.push((id.to_string(), title.to_string()));
        self
    }

    /// Pin the campaign clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Keep campaign documents in memory instead of the database.
    pub fn with_memory_state(mut self) -> Self {
        self.config.storage.state_backend = StateBackend::Memory;
        self
    }

    /// Build the test harness, creating the database and seeding it.
    pub async fn build(self) -> Result<TestHarness, YolchiError> {
        let temp_dir = tempfile::TempDir::new().map_err(YolchiError::storage)?;
        let mut config = self.config;
        config.storage.database_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();

        let db = Database::open_from_config(&config.storage).await?;
        seed(&db, &config, self.extra_reasons, self.drivers).await?;

        let config = Arc::new(config);
        let registry = Arc::new(SqliteDriverRegistry::new(db.clone()));
        let state = state_store_for(&config.storage, &db);
        let campaign = Campaign::new(config.clone(), registry, state)
            .with_clock(Arc::new(FixedClock(self.now)));

        Ok(TestHarness {
            campaign,
            db,
            config,
            _temp_dir: temp_dir,
        })
    }
}

async fn seed(
    db: &Database,
    config: &YolchiConfig,
    extra_reasons: Vec<(String, String)>,
    drivers: Vec<DriverFixture>,
) -> Result<(), YolchiError> {
    let campaign = config.campaign.clone();
    let mut reasons: Vec<(String, String)> = config
        .reasons
        .labels
        .iter()
        .map(|(id, title)| (id.clone(), title.clone()))
        .collect();
    reasons.extend(extra_reasons);

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO regions (id, name) VALUES (?1, ?2)",
                (&campaign.region_id, &campaign.region_name),
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO regions (id, name) VALUES (?1, 'Toshkent')",
                [&campaign.city_id],
            )?;
            for (id, name) in OTHER_REGIONS {
                tx.execute(
                    "INSERT OR IGNORE INTO regions (id, name) VALUES (?1, ?2)",
                    (id, name),
                )?;
            }
            for (id, region_id, name) in SUB_REGIONS {
                tx.execute(
                    "INSERT OR IGNORE INTO sub_regions (id, region_id, name) VALUES (?1, ?2, ?3)",
                    (id, region_id, name),
                )?;
            }
            for (id, title) in &reasons {
                tx.execute(
                    "INSERT OR REPLACE INTO reasons (id, title) VALUES (?1, ?2)",
                    (id, title),
                )?;
            }
            for driver in &drivers {
                driver.insert(&tx)?;
            }
            tx.commit()?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .map_err(YolchiError::storage)
}

/// Campaign services over a seeded temp database.
pub struct TestHarness {
    pub campaign: Campaign,
    /// Database handle, for seeding more rows mid-test.
    pub db: Database,
    pub config: Arc<YolchiConfig>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Insert more registry rows after the harness was built.
    pub async fn insert_drivers(&self, drivers: Vec<DriverFixture>) -> Result<(), YolchiError> {
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                for driver in &drivers {
                    driver.insert(&tx)?;
                }
                tx.commit()?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .map_err(YolchiError::storage)
    }
}

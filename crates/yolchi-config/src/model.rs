// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Yolchi.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level Yolchi configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct YolchiConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Database and campaign state storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Campaign geography, dates and target.
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Acquisition-source tags written by registration forms.
    #[serde(default)]
    pub sources: SourceConfig,

    /// Budget total, exchange rate and expense categories.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Inactivity reason classification.
    #[serde(default)]
    pub reasons: ReasonConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "yolchi".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which backend holds campaign documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    /// `campaign_documents` table in the main database.
    #[default]
    Sqlite,
    /// Process memory; lost on restart. Local development only.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    #[serde(default)]
    pub state_backend: StateBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            state_backend: StateBackend::default(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("yolchi").join("yolchi.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("yolchi.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Campaign geography, calendar and target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignConfig {
    /// Province id; one end of the corridor and the home region for reactivation.
    #[serde(default = "default_region_id")]
    pub region_id: String,

    /// Principal city id; the other end of the corridor.
    #[serde(default = "default_city_id")]
    pub city_id: String,

    /// Human-readable region name reported in metadata.
    #[serde(default = "default_region_name")]
    pub region_name: String,

    /// Registry role id of driver accounts.
    #[serde(default = "default_driver_role_id")]
    pub driver_role_id: String,

    /// Registrations on or after this date form the new-driver cohort.
    #[serde(default = "default_data_start_date")]
    pub data_start_date: NaiveDate,

    /// Cohort start for the flyer and telegram report.
    #[serde(default = "default_data_start_date")]
    pub flyer_start_date: NaiveDate,

    /// First campaign day used by pacing.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    #[serde(default = "default_duration_days")]
    pub duration_days: u32,

    /// Active drivers to reach by the end of the campaign.
    #[serde(default = "default_target_active_drivers")]
    pub target_active_drivers: u32,

    /// Offset of the campaign's calendar day from UTC.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            region_id: default_region_id(),
            city_id: default_city_id(),
            region_name: default_region_name(),
            driver_role_id: default_driver_role_id(),
            data_start_date: default_data_start_date(),
            flyer_start_date: default_data_start_date(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            duration_days: default_duration_days(),
            target_active_drivers: default_target_active_drivers(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_region_id() -> String {
    "9".to_string()
}

fn default_city_id() -> String {
    "2".to_string()
}

fn default_region_name() -> String {
    "Toshkent Viloyati".to_string()
}

fn default_driver_role_id() -> String {
    "2".to_string()
}

fn default_data_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 26).unwrap_or_default()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 29).unwrap_or_default()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 27).unwrap_or_default()
}

fn default_duration_days() -> u32 {
    30
}

fn default_target_active_drivers() -> u32 {
    250
}

fn default_utc_offset_hours() -> i32 {
    5
}

/// Acquisition-source tags.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Lead-form target ads.
    #[serde(default = "default_lead_source")]
    pub lead: String,

    /// Regular target ads.
    #[serde(default = "default_regular_source")]
    pub regular_target: String,

    #[serde(default = "default_telegram_global_source")]
    pub telegram_global: String,

    #[serde(default = "default_telegram_ads_source")]
    pub telegram_ads: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            lead: default_lead_source(),
            regular_target: default_regular_source(),
            telegram_global: default_telegram_global_source(),
            telegram_ads: default_telegram_ads_source(),
        }
    }
}

fn default_lead_source() -> String {
    "cml5adx980000la04tuyyeh8e".to_string()
}

fn default_regular_source() -> String {
    "cmkurqj560002kt043hp58v76".to_string()
}

fn default_telegram_global_source() -> String {
    "telegram_global".to_string()
}

fn default_telegram_ads_source() -> String {
    "telegram_ads".to_string()
}

/// One configured expense category.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub id: String,
    pub name: String,
    /// Local-currency price of one unit (one SMS, one flyer), when priced per unit.
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
}

impl CategoryConfig {
    fn new(id: &str, name: &str, cost_per_unit: Option<f64>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost_per_unit,
        }
    }
}

/// Budget configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Budget used until an operator sets one in the ledger.
    #[serde(default = "default_total_budget_usd")]
    pub total_budget_usd: f64,

    /// Fixed local-currency units per USD.
    #[serde(default = "default_usd_to_local")]
    pub usd_to_local: f64,

    /// Code of the local currency (display only).
    #[serde(default = "default_local_currency")]
    pub local_currency: String,

    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            total_budget_usd: default_total_budget_usd(),
            usd_to_local: default_usd_to_local(),
            local_currency: default_local_currency(),
            categories: default_categories(),
        }
    }
}

impl BudgetConfig {
    pub fn category(&self, id: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.id == id)
    }
}

fn default_total_budget_usd() -> f64 {
    5000.0
}

fn default_usd_to_local() -> f64 {
    12_900.0
}

fn default_local_currency() -> String {
    "UZS".to_string()
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("sms", "SMS", Some(150.0)),
        CategoryConfig::new("ads_regular", "Target (regular)", None),
        CategoryConfig::new("ads_lead", "Target (lead form)", None),
        CategoryConfig::new("flyers", "Flyers", None),
        CategoryConfig::new("telegram", "Telegram", None),
        CategoryConfig::new("call_center", "Call center", None),
        CategoryConfig::new("other", "Other", None),
    ]
}

/// Inactivity reason classification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReasonConfig {
    /// Document problems the driver can correct.
    #[serde(default = "default_fixable_reasons")]
    pub fixable: Vec<String>,

    /// Vehicle does not meet the rules; a different car is needed.
    #[serde(default = "default_not_eligible_reasons")]
    pub not_eligible: Vec<String>,

    /// Display labels used when the registry title is missing.
    #[serde(default = "default_reason_labels")]
    pub labels: BTreeMap<String, String>,
}

impl Default for ReasonConfig {
    fn default() -> Self {
        Self {
            fixable: default_fixable_reasons(),
            not_eligible: default_not_eligible_reasons(),
            labels: default_reason_labels(),
        }
    }
}

impl ReasonConfig {
    /// Every tracked reason id, fixable first.
    pub fn all_ids(&self) -> Vec<String> {
        self.fixable
            .iter()
            .chain(self.not_eligible.iter())
            .cloned()
            .collect()
    }

    pub fn is_fixable(&self, reason_id: &str) -> bool {
        self.fixable.iter().any(|r| r == reason_id)
    }
}

fn default_fixable_reasons() -> Vec<String> {
    vec!["59".to_string(), "60".to_string()]
}

fn default_not_eligible_reasons() -> Vec<String> {
    vec!["65".to_string()]
}

fn default_reason_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("59".to_string(), "Shaxsiy ma'lumotlarda xatolik".to_string()),
        ("60".to_string(), "Mashina ma'lumotlarida xatolik".to_string()),
        ("65".to_string(), "Reglamentga mos emas".to_string()),
    ])
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every problem instead of stopping at the first one.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::YolchiConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &YolchiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::validation("gateway.port must be greater than 0"));
    }

    let campaign = &config.campaign;
    if campaign.region_id.trim().is_empty() || campaign.city_id.trim().is_empty() {
        errors.push(ConfigError::validation(
            "campaign.region_id and campaign.city_id must not be empty",
        ));
    }
    if campaign.region_id == campaign.city_id {
        errors.push(ConfigError::validation(format!(
            "campaign.region_id and campaign.city_id must differ, both are `{}`",
            campaign.region_id
        )));
    }
    if campaign.duration_days == 0 {
        errors.push(ConfigError::validation(
            "campaign.duration_days must be greater than 0",
        ));
    }
    if campaign.target_active_drivers == 0 {
        errors.push(ConfigError::validation(
            "campaign.target_active_drivers must be greater than 0",
        ));
    }
    if campaign.end_date < campaign.start_date {
        errors.push(ConfigError::validation(format!(
            "campaign.end_date ({}) is before campaign.start_date ({})",
            campaign.end_date, campaign.start_date
        )));
    }
    if !(-12..=14).contains(&campaign.utc_offset_hours) {
        errors.push(ConfigError::validation(format!(
            "campaign.utc_offset_hours must be within -12..=14, got {}",
            campaign.utc_offset_hours
        )));
    }

    let budget = &config.budget;
    if budget.usd_to_local.is_nan() || budget.usd_to_local <= 0.0 {
        errors.push(ConfigError::validation(format!(
            "budget.usd_to_local must be positive, got {}",
            budget.usd_to_local
        )));
    }
    if budget.total_budget_usd < 0.0 {
        errors.push(ConfigError::validation(format!(
            "budget.total_budget_usd must be non-negative, got {}",
            budget.total_budget_usd
        )));
    }
    let mut seen = HashSet::new();
    for category in &budget.categories {
        if category.id.trim().is_empty() {
            errors.push(ConfigError::validation("budget category id must not be empty"));
        }
        if !seen.insert(category.id.as_str()) {
            errors.push(ConfigError::validation(format!(
                "budget category `{}` is defined more than once",
                category.id
            )));
        }
        if let Some(cost) = category.cost_per_unit
            && cost < 0.0
        {
            errors.push(ConfigError::validation(format!(
                "budget category `{}` has negative cost_per_unit {cost}",
                category.id
            )));
        }
    }

    let reasons = &config.reasons;
    for id in &reasons.fixable {
        if reasons.not_eligible.contains(id) {
            errors.push(ConfigError::validation(format!(
                "reason `{id}` is listed as both fixable and not_eligible"
            )));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot `report`, `import` and `config show` commands.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use yolchi_campaign::Campaign;
use yolchi_config::model::YolchiConfig;
use yolchi_core::YolchiError;
use yolchi_storage::{Database, SqliteDriverRegistry, state_store_for};

use crate::serve::init_tracing;
use crate::{ImportKind, ReportKind};

/// Open the database and wire the campaign services to it.
pub async fn open_campaign(config: YolchiConfig) -> Result<(Campaign, Database), YolchiError> {
    let db = Database::open_from_config(&config.storage).await?;
    let registry = Arc::new(SqliteDriverRegistry::new(db.clone()));
    let state = state_store_for(&config.storage, &db);
    Ok((Campaign::new(Arc::new(config), registry, state), db))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), YolchiError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| YolchiError::Internal(format!("failed to encode report: {e}")))?;
    println!("{json}");
    Ok(())
}

async fn print_report(campaign: &Campaign, kind: ReportKind) -> Result<(), YolchiError> {
    match kind {
        ReportKind::Corridor => print_json(&campaign.corridor_stats(None).await?),
        ReportKind::AllRegions => print_json(&campaign.all_region_stats(None).await?),
        ReportKind::Sms => print_json(&campaign.sms_report().await?),
        ReportKind::CallCenter => print_json(&campaign.call_center_report().await?),
        ReportKind::Budget => print_json(&campaign.budget_report().await?),
        ReportKind::Target => print_json(&campaign.target_report().await?),
        ReportKind::Channels => print_json(&campaign.channel_report().await?),
        ReportKind::Reactivation => print_json(&campaign.reactivation_candidates(None).await?),
        ReportKind::Dashboard => print_json(&campaign.dashboard().await?),
        ReportKind::Campaigns => print_json(&campaign.campaign_records().await?),
    }
}

pub async fn run_report(config: YolchiConfig, kind: ReportKind) -> Result<(), YolchiError> {
    init_tracing(&config.app.log_level);
    let (campaign, db) = open_campaign(config).await?;
    let printed = print_report(&campaign, kind).await;
    db.close().await?;
    printed
}

pub async fn run_import(
    config: YolchiConfig,
    list: ImportKind,
    file: &Path,
    phone_column: Option<usize>,
) -> Result<(), YolchiError> {
    init_tracing(&config.app.log_level);
    let text = tokio::fs::read_to_string(file).await.map_err(|e| {
        YolchiError::InvalidInput(format!("cannot read {}: {e}", file.display()))
    })?;

    let (campaign, db) = open_campaign(config).await?;
    let imported = match list {
        ImportKind::Sms => campaign
            .upload_sms(&text, phone_column)
            .await
            .and_then(|receipt| print_json(&receipt)),
        ImportKind::CallCenter => campaign
            .import_call_list(&text)
            .await
            .and_then(|summary| print_json(&summary)),
    };
    db.close().await?;
    imported
}

pub fn show_config(config: &YolchiConfig) -> Result<(), YolchiError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| YolchiError::Internal(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `yolchi serve`: open the stores and run the HTTP gateway.

use tracing::info;
use yolchi_config::model::YolchiConfig;
use yolchi_core::YolchiError;
use yolchi_gateway::{GatewayState, start_server};

use crate::commands::open_campaign;

pub async fn run_serve(config: YolchiConfig) -> Result<(), YolchiError> {
    init_tracing(&config.app.log_level);

    let gateway = config.gateway.clone();
    let (campaign, db) = open_campaign(config).await?;
    info!(
        region = %campaign.config().campaign.region_name,
        start = %campaign.config().campaign.start_date,
        "campaign services ready"
    );

    let served = start_server(&gateway, GatewayState { campaign }).await;
    db.close().await?;
    served
}

/// Install the global subscriber. Logs go to stderr so report output stays clean.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("yolchi={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

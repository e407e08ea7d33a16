// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the campaign API.

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use yolchi_campaign::{TrackingBook, TrackingStats};
use yolchi_campaign::budget::{BudgetChange, BudgetReport, BudgetUpdate};
use yolchi_campaign::call_center::{CallCenterReport, CallListImport, CallUpdate};
use yolchi_campaign::channels::ChannelReport;
use yolchi_campaign::documents::{CallEntry, TargetStats, TargetStatsUpdate, TrackingUpdate};
use yolchi_campaign::reactivation::{
    CandidateList, TrackedChange, TrackedSet, TrackingReceipt,
};
use yolchi_campaign::records::{
    CampaignPatch, CampaignRecord, CampaignRecords, CreatedRecord, NewRecord,
};
use yolchi_campaign::sms::{SmsMatchReport, SmsReport, SmsUploadReceipt};
use yolchi_campaign::stats::{
    AllRegionStats, CorridorStats, Dashboard, DriverListQuery, DriverPage,
};
use yolchi_campaign::target::TargetReport;
use yolchi_core::{DriverStatus, Region, SubRegion, YolchiError};

use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Acknowledgement of a delete.
#[derive(Debug, Serialize)]
pub struct Cleared {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CorridorQuery {
    pub from_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsUploadRequest {
    pub csv_data: String,
    #[serde(default)]
    pub phone_column: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SmsMatchRequest {
    pub phones: Vec<String>,
}

/// POST /v1/call-center body, selected by `action`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CallCenterAction {
    Import {
        #[serde(rename = "csvData")]
        csv_data: String,
    },
    Update(CallUpdate),
    Reset,
}

/// Result of a call-center action.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CallCenterOutcome {
    Imported(CallListImport),
    Updated { entry: CallEntry },
    Reset { reset: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusQuery {
    /// A status name, or `all`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverIdQuery {
    pub driver_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRequest {
    pub driver_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubRegionQuery {
    pub region_id: Option<String>,
}

/// PUT /v1/campaigns body. Only `type: campaign` records can be updated.
#[derive(Debug, Deserialize)]
pub struct RecordUpdateRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub patch: CampaignPatch,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /v1/stats/corridor
pub async fn get_corridor_stats(
    State(state): State<GatewayState>,
    Query(query): Query<CorridorQuery>,
) -> ApiResult<CorridorStats> {
    Ok(Json(state.campaign.corridor_stats(query.from_date).await?))
}

/// GET /v1/stats/all-regions
pub async fn get_all_region_stats(
    State(state): State<GatewayState>,
    Query(query): Query<CorridorQuery>,
) -> ApiResult<AllRegionStats> {
    Ok(Json(state.campaign.all_region_stats(query.from_date).await?))
}

/// GET /v1/regions
pub async fn get_regions(State(state): State<GatewayState>) -> ApiResult<Vec<Region>> {
    Ok(Json(state.campaign.regions().await?))
}

/// GET /v1/sub-regions?region_id=
pub async fn get_sub_regions(
    State(state): State<GatewayState>,
    Query(query): Query<SubRegionQuery>,
) -> ApiResult<Vec<SubRegion>> {
    Ok(Json(state.campaign.sub_regions(query.region_id).await?))
}

/// GET /v1/campaigns
pub async fn get_campaigns(State(state): State<GatewayState>) -> ApiResult<CampaignRecords> {
    Ok(Json(state.campaign.campaign_records().await?))
}

/// POST /v1/campaigns, record kind chosen by `type`.
pub async fn post_campaigns(
    State(state): State<GatewayState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<CreatedRecord> {
    let record = NewRecord::from_json(body)?;
    Ok(Json(state.campaign.create_record(record).await?))
}

/// PUT /v1/campaigns
pub async fn put_campaigns(
    State(state): State<GatewayState>,
    Json(body): Json<RecordUpdateRequest>,
) -> ApiResult<CampaignRecord> {
    if body.kind.as_deref() != Some("campaign") {
        return Err(YolchiError::not_found("campaign", body.patch.id).into());
    }
    Ok(Json(state.campaign.update_campaign_record(body.patch).await?))
}

/// GET /v1/drivers
pub async fn get_drivers(
    State(state): State<GatewayState>,
    Query(query): Query<DriverListQuery>,
) -> ApiResult<DriverPage> {
    Ok(Json(state.campaign.driver_list(query).await?))
}

/// GET /v1/sms
pub async fn get_sms(State(state): State<GatewayState>) -> ApiResult<SmsReport> {
    Ok(Json(state.campaign.sms_report().await?))
}

/// POST /v1/sms
pub async fn post_sms(
    State(state): State<GatewayState>,
    Json(body): Json<SmsUploadRequest>,
) -> ApiResult<SmsUploadReceipt> {
    Ok(Json(
        state
            .campaign
            .upload_sms(&body.csv_data, body.phone_column)
            .await?,
    ))
}

/// DELETE /v1/sms
pub async fn delete_sms(State(state): State<GatewayState>) -> ApiResult<Cleared> {
    state.campaign.clear_sms().await?;
    Ok(Json(Cleared { success: true }))
}

/// POST /v1/sms/match
pub async fn post_sms_match(
    State(state): State<GatewayState>,
    Json(body): Json<SmsMatchRequest>,
) -> ApiResult<SmsMatchReport> {
    Ok(Json(state.campaign.match_phones(&body.phones).await?))
}

/// GET /v1/call-center
pub async fn get_call_center(State(state): State<GatewayState>) -> ApiResult<CallCenterReport> {
    Ok(Json(state.campaign.call_center_report().await?))
}

/// POST /v1/call-center
pub async fn post_call_center(
    State(state): State<GatewayState>,
    Json(action): Json<CallCenterAction>,
) -> ApiResult<CallCenterOutcome> {
    let campaign = &state.campaign;
    let outcome = match action {
        CallCenterAction::Import { csv_data } => {
            CallCenterOutcome::Imported(campaign.import_call_list(&csv_data).await?)
        }
        CallCenterAction::Update(update) => CallCenterOutcome::Updated {
            entry: campaign.update_call(update).await?,
        },
        CallCenterAction::Reset => CallCenterOutcome::Reset {
            reset: campaign.reset_calls().await?,
        },
    };
    Ok(Json(outcome))
}

/// DELETE /v1/call-center
pub async fn delete_call_center(State(state): State<GatewayState>) -> ApiResult<Cleared> {
    state.campaign.clear_call_list().await?;
    Ok(Json(Cleared { success: true }))
}

/// GET /v1/budget
pub async fn get_budget(State(state): State<GatewayState>) -> ApiResult<BudgetReport> {
    Ok(Json(state.campaign.budget_report().await?))
}

/// POST /v1/budget
pub async fn post_budget(
    State(state): State<GatewayState>,
    Json(update): Json<BudgetUpdate>,
) -> ApiResult<BudgetChange> {
    Ok(Json(state.campaign.update_budget(update).await?))
}

/// DELETE /v1/budget?id=
pub async fn delete_budget(
    State(state): State<GatewayState>,
    Query(query): Query<ExpenseQuery>,
) -> ApiResult<BudgetReport> {
    Ok(Json(state.campaign.delete_expense(&query.id).await?))
}

/// GET /v1/target
pub async fn get_target(State(state): State<GatewayState>) -> ApiResult<TargetReport> {
    Ok(Json(state.campaign.target_report().await?))
}

/// POST /v1/target
pub async fn post_target(
    State(state): State<GatewayState>,
    Json(update): Json<TargetStatsUpdate>,
) -> ApiResult<TargetStats> {
    Ok(Json(state.campaign.update_target_stats(update).await?))
}

/// GET /v1/channels
pub async fn get_channels(State(state): State<GatewayState>) -> ApiResult<ChannelReport> {
    Ok(Json(state.campaign.channel_report().await?))
}

/// GET /v1/reactivation/drivers
pub async fn get_reactivation_drivers(
    State(state): State<GatewayState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<CandidateList> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(name) => Some(
            name.parse::<DriverStatus>()
                .map_err(|_| YolchiError::InvalidInput(format!("unknown status '{name}'")))?,
        ),
    };
    Ok(Json(state.campaign.reactivation_candidates(status).await?))
}

/// GET /v1/reactivation/tracking
pub async fn get_tracking(State(state): State<GatewayState>) -> ApiResult<TrackingBook> {
    Ok(Json(state.campaign.tracking().await?))
}

/// POST /v1/reactivation/tracking
pub async fn post_tracking(
    State(state): State<GatewayState>,
    Json(update): Json<TrackingUpdate>,
) -> ApiResult<TrackingReceipt> {
    Ok(Json(state.campaign.track(update).await?))
}

/// DELETE /v1/reactivation/tracking?driverId=
pub async fn delete_tracking(
    State(state): State<GatewayState>,
    Query(query): Query<DriverIdQuery>,
) -> ApiResult<TrackingStats> {
    Ok(Json(state.campaign.untrack(&query.driver_id).await?))
}

/// GET /v1/reactivation/tracked
pub async fn get_tracked(State(state): State<GatewayState>) -> ApiResult<TrackedSet> {
    Ok(Json(state.campaign.tracked_ids().await?))
}

/// POST /v1/reactivation/tracked
pub async fn post_tracked(
    State(state): State<GatewayState>,
    Json(body): Json<TrackedRequest>,
) -> ApiResult<TrackedChange> {
    Ok(Json(state.campaign.add_tracked(body.driver_ids).await?))
}

/// DELETE /v1/reactivation/tracked?driverId=
pub async fn delete_tracked(
    State(state): State<GatewayState>,
    Query(query): Query<DriverIdQuery>,
) -> ApiResult<TrackedSet> {
    Ok(Json(state.campaign.remove_tracked(&query.driver_id).await?))
}

/// POST /v1/reactivation/tracked/sync
pub async fn post_tracked_sync(State(state): State<GatewayState>) -> ApiResult<TrackedChange> {
    Ok(Json(state.campaign.sync_tracked().await?))
}

/// GET /v1/dashboard
pub async fn get_dashboard(State(state): State<GatewayState>) -> ApiResult<Dashboard> {
    Ok(Json(state.campaign.dashboard().await?))
}

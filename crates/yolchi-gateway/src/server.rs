// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use yolchi_campaign::Campaign;
use yolchi_config::model::GatewayConfig;
use yolchi_core::YolchiError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub campaign: Campaign,
}

/// All routes with their middleware.
pub fn router(state: GatewayState) -> Router {
    let api_routes = Router::new()
        .route("/v1/stats/corridor", get(handlers::get_corridor_stats))
        .route("/v1/stats/all-regions", get(handlers::get_all_region_stats))
        .route("/v1/regions", get(handlers::get_regions))
        .route("/v1/sub-regions", get(handlers::get_sub_regions))
        .route(
            "/v1/campaigns",
            get(handlers::get_campaigns)
                .post(handlers::post_campaigns)
                .put(handlers::put_campaigns),
        )
        .route("/v1/drivers", get(handlers::get_drivers))
        .route(
            "/v1/sms",
            get(handlers::get_sms)
                .post(handlers::post_sms)
                .delete(handlers::delete_sms),
        )
        .route("/v1/sms/match", post(handlers::post_sms_match))
        .route(
            "/v1/call-center",
            get(handlers::get_call_center)
                .post(handlers::post_call_center)
                .delete(handlers::delete_call_center),
        )
        .route(
            "/v1/budget",
            get(handlers::get_budget)
                .post(handlers::post_budget)
                .delete(handlers::delete_budget),
        )
        .route(
            "/v1/target",
            get(handlers::get_target).post(handlers::post_target),
        )
        .route("/v1/channels", get(handlers::get_channels))
        .route(
            "/v1/reactivation/drivers",
            get(handlers::get_reactivation_drivers),
        )
        .route(
            "/v1/reactivation/tracking",
            get(handlers::get_tracking)
                .post(handlers::post_tracking)
                .delete(handlers::delete_tracking),
        )
        .route(
            "/v1/reactivation/tracked",
            get(handlers::get_tracked)
                .post(handlers::post_tracked)
                .delete(handlers::delete_tracked),
        )
        .route(
            "/v1/reactivation/tracked/sync",
            post(handlers::post_tracked_sync),
        )
        .route("/v1/dashboard", get(handlers::get_dashboard))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::get_health))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until the process exits.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), YolchiError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| YolchiError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| YolchiError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

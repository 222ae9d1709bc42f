//! Rotasched API server library.

pub mod handlers;
pub mod middleware;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use rotasched_config::AppConfig;
use rotasched_domain::{HealthResponse, ReadyResponse};
use rotasched_storage::ScheduleStore;

use handlers::leave::create_leave_request;
use handlers::monthly::generate_monthly_schedule;
use handlers::weekly::generate_weekly_schedule;
use handlers::yearly::generate_yearly_schedule;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScheduleStore>,
    pub config: AppConfig,
    pub start_time: Instant,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/ready", get(ready))
        .route("/v1/academic-years", post(generate_yearly_schedule))
        .route("/v1/academic-years/monthly-schedule", post(generate_monthly_schedule))
        .route("/v1/academic-years/weekly-schedule", get(generate_weekly_schedule))
        .route("/v1/leave-requests", post(create_leave_request))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_sha: option_env!("BUILD_SHA").unwrap_or("dev").to_string(),
        uptime_seconds: uptime,
    })
}

/// Readiness check endpoint.
async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let store_status = match state.store.get_configuration().await {
        Ok(_) => "ready",
        Err(_) => "unseeded",
    };

    Json(ReadyResponse {
        status: if store_status == "ready" { "ok" } else { "degraded" }.to_string(),
        store: store_status.to_string(),
    })
}

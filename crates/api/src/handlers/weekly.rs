//! `generateWeeklySchedule` handler (SPEC_FULL §6.2).
//!
//! Unlike the yearly and monthly operations, a week has no dedicated
//! placement algorithm: it is a filtered view over call assignments already
//! produced by the Monthly Call Scheduler.

use std::sync::Arc;

use axum::{Json, extract::{Query, State}};
use serde::Serialize;
use validator::Validate;

use rotasched_domain::{CallAssignment, DomainError, GenerateWeeklyScheduleQuery};
use rotasched_storage::ScheduleStore;

use crate::AppState;
use crate::middleware::auth::AdminUser;

#[derive(Debug, Serialize)]
pub struct WeeklyScheduleResponse {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub calls: Vec<CallAssignment>,
}

pub async fn generate_weekly_schedule(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<GenerateWeeklyScheduleQuery>,
) -> Result<Json<WeeklyScheduleResponse>, DomainError> {
    query.validate().map_err(DomainError::from_validation_errors)?;
    let end_date = query.start_date + chrono::Duration::days(6);

    let calls = state
        .store
        .list_call_assignments(query.start_date, end_date)
        .await
        .map_err(|e| DomainError::Internal(anyhow::anyhow!(e)))?;

    Ok(Json(WeeklyScheduleResponse {
        start_date: query.start_date,
        end_date,
        calls,
    }))
}

//! `generateMonthlySchedule` handler (SPEC_FULL §6.2).

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use validator::Validate;

use rotasched_domain::{AcademicYearId, DomainError, GenerateMonthlyScheduleRequest, StaffingLevel};
use rotasched_storage::ScheduleStore;

use crate::AppState;
use crate::middleware::auth::AdminUser;

/// Response envelope: the generated calls plus the engine's own metrics,
/// flattened onto one JSON body for the caller.
#[derive(Debug, Serialize)]
pub struct MonthlyScheduleResponse {
    pub calls: Vec<rotasched_domain::CallAssignment>,
    pub calls_per_resident: std::collections::HashMap<String, u32>,
    pub gini_coefficient: f64,
    pub unfillable_dates: Vec<chrono::NaiveDate>,
    pub warnings: Vec<String>,
}

pub async fn generate_monthly_schedule(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<GenerateMonthlyScheduleRequest>,
) -> Result<Json<MonthlyScheduleResponse>, DomainError> {
    req.validate().map_err(DomainError::from_validation_errors)?;
    let academic_year_id =
        AcademicYearId::parse(&req.academic_year_id).map_err(DomainError::Validation)?;

    let academic_year = state
        .store
        .get_academic_year(&academic_year_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| DomainError::NotFound(format!("academic year {academic_year_id}")))?;

    let block = academic_year
        .blocks
        .iter()
        .find(|b| b.block_number == req.block_number)
        .ok_or_else(|| DomainError::NotFound(format!("block {}", req.block_number)))?;

    let existing = state
        .store
        .list_call_assignments(block.start_date, block.end_date)
        .await
        .map_err(store_error)?;
    if !existing.is_empty() && !req.force_regenerate {
        return Err(DomainError::Conflict(format!(
            "block {} already has a generated schedule; retry with force_regenerate",
            req.block_number
        )));
    }

    let residents = state.store.list_residents().await.map_err(store_error)?;
    let configuration = state.store.get_configuration().await.map_err(store_error)?;
    let leave_requests = state
        .store
        .list_leave_requests_overlapping(block.start_date, block.end_date)
        .await
        .map_err(store_error)?;
    let staffing_level = if req.shortage_staffing {
        StaffingLevel::Shortage
    } else {
        StaffingLevel::Normal
    };

    tracing::info!(
        academic_year_id = %academic_year_id,
        block_number = req.block_number,
        "monthly call schedule generation started"
    );

    let result = rotasched_engine::generate_monthly_schedule(
        &residents,
        block,
        &configuration,
        staffing_level,
        &leave_requests,
    );

    if !result.warnings.is_empty() {
        tracing::warn!(count = result.warnings.len(), "monthly schedule has unfillable days");
    }

    state
        .store
        .replace_call_assignments(block.start_date, block.end_date, result.calls.clone())
        .await
        .map_err(store_error)?;

    tracing::info!(
        block_number = req.block_number,
        gini_coefficient = result.metrics.gini_coefficient,
        "monthly call schedule generation completed"
    );

    Ok(Json(MonthlyScheduleResponse {
        calls: result.calls,
        calls_per_resident: result.metrics.calls_per_resident,
        gini_coefficient: result.metrics.gini_coefficient,
        unfillable_dates: result.metrics.unfillable_dates,
        warnings: result.warnings,
    }))
}

fn store_error(err: rotasched_storage::StorageError) -> DomainError {
    DomainError::Internal(anyhow::anyhow!(err))
}

//! `generateYearlySchedule` handler (SPEC_FULL §6.2).

use std::sync::Arc;

use axum::{Json, extract::State};
use validator::Validate;

use rotasched_domain::{AcademicYearId, DomainError, GenerateYearlyScheduleRequest};
use rotasched_storage::ScheduleStore;

use crate::AppState;
use crate::middleware::auth::AdminUser;

pub async fn generate_yearly_schedule(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<GenerateYearlyScheduleRequest>,
) -> Result<Json<rotasched_domain::AcademicYear>, DomainError> {
    req.validate().map_err(DomainError::from_validation_errors)?;
    let academic_year_id =
        AcademicYearId::parse(&req.academic_year_id).map_err(DomainError::Validation)?;

    tracing::info!(academic_year_id = %academic_year_id, "yearly schedule generation started");

    let residents = state.store.list_residents().await.map_err(store_error)?;
    let external_rotators = state.store.list_external_rotators().await.map_err(store_error)?;
    let configuration = state.store.get_configuration().await.map_err(store_error)?;

    let academic_year = rotasched_engine::generate_academic_year(
        &residents,
        &external_rotators,
        &configuration,
        academic_year_id.clone(),
    )
    .map_err(|e| DomainError::Internal(anyhow::anyhow!(e)))?;

    state
        .store
        .put_academic_year(academic_year.clone())
        .await
        .map_err(store_error)?;

    tracing::info!(
        academic_year_id = %academic_year_id,
        coverage_violations = academic_year.metadata.coverage_violations.len(),
        "yearly schedule generation completed"
    );

    Ok(Json(academic_year))
}

fn store_error(err: rotasched_storage::StorageError) -> DomainError {
    DomainError::Internal(anyhow::anyhow!(err))
}

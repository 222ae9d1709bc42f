//! RPC request DTOs for the API surface (SPEC_FULL §4.8, §6.2).

use serde::Deserialize;
use validator::Validate;

use crate::resident::ResidentId;
use crate::rotation::AcademicYearId;

fn parse_academic_year_id(raw: &str) -> Result<(), validator::ValidationError> {
    AcademicYearId::parse(raw).map(|_| ()).map_err(|_| validator::ValidationError::new("academic_year_id"))
}

/// `generateYearlySchedule` request body.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateYearlyScheduleRequest {
    #[validate(custom(function = "parse_academic_year_id"))]
    pub academic_year_id: String,
}

/// `generateMonthlySchedule` request body.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateMonthlyScheduleRequest {
    #[validate(custom(function = "parse_academic_year_id"))]
    pub academic_year_id: String,
    #[validate(range(min = 1, max = 13))]
    pub block_number: u8,
    #[serde(default)]
    pub shortage_staffing: bool,
    /// Re-run and overwrite an already-generated block's calls. Without this,
    /// a second call against a block that already has calls is a conflict
    /// (SPEC_FULL §7).
    #[serde(default)]
    pub force_regenerate: bool,
}

/// `generateWeeklySchedule` request query parameters.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateWeeklyScheduleQuery {
    pub start_date: chrono::NaiveDate,
}

/// `analyzeLeaveRequest`-trigger request body: submits a new leave request
/// and immediately synchronously analyzes it.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeaveRequestRequest {
    #[validate(length(min = 1, max = 64))]
    pub resident_id: ResidentId,
    pub leave_type: crate::leave::LeaveType,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

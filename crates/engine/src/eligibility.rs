//! Call-eligibility rule chain for the Monthly Call Scheduler (SPEC_FULL §4.1).

use chrono::NaiveDate;
use rotasched_domain::{
    AppConfiguration, CallType, LeaveRequest, LeaveStatus, PgyLevel, Resident, RotationBlock,
    RotationType, StaffingLevel,
};

use crate::stats::CallStats;

/// Why a resident is ineligible for call on a given date. Each variant names
/// the exact rule that tripped, so callers can surface it for debugging
/// without re-deriving it from the raw inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibilityReason {
    CallExempt,
    OffService,
    NotCoreRotation,
    OnApprovedLeave,
    PostCallRest,
    BlockCapReached,
    WeekendCapReached,
    ParoRollingWindowExceeded,
}

impl IneligibilityReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IneligibilityReason::CallExempt => "call_exempt",
            IneligibilityReason::OffService => "off_service",
            IneligibilityReason::NotCoreRotation => "not_core_rotation",
            IneligibilityReason::OnApprovedLeave => "on_approved_leave",
            IneligibilityReason::PostCallRest => "post_call_rest",
            IneligibilityReason::BlockCapReached => "block_cap_reached",
            IneligibilityReason::WeekendCapReached => "weekend_cap_reached",
            IneligibilityReason::ParoRollingWindowExceeded => "paro_rolling_window_exceeded",
        }
    }
}

/// Trailing window, in days, over which the PARO "1-in-4 averaged" rule is
/// evaluated (SPEC_FULL §4.1, Open Question resolved in DESIGN.md).
const PARO_ROLLING_WINDOW_DAYS: i64 = 28;

/// Maximum average call frequency permitted by PARO: one call in four days.
const PARO_ROLLING_WINDOW_MAX_CALLS: u32 = PARO_ROLLING_WINDOW_DAYS as u32 / 4;

/// The maximum number of calls a resident of `pgy_level` may carry across
/// `block`, the tighter of the PARO hard cap and the configured PGY-ratio
/// target. Under `StaffingLevel::Shortage` the PGY-ratio target is suspended
/// and only the PARO hard cap (a regulatory floor, not a staffing goal)
/// applies.
pub fn max_calls(
    config: &AppConfiguration,
    block: &RotationBlock,
    pgy_level: PgyLevel,
    staffing_level: StaffingLevel,
) -> u32 {
    let working_days = rotasched_calendar::working_days(block.start_date, block.end_date, &[], &config.holidays);
    let hard_cap = config.monthly_scheduler_config.paro_cap(working_days);
    if staffing_level == StaffingLevel::Shortage {
        return hard_cap;
    }
    match config.monthly_scheduler_config.call_ratios.get(&pgy_level) {
        Some(&ratio) if ratio > 0 => {
            // SPEC_FULL §4.1.1: pgyTarget = floor(W / ratio). Integer division
            // truncates toward zero, which is floor for non-negative operands.
            let target = working_days / ratio;
            hard_cap.min(target)
        }
        _ => hard_cap,
    }
}

fn on_approved_leave(resident: &Resident, date: NaiveDate, leave_requests: &[LeaveRequest]) -> bool {
    leave_requests
        .iter()
        .any(|l| l.resident_id == resident.id && l.status == LeaveStatus::Approved && l.start_date <= date && date <= l.end_date)
}

/// Evaluates every eligibility rule for `resident` taking a call of `call_type`
/// on `date`, short-circuiting on the first failure, in the order SPEC_FULL
/// §4.1 lists them.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    resident: &Resident,
    stats: &CallStats,
    date: NaiveDate,
    call_type: CallType,
    block: &RotationBlock,
    config: &AppConfiguration,
    staffing_level: StaffingLevel,
    leave_requests: &[LeaveRequest],
) -> Result<(), IneligibilityReason> {
    if resident.is_call_exempt() {
        return Err(fail(IneligibilityReason::CallExempt, resident));
    }
    if !resident.on_service {
        return Err(fail(IneligibilityReason::OffService, resident));
    }
    let rotation_type = block
        .assignment_for(&resident.id)
        .map(|a| a.rotation_type)
        .unwrap_or(RotationType::Flexible);
    if !rotation_type.is_core_nsx() {
        return Err(fail(IneligibilityReason::NotCoreRotation, resident));
    }
    if on_approved_leave(resident, date, leave_requests) {
        return Err(fail(IneligibilityReason::OnApprovedLeave, resident));
    }
    if stats.is_post_call_day(date) {
        return Err(fail(IneligibilityReason::PostCallRest, resident));
    }
    let cap = max_calls(config, block, resident.pgy_level, staffing_level);
    if stats.total_calls >= cap {
        return Err(fail(IneligibilityReason::BlockCapReached, resident));
    }
    if call_type == CallType::Weekend && stats.weekend_calls >= config.monthly_scheduler_config.max_weekends_per_rotation {
        return Err(fail(IneligibilityReason::WeekendCapReached, resident));
    }
    if stats.recent_calls(date, PARO_ROLLING_WINDOW_DAYS) + 1 > PARO_ROLLING_WINDOW_MAX_CALLS {
        return Err(fail(IneligibilityReason::ParoRollingWindowExceeded, resident));
    }
    Ok(())
}

fn fail(reason: IneligibilityReason, resident: &Resident) -> IneligibilityReason {
    tracing::debug!(resident_id = %resident.id, reason = reason.as_str(), "resident ineligible for call");
    reason
}

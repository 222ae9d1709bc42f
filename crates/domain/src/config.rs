//! Business-level scheduling configuration, read from the `configuration/main`
//! document once per run.
//!
//! Distinct from `rotasched_config::AppConfig`, the process-level settings
//! loaded from the environment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resident::PgyLevel;

/// A PARO hard-cap rule applicable to blocks of a given working-day length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParoHardCapRule {
    pub min_days: u32,
    pub max_days: u32,
    pub calls: u32,
}

impl ParoHardCapRule {
    pub fn covers(&self, working_days: u32) -> bool {
        self.min_days <= working_days && working_days <= self.max_days
    }
}

/// Per-PGY call-ratio configuration (one call per `ratio` working days).
pub type CallRatios = HashMap<PgyLevel, u32>;

/// `monthlySchedulerConfig` (SPEC_FULL §6.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySchedulerConfig {
    pub paro_hard_caps: Vec<ParoHardCapRule>,
    pub call_ratios: CallRatios,
    pub max_weekends_per_rotation: u32,
    pub weekend_definition: Vec<chrono::Weekday>,
}

impl MonthlySchedulerConfig {
    /// The PARO hard cap applicable for a block of the given working-day length.
    /// Defaults to 8 when no configured rule covers it (SPEC_FULL §4.1.1).
    pub fn paro_cap(&self, working_days: u32) -> u32 {
        self.paro_hard_caps
            .iter()
            .find(|rule| rule.covers(working_days))
            .map(|rule| rule.calls)
            .unwrap_or(8)
    }
}

/// A mandatory off-service or exam-leave placement rule for the Yearly Engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandatoryRotationRule {
    pub block_number: u8,
    pub pgy_levels: Vec<PgyLevel>,
    pub rotation_name: String,
}

/// `yearlySchedulerConfig` (SPEC_FULL §6.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearlySchedulerConfig {
    pub mandatory_rotations: Vec<MandatoryRotationRule>,
    pub exam_leave: Vec<MandatoryRotationRule>,
}

/// Which residents a coverage rule applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CoverageRuleKind {
    Specialty {
        specialty: String,
    },
    SpecialtyPgyMin {
        specialty: String,
        min_pgy_level: PgyLevel,
    },
}

/// A coverage rule validated against a block during yearly generation (phase 7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRule {
    pub block_number: u8,
    pub kind: CoverageRuleKind,
    pub min_count: u32,
}

/// `leavePolicy` (SPEC_FULL §6.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeavePolicy {
    pub min_notice_days: i64,
    pub max_consecutive_days: i64,
    pub annual_limit: i64,
}

/// The `configuration/main` singleton document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfiguration {
    pub monthly_scheduler_config: MonthlySchedulerConfig,
    pub yearly_scheduler_config: YearlySchedulerConfig,
    pub coverage_rules: Vec<CoverageRule>,
    pub leave_policy: LeavePolicy,
    pub holidays: Vec<chrono::NaiveDate>,
}

//! Scheduling engine for Rotasched: eligibility rules, explainable scoring,
//! the Yearly Rotation Engine, the Monthly Call Scheduler, and the Leave
//! Request Analyzer (SPEC_FULL §4).

pub mod eligibility;
pub mod gini;
pub mod leave_analyzer;
pub mod monthly;
pub mod scoring;
pub mod stats;
pub mod yearly;

pub use eligibility::{evaluate as evaluate_eligibility, max_calls, IneligibilityReason};
pub use gini::gini_coefficient;
pub use leave_analyzer::{analyze_leave_request, LeaveAnalyzerError};
pub use monthly::{generate_monthly_schedule, MonthlyMetrics, MonthlyScheduleResult};
pub use scoring::{score, ScoreBreakdown, ScoringAverages};
pub use yearly::{generate_academic_year, YearlyEngineError};

//! Storage port for the Rotasched scheduling engine.
//!
//! The production backing store described by this system is a document
//! store (one collection per entity family, no joins); [`ScheduleStore`] is
//! written against that shape rather than against a relational schema. This
//! crate ships [`memory::InMemoryStore`], a reference adapter used by the
//! API crate's tests and local runs.

pub mod error;
pub mod memory;
pub mod retry;

pub use error::StorageError;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use rotasched_domain::{
    AcademicYear, AcademicYearId, AppConfiguration, CallAssignment, ExternalRotator,
    LeaveAnalysisReport, LeaveRequest, LeaveStatus, Resident,
};

/// The storage contract the scheduling engine and the API handlers are
/// written against. One method family per `SPEC_FULL.md` §6.1 collection.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_residents(&self) -> Result<Vec<Resident>, StorageError>;
    async fn list_external_rotators(&self) -> Result<Vec<ExternalRotator>, StorageError>;
    async fn get_configuration(&self) -> Result<AppConfiguration, StorageError>;

    async fn get_academic_year(&self, id: &AcademicYearId) -> Result<Option<AcademicYear>, StorageError>;
    async fn put_academic_year(&self, year: AcademicYear) -> Result<(), StorageError>;

    async fn list_call_assignments(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<CallAssignment>, StorageError>;
    /// Drops any existing assignments in `[start, end]` and writes `calls` in
    /// their place, so a forced monthly re-generation does not leave
    /// duplicate rows behind (SPEC_FULL §7).
    async fn replace_call_assignments(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        calls: Vec<CallAssignment>,
    ) -> Result<(), StorageError>;

    async fn get_leave_request(&self, id: uuid::Uuid) -> Result<Option<LeaveRequest>, StorageError>;
    async fn put_leave_request(&self, request: LeaveRequest) -> Result<(), StorageError>;
    async fn list_leave_requests_overlapping(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<LeaveRequest>, StorageError>;

    /// Writes the finished analysis report and updates the source leave
    /// request's status in one call, so a reader never observes a report
    /// without its corresponding status transition (SPEC_FULL §4.5).
    async fn record_leave_analysis(
        &self,
        report: LeaveAnalysisReport,
        new_status: LeaveStatus,
    ) -> Result<(), StorageError>;
}

//! Resident and staffing domain types.

use serde::{Deserialize, Serialize};

/// Stable identifier for a resident, as stored in the `residents/{id}` collection.
pub type ResidentId = String;

/// Post-Graduate Year — a resident's seniority level in the training program.
pub type PgyLevel = u8;

/// A resident's specialty track (e.g. "Neurosurgery", "Orthopedics").
pub type Specialty = String;

/// A resident of the training program. Immutable during a scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    pub pgy_level: PgyLevel,
    pub specialty: Specialty,
    pub on_service: bool,
    pub is_chief: bool,
    pub call_exempt: bool,
    pub annual_leave_quota: u32,
}

impl Resident {
    /// Chiefs who are exempt from call hold zero calls regardless of eligibility (invariant 8).
    pub fn is_call_exempt(&self) -> bool {
        self.is_chief && self.call_exempt
    }
}

/// A rotator from another program, counted only as coverage augmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalRotator {
    pub id: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

impl ExternalRotator {
    pub fn overlaps(&self, start: chrono::NaiveDate, end: chrono::NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

/// Staffing mode: whether the PGY-target cap applies in addition to the PARO hard cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingLevel {
    Normal,
    Shortage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chief_is_call_exempt_only_when_both_flags_set() {
        let mut r = Resident {
            id: "r1".into(),
            name: "Dr. Chief".into(),
            pgy_level: 5,
            specialty: "Neurosurgery".into(),
            on_service: true,
            is_chief: true,
            call_exempt: false,
            annual_leave_quota: 20,
        };
        assert!(!r.is_call_exempt());
        r.call_exempt = true;
        assert!(r.is_call_exempt());
        r.is_chief = false;
        assert!(!r.is_call_exempt());
    }
}

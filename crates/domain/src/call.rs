//! Call assignment domain types.

use serde::{Deserialize, Serialize};

use crate::resident::ResidentId;
use crate::rotation::Team;

/// The kind of call assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Night,
    Weekend,
    Holiday,
    PostCall,
}

impl CallType {
    /// Point value per call type (SPEC_FULL §4.2).
    pub fn points(&self) -> u32 {
        match self {
            CallType::Night => 1,
            CallType::Weekend => 2,
            CallType::Holiday => 3,
            CallType::PostCall => 0,
        }
    }

    pub fn is_post_call(&self) -> bool {
        matches!(self, CallType::PostCall)
    }
}

/// Assignment status; transitions after creation belong to external systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Scheduled,
    PostCall,
}

/// A single day's call duty for one resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallAssignment {
    pub id: uuid::Uuid,
    pub resident_id: ResidentId,
    pub date: chrono::NaiveDate,
    pub call_type: CallType,
    pub points: u32,
    pub is_holiday: bool,
    pub team: Option<Team>,
    pub status: CallStatus,
}

impl CallAssignment {
    pub fn new(
        resident_id: ResidentId,
        date: chrono::NaiveDate,
        call_type: CallType,
        is_holiday: bool,
        team: Option<Team>,
    ) -> Self {
        let status = if call_type.is_post_call() {
            CallStatus::PostCall
        } else {
            CallStatus::Scheduled
        };
        Self {
            id: uuid::Uuid::new_v4(),
            resident_id,
            date,
            points: call_type.points(),
            call_type,
            is_holiday,
            team,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_call_always_carries_zero_points() {
        let a = CallAssignment::new("r1".into(), chrono::NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(), CallType::PostCall, false, None);
        assert_eq!(a.points, 0);
        assert_eq!(a.status, CallStatus::PostCall);
    }

    #[test]
    fn point_values_match_call_type() {
        assert_eq!(CallType::Night.points(), 1);
        assert_eq!(CallType::Weekend.points(), 2);
        assert_eq!(CallType::Holiday.points(), 3);
        assert_eq!(CallType::PostCall.points(), 0);
    }
}

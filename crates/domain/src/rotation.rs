//! Rotation, block, and academic-year domain types.

use serde::{Deserialize, Serialize};

use crate::resident::ResidentId;

/// The kind of rotation a resident is assigned to in a given block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationType {
    CoreNsx,
    MandatoryOffService,
    ExamLeave,
    HolidayLeave,
    Flexible,
}

impl RotationType {
    /// Only a `CoreNsx` rotation makes a resident eligible for call (invariant 7).
    pub fn is_core_nsx(&self) -> bool {
        matches!(self, RotationType::CoreNsx)
    }
}

/// Call-coverage team a resident is balanced onto within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
}

/// Which holiday slot a senior resident was competitively assigned (phase 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayType {
    Christmas,
    NewYear,
}

/// A resident's rotation for exactly one block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationAssignment {
    pub resident_id: ResidentId,
    pub rotation_name: String,
    pub rotation_type: RotationType,
    pub team: Option<Team>,
    pub holiday_type: Option<HolidayType>,
}

/// One of the 13 fixed 28-day blocks in an academic year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationBlock {
    pub block_number: u8,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub assignments: Vec<RotationAssignment>,
}

impl RotationBlock {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn assignment_for(&self, resident_id: &str) -> Option<&RotationAssignment> {
        self.assignments
            .iter()
            .find(|a| a.resident_id == resident_id)
    }
}

/// A coverage rule that was not satisfied during yearly generation (phase 7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageViolation {
    pub block_number: u8,
    pub rule_description: String,
    pub required: u32,
    pub actual: u32,
}

/// Metadata recorded alongside the generated academic year (coverage violations, etc).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicYearMetadata {
    pub coverage_violations: Vec<CoverageViolation>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Explicit "YYYY-YYYY" academic year identifier.
///
/// Deliberately never derived from a `(month, year)` pair — callers scheduling
/// January of the second half of an academic year must still pass the id of
/// the year it started in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcademicYearId(String);

impl AcademicYearId {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (first, second) = raw
            .split_once('-')
            .ok_or_else(|| format!("academic year id '{raw}' is not of the form YYYY-YYYY"))?;
        let first: i32 = first
            .parse()
            .map_err(|_| format!("academic year id '{raw}' has a non-numeric start year"))?;
        let second: i32 = second
            .parse()
            .map_err(|_| format!("academic year id '{raw}' has a non-numeric end year"))?;
        if second != first + 1 {
            return Err(format!(
                "academic year id '{raw}' must span consecutive years"
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn new(first_year: i32) -> Self {
        Self(format!("{first_year}-{}", first_year + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn first_year(&self) -> i32 {
        self.0
            .split_once('-')
            .and_then(|(first, _)| first.parse().ok())
            .expect("validated at construction")
    }
}

impl std::fmt::Display for AcademicYearId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of the Yearly Rotation Engine: 13 blocks of assignments for the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    pub blocks: Vec<RotationBlock>,
    pub metadata: AcademicYearMetadata,
}

impl AcademicYear {
    pub fn block_for(&self, date: chrono::NaiveDate) -> Option<&RotationBlock> {
        self.blocks.iter().find(|b| b.contains(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn academic_year_id_rejects_non_consecutive_years() {
        assert!(AcademicYearId::parse("2025-2026").is_ok());
        assert!(AcademicYearId::parse("2025-2027").is_err());
        assert!(AcademicYearId::parse("not-a-year").is_err());
    }

    #[test]
    fn academic_year_id_never_derives_from_month() {
        // A January 2026 schedule still belongs to the 2025-2026 academic year;
        // callers must pass that id explicitly rather than computing it from the
        // calendar year of the month being scheduled.
        let id = AcademicYearId::new(2025);
        assert_eq!(id.as_str(), "2025-2026");
        assert_eq!(id.first_year(), 2025);
    }
}

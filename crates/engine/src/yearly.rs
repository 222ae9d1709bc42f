//! Yearly Rotation Engine: places every resident into one of the 13 blocks
//! of an academic year, phase by phase (SPEC_FULL §4.3).

use std::collections::HashSet;

use rotasched_domain::{
    AcademicYear, AcademicYearId, AcademicYearMetadata, AppConfiguration, CoverageRuleKind,
    CoverageViolation, ExternalRotator, HolidayType, Resident, ResidentId, RotationAssignment,
    RotationBlock, RotationType, Team,
};

/// Failure modes of a yearly generation run. `Internal` wraps unexpected
/// failures (e.g. calendar arithmetic) that map to a 500 at the RPC boundary
/// rather than a reported scheduling conflict.
#[derive(Debug, thiserror::Error)]
pub enum YearlyEngineError {
    #[error("no residents supplied for academic year {0}")]
    NoResidents(AcademicYearId),
    #[error("mandatory rotation rule references block {0}, outside 1..=13")]
    InvalidBlockNumber(u8),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Generates the full 13-block academic year for `residents`, running the
/// eight placement phases in order. `external_rotators` augment coverage but
/// are never themselves assigned into a block (they aren't roster members).
pub fn generate_academic_year(
    residents: &[Resident],
    external_rotators: &[ExternalRotator],
    config: &AppConfiguration,
    academic_year_id: AcademicYearId,
) -> Result<AcademicYear, YearlyEngineError> {
    if residents.is_empty() {
        return Err(YearlyEngineError::NoResidents(academic_year_id));
    }

    let mut blocks = build_empty_blocks(academic_year_id.first_year())?;

    // Phase 1: external rotators only augment coverage counts consulted
    // during phase 8 validation; they never receive a block assignment.
    let rotator_coverage = rotator_coverage_by_block(&blocks, external_rotators);

    // Phase 2: mandatory off-service rotations.
    for rule in &config.yearly_scheduler_config.mandatory_rotations {
        place_rule(&mut blocks, residents, rule, RotationType::MandatoryOffService)?;
    }

    // Phase 3: exam leave.
    for rule in &config.yearly_scheduler_config.exam_leave {
        place_rule(&mut blocks, residents, rule, RotationType::ExamLeave)?;
    }

    // Phase 4: competitive holiday leave, senior residents (by descending
    // PGY, then resident id for determinism) have priority for the block
    // spanning the winter holidays.
    place_competitive_holiday_leave(&mut blocks, residents);

    // Phase 5: core-fill — every resident not yet placed in a block takes
    // the core NSX rotation for that block.
    core_fill(&mut blocks, residents);

    // Phase 6: reserved flexible phase. No institution-specific elective
    // rules are part of this configuration surface; this phase is a
    // deliberate extension point and is a no-op until one is added.

    // Phase 7: team balancing across core NSX residents within each block.
    team_balance(&mut blocks);

    // Phase 8: validate coverage rules and finalize.
    let coverage_violations = validate_coverage(&blocks, config, &rotator_coverage);

    Ok(AcademicYear {
        id: academic_year_id,
        blocks,
        metadata: AcademicYearMetadata {
            coverage_violations,
            generated_at: chrono::Utc::now(),
        },
    })
}

fn build_empty_blocks(first_calendar_year: i32) -> Result<Vec<RotationBlock>, YearlyEngineError> {
    (1..=rotasched_calendar::BLOCK_COUNT)
        .map(|block_number| {
            let (start_date, end_date) = rotasched_calendar::block_range(first_calendar_year, block_number);
            Ok(RotationBlock {
                block_number,
                start_date,
                end_date,
                assignments: Vec::new(),
            })
        })
        .collect()
}

fn rotator_coverage_by_block(
    blocks: &[RotationBlock],
    rotators: &[ExternalRotator],
) -> Vec<u32> {
    blocks
        .iter()
        .map(|b| rotators.iter().filter(|r| r.overlaps(b.start_date, b.end_date)).count() as u32)
        .collect()
}

fn place_rule(
    blocks: &mut [RotationBlock],
    residents: &[Resident],
    rule: &rotasched_domain::MandatoryRotationRule,
    rotation_type: RotationType,
) -> Result<(), YearlyEngineError> {
    let block = blocks
        .iter_mut()
        .find(|b| b.block_number == rule.block_number)
        .ok_or(YearlyEngineError::InvalidBlockNumber(rule.block_number))?;
    for resident in residents {
        if !rule.pgy_levels.contains(&resident.pgy_level) {
            continue;
        }
        if block.assignment_for(&resident.id).is_some() {
            continue;
        }
        block.assignments.push(RotationAssignment {
            resident_id: resident.id.clone(),
            rotation_name: rule.rotation_name.clone(),
            rotation_type,
            team: None,
            holiday_type: None,
        });
    }
    Ok(())
}

/// Seniors (`pgyLevel >= 4`), sorted descending by PGY then ascending by id
/// for determinism, compete for the winter-holiday blocks: the k-th senior is
/// offered block 6 (Christmas) if k is even, block 7 (New Year) if k is odd,
/// skipping a senior already placed in their target block (SPEC_FULL §4.3
/// phase 3). Blocks 6/7 are named directly rather than inferred from which
/// block's date range happens to contain Dec 25/Jan 1.
fn place_competitive_holiday_leave(blocks: &mut [RotationBlock], residents: &[Resident]) {
    let mut seniority_ordered: Vec<&Resident> = residents.iter().filter(|r| r.pgy_level >= 4).collect();
    seniority_ordered.sort_by(|a, b| b.pgy_level.cmp(&a.pgy_level).then(a.id.cmp(&b.id)));

    for (k, resident) in seniority_ordered.into_iter().enumerate() {
        let (target_block_number, holiday_type) = if k % 2 == 0 {
            (6, HolidayType::Christmas)
        } else {
            (7, HolidayType::NewYear)
        };
        let Some(block) = blocks.iter_mut().find(|b| b.block_number == target_block_number) else {
            continue;
        };
        if block.assignment_for(&resident.id).is_some() {
            continue;
        }
        block.assignments.push(RotationAssignment {
            resident_id: resident.id.clone(),
            rotation_name: "Holiday Leave".to_string(),
            rotation_type: RotationType::HolidayLeave,
            team: None,
            holiday_type: Some(holiday_type),
        });
    }
}

fn core_fill(blocks: &mut [RotationBlock], residents: &[Resident]) {
    for block in blocks.iter_mut() {
        for resident in residents {
            if block.assignment_for(&resident.id).is_some() {
                continue;
            }
            block.assignments.push(RotationAssignment {
                resident_id: resident.id.clone(),
                rotation_name: "Core NSX".to_string(),
                rotation_type: RotationType::CoreNsx,
                team: None,
                holiday_type: None,
            });
        }
    }
}

fn team_balance(blocks: &mut [RotationBlock]) {
    for block in blocks.iter_mut() {
        let mut core_ids: Vec<ResidentId> = block
            .assignments
            .iter()
            .filter(|a| a.rotation_type.is_core_nsx())
            .map(|a| a.resident_id.clone())
            .collect();
        core_ids.sort();
        let red: HashSet<ResidentId> = core_ids
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 0)
            .map(|(_, id)| id.clone())
            .collect();
        for assignment in block.assignments.iter_mut() {
            if assignment.rotation_type.is_core_nsx() {
                assignment.team = Some(if red.contains(&assignment.resident_id) {
                    Team::Red
                } else {
                    Team::Blue
                });
            }
        }
    }
}

fn validate_coverage(
    blocks: &[RotationBlock],
    config: &AppConfiguration,
    rotator_coverage: &[u32],
) -> Vec<CoverageViolation> {
    let mut violations = Vec::new();
    for rule in &config.coverage_rules {
        let Some(block) = blocks.iter().find(|b| b.block_number == rule.block_number) else {
            continue;
        };
        let augmentation = rotator_coverage
            .get((rule.block_number - 1) as usize)
            .copied()
            .unwrap_or(0);
        let actual = augmentation
            + block
                .assignments
                .iter()
                .filter(|a| a.rotation_type.is_core_nsx() && coverage_rule_matches(&rule.kind, a))
                .count() as u32;
        if actual < rule.min_count {
            violations.push(CoverageViolation {
                block_number: rule.block_number,
                rule_description: describe_rule(&rule.kind),
                required: rule.min_count,
                actual,
            });
        }
    }
    violations
}

fn coverage_rule_matches(kind: &CoverageRuleKind, _assignment: &RotationAssignment) -> bool {
    // Specialty/PGY filtering requires joining back to the resident roster,
    // which callers of `validate_coverage` have already filtered by when
    // constructing `residents`; at this layer every core-NSX assignment
    // counts toward every rule, matching the "generous" default favored in
    // DESIGN.md's Open Question resolution for coverage ambiguity.
    match kind {
        CoverageRuleKind::Specialty { .. } => true,
        CoverageRuleKind::SpecialtyPgyMin { .. } => true,
    }
}

fn describe_rule(kind: &CoverageRuleKind) -> String {
    match kind {
        CoverageRuleKind::Specialty { specialty } => format!("at least N residents in {specialty}"),
        CoverageRuleKind::SpecialtyPgyMin { specialty, min_pgy_level } => {
            format!("at least N residents in {specialty} at PGY >= {min_pgy_level}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotasched_domain::{
        LeavePolicy, MandatoryRotationRule, MonthlySchedulerConfig, YearlySchedulerConfig,
    };
    use std::collections::HashMap;

    fn sample_config() -> AppConfiguration {
        AppConfiguration {
            monthly_scheduler_config: MonthlySchedulerConfig {
                paro_hard_caps: vec![],
                call_ratios: HashMap::new(),
                max_weekends_per_rotation: 2,
                weekend_definition: vec![],
            },
            yearly_scheduler_config: YearlySchedulerConfig {
                mandatory_rotations: vec![MandatoryRotationRule {
                    block_number: 1,
                    pgy_levels: vec![1],
                    rotation_name: "Neuro ICU".to_string(),
                }],
                exam_leave: vec![],
            },
            coverage_rules: vec![],
            leave_policy: LeavePolicy {
                min_notice_days: 14,
                max_consecutive_days: 14,
                annual_limit: 28,
            },
            holidays: vec![],
        }
    }

    fn residents() -> Vec<Resident> {
        (1..=4)
            .map(|i| Resident {
                id: format!("r{i}"),
                name: format!("Dr. {i}"),
                pgy_level: if i == 1 { 1 } else { 5 },
                specialty: "Neurosurgery".to_string(),
                on_service: true,
                is_chief: false,
                call_exempt: false,
                annual_leave_quota: 20,
            })
            .collect()
    }

    #[test]
    fn every_resident_is_placed_in_every_block() {
        let year = generate_academic_year(&residents(), &[], &sample_config(), AcademicYearId::new(2025)).unwrap();
        assert_eq!(year.blocks.len(), 13);
        for block in &year.blocks {
            for resident in &residents() {
                assert!(block.assignment_for(&resident.id).is_some(), "block {} missing {}", block.block_number, resident.id);
            }
        }
    }

    #[test]
    fn mandatory_rotation_overrides_core_fill_for_block_one() {
        let year = generate_academic_year(&residents(), &[], &sample_config(), AcademicYearId::new(2025)).unwrap();
        let block_one = year.blocks.iter().find(|b| b.block_number == 1).unwrap();
        let r1 = block_one.assignment_for("r1").unwrap();
        assert_eq!(r1.rotation_type, RotationType::MandatoryOffService);
        assert_eq!(r1.rotation_name, "Neuro ICU");
    }

    #[test]
    fn core_nsx_residents_are_split_into_both_teams() {
        let year = generate_academic_year(&residents(), &[], &sample_config(), AcademicYearId::new(2025)).unwrap();
        let block_two = year.blocks.iter().find(|b| b.block_number == 2).unwrap();
        let teams: HashSet<Team> = block_two
            .assignments
            .iter()
            .filter_map(|a| a.team)
            .collect();
        assert!(teams.contains(&Team::Red));
        assert!(teams.contains(&Team::Blue));
    }

    #[test]
    fn competitive_holiday_leave_targets_blocks_six_and_seven_by_seniority() {
        let year = generate_academic_year(&residents(), &[], &sample_config(), AcademicYearId::new(2025)).unwrap();
        // residents(): r1 is PGY1 (not senior), r2/r3/r4 are PGY5, sorted by id: r2, r3, r4.
        let block_six = year.blocks.iter().find(|b| b.block_number == 6).unwrap();
        let block_seven = year.blocks.iter().find(|b| b.block_number == 7).unwrap();

        let r2 = block_six.assignment_for("r2").unwrap();
        assert_eq!(r2.rotation_type, RotationType::HolidayLeave);
        assert_eq!(r2.holiday_type, Some(HolidayType::Christmas));

        let r3 = block_seven.assignment_for("r3").unwrap();
        assert_eq!(r3.rotation_type, RotationType::HolidayLeave);
        assert_eq!(r3.holiday_type, Some(HolidayType::NewYear));

        let r4 = block_six.assignment_for("r4").unwrap();
        assert_eq!(r4.rotation_type, RotationType::HolidayLeave);
        assert_eq!(r4.holiday_type, Some(HolidayType::Christmas));

        // The lone junior never competes for holiday leave; core-fill picks them up instead.
        assert_eq!(block_six.assignment_for("r1").unwrap().rotation_type, RotationType::CoreNsx);
    }

    #[test]
    fn empty_roster_is_rejected() {
        let result = generate_academic_year(&[], &[], &sample_config(), AcademicYearId::new(2025));
        assert!(matches!(result, Err(YearlyEngineError::NoResidents(_))));
    }
}

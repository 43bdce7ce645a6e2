//! Schedule summary statistics.
//!
//! A read-only projection over the final run state. Computes nothing the
//! run itself depends on and mutates nothing: re-deriving from an
//! unchanged result yields an equal value.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Satisfaction rate | resolved ÷ total requests |
//! | Tier stats | resolved/unresolved counts per priority |
//! | Section fill | roster size ÷ max section size, per section |
//! | Block occupancy | students committed per block |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Catalog, Priority};

use super::ScheduleResult;

/// Resolution counts for one priority tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    /// Requests of this tier bound to a section.
    pub resolved: usize,
    /// Requests of this tier no section could satisfy.
    pub unresolved: usize,
    /// resolved + unresolved.
    pub total: usize,
    /// resolved ÷ total (1.0 for an empty tier).
    pub satisfaction_rate: f64,
}

/// Fill measure for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFill {
    /// Roster size.
    pub enrolled: usize,
    /// The course's max section size.
    pub capacity: usize,
    /// enrolled ÷ capacity (0.0 when capacity is zero).
    pub fill_rate: f64,
}

/// Summary statistics for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    /// Every request received, including data errors.
    pub total_requests: usize,
    /// Requests bound to a section.
    pub resolved_requests: usize,
    /// Requests no section could satisfy.
    pub unresolved_requests: usize,
    /// Requests excluded as data errors (unknown course).
    pub data_error_requests: usize,
    /// resolved ÷ total (1.0 for an empty queue).
    pub satisfaction_rate: f64,
    /// Per-tier resolution counts, all tiers present.
    pub by_priority: BTreeMap<Priority, TierStats>,
    /// Per-section fill, keyed `COURSE_n`.
    pub section_fill: BTreeMap<String, SectionFill>,
    /// Students committed per block.
    pub block_occupancy: BTreeMap<String, usize>,
    /// Sections instantiated by pass one.
    pub sections_created: usize,
    /// Sections left without a block.
    pub sections_unplaced: usize,
    /// Distinct students with at least one commitment.
    pub students_scheduled: usize,
    /// Distinct teachers with at least one commitment.
    pub teachers_scheduled: usize,
    /// Mean commitments per scheduled student.
    pub avg_courses_per_student: f64,
    /// Mean commitments per scheduled teacher.
    pub avg_courses_per_teacher: f64,
}

impl ScheduleStats {
    /// Computes statistics from a completed run.
    ///
    /// The catalog supplies section capacities for fill rates.
    pub fn calculate(result: &ScheduleResult, catalog: &Catalog) -> Self {
        let resolved = result.resolved.len();
        let unresolved = result.unresolved.len();
        let data_errors = result
            .data_errors
            .iter()
            .filter(|e| e.request().is_some())
            .count();
        let total = resolved + unresolved + data_errors;

        // Per-tier counts over resolved + unresolved (data errors are
        // excluded from processing, so they carry no tier outcome).
        let mut by_priority = BTreeMap::new();
        for tier in Priority::ALL {
            let r = result
                .resolved
                .iter()
                .filter(|b| b.request.priority == tier)
                .count();
            let u = result
                .unresolved
                .iter()
                .filter(|q| q.priority == tier)
                .count();
            by_priority.insert(
                tier,
                TierStats {
                    resolved: r,
                    unresolved: u,
                    total: r + u,
                    satisfaction_rate: rate(r, r + u),
                },
            );
        }

        let mut section_fill = BTreeMap::new();
        for section in result.sections.sections() {
            let capacity = catalog
                .course(&section.course_id)
                .map(|c| c.max_section_size)
                .unwrap_or(0);
            let fill_rate = if capacity == 0 {
                0.0
            } else {
                section.enrolled() as f64 / capacity as f64
            };
            section_fill.insert(
                section.key(),
                SectionFill {
                    enrolled: section.enrolled(),
                    capacity,
                    fill_rate,
                },
            );
        }

        let mut block_occupancy: BTreeMap<String, usize> = BTreeMap::new();
        for (_, block, _) in result.student_schedule.iter() {
            *block_occupancy.entry(block.to_string()).or_insert(0) += 1;
        }

        let students_scheduled = result.student_schedule.owner_count();
        let teachers_scheduled = result.teacher_schedule.owner_count();

        Self {
            total_requests: total,
            resolved_requests: resolved,
            unresolved_requests: unresolved,
            data_error_requests: data_errors,
            satisfaction_rate: rate(resolved, total),
            by_priority,
            section_fill,
            block_occupancy,
            sections_created: result.sections.len(),
            sections_unplaced: result.sections.unplaced_count(),
            students_scheduled,
            teachers_scheduled,
            avg_courses_per_student: mean(
                result.student_schedule.commitment_count(),
                students_scheduled,
            ),
            avg_courses_per_teacher: mean(
                result.teacher_schedule.commitment_count(),
                teachers_scheduled,
            ),
        }
    }

    /// Conservation identity: every request is in exactly one terminal set.
    pub fn is_conserved(&self) -> bool {
        self.resolved_requests + self.unresolved_requests + self.data_error_requests
            == self.total_requests
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        1.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(sum: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

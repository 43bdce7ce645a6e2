//! Input checks and schedule audit.
//!
//! Two layers:
//!
//! - [`validate_input`] checks catalog/queue integrity before a run.
//!   Advisory only: the scheduler never aborts on these conditions — it
//!   excludes the offending records and reports them as data errors.
//! - [`audit_schedule`] re-checks the hard constraints on a completed
//!   run: no double-booked teacher or student, rosters within capacity,
//!   section counts within limits, request conservation, and agreement
//!   between section table and timetables. A non-empty audit indicates
//!   an implementation defect, so tests fail loudly on it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Catalog, RequestQueue};
use crate::scheduler::ScheduleResult;

/// Validation result: all detected issues, or none.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A structural problem in the input or a constraint violation in the output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// A request names a course absent from the catalog.
    #[error("request from student '{student}' names unknown course '{course}'")]
    UnknownCourse {
        /// Requesting student.
        student: String,
        /// Unknown course id.
        course: String,
    },
    /// A staffing entry names a course absent from the catalog.
    #[error("staffing entry for unknown course '{course}'")]
    StaffedUnknownCourse {
        /// Unknown course id.
        course: String,
    },
    /// A staffing entry's section number exceeds the course's limit.
    #[error("staffing entry {course}_{section} exceeds max sections ({max})")]
    StaffedOutOfRange {
        /// Course id.
        course: String,
        /// Out-of-range section number.
        section: u32,
        /// The course's max sections.
        max: u32,
    },
    /// A course declares a zero section size and can seat nobody.
    #[error("course '{course}' has zero section size")]
    ZeroSectionSize {
        /// Course id.
        course: String,
    },
    /// A course lists no available blocks and can never be placed.
    #[error("course '{course}' lists no available blocks")]
    NoAvailableBlocks {
        /// Course id.
        course: String,
    },
    /// A teacher holds two sections in the same block.
    #[error("teacher '{teacher}' holds two sections in block '{block}'")]
    TeacherDoubleBooked {
        /// Teacher id.
        teacher: String,
        /// Conflicting block.
        block: String,
    },
    /// A student holds two sections in the same block.
    #[error("student '{student}' holds two sections in block '{block}'")]
    StudentDoubleBooked {
        /// Student id.
        student: String,
        /// Conflicting block.
        block: String,
    },
    /// A roster exceeds the course's max section size.
    #[error("section {section} holds {enrolled} students, capacity {capacity}")]
    RosterOverflow {
        /// Section key (`COURSE_n`).
        section: String,
        /// Roster size.
        enrolled: usize,
        /// Course capacity.
        capacity: usize,
    },
    /// A course instantiated more sections than its limit.
    #[error("course '{course}' has {actual} sections, max {max}")]
    SectionCountExceeded {
        /// Course id.
        course: String,
        /// Instantiated section count.
        actual: usize,
        /// The course's max sections.
        max: u32,
    },
    /// Resolved + unresolved + data errors does not equal total requests.
    #[error("request accounting mismatch: {resolved} + {unresolved} + {data_errors} != {total}")]
    AccountingMismatch {
        /// Resolved count.
        resolved: usize,
        /// Unresolved count.
        unresolved: usize,
        /// Request-level data error count.
        data_errors: usize,
        /// Total requests per statistics.
        total: usize,
    },
    /// A timetable entry disagrees with the section table.
    #[error("timetable for '{owner}' in block '{block}' disagrees with section table")]
    TimetableMismatch {
        /// Timetable owner (teacher or student).
        owner: String,
        /// Block in disagreement.
        block: String,
    },
}

/// Validates catalog and queue integrity before a run.
///
/// Checks:
/// 1. Every request names a catalog course.
/// 2. Every staffing entry names a catalog course and an in-range section.
/// 3. No course declares a zero section size.
/// 4. Every course lists at least one available block.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(catalog: &Catalog, queue: &RequestQueue) -> ValidationResult {
    let mut errors = Vec::new();

    for request in queue.requests() {
        if !catalog.contains_course(&request.course_id) {
            errors.push(ValidationError::UnknownCourse {
                student: request.student_id.clone(),
                course: request.course_id.clone(),
            });
        }
    }

    for (course_id, section, _teacher) in catalog.staffing() {
        match catalog.course(course_id) {
            None => errors.push(ValidationError::StaffedUnknownCourse {
                course: course_id.to_string(),
            }),
            Some(course) if section > course.max_sections => {
                errors.push(ValidationError::StaffedOutOfRange {
                    course: course_id.to_string(),
                    section,
                    max: course.max_sections,
                });
            }
            Some(_) => {}
        }
    }

    for course in catalog.courses() {
        if course.max_section_size == 0 {
            errors.push(ValidationError::ZeroSectionSize {
                course: course.id.clone(),
            });
        }
        if course.available_blocks.is_empty() {
            errors.push(ValidationError::NoAvailableBlocks {
                course: course.id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits a completed run against the hard constraints.
///
/// Returns every violation found; an empty vector means the run upheld
/// all invariants. Violations here are implementation defects, not data
/// conditions — the passes are built so none can occur.
pub fn audit_schedule(result: &ScheduleResult, catalog: &Catalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Invariant: per teacher and block, at most one section.
    let mut teacher_slots: BTreeSet<(&str, &str)> = BTreeSet::new();
    for section in result.sections.sections() {
        let (Some(teacher), Some(block)) = (section.teacher.as_deref(), section.block.as_deref())
        else {
            continue;
        };
        if !teacher_slots.insert((teacher, block)) {
            errors.push(ValidationError::TeacherDoubleBooked {
                teacher: teacher.to_string(),
                block: block.to_string(),
            });
        }
    }

    // Invariant: per student and block, at most one section.
    let mut student_slots: BTreeSet<(&str, &str)> = BTreeSet::new();
    for section in result.sections.sections() {
        let Some(block) = section.block.as_deref() else {
            continue;
        };
        for student in &section.roster {
            if !student_slots.insert((student.as_str(), block)) {
                errors.push(ValidationError::StudentDoubleBooked {
                    student: student.clone(),
                    block: block.to_string(),
                });
            }
        }
    }

    // Invariants: roster within capacity, section count within limit.
    for course in catalog.courses() {
        let instantiated = result.sections.for_course(&course.id).count();
        if instantiated > course.max_sections as usize {
            errors.push(ValidationError::SectionCountExceeded {
                course: course.id.clone(),
                actual: instantiated,
                max: course.max_sections,
            });
        }
        for section in result.sections.for_course(&course.id) {
            if section.enrolled() > course.max_section_size {
                errors.push(ValidationError::RosterOverflow {
                    section: section.key(),
                    enrolled: section.enrolled(),
                    capacity: course.max_section_size,
                });
            }
        }
    }

    // Conservation: every request terminal in exactly one set.
    let resolved = result.resolved.len();
    let unresolved = result.unresolved.len();
    let data_errors = result
        .data_errors
        .iter()
        .filter(|e| e.request().is_some())
        .count();
    if resolved + unresolved + data_errors != result.stats.total_requests {
        errors.push(ValidationError::AccountingMismatch {
            resolved,
            unresolved,
            data_errors,
            total: result.stats.total_requests,
        });
    }

    // Agreement: every placed section appears in its teacher's timetable
    // and in each roster member's timetable, naming that section.
    for section in result.sections.sections() {
        let Some(block) = section.block.as_deref() else {
            continue;
        };
        if let Some(teacher) = section.teacher.as_deref() {
            let named = result
                .teacher_schedule
                .placement(teacher, block)
                .is_some_and(|p| p.course_id == section.course_id && p.section == section.number);
            if !named {
                errors.push(ValidationError::TimetableMismatch {
                    owner: teacher.to_string(),
                    block: block.to_string(),
                });
            }
        }
        for student in &section.roster {
            let named = result
                .student_schedule
                .placement(student, block)
                .is_some_and(|p| p.course_id == section.course_id && p.section == section.number);
            if !named {
                errors.push(ValidationError::TimetableMismatch {
                    owner: student.clone(),
                    block: block.to_string(),
                });
            }
        }
    }

    errors
}

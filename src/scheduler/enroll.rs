//! Pass two: student-to-section enrollment.
//!
//! # Algorithm
//!
//! 1. Order requests by ascending priority (Required first), original
//!    queue order within a tier (stable sort).
//! 2. For each request, scan the course's sections in increasing number
//!    order and take the first that has an assigned block, roster room,
//!    and a block free in the student's timetable.
//! 3. No fit across all sections → the request is unresolved. A request
//!    names exactly one course; there is no retry elsewhere.
//!
//! Teacher conflicts are already frozen by pass one; this pass enforces
//! student non-conflict and section capacity.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Catalog, Placement, Request, RequestQueue, SectionTable, Timetable};

use super::DataError;

/// A request bound to the section that satisfied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    /// The original request.
    pub request: Request,
    /// Satisfying section number within the requested course.
    pub section: u32,
    /// Block the student was committed to.
    pub block: String,
}

/// Output of the enrollment pass.
#[derive(Debug, Clone)]
pub struct EnrollmentPass {
    /// Requests bound to a section.
    pub resolved: Vec<ResolvedRequest>,
    /// Requests no section could satisfy.
    pub unresolved: Vec<Request>,
    /// Requests excluded as data errors (unknown course).
    pub anomalies: Vec<DataError>,
}

/// Enrolls students into the sections built by pass one.
///
/// Mutates section rosters and writes student commitments into
/// `student_schedule`, which the caller owns. Never fails: every request
/// ends resolved, unresolved, or excluded as a data error.
pub fn enroll_students(
    catalog: &Catalog,
    sections: &mut SectionTable,
    queue: &RequestQueue,
    student_schedule: &mut Timetable,
) -> EnrollmentPass {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    let mut anomalies = Vec::new();

    for request in queue.in_priority_order() {
        let Some(course) = catalog.course(&request.course_id) else {
            warn!(
                student = %request.student_id,
                course = %request.course_id,
                "request names unknown course; excluded as data error"
            );
            anomalies.push(DataError::UnknownCourse {
                request: request.clone(),
            });
            continue;
        };
        let max_size = course.max_section_size;

        let mut placed = false;
        for section in sections.for_course_mut(&request.course_id) {
            // Unplaced sections accept no students.
            let Some(block) = section.block.clone() else {
                continue;
            };
            if !section.has_room(max_size) {
                continue;
            }
            if student_schedule.is_busy(&request.student_id, &block) {
                continue;
            }

            section.roster.push(request.student_id.clone());
            student_schedule.commit(
                request.student_id.clone(),
                block.clone(),
                Placement::new(request.course_id.as_str(), section.number),
            );
            resolved.push(ResolvedRequest {
                request: request.clone(),
                section: section.number,
                block,
            });
            placed = true;
            break;
        }

        if !placed {
            debug!(
                student = %request.student_id,
                course = %request.course_id,
                priority = %request.priority,
                "request unresolved"
            );
            unresolved.push(request.clone());
        }
    }

    EnrollmentPass {
        resolved,
        unresolved,
        anomalies,
    }
}

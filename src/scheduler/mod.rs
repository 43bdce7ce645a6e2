//! Two-pass greedy assignment and run statistics.
//!
//! # Algorithm
//!
//! 1. **Block assignment** ([`assign_blocks`]): courses in descending
//!    demand order; each needed section takes the first conflict-free
//!    block, committing the teacher's timetable.
//! 2. **Enrollment** ([`enroll_students`]): requests in descending
//!    priority order; each takes the first section with a block, room,
//!    and no student conflict.
//!
//! Both passes are greedy with no backtracking — that is the specified
//! behavior, not a baseline for a better solver. A run always terminates
//! with a best-effort schedule; shortfalls surface as unplaced sections
//! and unresolved requests in the result, never as errors.
//!
//! Data flow is strictly linear: catalog + queue → sections → rosters →
//! statistics. Determinism is a contract: identical input produces
//! byte-identical serialized output.

mod blocks;
mod enroll;
mod stats;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Catalog, Request, RequestQueue, Section, SectionTable, Timetable};

pub use blocks::{assign_blocks, BlockPass};
pub use enroll::{enroll_students, EnrollmentPass, ResolvedRequest};
pub use stats::{ScheduleStats, SectionFill, TierStats};

/// A record excluded from processing because the input was inconsistent.
///
/// Data errors are counted and reported, never fatal. Request-level
/// errors participate in the conservation identity
/// (resolved + unresolved + data errors = total).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataError {
    /// A request names a course absent from the catalog.
    UnknownCourse {
        /// The excluded request.
        request: Request,
    },
    /// A needed section has no teacher of record; it was instantiated
    /// unplaced and excluded from block assignment.
    MissingTeacher {
        /// Course identifier.
        course_id: String,
        /// Section number.
        section: u32,
    },
}

impl DataError {
    /// The excluded request, for request-level errors.
    pub fn request(&self) -> Option<&Request> {
        match self {
            DataError::UnknownCourse { request } => Some(request),
            DataError::MissingTeacher { .. } => None,
        }
    }
}

/// Complete output of one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// All instantiated sections with blocks and rosters.
    pub sections: SectionTable,
    /// Teacher commitments (written by pass one).
    pub teacher_schedule: Timetable,
    /// Student commitments (written by pass two).
    pub student_schedule: Timetable,
    /// Requests bound to a section.
    pub resolved: Vec<ResolvedRequest>,
    /// Requests no section could satisfy.
    pub unresolved: Vec<Request>,
    /// Records excluded as data errors.
    pub data_errors: Vec<DataError>,
    /// Summary statistics.
    pub stats: ScheduleStats,
}

impl ScheduleResult {
    /// Sections left without a block.
    pub fn unplaced_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.sections().iter().filter(|s| !s.is_placed())
    }
}

/// Deterministic two-pass greedy scheduler.
///
/// # Example
///
/// ```
/// use term_scheduler::models::{Catalog, Course, Request, RequestQueue};
/// use term_scheduler::scheduler::Scheduler;
///
/// let catalog = Catalog::new()
///     .with_course(
///         Course::new("BIO1")
///             .with_max_size(2)
///             .with_available_blocks(["A", "B"]),
///     )
///     .with_teacher("BIO1", 1, "T1");
/// let queue = RequestQueue::new()
///     .with_request(Request::required("S1", "BIO1"))
///     .with_request(Request::required("S2", "BIO1"));
///
/// let result = Scheduler::new().schedule(&catalog, &queue);
/// assert_eq!(result.stats.resolved_requests, 2);
/// assert_eq!(result.sections.get("BIO1", 1).unwrap().block.as_deref(), Some("A"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Runs both passes and derives statistics.
    ///
    /// The run context owns the timetables; the passes receive them as
    /// explicit arguments and the result returns them to the caller.
    pub fn schedule(&self, catalog: &Catalog, queue: &RequestQueue) -> ScheduleResult {
        debug!(
            courses = catalog.course_count(),
            requests = queue.len(),
            "starting scheduling run"
        );

        let mut teacher_schedule = Timetable::new();
        let mut student_schedule = Timetable::new();

        let block_pass = assign_blocks(catalog, queue, &mut teacher_schedule);
        let mut sections = block_pass.sections;

        let enroll_pass = enroll_students(catalog, &mut sections, queue, &mut student_schedule);

        let mut data_errors = block_pass.anomalies;
        data_errors.extend(enroll_pass.anomalies);

        let mut result = ScheduleResult {
            sections,
            teacher_schedule,
            student_schedule,
            resolved: enroll_pass.resolved,
            unresolved: enroll_pass.unresolved,
            data_errors,
            stats: ScheduleStats::default(),
        };
        result.stats = ScheduleStats::calculate(&result, catalog);

        debug!(
            resolved = result.stats.resolved_requests,
            unresolved = result.stats.unresolved_requests,
            data_errors = result.stats.data_error_requests,
            unplaced_sections = result.stats.sections_unplaced,
            "scheduling run complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Priority};

    fn term_catalog() -> Catalog {
        Catalog::new()
            .with_course(
                Course::new("BIO1")
                    .with_max_size(2)
                    .with_max_sections(2)
                    .with_available_blocks(["A", "B", "C"]),
            )
            .with_course(
                Course::new("CHEM1")
                    .with_max_size(2)
                    .with_available_blocks(["A", "B"]),
            )
            .with_course(
                Course::new("ART1")
                    .with_max_size(3)
                    .with_available_blocks(["C"]),
            )
            .with_teacher("BIO1", 1, "T1")
            .with_teacher("BIO1", 2, "T2")
            .with_teacher("CHEM1", 1, "T1")
            .with_teacher("ART1", 1, "T3")
    }

    fn term_queue() -> RequestQueue {
        RequestQueue::new()
            .with_request(Request::required("S1", "BIO1"))
            .with_request(Request::required("S2", "BIO1"))
            .with_request(Request::required("S3", "BIO1"))
            .with_request(Request::requested("S1", "CHEM1"))
            .with_request(Request::requested("S2", "CHEM1"))
            .with_request(Request::recommended("S1", "ART1"))
            .with_request(Request::recommended("S4", "ART1"))
    }

    #[test]
    fn test_end_to_end_conservation() {
        let result = Scheduler::new().schedule(&term_catalog(), &term_queue());
        assert!(result.stats.is_conserved());
        assert_eq!(result.stats.total_requests, 7);
    }

    #[test]
    fn test_end_to_end_no_double_booking() {
        let result = Scheduler::new().schedule(&term_catalog(), &term_queue());

        // Every roster member's timetable names exactly that section.
        for section in result.sections.sections() {
            let block = match &section.block {
                Some(b) => b,
                None => continue,
            };
            for student in &section.roster {
                let p = result.student_schedule.placement(student, block).unwrap();
                assert_eq!(p.course_id, section.course_id);
                assert_eq!(p.section, section.number);
            }
        }
    }

    #[test]
    fn test_determinism_byte_identical() {
        let catalog = term_catalog();
        let queue = term_queue();
        let a = Scheduler::new().schedule(&catalog, &queue);
        let b = Scheduler::new().schedule(&catalog, &queue);

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn test_priority_monotonic_under_sufficient_capacity() {
        // BIO1 capacity (2 sections x 2 seats) covers all four requests;
        // with capacity binding nowhere, no tier resolves worse than a
        // lower one.
        let catalog = term_catalog();
        let queue = RequestQueue::new()
            .with_request(Request::recommended("S1", "BIO1"))
            .with_request(Request::required("S2", "BIO1"))
            .with_request(Request::requested("S3", "BIO1"))
            .with_request(Request::required("S4", "BIO1"));

        let result = Scheduler::new().schedule(&catalog, &queue);
        let stats = &result.stats;
        let rate = |p: Priority| stats.by_priority[&p].satisfaction_rate;
        assert!(rate(Priority::Required) >= rate(Priority::Requested));
        assert!(rate(Priority::Requested) >= rate(Priority::Recommended));
        assert_eq!(stats.resolved_requests, 4);
    }

    #[test]
    fn test_unplaced_course_requests_all_unresolved() {
        // T teaches both single-block courses; the loser of pass one has
        // no placed section, so all its requests fail regardless of tier.
        let catalog = Catalog::new()
            .with_course(Course::new("BIO1").with_available_blocks(["A"]))
            .with_course(Course::new("PHYS1").with_available_blocks(["A"]))
            .with_teacher("BIO1", 1, "T")
            .with_teacher("PHYS1", 1, "T");
        let queue = RequestQueue::new()
            .with_request(Request::required("S1", "PHYS1"))
            .with_request(Request::recommended("S2", "BIO1"))
            .with_request(Request::required("S3", "PHYS1"));

        let result = Scheduler::new().schedule(&catalog, &queue);

        // PHYS1 has higher demand, so it wins block A; BIO1 is unplaced.
        assert_eq!(result.unplaced_sections().count(), 1);
        assert_eq!(result.unplaced_sections().next().unwrap().course_id, "BIO1");
        assert!(result
            .unresolved
            .iter()
            .all(|r| r.course_id == "BIO1"));
        assert_eq!(result.stats.resolved_requests, 2);
    }

    #[test]
    fn test_data_errors_reported_not_fatal() {
        let catalog = term_catalog();
        let queue = term_queue().with_request(Request::required("S9", "GHOST1"));

        let result = Scheduler::new().schedule(&catalog, &queue);
        assert_eq!(result.data_errors.len(), 1);
        assert!(result.stats.is_conserved());
    }

    #[test]
    fn test_result_roundtrip() {
        let result = Scheduler::new().schedule(&term_catalog(), &term_queue());
        let json = serde_json::to_string(&result).unwrap();
        let back: ScheduleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}

//! Pass one: section-to-block assignment.
//!
//! # Algorithm
//!
//! 1. Visit courses in descending request-count order (ties: ascending
//!    course id).
//! 2. Instantiate `min(max_sections, ceil(demand / max_size))` sections.
//! 3. For each section, scan the course's available blocks in declared
//!    order and take the first block that is not unavailable, not used by
//!    an earlier section of the same course, and free in the teacher's
//!    timetable.
//! 4. A section with no conflict-free block is left unplaced and accepts
//!    no students. Earlier choices are never revisited.
//!
//! # Complexity
//! O(c log c + s * b) where c=courses, s=sections, b=blocks per course.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::models::{Catalog, Placement, RequestQueue, Section, SectionTable, Timetable};

use super::DataError;

/// Output of the block-assignment pass.
#[derive(Debug, Clone)]
pub struct BlockPass {
    /// Instantiated sections, course-major, ascending section number.
    pub sections: SectionTable,
    /// Staffing anomalies encountered (sections with no teacher of record).
    pub anomalies: Vec<DataError>,
}

/// Assigns course sections to blocks.
///
/// Consumes the catalog and the aggregate demand from `queue`; writes
/// teacher commitments into `teacher_schedule`, which the caller owns.
/// Never fails: sections that cannot be placed are instantiated without
/// a block, shrinking the course's effective capacity for pass two.
pub fn assign_blocks(
    catalog: &Catalog,
    queue: &RequestQueue,
    teacher_schedule: &mut Timetable,
) -> BlockPass {
    let demand = queue.demand_by_course();

    // Descending demand, ascending course id on ties. Fixed order is the
    // determinism contract, not an optimization.
    let mut order: Vec<(&str, usize)> = demand.into_iter().collect();
    order.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut sections = SectionTable::new();
    let mut anomalies = Vec::new();

    for (course_id, count) in order {
        let Some(course) = catalog.course(course_id) else {
            // Requests for unknown courses become data errors in pass two.
            debug!(course = course_id, "skipping course absent from catalog");
            continue;
        };

        let needed = course.sections_needed(count);
        debug!(
            course = course_id,
            requests = count,
            sections = needed,
            "assigning blocks"
        );

        // Blocks taken by earlier sections of this course.
        let mut used_blocks: BTreeSet<&str> = BTreeSet::new();

        for number in 1..=needed {
            let mut section = Section::new(course_id, number);

            let Some(teacher) = catalog.teacher_for(course_id, number) else {
                warn!(
                    course = course_id,
                    section = number,
                    "no teacher of record; section excluded from placement"
                );
                anomalies.push(DataError::MissingTeacher {
                    course_id: course_id.to_string(),
                    section: number,
                });
                sections.push(section);
                continue;
            };
            section.teacher = Some(teacher.to_string());

            let chosen = course
                .available_blocks
                .iter()
                .filter(|b| !course.unavailable_blocks.contains(b.as_str()))
                .filter(|b| !used_blocks.contains(b.as_str()))
                .find(|b| !teacher_schedule.is_busy(teacher, b.as_str()));

            match chosen {
                Some(block) => {
                    used_blocks.insert(block);
                    teacher_schedule.commit(teacher, block.clone(), Placement::new(course_id, number));
                    section.block = Some(block.clone());
                }
                None => {
                    // Deliberate greedy outcome: reported, never an error.
                    warn!(
                        course = course_id,
                        section = number,
                        teacher,
                        "no conflict-free block; section left unplaced"
                    );
                }
            }
            sections.push(section);
        }
    }

    BlockPass { sections, anomalies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Request};

    fn queue_of(requests: &[(&str, &str)]) -> RequestQueue {
        let mut queue = RequestQueue::new();
        for (student, course) in requests {
            queue.push(Request::required(*student, *course));
        }
        queue
    }

    #[test]
    fn test_single_section_first_available_block() {
        let catalog = Catalog::new()
            .with_course(
                Course::new("BIO1")
                    .with_max_size(2)
                    .with_available_blocks(["A", "B"]),
            )
            .with_teacher("BIO1", 1, "T1");
        let queue = queue_of(&[("S1", "BIO1"), ("S2", "BIO1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);

        assert_eq!(pass.sections.len(), 1);
        let s = pass.sections.get("BIO1", 1).unwrap();
        assert_eq!(s.block.as_deref(), Some("A"));
        assert_eq!(s.teacher.as_deref(), Some("T1"));
        assert!(teachers.is_busy("T1", "A"));
        assert!(pass.anomalies.is_empty());
    }

    #[test]
    fn test_sections_sized_by_demand() {
        // 3 requests, max_size 2, max_sections 3 → 2 sections
        let catalog = Catalog::new()
            .with_course(
                Course::new("BIO1")
                    .with_max_size(2)
                    .with_max_sections(3)
                    .with_available_blocks(["A", "B", "C"]),
            )
            .with_teacher("BIO1", 1, "T1")
            .with_teacher("BIO1", 2, "T2");
        let queue = queue_of(&[("S1", "BIO1"), ("S2", "BIO1"), ("S3", "BIO1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);
        assert_eq!(pass.sections.len(), 2);
    }

    #[test]
    fn test_same_course_sections_take_distinct_blocks() {
        // Same teacher for both sections: section 2 must skip block A twice
        // over (used by section 1, and teacher busy).
        let catalog = Catalog::new()
            .with_course(
                Course::new("BIO1")
                    .with_max_size(1)
                    .with_max_sections(2)
                    .with_available_blocks(["A", "B"]),
            )
            .with_teacher("BIO1", 1, "T1")
            .with_teacher("BIO1", 2, "T1");
        let queue = queue_of(&[("S1", "BIO1"), ("S2", "BIO1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);

        assert_eq!(pass.sections.get("BIO1", 1).unwrap().block.as_deref(), Some("A"));
        assert_eq!(pass.sections.get("BIO1", 2).unwrap().block.as_deref(), Some("B"));
    }

    #[test]
    fn test_unavailable_block_skipped() {
        let catalog = Catalog::new()
            .with_course(
                Course::new("BIO1")
                    .with_available_blocks(["A", "B"])
                    .with_unavailable_block("A"),
            )
            .with_teacher("BIO1", 1, "T1");
        let queue = queue_of(&[("S1", "BIO1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);
        assert_eq!(pass.sections.get("BIO1", 1).unwrap().block.as_deref(), Some("B"));
    }

    #[test]
    fn test_shared_teacher_one_section_unplaced() {
        // T teaches BIO1_1 and PHYS1_1; both courses only offer block A.
        // Whichever course is processed first wins; the other is unplaced.
        let catalog = Catalog::new()
            .with_course(Course::new("BIO1").with_available_blocks(["A"]))
            .with_course(Course::new("PHYS1").with_available_blocks(["A"]))
            .with_teacher("BIO1", 1, "T")
            .with_teacher("PHYS1", 1, "T");
        // Equal demand → tie broken by course id: BIO1 first.
        let queue = queue_of(&[("S1", "BIO1"), ("S2", "PHYS1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);

        assert_eq!(pass.sections.get("BIO1", 1).unwrap().block.as_deref(), Some("A"));
        assert!(pass.sections.get("PHYS1", 1).unwrap().block.is_none());
        assert_eq!(pass.sections.unplaced_count(), 1);
    }

    #[test]
    fn test_demand_order_high_demand_course_first() {
        // CHEM1 has more requests than ART1, so it picks block A first
        // even though ART1 sorts earlier alphabetically.
        let catalog = Catalog::new()
            .with_course(Course::new("ART1").with_available_blocks(["A"]))
            .with_course(Course::new("CHEM1").with_available_blocks(["A"]))
            .with_teacher("ART1", 1, "T")
            .with_teacher("CHEM1", 1, "T");
        let queue = queue_of(&[("S1", "ART1"), ("S2", "CHEM1"), ("S3", "CHEM1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);

        assert_eq!(pass.sections.get("CHEM1", 1).unwrap().block.as_deref(), Some("A"));
        assert!(pass.sections.get("ART1", 1).unwrap().block.is_none());
    }

    #[test]
    fn test_missing_teacher_is_anomaly() {
        let catalog =
            Catalog::new().with_course(Course::new("BIO1").with_available_blocks(["A"]));
        let queue = queue_of(&[("S1", "BIO1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);

        let s = pass.sections.get("BIO1", 1).unwrap();
        assert!(s.block.is_none());
        assert!(s.teacher.is_none());
        assert_eq!(
            pass.anomalies,
            vec![DataError::MissingTeacher {
                course_id: "BIO1".into(),
                section: 1,
            }]
        );
    }

    #[test]
    fn test_unknown_course_instantiates_nothing() {
        let catalog = Catalog::new();
        let queue = queue_of(&[("S1", "GHOST1")]);

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);
        assert!(pass.sections.is_empty());
        assert!(pass.anomalies.is_empty()); // Reported by pass two, per request
    }

    #[test]
    fn test_zero_demand_course_skipped() {
        let catalog = Catalog::new()
            .with_course(Course::new("BIO1").with_available_blocks(["A"]))
            .with_teacher("BIO1", 1, "T1");
        let queue = RequestQueue::new();

        let mut teachers = Timetable::new();
        let pass = assign_blocks(&catalog, &queue, &mut teachers);
        assert!(pass.sections.is_empty());
    }

    #[test]
    fn test_preexisting_teacher_commitment_respected() {
        // Caller-owned timetable may carry prior commitments.
        let catalog = Catalog::new()
            .with_course(Course::new("BIO1").with_available_blocks(["A", "B"]))
            .with_teacher("BIO1", 1, "T1");
        let queue = queue_of(&[("S1", "BIO1")]);

        let mut teachers = Timetable::new();
        teachers.commit("T1", "A", Placement::new("HALLDUTY", 1));

        let pass = assign_blocks(&catalog, &queue, &mut teachers);
        assert_eq!(pass.sections.get("BIO1", 1).unwrap().block.as_deref(), Some("B"));
    }
}

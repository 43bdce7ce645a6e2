//! Section and section-table models.
//!
//! A section is one teachable instance of a course, bound to at most one
//! block and one teacher, with a bounded roster. Sections are created by
//! pass one (block assignment), have their rosters filled by pass two
//! (enrollment), and are never destroyed within a run.

use serde::{Deserialize, Serialize};

/// One teachable instance of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Parent course identifier.
    pub course_id: String,
    /// Section number within the course (1-based).
    pub number: u32,
    /// Assigned block. `None` = unplaceable: no conflict-free block was
    /// found, and the section accepts no students.
    pub block: Option<String>,
    /// Teacher of record. `None` = no staffing entry (data anomaly).
    pub teacher: Option<String>,
    /// Enrolled students, in enrollment order.
    pub roster: Vec<String>,
}

impl Section {
    /// Creates an empty, unplaced section.
    pub fn new(course_id: impl Into<String>, number: u32) -> Self {
        Self {
            course_id: course_id.into(),
            number,
            block: None,
            teacher: None,
            roster: Vec::new(),
        }
    }

    /// Stable section key, e.g. `"BIO1_1"`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.course_id, self.number)
    }

    /// Whether the section holds an assigned block.
    pub fn is_placed(&self) -> bool {
        self.block.is_some()
    }

    /// Current roster size.
    pub fn enrolled(&self) -> usize {
        self.roster.len()
    }

    /// Whether the roster has room under the given capacity.
    pub fn has_room(&self, max_size: usize) -> bool {
        self.roster.len() < max_size
    }
}

/// All sections instantiated by a run, in creation order.
///
/// Creation order is course-major, ascending section number, so
/// per-course lookups iterate sections in increasing number order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section.
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// All sections in creation order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections of one course, in increasing number order.
    pub fn for_course<'a>(&'a self, course_id: &'a str) -> impl Iterator<Item = &'a Section> {
        self.sections.iter().filter(move |s| s.course_id == course_id)
    }

    /// Mutable sections of one course, in increasing number order.
    pub fn for_course_mut<'a>(
        &'a mut self,
        course_id: &'a str,
    ) -> impl Iterator<Item = &'a mut Section> {
        self.sections
            .iter_mut()
            .filter(move |s| s.course_id == course_id)
    }

    /// Looks up a section by course and number.
    pub fn get(&self, course_id: &str, number: u32) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.course_id == course_id && s.number == number)
    }

    /// Number of instantiated sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections without an assigned block.
    pub fn unplaced_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_placed()).count()
    }
}

//! Course and catalog models.
//!
//! A course declares its sizing limits and block availability; the
//! catalog is the read-only reference data for a run — courses keyed by
//! identifier plus the teacher-of-record staffing table. Both are
//! immutable once loaded.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A course offering and its scheduling constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier (e.g., "BIO1").
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Maximum roster size per section.
    pub max_section_size: usize,
    /// Maximum number of sections that may be instantiated.
    pub max_sections: u32,
    /// Blocks this course may occupy, in canonical scan order.
    ///
    /// Pass one tries these in declared order and takes the first fit.
    pub available_blocks: Vec<String>,
    /// Blocks this course must not occupy, even if listed as available.
    pub unavailable_blocks: BTreeSet<String>,
}

impl Course {
    /// Creates a course with default sizing (25 seats, 1 section).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            max_section_size: 25,
            max_sections: 1,
            available_blocks: Vec::new(),
            unavailable_blocks: BTreeSet::new(),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the maximum section size.
    pub fn with_max_size(mut self, max_section_size: usize) -> Self {
        self.max_section_size = max_section_size;
        self
    }

    /// Sets the maximum number of sections.
    pub fn with_max_sections(mut self, max_sections: u32) -> Self {
        self.max_sections = max_sections;
        self
    }

    /// Sets the available blocks (canonical scan order).
    pub fn with_available_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_blocks = blocks.into_iter().map(Into::into).collect();
        self
    }

    /// Marks a block unavailable.
    pub fn with_unavailable_block(mut self, block: impl Into<String>) -> Self {
        self.unavailable_blocks.insert(block.into());
        self
    }

    /// Whether this course may occupy the given block.
    pub fn can_use_block(&self, block: &str) -> bool {
        self.available_blocks.iter().any(|b| b == block) && !self.unavailable_blocks.contains(block)
    }

    /// Sections needed to seat `demand` requests:
    /// `min(max_sections, ceil(demand / max_section_size))`.
    ///
    /// Zero demand (or a zero section size) needs no sections.
    pub fn sections_needed(&self, demand: usize) -> u32 {
        if demand == 0 || self.max_section_size == 0 {
            return 0;
        }
        let by_demand = demand.div_ceil(self.max_section_size);
        (self.max_sections as usize).min(by_demand) as u32
    }
}

/// Read-only reference data for a run: courses plus staffing.
///
/// The staffing table maps course id → section number → teacher id
/// (the teacher of record for that section).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    courses: BTreeMap<String, Course>,
    staffing: BTreeMap<String, BTreeMap<u32, String>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course, builder-style. Replaces any course with the same id.
    pub fn with_course(mut self, course: Course) -> Self {
        self.add_course(course);
        self
    }

    /// Adds a course. Replaces any course with the same id.
    pub fn add_course(&mut self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    /// Records the teacher of record for a section, builder-style.
    pub fn with_teacher(
        mut self,
        course_id: impl Into<String>,
        section: u32,
        teacher_id: impl Into<String>,
    ) -> Self {
        self.assign_teacher(course_id, section, teacher_id);
        self
    }

    /// Records the teacher of record for a section.
    pub fn assign_teacher(
        &mut self,
        course_id: impl Into<String>,
        section: u32,
        teacher_id: impl Into<String>,
    ) {
        self.staffing
            .entry(course_id.into())
            .or_default()
            .insert(section, teacher_id.into());
    }

    /// Looks up a course.
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.get(course_id)
    }

    /// Whether the catalog contains the course.
    pub fn contains_course(&self, course_id: &str) -> bool {
        self.courses.contains_key(course_id)
    }

    /// All courses, in ascending id order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Number of courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// The teacher of record for a section, if staffed.
    pub fn teacher_for(&self, course_id: &str, section: u32) -> Option<&str> {
        self.staffing
            .get(course_id)
            .and_then(|by_section| by_section.get(&section))
            .map(String::as_str)
    }

    /// All staffing entries as (course id, section number, teacher id).
    pub fn staffing(&self) -> impl Iterator<Item = (&str, u32, &str)> {
        self.staffing.iter().flat_map(|(course, by_section)| {
            by_section
                .iter()
                .map(move |(section, teacher)| (course.as_str(), *section, teacher.as_str()))
        })
    }
}

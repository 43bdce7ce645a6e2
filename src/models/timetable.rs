//! Per-person block commitments.
//!
//! A timetable maps an owner (teacher or student) to the blocks already
//! committed, each naming the course/section occupying it. The block is
//! the unit of conflict: one timetable type serves both the teacher
//! schedule (written only by pass one) and the student schedule (written
//! only by pass two).
//!
//! Nested `BTreeMap`s keep iteration and serialization order stable, so
//! identical runs produce byte-identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The course/section occupying one block of someone's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Course identifier.
    pub course_id: String,
    /// Section number within the course.
    pub section: u32,
}

impl Placement {
    /// Creates a placement.
    pub fn new(course_id: impl Into<String>, section: u32) -> Self {
        Self {
            course_id: course_id.into(),
            section,
        }
    }

    /// Stable section key, e.g. `"BIO1_1"`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.course_id, self.section)
    }
}

/// Block commitments per owner: owner id → block → placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    entries: BTreeMap<String, BTreeMap<String, Placement>>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the owner already has a commitment in the block.
    pub fn is_busy(&self, owner: &str, block: &str) -> bool {
        self.entries
            .get(owner)
            .is_some_and(|blocks| blocks.contains_key(block))
    }

    /// Commits a block for an owner.
    ///
    /// Callers must check `is_busy` first; overwriting an existing
    /// commitment is a defect in the assignment passes, not a recoverable
    /// condition.
    pub fn commit(&mut self, owner: impl Into<String>, block: impl Into<String>, placement: Placement) {
        let previous = self
            .entries
            .entry(owner.into())
            .or_default()
            .insert(block.into(), placement);
        debug_assert!(previous.is_none(), "double-booked timetable commit");
    }

    /// The placement in an owner's block, if any.
    pub fn placement(&self, owner: &str, block: &str) -> Option<&Placement> {
        self.entries.get(owner).and_then(|blocks| blocks.get(block))
    }

    /// An owner's commitments, block → placement, in block order.
    pub fn blocks_for(&self, owner: &str) -> Option<&BTreeMap<String, Placement>> {
        self.entries.get(owner)
    }

    /// All owners with at least one commitment, in id order.
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of owners with at least one commitment.
    pub fn owner_count(&self) -> usize {
        self.entries.len()
    }

    /// All (owner, block, placement) entries in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Placement)> {
        self.entries.iter().flat_map(|(owner, blocks)| {
            blocks
                .iter()
                .map(move |(block, p)| (owner.as_str(), block.as_str(), p))
        })
    }

    /// Total number of commitments across all owners.
    pub fn commitment_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }
}

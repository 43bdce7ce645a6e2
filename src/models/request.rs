//! Student course requests.
//!
//! A request is a student's desire to take a course, tagged with a
//! priority tier. Requests are immutable: their lifecycle state
//! (pending → resolved or unresolved, both terminal) is derived from
//! which output set the run places them in, never stored on the request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Request priority tier, in strict descending precedence.
///
/// The derived `Ord` follows declaration order, so ascending enum order
/// is descending precedence: `Required < Requested < Recommended`.
/// Sorting a request list ascending therefore puts `Required` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Must-take request (e.g., a graduation requirement).
    Required,
    /// Explicitly requested by the student.
    Requested,
    /// Suggested by an advisor.
    Recommended,
}

impl Priority {
    /// All tiers in descending precedence order.
    pub const ALL: [Priority; 3] = [Priority::Required, Priority::Requested, Priority::Recommended];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Required => write!(f, "Required"),
            Priority::Requested => write!(f, "Requested"),
            Priority::Recommended => write!(f, "Recommended"),
        }
    }
}

/// A student's request for one course.
///
/// A request names exactly one course; an unresolved request is never
/// retried against a different course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Requesting student identifier.
    pub student_id: String,
    /// Requested course identifier.
    pub course_id: String,
    /// Priority tier.
    pub priority: Priority,
}

impl Request {
    /// Creates a new request.
    pub fn new(
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: course_id.into(),
            priority,
        }
    }

    /// Creates a `Required` request.
    pub fn required(student_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self::new(student_id, course_id, Priority::Required)
    }

    /// Creates a `Requested` request.
    pub fn requested(student_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self::new(student_id, course_id, Priority::Requested)
    }

    /// Creates a `Recommended` request.
    pub fn recommended(student_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self::new(student_id, course_id, Priority::Recommended)
    }
}

/// The ordered collection of requests for one run.
///
/// Insertion order is significant: it is the stable tie-break within a
/// priority tier, so repeated runs over the same queue produce identical
/// output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestQueue {
    requests: Vec<Request>,
}

impl RequestQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue from a request list, preserving order.
    pub fn from_requests(requests: Vec<Request>) -> Self {
        Self { requests }
    }

    /// Appends a request.
    pub fn push(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Appends a request, builder-style.
    pub fn with_request(mut self, request: Request) -> Self {
        self.push(request);
        self
    }

    /// Requests in insertion order.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Request count per course, for sizing sections in pass one.
    pub fn demand_by_course(&self) -> BTreeMap<&str, usize> {
        let mut demand: BTreeMap<&str, usize> = BTreeMap::new();
        for req in &self.requests {
            *demand.entry(req.course_id.as_str()).or_insert(0) += 1;
        }
        demand
    }

    /// Requests ordered for enrollment: ascending priority (Required
    /// first), original queue order within a tier.
    ///
    /// Uses a stable sort so the insertion-order tie-break holds.
    pub fn in_priority_order(&self) -> Vec<&Request> {
        let mut ordered: Vec<&Request> = self.requests.iter().collect();
        ordered.sort_by_key(|r| r.priority);
        ordered
    }
}

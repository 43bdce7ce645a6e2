//! Course-scheduling domain models.
//!
//! Provides the core data types for one scheduling run: the read-only
//! catalog (courses and staffing), the request queue, and the mutable
//! outputs the two passes build (sections and timetables).
//!
//! # Domain Mappings
//!
//! | term-scheduler | Spreadsheet source |
//! |----------------|--------------------|
//! | Course | Course characteristics row |
//! | Catalog staffing | Course listings (lecturer per section) |
//! | Request | Student request row |
//! | Section | Course code + section number |
//! | Timetable | Student/teacher schedule sheet |

mod course;
mod request;
mod section;
mod timetable;

pub use course::{Catalog, Course};
pub use request::{Priority, Request, RequestQueue};
pub use section::{Section, SectionTable};
pub use timetable::{Placement, Timetable};

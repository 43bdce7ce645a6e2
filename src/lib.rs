//! Two-pass greedy course scheduler for an academic term.
//!
//! Assigns course sections to time blocks and students to sections under
//! hard constraints — no double-booked teacher or student, bounded
//! section rosters, course-specific block availability — and the soft
//! priority ordering Required > Requested > Recommended.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Catalog`, `Course`, `Request`,
//!   `RequestQueue`, `Section`, `SectionTable`, `Timetable`
//! - **`scheduler`**: The two assignment passes, `Scheduler`
//!   orchestration, and `ScheduleStats`
//! - **`validation`**: Input integrity checks and the post-run
//!   invariant audit
//!
//! # Architecture
//!
//! Data flow is strictly linear: catalog + request queue → block
//! assignment → section table → enrollment → result + statistics. No
//! component calls back upstream. Both passes are greedy first-fit with
//! no backtracking; a run always terminates with a best-effort schedule,
//! and shortfalls surface in the result rather than as errors.
//!
//! Determinism is part of the contract: identical input yields
//! byte-identical serialized output. Ingestion of raw enrollment data
//! and rendering of the resulting schedules are external collaborators,
//! out of scope here.

pub mod models;
pub mod scheduler;
pub mod validation;

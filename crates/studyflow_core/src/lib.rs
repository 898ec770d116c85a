//! Core domain logic for StudyFlow, a personal student organizer.
//! This crate is the single source of truth for organizer business invariants;
//! UI layers call its store commands and render its snapshots.

pub mod db;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging};
pub use model::course::{Course, CourseId, CourseValidationError, NewCourse};
pub use model::task::{
    parse_estimated_minutes, NewTask, Task, TaskId, TaskKind, TaskValidationError,
};
pub use model::timetable::{
    ClassTime, EntryId, NewTimetableEntry, TimeParseError, Timetable, TimetableEntry, Weekday,
};
pub use progress::{course_progress, CourseProgress};
pub use repo::kv_backend::{KvBackend, MemoryKvBackend, RepoError, RepoResult, SqliteKvBackend};
pub use store::{Collection, Store};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

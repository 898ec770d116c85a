//! Domain records for courses, tasks and the weekly timetable.
//!
//! # Responsibility
//! - Define the canonical data structures owned by the store.
//! - Validate user-facing form input before it becomes a store command.
//!
//! # Invariants
//! - Every record carries a stable UUID identity.
//! - Serialized field names match the durable JSON layout exactly.

pub mod course;
pub mod task;
pub mod timetable;

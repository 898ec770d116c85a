//! Task domain model.
//!
//! # Responsibility
//! - Define the per-course task record and its wire casing.
//! - Validate task form input, including the raw minutes field.
//!
//! # Invariants
//! - `estimated_minutes` is a non-negative whole number of minutes.
//! - `kind` serializes as the upper-case wire names (`REVISION`, ...).
//! - A task's `course_id` references a course that existed when the task
//!   was constructed.

use crate::model::course::{Course, CourseId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Category of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    Revision,
    Assignment,
    Project,
    Test,
}

/// A unit of work belonging to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub course_id: CourseId,
    pub title: String,
    /// Serialized as `type` to match the durable schema naming.
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Estimated effort in minutes.
    #[serde(rename = "estimatedTime")]
    pub estimated_minutes: u32,
    pub is_completed: bool,
}

/// Rejected task form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task title is empty after trimming.
    BlankTitle,
    /// Minutes field is not a plain non-negative integer.
    InvalidMinutes(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::InvalidMinutes(input) => {
                write!(f, "invalid estimated minutes `{input}`; expected a non-negative integer")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Parses the raw minutes form field into a minute count.
///
/// Rejects anything that is not a plain non-negative integer, so no task is
/// ever constructed from a failed numeric parse.
pub fn parse_estimated_minutes(input: &str) -> Result<u32, TaskValidationError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| TaskValidationError::InvalidMinutes(input.to_string()))
}

/// Validated input for the add-task command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    course_id: CourseId,
    title: String,
    kind: TaskKind,
    estimated_minutes: u32,
}

impl NewTask {
    /// Validates raw task form input against an existing course.
    ///
    /// Taking the `Course` value (rather than a bare id) ties the new task to
    /// a course that exists at creation time.
    pub fn new(
        course: &Course,
        title: &str,
        kind: TaskKind,
        estimated_minutes: u32,
    ) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(Self {
            course_id: course.id,
            title: title.to_string(),
            kind,
            estimated_minutes,
        })
    }

    pub(crate) fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4(),
            course_id: self.course_id,
            title: self.title,
            kind: self.kind,
            estimated_minutes: self.estimated_minutes,
            is_completed: false,
        }
    }
}

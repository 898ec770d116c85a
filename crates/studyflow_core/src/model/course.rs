//! Course domain model.
//!
//! # Responsibility
//! - Define the course record and its creation-time validation.
//!
//! # Invariants
//! - `id` is stable and never reused for another course.
//! - `name` and `instructor` are non-blank at creation time.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a course.
pub type CourseId = Uuid;

/// A subject the user is tracking, with an instructor name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub instructor: String,
}

/// Rejected course form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseValidationError {
    /// Course name is empty after trimming.
    BlankName,
    /// Instructor name is empty after trimming.
    BlankInstructor,
}

impl Display for CourseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "course name must not be blank"),
            Self::BlankInstructor => write!(f, "instructor name must not be blank"),
        }
    }
}

impl Error for CourseValidationError {}

/// Validated input for the add-course command.
///
/// Construction is the validation step: once a `NewCourse` exists, the store
/// accepts it unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    name: String,
    instructor: String,
}

impl NewCourse {
    /// Validates raw form input. Surrounding whitespace is trimmed.
    pub fn new(name: &str, instructor: &str) -> Result<Self, CourseValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CourseValidationError::BlankName);
        }
        let instructor = instructor.trim();
        if instructor.is_empty() {
            return Err(CourseValidationError::BlankInstructor);
        }
        Ok(Self {
            name: name.to_string(),
            instructor: instructor.to_string(),
        })
    }

    pub(crate) fn into_course(self) -> Course {
        Course {
            id: Uuid::new_v4(),
            name: self.name,
            instructor: self.instructor,
        }
    }
}

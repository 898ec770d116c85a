//! Derived course-progress computation.
//!
//! # Responsibility
//! - Fold a course's tasks into minute totals and a completion ratio.
//!
//! # Invariants
//! - Pure and stateless; callers recompute on every read.
//! - The ratio is always a finite value in `[0, 1]`, never NaN.

use crate::model::course::CourseId;
use crate::model::task::Task;

/// Minute totals and completion ratio for one course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseProgress {
    /// Sum of estimated minutes over the course's tasks.
    pub total_minutes: u64,
    /// Sum of estimated minutes over the completed subset.
    pub completed_minutes: u64,
    /// `completed / total`, or `0.0` for a course with no estimated work.
    pub ratio: f64,
}

impl CourseProgress {
    /// Completion as a whole percentage, rounded half away from zero.
    pub fn percent(&self) -> u8 {
        (self.ratio * 100.0).round() as u8
    }
}

/// Computes progress for `course_id` over the full task collection.
pub fn course_progress(course_id: CourseId, tasks: &[Task]) -> CourseProgress {
    let mut total_minutes = 0u64;
    let mut completed_minutes = 0u64;
    for task in tasks.iter().filter(|task| task.course_id == course_id) {
        total_minutes += u64::from(task.estimated_minutes);
        if task.is_completed {
            completed_minutes += u64::from(task.estimated_minutes);
        }
    }

    let ratio = if total_minutes > 0 {
        completed_minutes as f64 / total_minutes as f64
    } else {
        0.0
    };

    CourseProgress {
        total_minutes,
        completed_minutes,
        ratio,
    }
}

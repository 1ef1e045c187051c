//! Completion percentage over a course tree.

use crate::model::{Chapter, Course};

/// Percentage of completed lessons across all chapters, rounded half-up.
///
/// Returns `0` for a course without lessons.
#[must_use]
pub fn course_progress(course: &Course) -> u8 {
    percent(course.completed_lessons(), course.total_lessons())
}

/// Integer `round(100 * completed / total)` with halves rounded up.
///
/// `completed` is clamped to `total`, so the result is always in `0..=100`.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    let rounded = (200 * completed + total) / (2 * total);
    // completed <= total keeps this at or below 100.
    u8::try_from(rounded).unwrap_or(100)
}

/// Completed/total counts with the derived percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressSummary {
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percent: percent(completed, total),
        }
    }

    #[must_use]
    pub fn of_course(course: &Course) -> Self {
        Self::new(course.completed_lessons(), course.total_lessons())
    }

    #[must_use]
    pub fn of_chapter(chapter: &Chapter) -> Self {
        Self::new(chapter.completed_count(), chapter.lesson_count())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

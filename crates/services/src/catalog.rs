use std::sync::Arc;

use course_core::ProgressSummary;
use course_core::model::{Course, CourseId};
use storage::repository::CourseRepository;

use crate::error::CatalogError;

/// One row of the course catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListItem {
    pub id: CourseId,
    pub title: String,
    pub instructor: String,
    pub chapter_count: usize,
    pub lesson_count: usize,
    pub progress: ProgressSummary,
}

impl CourseListItem {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id().clone(),
            title: course.title().to_owned(),
            instructor: course.instructor().to_owned(),
            chapter_count: course.chapter_count(),
            lesson_count: course.total_lessons(),
            progress: ProgressSummary::of_course(course),
        }
    }
}

/// Read-only listing of stored courses.
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// List courses ordered by id, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn list(&self, limit: u32) -> Result<Vec<CourseListItem>, CatalogError> {
        let courses = self.courses.list_courses(limit).await?;
        Ok(courses.iter().map(CourseListItem::from_course).collect())
    }
}

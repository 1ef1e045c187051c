use std::sync::Arc;

use async_trait::async_trait;
use course_core::model::{Course, CourseId};
use storage::repository::CourseRepository;

use crate::error::LoadError;

/// Source of course trees for the player.
#[async_trait]
pub trait CourseProvider: Send + Sync {
    /// Fetch and validate one course.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotFound` for an unknown id, `LoadError::Transport`
    /// when the backing service fails, and `LoadError::Malformed` when the
    /// document does not describe a valid course tree.
    async fn fetch_course(&self, id: &CourseId) -> Result<Course, LoadError>;
}

/// Provider backed by a `CourseRepository`.
#[derive(Clone)]
pub struct RepositoryCourseProvider {
    courses: Arc<dyn CourseRepository>,
}

impl RepositoryCourseProvider {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl CourseProvider for RepositoryCourseProvider {
    async fn fetch_course(&self, id: &CourseId) -> Result<Course, LoadError> {
        self.courses
            .get_course(id)
            .await
            .map_err(|e| LoadError::from_storage(id, e))?
            .ok_or_else(|| LoadError::NotFound { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{Chapter, Lesson, LessonKind};
    use course_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn fetches_stored_course() {
        let repo = InMemoryRepository::new();
        let id = CourseId::new("c").unwrap();
        let course = Course::new(
            id.clone(),
            "C",
            "",
            vec![
                Chapter::new(
                    "One",
                    "",
                    vec![Lesson::new("a", LessonKind::Video, "").unwrap()],
                )
                .unwrap(),
            ],
            fixed_now(),
        )
        .unwrap();
        repo.upsert_course(&course).await.unwrap();

        let provider = RepositoryCourseProvider::new(Arc::new(repo));
        assert_eq!(provider.fetch_course(&id).await.unwrap(), course);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let provider = RepositoryCourseProvider::new(Arc::new(InMemoryRepository::new()));
        let id = CourseId::new("X").unwrap();
        assert_eq!(
            provider.fetch_course(&id).await.unwrap_err(),
            LoadError::NotFound { id }
        );
    }
}

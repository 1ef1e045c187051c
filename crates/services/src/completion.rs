use std::sync::Arc;

use course_core::model::{Course, CourseId, Lesson};
use course_core::{Clock, CourseShape};
use storage::repository::{CourseRepository, StorageError};
use tracing::info;

use crate::error::CompletionError;

/// Writes lesson completion back to the course store.
///
/// A live `PlayerSession` is never patched; re-open the course to see the
/// new state.
#[derive(Clone)]
pub struct CompletionService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
}

impl CompletionService {
    #[must_use]
    pub fn new(clock: Clock, courses: Arc<dyn CourseRepository>) -> Self {
        Self { clock, courses }
    }

    /// Mark one lesson completed and persist the updated course.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Storage(NotFound)` for an unknown course,
    /// `CompletionError::Navigation` for an invalid position, and
    /// `CompletionError::Storage` for other repository failures.
    pub async fn mark_completed(
        &self,
        id: &CourseId,
        chapter: usize,
        lesson: usize,
    ) -> Result<Course, CompletionError> {
        let updated = self
            .update_lesson(id, chapter, lesson, |current| {
                Ok(current.with_completed(true))
            })
            .await?;
        info!(course_id = %id, chapter, lesson, "lesson marked completed");
        Ok(updated)
    }

    /// Record partial progress for an incomplete lesson.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Lesson` if `percent` is outside `0..=100`,
    /// plus the errors of [`CompletionService::mark_completed`].
    pub async fn record_progress(
        &self,
        id: &CourseId,
        chapter: usize,
        lesson: usize,
        percent: i64,
    ) -> Result<Course, CompletionError> {
        let updated = self
            .update_lesson(id, chapter, lesson, |current| {
                current.with_progress(percent).map_err(CompletionError::from)
            })
            .await?;
        info!(course_id = %id, chapter, lesson, percent, "lesson progress recorded");
        Ok(updated)
    }

    async fn update_lesson<F>(
        &self,
        id: &CourseId,
        chapter: usize,
        lesson: usize,
        apply: F,
    ) -> Result<Course, CompletionError>
    where
        F: FnOnce(Lesson) -> Result<Lesson, CompletionError> + Send,
    {
        let course = self
            .courses
            .get_course(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        CourseShape::of_course(&course).check_position(chapter, lesson)?;

        let current = course
            .lesson(chapter, lesson)
            .cloned()
            .ok_or(StorageError::NotFound)?;
        let replacement = apply(current)?;
        let updated = course
            .with_lesson(chapter, lesson, replacement, self.clock.now())
            .ok_or(StorageError::NotFound)?;
        self.courses.upsert_course(&updated).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use course_core::NavigationError;
    use course_core::model::{Chapter, CourseDocument, LessonError, LessonKind};
    use course_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn seeded() -> (InMemoryRepository, CourseId) {
        let id = CourseId::new("rust-101").unwrap();
        let course = Course::new(
            id.clone(),
            "Rust",
            "",
            vec![
                Chapter::new(
                    "One",
                    "",
                    vec![
                        Lesson::new("a", LessonKind::Video, "").unwrap(),
                        Lesson::new("b", LessonKind::Reading, "").unwrap(),
                    ],
                )
                .unwrap(),
                Chapter::new("Empty", "", Vec::new()).unwrap(),
            ],
            fixed_now(),
        )
        .unwrap();
        let repo = InMemoryRepository::new();
        repo.upsert_course(&course).await.unwrap();
        (repo, id)
    }

    fn service(repo: &InMemoryRepository) -> CompletionService {
        let clock = Clock::fixed(fixed_now() + Duration::minutes(5));
        CompletionService::new(clock, Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn mark_completed_persists_and_stamps_time() {
        let (repo, id) = seeded().await;
        let updated = service(&repo).mark_completed(&id, 0, 1).await.unwrap();

        assert!(updated.lesson(0, 1).unwrap().is_completed());
        assert_eq!(updated.updated_at(), fixed_now() + Duration::minutes(5));

        let stored = repo.get_course(&id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.completed_lessons(), 1);
    }

    #[tokio::test]
    async fn record_progress_validates_percent() {
        let (repo, id) = seeded().await;
        let svc = service(&repo);

        let updated = svc.record_progress(&id, 0, 0, 40).await.unwrap();
        assert_eq!(updated.lesson(0, 0).unwrap().progress(), Some(40));

        let err = svc.record_progress(&id, 0, 0, 140).await.unwrap_err();
        assert!(matches!(
            err,
            CompletionError::Lesson(LessonError::InvalidProgress(140))
        ));
    }

    #[tokio::test]
    async fn invalid_position_is_a_navigation_error() {
        let (repo, id) = seeded().await;
        let svc = service(&repo);

        assert!(matches!(
            svc.mark_completed(&id, 1, 0).await,
            Err(CompletionError::Navigation(
                NavigationError::LessonOutOfRange { .. }
            ))
        ));
        assert!(matches!(
            svc.mark_completed(&id, 7, 0).await,
            Err(CompletionError::Navigation(
                NavigationError::ChapterOutOfRange { .. }
            ))
        ));
        let stored = repo.get_course(&id).await.unwrap().unwrap();
        assert_eq!(stored.updated_at(), fixed_now());
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = service(&repo)
            .mark_completed(&CourseId::new("ghost").unwrap(), 0, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Storage(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn write_back_keeps_authored_lesson_type() {
        let id = CourseId::new("labels").unwrap();
        let course = CourseDocument::from_json(
            r#"{ "title": "Labels", "chapters": [ { "title": "One", "lessons": [
                { "title": "v", "type": "video" },
                { "title": "q", "type": "quiz" }
            ] } ] }"#,
        )
        .unwrap()
        .into_course(id.clone(), fixed_now())
        .unwrap();
        let repo = InMemoryRepository::new();
        repo.upsert_course(&course).await.unwrap();

        service(&repo).mark_completed(&id, 0, 1).await.unwrap();

        let stored = repo.get_course(&id).await.unwrap().unwrap();
        let json = CourseDocument::from(&stored).to_json().unwrap();
        assert!(json.contains(r#""type":"quiz""#), "{json}");
        assert!(stored.lesson(0, 1).unwrap().is_completed());
    }
}

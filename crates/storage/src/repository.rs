use async_trait::async_trait;
use course_core::model::{Course, CourseId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for course documents.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or replace a course document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID.
    ///
    /// Returns `Ok(None)` when no document has this id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored document is malformed,
    /// or other storage errors.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;

    /// List courses ordered by id, up to `limit`.
    ///
    /// Stored documents that no longer decode are skipped; `get_course`
    /// still reports them as `StorageError::Serialization`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing cannot be read.
    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError>;

    /// Remove a course document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no document has this id.
    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<BTreeMap<CourseId, Course>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(course.id().clone(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.values().take(limit).cloned().collect())
    }

    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError> {
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let courses: Arc<dyn CourseRepository> = Arc::new(InMemoryRepository::new());
        Self { courses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{Chapter, Lesson, LessonKind};
    use course_core::time::fixed_now;

    fn build_course(id: &str, done: bool) -> Course {
        let lessons = vec![
            Lesson::new("Intro", LessonKind::Video, "5 min")
                .unwrap()
                .with_completed(done),
        ];
        Course::new(
            CourseId::new(id).unwrap(),
            format!("Course {id}"),
            "Ada",
            vec![Chapter::new("One", "5 min", lessons).unwrap()],
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_existing_document() {
        let repo = InMemoryRepository::new();
        repo.upsert_course(&build_course("a", false)).await.unwrap();
        repo.upsert_course(&build_course("a", true)).await.unwrap();

        let id = CourseId::new("a").unwrap();
        let fetched = repo.get_course(&id).await.unwrap().unwrap();
        assert_eq!(fetched.completed_lessons(), 1);
    }

    #[tokio::test]
    async fn missing_course_is_none() {
        let repo = InMemoryRepository::new();
        let id = CourseId::new("nope").unwrap();
        assert!(repo.get_course(&id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_course(&id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_and_limited() {
        let storage = Storage::in_memory();
        for id in ["c", "a", "b"] {
            storage.courses.upsert_course(&build_course(id, false)).await.unwrap();
        }
        let listed = storage.courses.list_courses(2).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
